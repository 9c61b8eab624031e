use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agentdeck")]
#[command(author, version, about)]
#[command(long_about = "AI Agents for Developers, presented natively.\n\n\
    Without a deck file the built-in talk is shown. Decks are YAML or JSON\n\
    lists of slides.\n\n\
    Examples:\n  \
    agentdeck                        Present the built-in deck (fullscreen)\n  \
    agentdeck talk.yaml --windowed   Present a deck file in a window\n  \
    agentdeck validate talk.yaml     Check a deck for problems\n  \
    agentdeck export -o slides       Save every slide as PNG")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Deck file to present (YAML or JSON)
    pub deck: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// Disable entrance animations, transitions and the animated background
    #[arg(long, global = false)]
    pub reduced_motion: bool,

    /// Use the static cover background instead of the shader
    #[arg(long, global = false)]
    pub static_background: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a deck file and list every problem
    Validate {
        /// Deck file to check; the built-in deck when omitted
        deck: Option<PathBuf>,
    },

    /// Export slides as PNG images
    Export {
        /// Deck file to export; the built-in deck when omitted
        deck: Option<PathBuf>,

        /// Output directory for PNG files
        #[arg(short, long, default_value = "export")]
        output_dir: PathBuf,

        /// Export width in pixels
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Export height in pixels
        #[arg(long, default_value = "1080")]
        height: u32,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.transition, defaults.start_slide)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Tracing filter level implied by `-v`/`-q`.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Validate { deck }) => crate::commands::validate::run(deck.as_deref()),
            Some(Commands::Export {
                deck,
                output_dir,
                width,
                height,
            }) => crate::commands::export::run(deck, output_dir, width, height),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                crate::commands::version::run();
                Ok(())
            }
            None => {
                if let Some(deck) = &self.deck {
                    if !deck.exists() {
                        anyhow::bail!("File not found: {}", deck.display());
                    }
                }
                crate::app::run(crate::app::LaunchOptions {
                    deck: self.deck,
                    windowed: self.windowed,
                    slide: self.slide,
                    reduced_motion: self.reduced_motion,
                    static_background: self.static_background,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("agentdeck").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_present_flags() {
        let cli = parse(&["talk.yaml", "--windowed", "--slide", "4", "--reduced-motion"]);
        assert_eq!(cli.deck, Some(PathBuf::from("talk.yaml")));
        assert!(cli.windowed);
        assert_eq!(cli.slide, Some(4));
        assert!(cli.reduced_motion);
        assert!(!cli.static_background);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_no_deck_presents_builtin() {
        let cli = parse(&[]);
        assert!(cli.deck.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_export_defaults() {
        let cli = parse(&["export"]);
        match cli.command {
            Some(Commands::Export {
                deck,
                output_dir,
                width,
                height,
            }) => {
                assert!(deck.is_none());
                assert_eq!(output_dir, PathBuf::from("export"));
                assert_eq!((width, height), (1920, 1080));
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_log_level() {
        assert_eq!(parse(&[]).log_level(), tracing::Level::WARN);
        assert_eq!(parse(&["-v"]).log_level(), tracing::Level::DEBUG);
        assert_eq!(parse(&["-vv"]).log_level(), tracing::Level::TRACE);
        assert_eq!(parse(&["-q", "-v"]).log_level(), tracing::Level::ERROR);
    }
}
