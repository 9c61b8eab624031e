use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();
    print_row("defaults.transition", config.transition().name());
    let start = config.start_slide().unwrap_or(1).to_string();
    print_row("defaults.start_slide", &start);
    print_row(
        "defaults.reduced_motion",
        if config.reduced_motion() { "true" } else { "false" },
    );
    print_row("defaults.background", config.background().name());
    Ok(())
}

fn print_row(key: &str, value: &str) {
    println!("  {:<26}{}", key.cyan(), value);
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {} = {} ({})",
        "Saved".green().bold(),
        key,
        value,
        path.display()
    );
    Ok(())
}
