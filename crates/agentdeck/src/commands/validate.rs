use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::deck::{self, Deck, validate::validate};

/// Parse a deck and report every structural problem, not just the first.
pub fn run(path: Option<&Path>) -> Result<()> {
    let (name, slides) = match path {
        Some(path) => (path.display().to_string(), deck::parse_file(path)?),
        None => ("built-in deck".to_string(), Deck::builtin()?.slides().to_vec()),
    };

    let errors = validate(&slides);
    if errors.is_empty() {
        println!(
            "{} {} ({} slides)",
            "\u{2713}".green().bold(),
            name,
            slides.len()
        );
        return Ok(());
    }

    eprintln!("{} {}", "\u{2717}".red().bold(), name);
    for error in &errors {
        eprintln!("  {} {error}", "-".red());
    }
    anyhow::bail!(
        "{} problem{} found",
        errors.len(),
        if errors.len() == 1 { "" } else { "s" }
    )
}
