//! Interactive prompts for flags the user left out.
//!
//! Each resolver takes the optional flag value and either accepts it,
//! asks on the terminal, or fails with a descriptive message when
//! stdin is not a terminal and nothing usable was passed.

use colored::*;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use std::io::IsTerminal;
use std::path::PathBuf;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn non_interactive() -> bool {
    !std::io::stdin().is_terminal()
}

/// Resolves the input workbook path, re-prompting until the file exists.
pub fn input_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    let mut candidate = flag;
    loop {
        match candidate.take() {
            Some(path) if path.is_file() => return Ok(path),
            Some(path) => {
                eprintln!(
                    "{} File not found: {}",
                    "!".yellow().bold(),
                    path.display()
                );
            }
            None => {}
        }

        if non_interactive() {
            return Err("no input file; pass --input with an existing .xlsx path".into());
        }

        let theme = ColorfulTheme::default();
        let entered = Input::<String>::with_theme(&theme)
            .with_prompt("Enter the Excel file path (.xlsx)")
            .interact()?;
        candidate = Some(PathBuf::from(entered.trim()));
    }
}

/// Resolves the sheet name against the workbook's actual sheets.
///
/// An invalid flag value falls back to a selection list rather than
/// failing outright, so a typo does not restart the whole run.
pub fn sheet_name(flag: Option<String>, available: &[&str]) -> Result<String> {
    if let Some(name) = flag {
        if available.contains(&name.as_str()) {
            return Ok(name);
        }
        eprintln!("{} Sheet '{}' not found.", "!".yellow().bold(), name);
    }

    if available.is_empty() {
        return Err("workbook has no sheets".into());
    }

    if non_interactive() {
        return Err(format!(
            "no sheet selected; pass --sheet (available: {})",
            available.join(", ")
        )
        .into());
    }

    let theme = ColorfulTheme::default();
    let index = Select::with_theme(&theme)
        .with_prompt("Select the sheet to convert")
        .items(available)
        .default(0)
        .interact()?;

    Ok(available[index].to_string())
}

/// Resolves the level count, defaulting to the detected value.
pub fn level_count(flag: Option<usize>, detected: usize) -> Result<usize> {
    if let Some(levels) = flag {
        return Ok(levels);
    }

    let fallback = detected.max(1);
    if non_interactive() {
        return Ok(fallback);
    }

    let theme = ColorfulTheme::default();
    let levels = Input::<usize>::with_theme(&theme)
        .with_prompt("Number of levels to map")
        .default(fallback)
        .interact()?;

    Ok(levels)
}

/// Resolves the output path. The `.json` suffix is handled by the caller.
pub fn output_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }

    if non_interactive() {
        return Err("no output path; pass --output".into());
    }

    let theme = ColorfulTheme::default();
    let entered = Input::<String>::with_theme(&theme)
        .with_prompt("Enter the output JSON file path")
        .interact()?;

    Ok(PathBuf::from(entered.trim()))
}
