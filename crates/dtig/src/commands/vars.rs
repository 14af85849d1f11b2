//! Vars command - list reserved directive names

use anyhow::Result;
use colored::Colorize;
use dtig_core::template::{NameEntry, vocabulary};

pub fn run(json: bool) -> Result<()> {
    let vocabulary = vocabulary();

    if json {
        println!("{}", serde_json::to_string_pretty(&vocabulary)?);
        return Ok(());
    }

    print_names("Keywords", &vocabulary.keywords);
    print_names("Inline functions", &vocabulary.inline_functions);
    print_names("Loop variables", &vocabulary.loop_variables);
    print_names("Collections", &vocabulary.collections);
    print_entries("Constants", &vocabulary.constants);
    print_entries("Configuration keys", &vocabulary.config_keys);

    Ok(())
}

fn print_names<S: AsRef<str>>(title: &str, names: &[S]) {
    println!("{}", title.bold());
    for name in names {
        println!("  {}", name.as_ref());
    }
    println!();
}

fn print_entries(title: &str, entries: &[NameEntry]) {
    println!("{}", title.bold());
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in entries {
        println!("  {:width$}  {}", entry.name, entry.value.dimmed(), width = width);
    }
    println!();
}
