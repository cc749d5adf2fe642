//! Command-line interface for redpen
//! This binary runs the highlighting pipeline over a text file and an
//! upstream mistake list, for inspecting what a renderer would receive.
//!
//! Usage:
//!   redpen check `<text>` `<mistakes.json>` [--format `<format>`]  - Print the resolved token stream

use clap::{Arg, Command};
use std::fs;

use redpen::highlight::{highlight, MistakeDescriptor};

fn main() {
    let matches = Command::new("redpen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting mistake highlighting")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("check")
                .about("Resolve a mistake list against a text and print the token stream")
                .arg(
                    Arg::new("text")
                        .help("Path to the student text file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("mistakes")
                        .help("Path to the mistake list JSON file (an array of mistake objects)")
                        .required(true)
                        .index(2),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('json' or 'yaml')")
                        .default_value("json"),
                ),
        )
        .get_matches();

    // Handle subcommands
    match matches.subcommand() {
        Some(("check", check_matches)) => {
            let text_path = check_matches.get_one::<String>("text").unwrap();
            let mistakes_path = check_matches.get_one::<String>("mistakes").unwrap();
            let format = check_matches.get_one::<String>("format").unwrap();
            handle_check_command(text_path, mistakes_path, format);
        }
        _ => unreachable!(),
    }
}

/// Handle the check command
fn handle_check_command(text_path: &str, mistakes_path: &str, format: &str) {
    match run_check(text_path, mistakes_path, format) {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_check(
    text_path: &str,
    mistakes_path: &str,
    format: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(text_path)?;
    let payload = fs::read_to_string(mistakes_path)?;
    let mistakes: Vec<MistakeDescriptor> = serde_json::from_str(&payload)?;

    let outcome = highlight(Some(&text), &mistakes);

    match format {
        "json" => Ok(serde_json::to_string_pretty(&outcome)?),
        "yaml" => Ok(serde_yaml::to_string(&outcome)?),
        other => Err(format!("Unknown format: {} (expected 'json' or 'yaml')", other).into()),
    }
}
