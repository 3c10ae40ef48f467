//! Command-line interface for pairlex
//! This binary dispatches the library's operations over strings supplied on
//! the command line.
//!
//! Usage:
//!   pairlex split `<text>` [--format `<format>`]             - Split into pair-protected tokens
//!   pairlex pairs `<text>` [--format `<format>`]             - Show the matched pair tree
//!   pairlex compile `<expr>` [--format `<format>`]           - Compile a boolean expression
//!   pairlex eval `<expr>` --names a,b,c                     - Evaluate an expression
//!
//! All subcommands accept `--config <yaml>` to override the delimiter,
//! separator, operator, and constant tables.

use clap::{Arg, Command};
use std::collections::HashSet;
use std::path::Path;
use std::process;

use pairlex::config::FileConfig;
use pairlex::{argument_split_with, compile_with, find_pairs_with, Pair};

fn main() {
    let matches = Command::new("pairlex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Pair-aware splitting and boolean expression evaluation")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("YAML configuration file overriding the default tables"),
        )
        .subcommand(
            Command::new("split")
                .about("Split text on separators outside matched pairs")
                .arg(Arg::new("text").help("Text to split").required(true).index(1))
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("pairs")
                .about("Show the matched delimiter pairs in text")
                .arg(Arg::new("text").help("Text to scan").required(true).index(1))
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("compile")
                .about("Compile a boolean expression and print its tree")
                .arg(
                    Arg::new("expression")
                        .help("Expression to compile")
                        .required(true)
                        .index(1),
                )
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("eval")
                .about("Evaluate a boolean expression against a set of true names")
                .arg(
                    Arg::new("expression")
                        .help("Expression to evaluate")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("names")
                        .long("names")
                        .short('n')
                        .value_delimiter(',')
                        .help("Comma-separated names considered true"),
                ),
        )
        .get_matches();

    let config = load_config(matches.get_one::<String>("config"));

    match matches.subcommand() {
        Some(("split", sub)) => {
            let text = sub.get_one::<String>("text").unwrap();
            let format = sub.get_one::<String>("format").unwrap();
            handle_split_command(text, format, &config);
        }
        Some(("pairs", sub)) => {
            let text = sub.get_one::<String>("text").unwrap();
            let format = sub.get_one::<String>("format").unwrap();
            handle_pairs_command(text, format, &config);
        }
        Some(("compile", sub)) => {
            let expression = sub.get_one::<String>("expression").unwrap();
            let format = sub.get_one::<String>("format").unwrap();
            handle_compile_command(expression, format, &config);
        }
        Some(("eval", sub)) => {
            let expression = sub.get_one::<String>("expression").unwrap();
            let names: HashSet<String> = sub
                .get_many::<String>("names")
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
            handle_eval_command(expression, &names, &config);
        }
        _ => unreachable!(),
    }
}

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format")
        .value_parser(["text", "json"])
        .default_value("text")
}

fn load_config(path: Option<&String>) -> FileConfig {
    match path {
        Some(path) => FileConfig::load(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        }),
        None => FileConfig::default(),
    }
}

/// Handle the split command
fn handle_split_command(text: &str, format: &str, config: &FileConfig) {
    let split_config = config.split_config().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });
    let tokens = argument_split_with(text, &split_config).unwrap_or_else(|e| {
        eprintln!("Split error: {}", e);
        process::exit(1);
    });
    match format {
        "json" => println!("{}", to_json(&tokens)),
        _ => {
            for token in tokens {
                println!("{}", token);
            }
        }
    }
}

/// Handle the pairs command
fn handle_pairs_command(text: &str, format: &str, config: &FileConfig) {
    let pair_config = config.pair_config().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });
    let pairs = find_pairs_with(text, &pair_config).unwrap_or_else(|e| {
        eprintln!("Pairing error: {}", e);
        process::exit(1);
    });
    match format {
        "json" => println!("{}", to_json(&pairs)),
        _ => {
            for pair in &pairs {
                print_pair(pair, text, 0);
            }
        }
    }
}

/// Handle the compile command
fn handle_compile_command(expression: &str, format: &str, config: &FileConfig) {
    let compiler_config = config.compiler_config().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });
    let compiled = compile_with(expression, &compiler_config).unwrap_or_else(|e| {
        eprintln!("Compile error: {}", e);
        process::exit(1);
    });
    match format {
        "json" => println!("{}", to_json(&compiled)),
        _ => println!("{}", compiled),
    }
}

/// Handle the eval command
fn handle_eval_command(expression: &str, names: &HashSet<String>, config: &FileConfig) {
    let compiler_config = config.compiler_config().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });
    let compiled = compile_with(expression, &compiler_config).unwrap_or_else(|e| {
        eprintln!("Compile error: {}", e);
        process::exit(1);
    });
    println!("{}", compiled.matches(names));
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Serialization error: {}", e);
        process::exit(1);
    })
}

/// Print one pair per line, children indented under their parent.
fn print_pair(pair: &Pair, source: &str, depth: usize) {
    let span = pair.outer_span();
    println!(
        "{}{}..{}  {}",
        "  ".repeat(depth),
        span.start,
        span.end,
        pair.outer_text(source)
    );
    for child in &pair.children {
        print_pair(child, source, depth + 1);
    }
}
