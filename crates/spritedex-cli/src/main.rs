//! Spritedex CLI - Command-line interface for sprite sheet catalogs
//!
//! This binary provides commands for validating tile tables, inspecting
//! catalogs, resolving appearances, and sampling animations.

use clap::Parser;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use spritedex_cli::commands;

mod cli_args;

use cli_args::{Cli, Commands};

fn init_logging(verbose: bool, no_color: bool) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();
    // A subscriber may already be installed when embedded; logging is best effort.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(cli.verbose, cli.no_color);

    let result = match cli.command {
        Commands::Validate {
            table,
            profile,
            json,
        } => commands::validate::run(&table, profile.as_deref(), json),
        Commands::Inspect { table, json } => commands::inspect::run(&table, json),
        Commands::Resolve {
            table,
            kind,
            imageset,
            direction,
            subclass,
            at,
            json,
        } => commands::resolve::run(
            &table,
            commands::resolve::QueryArgs {
                kind: &kind,
                imageset: &imageset,
                direction: &direction,
                subclass: subclass.as_deref(),
            },
            at,
            json,
        ),
        Commands::Sample {
            table,
            tile,
            from,
            to,
            step,
            json,
        } => commands::sample::run(
            &table,
            tile,
            commands::sample::SampleRange { from, to, step },
            json,
        ),
        Commands::Convert {
            input,
            output,
            allow_invalid,
            json,
        } => commands::convert::run(&input, &output, allow_invalid, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_validate() {
        let cli = Cli::try_parse_from([
            "spritedex",
            "validate",
            "--table",
            "characters.json",
            "--profile",
            "strict",
        ])
        .unwrap();
        match cli.command {
            Commands::Validate {
                table,
                profile,
                json,
            } => {
                assert_eq!(table, "characters.json");
                assert_eq!(profile.as_deref(), Some("strict"));
                assert!(!json);
            }
            _ => panic!("expected validate command"),
        }
    }

    #[test]
    fn test_cli_parses_resolve_defaults() {
        let cli = Cli::try_parse_from([
            "spritedex",
            "resolve",
            "-t",
            "characters.tsj",
            "--imageset",
            "boy",
            "--direction",
            "down",
        ])
        .unwrap();
        match cli.command {
            Commands::Resolve {
                kind,
                imageset,
                subclass,
                at,
                ..
            } => {
                assert_eq!(kind, "creature");
                assert_eq!(imageset, "boy");
                assert_eq!(subclass, None);
                assert_eq!(at, 0);
            }
            _ => panic!("expected resolve command"),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "spritedex",
            "inspect",
            "--table",
            "characters.json",
            "-v",
            "--no-color",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(cli.no_color);
    }

    #[test]
    fn test_cli_parses_sample() {
        let cli = Cli::try_parse_from([
            "spritedex",
            "sample",
            "--table",
            "characters.json",
            "--tile",
            "3",
            "--to",
            "960",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Sample {
                tile,
                from,
                to,
                step,
                json,
                ..
            } => {
                assert_eq!(tile, 3);
                assert_eq!(from, 0);
                assert_eq!(to, Some(960));
                assert_eq!(step, None);
                assert!(json);
            }
            _ => panic!("expected sample command"),
        }
    }

    #[test]
    fn test_cli_requires_input_and_output_for_convert() {
        let err = Cli::try_parse_from(["spritedex", "convert", "--input", "a.tsj"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("--output"));
    }

    #[test]
    fn test_cli_rejects_negative_tile() {
        assert!(Cli::try_parse_from([
            "spritedex",
            "sample",
            "--table",
            "characters.json",
            "--tile",
            "-1",
        ])
        .is_err());
    }
}
