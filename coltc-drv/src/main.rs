use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};

use coltc_drv::{Config, EmitType, Session};
use coltc_util::diagnostic::ColorConfig;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    if config.input_files.is_empty() {
        eprintln!("error: no input files");
        print_usage();
        return ExitCode::FAILURE;
    }

    match run(config) {
        Ok(failures) if failures == 0 => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<usize> {
    let mut session = Session::new(config);
    session.read_sources()?;
    session.compile()
}

fn parse_args(args: &[String]) -> Result<Config> {
    let mut config = Config::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--emit-tokens" => config.emit = EmitType::Tokens,
            "--emit-ast" => config.emit = EmitType::Ast,
            "--verbose" | "-v" => config.verbose = true,
            "-Werror" | "--warnings-as-errors" => config.warnings_as_errors = true,
            "--no-warn-shadowing" => config.warn_for.var_shadowing = false,
            "--no-warn-visibility" => config.warn_for.redundant_visibility = false,
            "--color" => {
                let value = iter.next();
                config.color = match value.map(String::as_str) {
                    Some("always") => ColorConfig::Always,
                    Some("never") => ColorConfig::Never,
                    Some("auto") => ColorConfig::Auto,
                    Some(other) => bail!("unknown --color value '{other}'"),
                    None => bail!("--color requires a value"),
                };
            }
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with('-') => bail!("unrecognized flag '{other}'"),
            other => config.input_files.push(PathBuf::from(other)),
        }
    }
    Ok(config)
}

fn print_usage() {
    eprintln!(
        "usage: coltc [options] <file>...\n\n\
         options:\n\
         \x20\x20--emit-tokens          print the lexer's token buffer\n\
         \x20\x20--emit-ast             print the built statement tree (default)\n\
         \x20\x20-v, --verbose          print progress to stderr\n\
         \x20\x20-Werror                treat warnings as errors\n\
         \x20\x20--no-warn-shadowing    silence variable-shadowing warnings\n\
         \x20\x20--no-warn-visibility   silence redundant-visibility warnings\n\
         \x20\x20--color <when>         always, never, or auto"
    );
}
