// std imports
use std::collections::VecDeque;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::exit;
// library imports
use indoc::indoc;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
// our imports
use backtrack::prelude::*;

const USAGE: &str = indoc! {r"
    USAGE:
        backtrack-json <file>
        backtrack-json -

    Calling `backtrack-json <file>` parses the JSON value in the given file and prints it back
    in compact form. Calling `backtrack-json -` does the same, but reads the value from stdin.
    Set `RUST_LOG=backtrack=debug` to log parse failures.
"};

#[derive(Debug, Error)]
enum Error {
    #[error("could not read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Parse(#[from] ParseError),
}

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq)]
struct MainConfig {
    command: Command,
    executable_name: String,
    help_flag: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Stdin,
    File(PathBuf),
    Error(Vec<String>),
}

impl MainConfig {
    pub fn new(mut args: VecDeque<String>) -> Self {
        let executable_name = args
            .pop_front()
            .unwrap_or_else(|| "backtrack-json".to_owned());
        let mut help_flag = false;
        args.retain(|arg| {
            let is_help_flag = arg == "--help" || arg == "-h";
            help_flag |= is_help_flag;
            !is_help_flag
        });
        let command = match &args.iter().map(|x| x.as_str()).collect::<Vec<_>>()[..] {
            ["-"] => Command::Stdin,
            [file] => Command::File(file.into()),
            _ => Command::Error(args.into()),
        };
        Self {
            command,
            executable_name,
            help_flag,
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.display().to_string(),
        source,
    })
}

fn run_text(text: &str) -> Result<()> {
    let value = json::parse(text)?;
    println!("{value}");
    Ok(())
}

fn handle_error<T, E: std::fmt::Display>(res: Result<T, E>) -> T {
    match res {
        Ok(value) => value,
        Err(err) => {
            eprintln!("Error: {err}");
            exit(1);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = MainConfig::new(std::env::args().collect());

    if config.help_flag {
        println!("{USAGE}");
        exit(0);
    }

    match config.command {
        Command::Stdin => {
            let text = handle_error(read_stdin());
            handle_error(run_text(&text));
        }
        Command::File(path_buf) => {
            let text = handle_error(read_file(&path_buf));
            handle_error(run_text(&text));
        }
        Command::Error(items) => {
            let items = items.join("\n");
            let name = config.executable_name;
            eprintln!("Error: {name} could not understand the command");
            eprintln!("Alien arguments: {items}");
            eprintln!("{USAGE}");
            exit(1);
        }
    }
}
