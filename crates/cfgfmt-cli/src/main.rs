//! Command-line front-end for `cfgfmt`. Not part of the core library.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use is_terminal::IsTerminal;

/// Read, validate, or query a cfgfmt document.
#[derive(Parser, Debug)]
#[command(name = "cfgfmt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Read, validate, or query a cfgfmt document", long_about = None)]
struct Cli {
    /// Input file. Reads from standard input when omitted and stdin is not
    /// a terminal, or when given as `-`.
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Validate the input and report success or failure only.
    #[arg(short = 't', long = "validate")]
    validate: bool,

    /// Look up a dotted path in the parsed document and print its value.
    #[arg(short = 'q', long = "query")]
    query: Option<String>,
}

fn read_source(input: &Option<PathBuf>) -> anyhow::Result<Vec<u8>> {
    let read_from_stdin = match input {
        Some(path) if path.as_os_str() == "-" => true,
        Some(_) => false,
        None => !std::io::stdin().is_terminal(),
    };

    if read_from_stdin {
        log::debug!("reading document from stdin");
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        let path = input
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No input file specified"))?;
        log::debug!("reading document from {}", path.display());
        Ok(std::fs::read(path)?)
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let source = read_source(&cli.input)?;
    let root = cfgfmt::parse(&source);

    if cli.validate {
        return Ok(if let Some(message) = root.as_error() {
            println!("Failed to parse: {message}");
            ExitCode::FAILURE
        } else {
            println!("Parsed successfully");
            ExitCode::SUCCESS
        });
    }

    if let Some(message) = root.as_error() {
        println!("Failed to parse: {message}");
        return Ok(ExitCode::FAILURE);
    }

    if let Some(path) = &cli.query {
        return Ok(match cfgfmt::query(&root, path) {
            Some(value) => {
                let text =
                    cfgfmt_encoder::serialize_fragment(value, cfgfmt_encoder::Flags::pretty())?;
                println!("{}", String::from_utf8_lossy(&text));
                ExitCode::SUCCESS
            }
            None => ExitCode::FAILURE,
        });
    }

    let text = cfgfmt_encoder::serialize(&root, cfgfmt_encoder::Flags::pretty())?;
    println!("{}", String::from_utf8_lossy(&text));
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
