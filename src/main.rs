use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use rox::scanner::Scanner;
use rox::token::Token;
use rox::{Diagnostics, Lox, LoxError, RunStatus};

/// Exit code for lexical, syntax and resolution errors.
const EXIT_STATIC_ERROR: i32 = 65;

/// Exit code for runtime errors.
const EXIT_RUNTIME_ERROR: i32 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "Rox: a Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable logging to a file (default: rox.log)
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1, default_missing_value = "rox.log")]
    log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Runs a file as a Lox program
    Run { filename: PathBuf },

    /// Starts an interactive prompt (the default)
    Repl,
}

/// Memory‑maps `filename` and returns its contents as UTF‑8 text.
fn read_source(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename).with_context(|| format!("Failed to open file {:?}", filename))?;

    let len = file
        .metadata()
        .with_context(|| format!("Failed to stat file {:?}", filename))?
        .len();

    // Zero‑length files cannot be mapped on every platform.
    if len == 0 {
        return Ok(String::new());
    }

    // SAFETY: the mapping is copied out before this function returns and the
    // file is not written by this process.
    let map = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map file {:?}", filename))?;

    let text = std::str::from_utf8(&map)
        .map_err(LoxError::from)
        .with_context(|| format!("File {:?} is not valid UTF-8", filename))?;

    info!("Read {} bytes from {:?}", len, filename);

    Ok(text.to_owned())
}

fn init_logger(path: &Path) -> Result<()> {
    let log_file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;

    // Each record carries the module and source line that emitted it.
    Builder::new()
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("rox::").unwrap_or(module);
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to {:?}", path);
    Ok(())
}

fn print_diagnostics(diagnostics: &mut Diagnostics) {
    for error in diagnostics.drain() {
        debug!(
            "Reporting line {}: {}",
            error.line().unwrap_or(0),
            error.message()
        );
        eprintln!("{}", error);
    }
}

fn tokenize(filename: &Path, json: bool) -> Result<i32> {
    let source = read_source(filename)?;
    let mut tokens: Vec<Token> = Vec::new();
    let mut tokenized = true;

    for result in Scanner::new(&source) {
        match result {
            Ok(token) => tokens.push(token),
            Err(e) => {
                tokenized = false;
                eprintln!("{}", e);
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }

    Ok(if tokenized { 0 } else { EXIT_STATIC_ERROR })
}

fn run_file(filename: &Path) -> Result<i32> {
    let source = read_source(filename)?;
    let mut lox = Lox::new();
    let mut diagnostics = Diagnostics::new();

    let status = lox.run(&source, &mut diagnostics);
    print_diagnostics(&mut diagnostics);

    info!("Run finished: {:?}", status);

    Ok(match status {
        RunStatus::Ok => 0,
        RunStatus::StaticError => EXIT_STATIC_ERROR,
        RunStatus::RuntimeError => EXIT_RUNTIME_ERROR,
    })
}

fn run_prompt() -> Result<i32> {
    let mut lox = Lox::new();
    let mut diagnostics = Diagnostics::new();
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let status = lox.run(&line, &mut diagnostics);
        debug!("REPL line finished: {:?}", status);

        print_diagnostics(&mut diagnostics);
        diagnostics.reset();
    }

    Ok(0)
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    match &args.log {
        Some(path) => init_logger(path)?,
        None => {
            // Minimal logger so `log` macros have somewhere to go.
            Builder::new().filter_level(log::LevelFilter::Off).init();
        }
    }

    info!("CLI arguments: {:?}", args);

    let code = match args.command.unwrap_or(Commands::Repl) {
        Commands::Tokenize { filename, json } => tokenize(&filename, json)?,
        Commands::Run { filename } => run_file(&filename)?,
        Commands::Repl => run_prompt()?,
    };

    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
