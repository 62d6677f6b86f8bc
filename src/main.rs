//! Glassbridge -- a Glass Bridge game engine speaking GBI.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG` to override
//! the level picked by `--verbose`.

use std::fs::OpenOptions;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use glassbridge::engine::Engine;
use glassbridge::protocol::parser::{parse_command, Command, ParseError};
use glassbridge::session::JsonLinesLogger;

#[derive(Parser)]
#[command(name = "glassbridge")]
#[command(about = "Glass Bridge game engine speaking a line-based protocol on stdin/stdout")]
struct Args {
    /// Seed for layout generation (0 = entropy)
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Append session records as JSON lines to this file
    #[arg(long)]
    session_log: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut engine = match &args.session_log {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            info!(path = %path.display(), "recording sessions");
            Engine::with_logger(JsonLinesLogger::new(BufWriter::new(file)))
        }
        None => Engine::new(),
    };
    if args.seed != 0 {
        engine.set_option("Seed", &args.seed.to_string())?;
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!(error = %e, "failed to read stdin");
                break;
            }
        };

        let cmd = match parse_command(&line) {
            Ok(c) => c,
            Err(ParseError::Empty) => continue,
            Err(e) => {
                debug!(error = %e, line = %line, "unparsable command");
                writeln!(out, "rejected {}", e)?;
                out.flush()?;
                continue;
            }
        };

        if cmd == Command::Quit {
            break;
        }
        engine.handle_command(cmd, &mut out)?;
    }

    if let Some(game) = engine.game.as_mut() {
        if !game.is_over() {
            info!("closing unfinished session on exit");
            game.finalize(false);
        }
    }
    Ok(())
}
