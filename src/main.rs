use clap::Parser;
use deckpdf::{Deck, Pipeline, PipelineConfig};
use std::io::Read;
use std::path::PathBuf;

/// Render an HTML slide deck (JSON) into a fixed-geometry PDF.
#[derive(Parser, Debug)]
#[command(name = "deckpdf", version, about)]
struct Args {
    /// Deck JSON file ({"deckTitle": ..., "slides": [{"html": ..., "index": ...}]});
    /// reads stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output path; defaults to "{deckTitle}.pdf" in the working directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Per-slide load timeout in milliseconds
    #[arg(long, default_value_t = 30_000)]
    timeout_ms: u64,

    /// Post-load settle delay in milliseconds
    #[arg(long, default_value_t = 500)]
    settle_ms: u64,

    /// Include raw internal failure detail in error output
    #[arg(long)]
    verbose_diagnostics: bool,
}

fn read_deck(input: Option<&PathBuf>) -> anyhow::Result<Deck> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&raw)?)
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let deck = match read_deck(args.input.as_ref()) {
        Ok(deck) => deck,
        Err(e) => {
            eprintln!("failed to read deck: {}", e);
            std::process::exit(2);
        }
    };

    let config = PipelineConfig {
        load_timeout_ms: args.timeout_ms,
        settle_delay_ms: args.settle_ms,
        verbose_diagnostics: args.verbose_diagnostics,
    };
    let verbose = config.verbose_diagnostics;

    match Pipeline::new(config).run(&deck) {
        Ok(bytes) => {
            let path = args
                .output
                .unwrap_or_else(|| PathBuf::from(deck.pdf_filename()));
            if let Err(e) = std::fs::write(&path, &bytes) {
                eprintln!("failed to write {}: {}", path.display(), e);
                std::process::exit(1);
            }
            println!("{}", path.display());
        }
        Err(e) => {
            let payload = e.to_payload(verbose);
            eprintln!(
                "{}",
                serde_json::to_string(&payload)
                    .unwrap_or_else(|_| payload.error.clone())
            );
            std::process::exit(1);
        }
    }
}
