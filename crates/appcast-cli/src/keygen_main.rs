//! `appcast-keygen`: generate the Ed25519 key pair used to sign Sparkle updates.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use appcast_cli::bootstrap;
use appcast_cli::instructions::SECURITY_NOTES;
use appcast_cli::keygen::{KeygenRequest, generate_keys};
use appcast_cli::theme::Theme;
use appcast_crypto::{Purpose, SignatureEngine};
use clap::Parser;

/// Generate an Ed25519 key pair for signing Sparkle updates
#[derive(Parser)]
#[command(name = "appcast-keygen", version, about, long_about = None)]
struct Cli {
    /// Directory to write the key files to
    #[arg(default_value = ".")]
    output_dir: PathBuf,

    /// Replace an existing private key
    #[arg(long)]
    force: bool,

    /// Configuration file
    #[arg(long, env = "APPCAST_SIGNER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{}", Theme::error(&format!("{e:#}")));
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = bootstrap::init(cli.config.as_deref(), cli.verbose)?;

    println!("{}", Theme::header("Generating Ed25519 key pair for Sparkle updates"));
    let engine = SignatureEngine::select(Purpose::KeyGeneration)?;

    let request = KeygenRequest::from_config(&config, &cli.output_dir, cli.force);
    let generated = generate_keys(&engine, &request)?;

    println!("{}", Theme::success("Keys generated"));
    println!("{}", Theme::kv("Backend", generated.backend));
    println!("{}", Theme::kv("Key ID", &generated.key_id));
    println!("{}", Theme::kv("Private key", &generated.private_key_file.display().to_string()));
    println!("{}", Theme::kv("Public key", &generated.public_key_file.display().to_string()));
    println!();

    println!("{}", Theme::header("Setup"));
    println!("{}", Theme::separator());
    println!("1. Info.plist configuration:\n");
    println!("{}", generated.snippet);
    println!("{}", Theme::info(&format!("Snippet saved to {}", generated.snippet_file.display())));
    println!();
    println!("2. CI secret ({}):", config.signing.secret_env);
    println!("{}", Theme::info(&format!("Instructions saved to {}", generated.guide_file.display())));
    println!();

    println!("{}", Theme::warning("Security notes:"));
    for note in SECURITY_NOTES {
        println!("   - {note}");
    }
    Ok(())
}
