//! `appcast-verify`: check a signature map against the assets and a public key.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use appcast_cli::bootstrap;
use appcast_cli::theme::Theme;
use appcast_cli::verify::{load_public_key, verify_assets};
use appcast_feed::SignatureMap;
use clap::Parser;

/// Verify release assets against their recorded Ed25519 signatures
#[derive(Parser)]
#[command(name = "appcast-verify", version, about, long_about = None)]
struct Cli {
    /// Public key: a file containing it, or the base64 text itself
    #[arg(long, value_name = "FILE|BASE64")]
    public_key: String,

    /// Directory holding the release assets [default: from config, `dist`]
    assets_dir: Option<PathBuf>,

    /// Signature map [default: `signatures.json` in the assets directory]
    #[arg(long, value_name = "PATH")]
    signatures: Option<PathBuf>,

    /// Configuration file
    #[arg(long, env = "APPCAST_SIGNER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => {},
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{}", Theme::error(&format!("{e:#}")));
            process::exit(1);
        },
    }
}

/// Returns whether every entry verified.
fn run(cli: Cli) -> Result<bool> {
    let config = bootstrap::init(cli.config.as_deref(), cli.verbose)?;
    let public_key = load_public_key(&cli.public_key).context("invalid public key")?;

    let assets_dir = cli.assets_dir.unwrap_or_else(|| config.signing.assets_dir.clone());
    let signatures_file = cli
        .signatures
        .unwrap_or_else(|| config.signing.signatures_path(&assets_dir));
    let signatures = SignatureMap::load(&signatures_file)?;

    let report = verify_assets(&public_key, &assets_dir, &signatures);
    for asset in &report.verified {
        println!("{}", Theme::success(&format!("{asset} verified")));
    }
    for asset in &report.mismatched {
        println!("{}", Theme::error(&format!("{asset}: signature does not match")));
    }
    for asset in &report.missing {
        println!("{}", Theme::warning(&format!("{asset}: file not found")));
    }
    println!(
        "{}",
        Theme::info(&format!(
            "{} verified, {} mismatched, {} missing (key {})",
            report.verified.len(),
            report.mismatched.len(),
            report.missing.len(),
            public_key.key_id_hex()
        ))
    );

    Ok(report.is_success())
}
