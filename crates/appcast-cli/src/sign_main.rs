//! `appcast-sign`: sign release assets and add the signatures to the appcasts.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use appcast_cli::assets::{FeedStatus, SignOutcome, SignRequest, SigningReport, sign_assets};
use appcast_cli::bootstrap;
use appcast_cli::theme::Theme;
use clap::Parser;

/// Sign release assets with Ed25519 and update the appcast feeds
#[derive(Parser)]
#[command(name = "appcast-sign", version, about, long_about = None)]
struct Cli {
    /// Directory holding the release assets [default: from config, `dist`]
    assets_dir: Option<PathBuf>,

    /// Feed document to patch; repeat for several. Replaces the configured list
    #[arg(long = "feed", value_name = "PATH")]
    feeds: Vec<PathBuf>,

    /// Configuration file
    #[arg(long, env = "APPCAST_SIGNER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{}", Theme::error(&format!("{e:#}")));
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = bootstrap::init(cli.config.as_deref(), cli.verbose)?;
    let secret = appcast_config::resolve_secret(&config);
    let request = SignRequest::from_config(&config, cli.assets_dir, cli.feeds);

    match sign_assets(&request, secret.as_ref())? {
        SignOutcome::Skipped => {
            println!(
                "{}",
                Theme::warning(&format!(
                    "{} is not set; skipping signature generation",
                    config.signing.secret_env
                ))
            );
        },
        SignOutcome::Completed(report) => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &SigningReport) {
    if let Some(backend) = report.backend {
        println!("{}", Theme::dimmed(&format!("using {backend}")));
    }
    for (asset, _) in report.signatures.iter() {
        println!("{}", Theme::success(&format!("Signed {asset}")));
    }
    for failure in &report.failures {
        println!("{}", Theme::error(&format!("Could not sign {}: {}", failure.asset, failure.error)));
    }
    println!(
        "{}",
        Theme::info(&format!("Saved signatures to {}", report.signatures_file.display()))
    );

    for feed in &report.feeds {
        match feed {
            FeedStatus::Patched(outcome) if outcome.signed.is_empty() => println!(
                "{}",
                Theme::dimmed(&format!("{} already up to date", outcome.path.display()))
            ),
            FeedStatus::Patched(outcome) => println!(
                "{}",
                Theme::success(&format!(
                    "Updated {} ({})",
                    outcome.path.display(),
                    outcome.signed.join(", ")
                ))
            ),
            FeedStatus::Missing(path) => {
                println!("{}", Theme::dimmed(&format!("{} not found, skipped", path.display())));
            },
            FeedStatus::Failed(e) => println!("{}", Theme::error(&e.to_string())),
        }
    }
}
