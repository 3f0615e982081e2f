#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays scripted pointer input against a fleet.

mod director;
mod layout_transfer;
mod script;
mod session;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    script::{Script, DEMO_SCRIPT},
    session::Session,
};

/// Replays a scripted deployment and battle, then prints both boards.
#[derive(Debug, Parser)]
#[command(name = "broadside", version)]
struct Args {
    /// TOML input script; the bundled demo runs when omitted.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
    /// Saved fleet layout restored when the battle starts.
    #[arg(long, value_name = "STRING")]
    layout: Option<String>,
    /// Seed for automatic deployment.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, value_name = "FILTER", default_value = "info")]
    log: String,
    /// Print the player's fleet layout after the run.
    #[arg(long)]
    export_layout: bool,
}

/// Entry point for the Broadside command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log);

    let text = match &args.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        None => DEMO_SCRIPT.to_owned(),
    };
    let script = Script::parse(&text).context("failed to parse input script")?;

    let mut session = Session::new(&script, args.layout.clone(), args.seed)
        .context("failed to deploy the opponent fleet")?;
    for (index, step) in script.steps.iter().enumerate() {
        session
            .apply(*step)
            .with_context(|| format!("step {} ({step:?}) failed", index + 1))?;
    }

    print!("{}", session.report());
    if args.export_layout {
        let layout = session
            .export_layout()
            .context("failed to encode the fleet layout")?;
        println!("{layout}");
    }
    Ok(())
}

fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
