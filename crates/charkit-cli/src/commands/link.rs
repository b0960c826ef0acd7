//! Link command: run the companion-tool TCP session until it ends.

use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::link::{LinkConfig, LinkOutcome, LinkSession};

/// Binds the listener, probes the peer ports, and runs the session to
/// completion.
pub fn run(listen_port: u16, peer_ports: &[u16]) -> Result<ExitCode> {
    let config = LinkConfig {
        listen_port,
        peer_ports: peer_ports.to_vec(),
        ..LinkConfig::default()
    };
    let mut session =
        LinkSession::bind(config).with_context(|| format!("binding port {listen_port}"))?;
    println!(
        "{} listening on {}",
        "Link:".cyan().bold(),
        session.local_port()
    );

    match session.run() {
        LinkOutcome::Stopped => {
            println!("{} peer requested stop", "Link:".green().bold());
        }
        LinkOutcome::TimedOut => {
            println!("{} peer went silent", "Link:".yellow().bold());
        }
        LinkOutcome::NoPeer => {
            println!("{} no peer connected", "Link:".yellow().bold());
        }
    }
    Ok(ExitCode::SUCCESS)
}
