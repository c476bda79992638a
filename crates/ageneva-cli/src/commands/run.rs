//! Run command - local strategy-applying relay
//!
//! Listens on a local address and forwards each connection to a fixed
//! upstream, pushing client-to-upstream bytes through the strategy
//! adapter so every request is mutated before it leaves the machine.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::io;
use std::net::{Shutdown, TcpListener, TcpStream};
use std::path::PathBuf;
use std::thread;
use tracing::{debug, error, info};

use ageneva_core::Client;

use super::StrategyPick;
use crate::config::Config;

/// Run command arguments
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub pick: StrategyPick,

    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    pub listen: String,

    /// Upstream address to forward requests to
    #[arg(short, long)]
    pub upstream: Option<String>,

    /// Configuration file (replaces the other flags)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Execute run command
pub fn execute(args: RunArgs) -> Result<()> {
    let (listen, upstream, strategy) = match &args.config {
        Some(path) => {
            let config = Config::load(path)?;
            config.validate()?;
            let strategy = StrategyPick {
                strategy: config.strategy.clone(),
                country: config.country.clone(),
                index: config.index,
            }
            .resolve()?;
            let upstream = config.upstream.clone().context("config must set 'upstream'")?;
            (config.listen, upstream, strategy)
        }
        None => {
            let upstream = args
                .upstream
                .clone()
                .context("--upstream is required unless --config is given")?;
            (args.listen.clone(), upstream, args.pick.resolve()?)
        }
    };

    let client = Client::new(&strategy)?;
    let listener =
        TcpListener::bind(&listen).with_context(|| format!("Failed to bind {listen}"))?;

    println!(
        "{} {} {} {}",
        "Relaying".green().bold(),
        listen,
        "->".dimmed(),
        upstream
    );
    println!("  strategy: {}", strategy.dimmed());
    info!(%listen, %upstream, "relay started");

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let client = client.clone();
                let upstream = upstream.clone();
                thread::spawn(move || {
                    if let Err(e) = relay(stream, &client, &upstream) {
                        error!("relay connection failed: {:#}", e);
                    }
                });
            }
            Err(e) => error!("accept failed: {}", e),
        }
    }

    Ok(())
}

/// Pump one downstream connection through a strategy-applying upstream
/// connection. Requests must carry a Content-Length header, since the
/// adapter uses it to frame request cycles; responses stream back
/// untouched.
fn relay(downstream: TcpStream, client: &Client, upstream: &str) -> Result<()> {
    let peer = downstream.peer_addr().ok();
    debug!(?peer, "accepted connection");

    let mut upstream_conn = client
        .connect(upstream)
        .with_context(|| format!("Failed to connect to {upstream}"))?;

    let mut down_read = downstream
        .try_clone()
        .context("Failed to clone downstream socket")?;
    let mut down_write = downstream;
    let mut up_read = upstream_conn
        .get_ref()
        .try_clone()
        .context("Failed to clone upstream socket")?;

    let responses = thread::spawn(move || {
        let _ = io::copy(&mut up_read, &mut down_write);
        let _ = down_write.shutdown(Shutdown::Write);
    });

    let result = io::copy(&mut down_read, &mut upstream_conn);
    let _ = upstream_conn.get_ref().shutdown(Shutdown::Write);
    let _ = responses.join();

    result.context("request relay failed")?;
    debug!(?peer, "connection closed");
    Ok(())
}
