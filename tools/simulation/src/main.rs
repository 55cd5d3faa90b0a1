//! feed-producer: fabricate an order-lifecycle stream onto a multicast group

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use simulation::config::SimConfig;
use simulation::runner;
use simulation::transport::UdpTransport;

#[derive(Parser, Debug)]
#[command(name = "feed-producer", version, about = "Multicast feed producer")]
struct Cli {
    /// TOML configuration file
    #[arg(long, default_value = "producer.toml")]
    config: PathBuf,

    /// Override the configured RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the configured events-per-second rate
    #[arg(long)]
    rate: Option<u32>,

    /// Override the configured run duration in seconds
    #[arg(long)]
    duration: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = SimConfig::from_path(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(rate) = cli.rate {
        config.messages_per_second = rate;
    }
    if let Some(duration) = cli.duration {
        config.duration_seconds = duration;
    }
    config.validate().context("config overrides")?;

    let mut transport = UdpTransport::new(config.multicast_address, config.port)
        .context("producer socket setup")?;

    let summary = runner::run(&config, &mut transport).context("producer run")?;
    println!(
        "{} in {} datagrams ({} bytes, {:.0} events/s)",
        summary.metrics.summary(),
        summary.datagrams,
        summary.bytes,
        summary.events_per_sec(),
    );

    Ok(())
}
