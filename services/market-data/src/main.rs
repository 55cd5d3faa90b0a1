//! feed-consumer: join the multicast feed and rebuild the books

use std::net::Ipv4Addr;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use market_data::pipeline::{Pipeline, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "feed-consumer", version, about = "Multicast feed consumer")]
struct Cli {
    /// Multicast group to join
    #[arg(long, default_value = "239.1.1.1")]
    group: Ipv4Addr,

    /// UDP port
    #[arg(long, default_value_t = 12345)]
    port: u16,

    /// Local bind address
    #[arg(long, default_value = "0.0.0.0")]
    listen: Ipv4Addr,

    /// Suppress the top-of-book table; stats lines are still printed
    #[arg(long)]
    no_display: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig {
        group: cli.group,
        port: cli.port,
        listen: cli.listen,
        display_enabled: !cli.no_display,
        ..PipelineConfig::default()
    };

    let pipeline = Pipeline::start(config).context("pipeline startup failed")?;

    // Shutdown is signal-driven; everything else is the pipeline's job.
    let waiter = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("signal runtime")?;
    waiter.block_on(tokio::signal::ctrl_c()).context("await ctrl-c")?;

    info!("shutdown signal received");
    let totals = pipeline.stop();
    println!(
        "processed {} records in {} datagrams ({} dropped, {} parse errors)",
        totals.records_parsed,
        totals.packets_received,
        totals.packets_dropped,
        totals.parse_errors,
    );

    Ok(())
}
