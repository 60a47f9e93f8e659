//! Example: a capture session with per-channel triggers
//!
//! Feeds synthetic ramp data for a few channels through a trigger stage and
//! prints the samples that make it past the trigger decision.
//!
//! Usage:
//!   cargo run --example capture_session -- \
//!       --trigger 0:er:2:4 --trigger 1:off --batches 8
//!
//! Trigger syntax: CHAN[@SRCCHAN]:CODE[:HOFFSET:LEVEL]
//!   0:on        channel 0, pass everything
//!   0:off       channel 0, suppress everything
//!   2:er:10:50  channel 2, rising edge at level 50 with 10 samples of history
//!   3@2:ef:0:0  channel 3, falling edge at 0, source-linked to channel 2

use clap::Parser;
use crossbeam_channel::bounded;
use tracing::info;
use trigstream::{ChannelId, SampleBatch, TriggerConfig, TriggerRegistry, TriggerStage};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Trigger specs, one per channel (CHAN[@SRCCHAN]:CODE[:HOFFSET:LEVEL])
    #[arg(short, long = "trigger", required = true)]
    triggers: Vec<String>,

    /// Number of batches to generate per channel
    #[arg(short, long, default_value = "8")]
    batches: usize,

    /// Samples per batch
    #[arg(long, default_value = "4")]
    batch_size: usize,
}

/// Parse one CHAN[@SRCCHAN]:CODE[:HOFFSET:LEVEL] spec into its parts
fn parse_spec(spec: &str) -> Result<(ChannelId, TriggerConfig), Box<dyn std::error::Error>> {
    let mut parts = spec.split(':');
    let head = parts.next().unwrap_or_default();
    let (chan, src) = match head.split_once('@') {
        Some((c, s)) => (c.parse::<ChannelId>()?, Some(s.parse::<ChannelId>()?)),
        None => (head.parse::<ChannelId>()?, None),
    };

    let code = parts.next().ok_or("missing trigger type code")?;
    let args: Vec<&str> = parts.collect();
    let config = TriggerConfig::parse(code, src, &args)?;
    Ok((chan, config))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut registry = TriggerRegistry::new();
    let mut channels = Vec::new();
    for spec in &args.triggers {
        let (chan, config) = parse_spec(spec)?;
        registry.register(chan, config)?;
        channels.push(chan);
        info!("channel {}: {:?}", chan, config);
    }

    let (batch_tx, batch_rx) = bounded::<SampleBatch>(64);
    let (out_tx, out_rx) = bounded::<SampleBatch>(64);
    let stage = TriggerStage::new("trigger_stage", registry).spawn(batch_rx, out_tx);

    // Synthetic acquisition: each channel ramps up from below zero, so edge
    // triggers with a positive level fire partway through the run.
    let producer = std::thread::spawn(move || {
        let mut t: i64 = -((args.batches * args.batch_size / 2) as i64);
        for _ in 0..args.batches {
            for &chan in &channels {
                let values: Vec<f64> = (0..args.batch_size)
                    .map(|i| (t + i as i64) as f64)
                    .collect();
                if batch_tx.send(SampleBatch::from_values(chan, &values)).is_err() {
                    return;
                }
            }
            t += args.batch_size as i64;
        }
    });

    for batch in out_rx.iter() {
        let values: Vec<f64> = batch.samples.iter().map(|s| s.value).collect();
        println!("chan {} -> {:?}", batch.channel, values);
    }

    producer.join().expect("producer thread panicked");
    let registry = stage.join().expect("stage thread panicked");
    for (id, handler) in registry.iter() {
        info!(
            "handler {} (channel {}): latched={}",
            id.as_usize(),
            handler.channel(),
            handler.latched()
        );
    }

    Ok(())
}
