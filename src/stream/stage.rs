//! Trigger stage — streaming filter between acquisition and sinks
//!
//! Owns one capture session's [`TriggerRegistry`] and applies it to tagged
//! sample batches flowing over crossbeam channels, one thread per stage. The
//! acquisition side sends [`SampleBatch`]es in; only the samples the trigger
//! decision forwards come out the other end.

use crossbeam_channel::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, trace};

use crate::trigger::{SampleBatch, TriggerRegistry};

/// Streaming stage applying a session's trigger handlers to its batch stream
pub struct TriggerStage<P = ()> {
    name: String,
    registry: TriggerRegistry<P>,
    batches_in: u64,
    samples_in: u64,
    samples_out: u64,
}

impl<P> TriggerStage<P> {
    /// Create a stage owning `registry` for the duration of the session
    pub fn new(name: impl Into<String>, registry: TriggerRegistry<P>) -> Self {
        Self {
            name: name.into(),
            registry,
            batches_in: 0,
            samples_in: 0,
            samples_out: 0,
        }
    }

    /// Debug name of this stage
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The session registry this stage filters with
    pub fn registry(&self) -> &TriggerRegistry<P> {
        &self.registry
    }

    /// Mutable access, for registering handlers before the stage runs
    pub fn registry_mut(&mut self) -> &mut TriggerRegistry<P> {
        &mut self.registry
    }

    /// Take the registry back out of the stage
    pub fn into_registry(self) -> TriggerRegistry<P> {
        self.registry
    }

    /// Run one batch through the trigger decision for its channel.
    ///
    /// The batch is routed to the earliest-registered handler for the
    /// channel, the same deterministic rule source-channel resolution uses.
    /// Channels with no handler pass through unfiltered. Returns `None` when
    /// the handler suppressed every sample.
    pub fn process(&mut self, batch: SampleBatch<P>) -> Option<SampleBatch<P>> {
        self.batches_in += 1;
        self.samples_in += batch.samples.len() as u64;

        let channel = batch.channel;
        let Some(id) = self.registry.find_first_by_channel(channel) else {
            trace!(channel, "no handler, passing batch through");
            self.samples_out += batch.samples.len() as u64;
            return Some(batch);
        };

        let handler = self
            .registry
            .get_mut(id)
            .expect("id from registry lookup is valid");
        let samples = handler.data_triggered(batch.samples);
        self.samples_out += samples.len() as u64;

        if samples.is_empty() {
            trace!(channel, "batch suppressed");
            None
        } else {
            Some(SampleBatch { channel, samples })
        }
    }

    /// Work loop: filter batches from `input` into `output` until the input
    /// channel disconnects.
    ///
    /// Returns the registry so the caller can inspect trigger state or reuse
    /// it for another session after `clear()`.
    pub fn run(
        mut self,
        input: Receiver<SampleBatch<P>>,
        output: Sender<SampleBatch<P>>,
    ) -> TriggerRegistry<P> {
        debug!("[{}] Stage running with {} handlers", self.name, self.registry.count());

        while let Ok(batch) = input.recv() {
            if let Some(filtered) = self.process(batch) {
                if output.send(filtered).is_err() {
                    info!("[{}] Downstream disconnected, stopping", self.name);
                    break;
                }
            }
        }

        info!(
            "[{}] Shutdown. {} batches in, {} samples in, {} samples out.",
            self.name, self.batches_in, self.samples_in, self.samples_out
        );
        self.registry
    }
}

impl<P: Send + 'static> TriggerStage<P> {
    /// Start the stage on its own thread.
    ///
    /// The thread ends when the acquisition side drops its sender; joining
    /// yields the session registry back.
    pub fn spawn(
        self,
        input: Receiver<SampleBatch<P>>,
        output: Sender<SampleBatch<P>>,
    ) -> JoinHandle<TriggerRegistry<P>> {
        thread::spawn(move || self.run(input, output))
    }
}
