//! Per-channel trigger handler — the edge-detection state machine
//!
//! A handler is an armed one-shot filter over a channel's sample stream:
//!
//!   1. While armed, it watches consecutive values (carried across batch
//!      boundaries) for a level crossing and buffers the most recent samples
//!      in a bounded pre-trigger history.
//!   2. On the first crossing it latches and emits the history followed by
//!      the crossing sample and everything after it.
//!   3. Once latched it passes every sample through verbatim. The latch never
//!      resets; a new capture session builds a fresh registry.

use std::collections::VecDeque;

use tracing::{debug, trace};

use super::config::{TriggerConfig, TriggerKind};
use super::registry::HandlerId;
use super::sample::{ChannelId, Sample};

/// Stateful stream filter for one channel
///
/// Constructed through [`TriggerRegistry::register`], which resolves the
/// optional source-channel link and appends the handler to the session
/// registry.
///
/// [`TriggerRegistry::register`]: super::registry::TriggerRegistry::register
#[derive(Debug)]
pub struct TriggerHandler<P = ()> {
    channel: ChannelId,
    config: TriggerConfig,

    /// Value of the last sample seen, carried across batches. `None` until
    /// the first sample ever; no crossing is possible without it.
    last_value: Option<f64>,

    /// Pre-trigger history, oldest first. Bounded by `config.history_offset`.
    history: VecDeque<Sample<P>>,

    /// One-shot latch. Never reverts to false.
    latched: bool,

    /// Handler resolved from `config.source_channel`, if any
    source: Option<HandlerId>,

    /// Handlers whose source resolved to this handler
    dependents: Vec<HandlerId>,
}

impl<P> TriggerHandler<P> {
    /// Create an unregistered handler. Source resolution and registration
    /// happen in the registry, which owns the only construction path.
    pub(super) fn new(channel: ChannelId, config: TriggerConfig, source: Option<HandlerId>) -> Self {
        Self {
            channel,
            config,
            last_value: None,
            history: VecDeque::with_capacity(config.history_offset),
            latched: false,
            source,
            dependents: Vec::new(),
        }
    }

    /// Channel this handler filters
    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// The configuration this handler was built from
    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    /// Whether the trigger has fired
    pub fn latched(&self) -> bool {
        self.latched
    }

    /// Handler this one is linked to as its trigger source, if any
    pub fn source(&self) -> Option<HandlerId> {
        self.source
    }

    /// Handlers that named this handler as their source.
    ///
    /// Bookkeeping only: how a source's latch state should affect its
    /// dependents' output is an extension point, deliberately undefined here.
    pub fn dependents(&self) -> &[HandlerId] {
        &self.dependents
    }

    pub(super) fn add_dependent(&mut self, id: HandlerId) {
        self.dependents.push(id);
    }

    /// Run one batch through the trigger decision.
    ///
    /// Returns the samples to forward downstream, in order. Total over any
    /// well-formed batch; never blocks.
    pub fn data_triggered(&mut self, batch: Vec<Sample<P>>) -> Vec<Sample<P>> {
        match self.config.kind {
            TriggerKind::AlwaysOff => Vec::new(),
            TriggerKind::AlwaysOn => batch,
            TriggerKind::EdgeRising { level } => self.edge_triggered(batch, level, true),
            TriggerKind::EdgeFalling { level } => self.edge_triggered(batch, level, false),
        }
    }

    fn edge_triggered(&mut self, batch: Vec<Sample<P>>, level: f64, rising: bool) -> Vec<Sample<P>> {
        // last_value always tracks the final sample of the batch, whether or
        // not anything fires. An empty batch leaves it alone.
        let batch_last = batch.last().map(|s| s.value);

        if self.latched {
            if batch_last.is_some() {
                self.last_value = batch_last;
            }
            return batch;
        }

        let crossing = self.find_crossing(&batch, level, rising);
        if batch_last.is_some() {
            self.last_value = batch_last;
        }

        match crossing {
            Some(i) => {
                self.latched = true;
                debug!(
                    channel = self.channel,
                    level,
                    rising,
                    batch_index = i,
                    "trigger latched"
                );

                // Pre-crossing samples join the history first, so the
                // emitted prefix is the true pre-trigger tail.
                let mut rest = batch.into_iter();
                for sample in rest.by_ref().take(i) {
                    self.push_history(sample);
                }

                let mut out: Vec<Sample<P>> = self.history.drain(..).collect();
                out.extend(rest);
                out
            }
            None => {
                trace!(channel = self.channel, "no crossing, buffering batch");
                for sample in batch {
                    self.push_history(sample);
                }
                Vec::new()
            }
        }
    }

    /// Index of the first level crossing in `batch`, scanning against the
    /// carried previous value.
    fn find_crossing(&self, batch: &[Sample<P>], level: f64, rising: bool) -> Option<usize> {
        let mut prev = self.last_value;
        for (i, sample) in batch.iter().enumerate() {
            if let Some(p) = prev {
                let crossed = if rising {
                    p < level && sample.value >= level
                } else {
                    p > level && sample.value <= level
                };
                if crossed {
                    return Some(i);
                }
            }
            prev = Some(sample.value);
        }
        None
    }

    /// FIFO push bounded by the configured history depth
    fn push_history(&mut self, sample: Sample<P>) {
        let capacity = self.config.history_offset;
        if capacity == 0 {
            return;
        }
        if self.history.len() == capacity {
            self.history.pop_front();
        }
        self.history.push_back(sample);
    }
}
