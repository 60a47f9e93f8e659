//! Streaming integration between acquisition and sinks
//!
//! The trigger engine itself is synchronous; this module wires it into a
//! thread-per-stage pipeline over bounded crossbeam channels:
//! - Acquisition sends [`SampleBatch`](crate::trigger::SampleBatch)es in.
//! - A [`TriggerStage`] owns the session registry and filters each batch.
//! - Sinks receive only the samples the trigger decision forwarded.

pub mod stage;

pub use stage::TriggerStage;
