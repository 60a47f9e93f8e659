//! Streaming multi-channel trigger engine for instrumentation capture
//!
//! Given successive batches of numeric samples arriving per channel, the
//! engine decides which samples are worth forwarding downstream, emulating an
//! oscilloscope trigger: arm, detect the level crossing, latch, then pass
//! everything.
//!
//! # Architecture
//!
//! - **TriggerConfig**: trigger kind and parameters, with a small token
//!   grammar (`off`, `on`, `er`, `ef`) for CLI-style construction
//! - **TriggerHandler**: per-channel stateful stream filter — edge detection,
//!   pre-trigger history buffering, one-shot latch
//! - **TriggerRegistry**: session-scoped ordered collection of handlers with
//!   cross-channel source lookup and bulk reset
//! - **TriggerStage**: thread-per-stage crossbeam work loop applying a
//!   registry to a stream of tagged batches
//!
//! # Example
//!
//! ```
//! use trigstream::{Sample, TriggerConfig, TriggerRegistry};
//!
//! let mut registry = TriggerRegistry::new();
//! let id = registry.register(0, TriggerConfig::edge_rising(4.0).with_history_offset(2))?;
//!
//! let handler = registry.get_mut(id).unwrap();
//! assert!(handler.data_triggered(vec![Sample::new(4.0), Sample::new(2.0)]).is_empty());
//!
//! // 2 -> 10 crosses the level; history is prepended, then everything passes
//! let out = handler.data_triggered(vec![Sample::new(10.0), Sample::new(11.0)]);
//! assert_eq!(out.iter().map(|s| s.value).collect::<Vec<_>>(), vec![4.0, 2.0, 10.0, 11.0]);
//! # Ok::<(), trigstream::ConfigurationError>(())
//! ```

use thiserror::Error;

pub mod stream;
pub mod trigger;

pub use stream::TriggerStage;
pub use trigger::{
    ChannelId, ConfigurationError, HandlerId, ParseError, Sample, SampleBatch, TriggerConfig,
    TriggerHandler, TriggerKind, TriggerRegistry,
};

/// Top-level error type aggregating the fallible surfaces of the crate
#[derive(Error, Debug)]
pub enum TrigStreamError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}
