//! Trigger engine: configuration, per-channel handlers and the session registry

pub mod config;
pub mod errors;
pub mod handler;
pub mod registry;
pub mod sample;

pub use config::{TriggerConfig, TriggerKind};
pub use errors::{ConfigurationError, ParseError};
pub use handler::TriggerHandler;
pub use registry::{HandlerId, TriggerRegistry};
pub use sample::{ChannelId, Sample, SampleBatch};
