//! Core data types for trigger processing

use std::fmt;

/// Integer identifier of a capture channel
pub type ChannelId = u32;

/// One observation on a channel
///
/// Carries the numeric value used for level comparison plus an opaque payload
/// (timestamps, raw ADC words, whatever the acquisition layer attaches). The
/// payload is never inspected by the trigger engine; it is forwarded untouched
/// alongside the value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample<P = ()> {
    /// Comparison value for edge detection
    pub value: f64,
    /// Opaque caller payload, passed through unchanged
    pub payload: P,
}

impl Sample {
    /// Create a payload-less sample
    pub fn new(value: f64) -> Self {
        Self { value, payload: () }
    }
}

impl<P> Sample<P> {
    /// Create a sample with an attached payload
    pub fn with_payload(value: f64, payload: P) -> Self {
        Self { value, payload }
    }
}

impl<P> fmt::Display for Sample<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Sample[v={}]", self.value)
    }
}

/// A batch of samples from a single channel
///
/// The unit flowing between the acquisition layer, the trigger stage and the
/// sinks. Samples are ordered; batch boundaries carry no meaning beyond
/// "order preserved".
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBatch<P = ()> {
    /// Channel the samples were captured on
    pub channel: ChannelId,
    /// Ordered samples
    pub samples: Vec<Sample<P>>,
}

impl<P> SampleBatch<P> {
    /// Create a new batch
    pub fn new(channel: ChannelId, samples: Vec<Sample<P>>) -> Self {
        Self { channel, samples }
    }

    /// Number of samples in the batch
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the batch carries no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl SampleBatch {
    /// Build a payload-less batch from raw values, oldest first
    pub fn from_values(channel: ChannelId, values: &[f64]) -> Self {
        Self {
            channel,
            samples: values.iter().copied().map(Sample::new).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_display() {
        let s = Sample::new(3.5);
        assert_eq!(format!("{}", s), "Sample[v=3.5]");
    }

    #[test]
    fn test_payload_passthrough() {
        let s = Sample::with_payload(1.0, "meta");
        assert_eq!(s.value, 1.0);
        assert_eq!(s.payload, "meta");
    }

    #[test]
    fn test_batch_from_values() {
        let batch = SampleBatch::from_values(3, &[0.0, 1.0, 2.0]);
        assert_eq!(batch.channel, 3);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.samples[2], Sample::new(2.0));
    }
}
