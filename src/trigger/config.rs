//! Trigger configuration and the token grammar that produces it

use super::errors::ParseError;
use super::sample::ChannelId;

/// Trigger kind
///
/// A closed set: either a constant decision (`AlwaysOff`, `AlwaysOn`) or an
/// edge detector with its threshold level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerKind {
    /// Suppress every sample
    AlwaysOff,
    /// Forward every sample
    AlwaysOn,
    /// Arm until the value crosses `level` from below
    EdgeRising { level: f64 },
    /// Arm until the value crosses `level` from above
    EdgeFalling { level: f64 },
}

/// Configuration for one trigger handler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerConfig {
    /// Trigger kind, including the threshold level for edge kinds
    pub kind: TriggerKind,
    /// Channel whose handler this trigger is linked to, if any
    pub source_channel: Option<ChannelId>,
    /// Pre-trigger history depth in samples. Meaningful for edge kinds only.
    pub history_offset: usize,
}

impl TriggerConfig {
    /// Create a configuration with no source channel and no history
    pub fn new(kind: TriggerKind) -> Self {
        Self {
            kind,
            source_channel: None,
            history_offset: 0,
        }
    }

    /// Rising-edge trigger at `level`
    pub fn edge_rising(level: f64) -> Self {
        Self::new(TriggerKind::EdgeRising { level })
    }

    /// Falling-edge trigger at `level`
    pub fn edge_falling(level: f64) -> Self {
        Self::new(TriggerKind::EdgeFalling { level })
    }

    /// Link this trigger to another channel's handler
    pub fn with_source_channel(mut self, channel: ChannelId) -> Self {
        self.source_channel = Some(channel);
        self
    }

    /// Set the pre-trigger history depth
    pub fn with_history_offset(mut self, offset: usize) -> Self {
        self.history_offset = offset;
        self
    }

    /// Threshold level, for edge kinds
    pub fn level(&self) -> Option<f64> {
        match self.kind {
            TriggerKind::EdgeRising { level } | TriggerKind::EdgeFalling { level } => Some(level),
            TriggerKind::AlwaysOff | TriggerKind::AlwaysOn => None,
        }
    }

    /// Parse a trigger description from its token form.
    ///
    /// The head token is the pair `(type_code, source_channel)`; `args` are
    /// the remaining tokens. Grammar:
    ///
    /// - `"off"` / `"on"` — no further tokens.
    /// - `"er"` / `"ef"` — exactly two tokens `<history_offset> <level>`,
    ///   base-10 integers, in that order.
    pub fn parse(
        type_code: &str,
        source_channel: Option<ChannelId>,
        args: &[&str],
    ) -> Result<Self, ParseError> {
        let config = match type_code {
            "off" => Self::new(TriggerKind::AlwaysOff),
            "on" => Self::new(TriggerKind::AlwaysOn),
            "er" => Self::parse_edge("er", args)?,
            "ef" => Self::parse_edge("ef", args)?,
            other => return Err(ParseError::UnrecognizedType(other.to_string())),
        };

        Ok(Self {
            source_channel,
            ..config
        })
    }

    /// Parse the `<history_offset> <level>` tail shared by both edge kinds
    fn parse_edge(code: &'static str, args: &[&str]) -> Result<Self, ParseError> {
        if args.len() < 2 {
            return Err(ParseError::MissingArgument(code));
        }

        let history_offset: usize =
            args[0]
                .parse()
                .map_err(|source| ParseError::InvalidNumber {
                    token: args[0].to_string(),
                    source,
                })?;
        let level = parse_int(args[1])? as f64;

        let kind = match code {
            "er" => TriggerKind::EdgeRising { level },
            _ => TriggerKind::EdgeFalling { level },
        };

        Ok(Self::new(kind).with_history_offset(history_offset))
    }
}

fn parse_int(token: &str) -> Result<i64, ParseError> {
    token.parse::<i64>().map_err(|source| ParseError::InvalidNumber {
        token: token.to_string(),
        source,
    })
}
