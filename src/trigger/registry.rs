//! Session-scoped registry of trigger handlers
//!
//! Owns every handler constructed for a capture session, in construction
//! order, and records the cross-channel links between them. Each session owns
//! exactly one registry; `clear()` resets it between independent sessions.

use tracing::debug;

use super::config::TriggerConfig;
use super::errors::ConfigurationError;
use super::handler::TriggerHandler;
use super::sample::ChannelId;

/// Identifier of a handler within one registry
///
/// Indexes the registration order. Ids handed out before a `clear()` are
/// invalid afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

impl HandlerId {
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

/// Ordered collection of all live trigger handlers
///
/// Many handlers may share one channel id; lookups resolve to the
/// earliest-registered match.
#[derive(Debug, Default)]
pub struct TriggerRegistry<P = ()> {
    handlers: Vec<TriggerHandler<P>>,
}

impl<P> TriggerRegistry<P> {
    /// Create an empty registry for a new capture session
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Construct a handler and append it to the registry.
    ///
    /// If the config names a source channel, it must resolve to an
    /// already-registered handler for that channel (earliest-registered when
    /// several share it); the new handler is then recorded in that source's
    /// dependent set. On [`ConfigurationError::UnknownSourceChannel`] no
    /// handler is created and the registry is unchanged.
    pub fn register(
        &mut self,
        channel: ChannelId,
        config: TriggerConfig,
    ) -> Result<HandlerId, ConfigurationError> {
        let source = match config.source_channel {
            Some(src) => Some(
                self.find_first_by_channel(src)
                    .ok_or(ConfigurationError::UnknownSourceChannel(src))?,
            ),
            None => None,
        };

        let id = HandlerId(self.handlers.len());
        self.handlers.push(TriggerHandler::new(channel, config, source));

        if let Some(src_id) = source {
            self.handlers[src_id.0].add_dependent(id);
        }

        debug!(
            channel,
            id = id.0,
            source = source.map(|s| s.0),
            "trigger handler registered"
        );
        Ok(id)
    }

    /// First handler registered for `channel`, in registration order
    pub fn find_first_by_channel(&self, channel: ChannelId) -> Option<HandlerId> {
        self.handlers
            .iter()
            .position(|h| h.channel() == channel)
            .map(HandlerId)
    }

    /// Shared access to a handler
    pub fn get(&self, id: HandlerId) -> Option<&TriggerHandler<P>> {
        self.handlers.get(id.0)
    }

    /// Exclusive access to a handler, for feeding batches through it
    pub fn get_mut(&mut self, id: HandlerId) -> Option<&mut TriggerHandler<P>> {
        self.handlers.get_mut(id.0)
    }

    /// Number of registered handlers
    pub fn count(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Drop all handlers and their cross-links.
    ///
    /// Used between independent capture sessions. Handler ids from before the
    /// clear must not be used afterwards.
    pub fn clear(&mut self) {
        debug!(count = self.handlers.len(), "clearing trigger registry");
        self.handlers.clear();
    }

    /// Iterate handlers in registration order
    pub fn iter(&self) -> impl Iterator<Item = (HandlerId, &TriggerHandler<P>)> {
        self.handlers
            .iter()
            .enumerate()
            .map(|(i, h)| (HandlerId(i), h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::config::TriggerKind;

    #[test]
    fn test_register_and_count() {
        let mut registry: TriggerRegistry = TriggerRegistry::new();
        assert_eq!(registry.count(), 0);
        assert!(registry.is_empty());

        let th0 = registry
            .register(0, TriggerConfig::new(TriggerKind::AlwaysOff))
            .unwrap();
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.get(th0).unwrap().channel(), 0);
        assert_eq!(registry.get(th0).unwrap().source(), None);
        assert!(registry.get(th0).unwrap().dependents().is_empty());
    }

    #[test]
    fn test_many_handlers_per_channel() {
        let mut registry: TriggerRegistry = TriggerRegistry::new();
        let a = registry
            .register(0, TriggerConfig::new(TriggerKind::AlwaysOff))
            .unwrap();
        let b = registry
            .register(0, TriggerConfig::new(TriggerKind::AlwaysOn))
            .unwrap();

        assert_eq!(registry.count(), 2);
        assert_ne!(a, b);
        // Lookup resolves to the earliest-registered handler
        assert_eq!(registry.find_first_by_channel(0), Some(a));
    }

    #[test]
    fn test_unknown_source_channel() {
        let mut registry: TriggerRegistry = TriggerRegistry::new();
        registry
            .register(0, TriggerConfig::new(TriggerKind::AlwaysOff))
            .unwrap();

        let config = TriggerConfig::new(TriggerKind::AlwaysOff).with_source_channel(2);
        let err = registry.register(1, config).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownSourceChannel(2)));

        // Failed construction leaves the registry untouched
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_source_resolution_and_dependents() {
        let mut registry: TriggerRegistry = TriggerRegistry::new();
        let th0 = registry
            .register(0, TriggerConfig::new(TriggerKind::AlwaysOff))
            .unwrap();

        let config = TriggerConfig::edge_rising(4.0).with_source_channel(0);
        let th1 = registry.register(1, config).unwrap();

        assert_eq!(registry.get(th1).unwrap().source(), Some(th0));
        assert_eq!(registry.get(th0).unwrap().dependents(), &[th1]);

        // More dependents on the same source accumulate in order
        let th2 = registry
            .register(2, TriggerConfig::new(TriggerKind::AlwaysOff).with_source_channel(0))
            .unwrap();
        let th3 = registry
            .register(3, TriggerConfig::new(TriggerKind::AlwaysOff).with_source_channel(0))
            .unwrap();

        assert_eq!(registry.count(), 4);
        assert_eq!(registry.get(th0).unwrap().dependents(), &[th1, th2, th3]);
        assert!(registry.get(th2).unwrap().dependents().is_empty());
    }

    #[test]
    fn test_source_resolves_to_earliest_registered() {
        let mut registry: TriggerRegistry = TriggerRegistry::new();
        let first = registry
            .register(5, TriggerConfig::new(TriggerKind::AlwaysOff))
            .unwrap();
        registry
            .register(5, TriggerConfig::new(TriggerKind::AlwaysOn))
            .unwrap();

        let dependent = registry
            .register(6, TriggerConfig::new(TriggerKind::AlwaysOff).with_source_channel(5))
            .unwrap();

        assert_eq!(registry.get(dependent).unwrap().source(), Some(first));
        assert_eq!(registry.get(first).unwrap().dependents(), &[dependent]);
    }

    #[test]
    fn test_clear_resets_session() {
        let mut registry: TriggerRegistry = TriggerRegistry::new();
        registry
            .register(0, TriggerConfig::new(TriggerKind::AlwaysOff))
            .unwrap();
        registry
            .register(1, TriggerConfig::new(TriggerKind::AlwaysOff).with_source_channel(0))
            .unwrap();
        assert_eq!(registry.count(), 2);

        registry.clear();
        assert_eq!(registry.count(), 0);

        // A handler constructed after the reset is the sole entry
        let th = registry
            .register(0, TriggerConfig::new(TriggerKind::AlwaysOff))
            .unwrap();
        assert_eq!(registry.count(), 1);
        assert!(registry.get(th).unwrap().dependents().is_empty());
    }

    #[test]
    fn test_data_flow_through_registry() {
        let mut registry: TriggerRegistry = TriggerRegistry::new();
        let id = registry.register(0, TriggerConfig::edge_rising(0.0)).unwrap();

        let th = registry.get_mut(id).unwrap();
        let din = vec![
            crate::trigger::Sample::new(-1.0),
            crate::trigger::Sample::new(0.0),
        ];
        let out = th.data_triggered(din);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, 0.0);
        assert!(registry.get(id).unwrap().latched());
    }
}
