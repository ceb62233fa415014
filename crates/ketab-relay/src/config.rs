//! Relay configuration.

/// Where events are delivered.
///
/// The endpoint list is always passed in explicitly; there is no built-in
/// default list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayConfig {
    /// Endpoints, attempted in order for every event.
    pub endpoints: Vec<String>,
    /// Hint appended to coordinate references. Falls back to the first
    /// endpoint when unset.
    pub relay_hint: Option<String>,
}

impl RelayConfig {
    pub fn new(endpoints: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            endpoints: endpoints.into_iter().map(Into::into).collect(),
            relay_hint: None,
        }
    }

    /// Parse a comma-separated endpoint list, ignoring blanks.
    pub fn from_csv(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
        )
    }

    pub fn with_relay_hint(mut self, hint: impl Into<String>) -> Self {
        self.relay_hint = Some(hint.into());
        self
    }

    /// The hint to put in reference tags, if any.
    pub fn relay_hint(&self) -> Option<&str> {
        self.relay_hint
            .as_deref()
            .or_else(|| self.endpoints.first().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_csv() {
        let config = RelayConfig::from_csv(" wss://a , ,wss://b");
        assert_eq!(config.endpoints, vec!["wss://a", "wss://b"]);
    }

    #[test]
    fn test_relay_hint_fallback() {
        assert_eq!(RelayConfig::default().relay_hint(), None);
        let config = RelayConfig::new(["wss://a", "wss://b"]);
        assert_eq!(config.relay_hint(), Some("wss://a"));
        assert_eq!(
            config.with_relay_hint("wss://hint").relay_hint(),
            Some("wss://hint")
        );
    }
}
