//! Orchestrator configuration

use std::time::Duration;

/// Configuration of embed and refresh renders.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use prodtable_lib::orchestrator::RenderConfig;
///
/// let config = RenderConfig::default().with_catalog_timeout(Duration::from_secs(5));
/// assert_eq!(config.catalog_timeout, Some(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Upper bound on each catalog call; a timeout fails the render with
    /// [`CatalogError::Timeout`](crate::error::CatalogError::Timeout).
    ///
    /// Default: none. Preview cycles never apply it.
    pub catalog_timeout: Option<Duration>,
}

impl RenderConfig {
    /// Creates a render config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the catalog call timeout.
    pub fn with_catalog_timeout(mut self, timeout: Duration) -> Self {
        self.catalog_timeout = Some(timeout);
        self
    }
}

/// Configuration of live preview sessions.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Quiet period after the latest edit before a cycle starts.
    ///
    /// Default: 400ms
    pub debounce: Duration,

    /// Capacity of the update channel.
    ///
    /// Default: 16
    pub channel_capacity: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(400),
            channel_capacity: 16,
        }
    }
}

impl PreviewConfig {
    /// Creates a preview config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the debounce window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Sets the update channel capacity.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}
