use crate::CBIOPORTAL_BASE_URL;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the cBioPortal client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// API root, e.g. `https://www.cbioportal.org/api`
    pub base_url: String,
    /// User agent for HTTP requests
    pub user_agent: String,
    /// Timeout applied to every request, in seconds
    pub timeout_secs: u64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: CBIOPORTAL_BASE_URL.to_string(),
            user_agent: format!("cbioportal-rs/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl PortalConfig {
    /// Create a configuration pointing at the public cBioPortal instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at another cBioPortal instance
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set custom user agent
    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs.max(1);
        self
    }
}
