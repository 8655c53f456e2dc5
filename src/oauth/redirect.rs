use crate::config::RedirectUrisConfig;

/// Which of the registered callback URIs a request should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    LocalDevelopment,
    Production,
}

impl RedirectTarget {
    /// Hosts that identify a developer machine. Anything else, including no host at all, is production.
    pub fn for_host(host: Option<&str>) -> Self {
        match host.map(|h| strip_port(h).to_ascii_lowercase()).as_deref() {
            Some("localhost") | Some("127.0.0.1") => RedirectTarget::LocalDevelopment,
            _ => RedirectTarget::Production,
        }
    }
}

/// Maps an invocation host onto one of the two pre-registered redirect URIs.
#[derive(Debug, Clone)]
pub struct RedirectResolver {
    local: String,
    production: String,
}

impl RedirectResolver {
    pub fn new(config: &RedirectUrisConfig) -> Self {
        Self {
            local: config.local.clone(),
            production: config.production.clone(),
        }
    }

    pub fn uri_for(&self, target: RedirectTarget) -> &str {
        match target {
            RedirectTarget::LocalDevelopment => &self.local,
            RedirectTarget::Production => &self.production,
        }
    }

    /// Never fails; an unknown or missing host resolves to the production URI.
    pub fn resolve(&self, host: Option<&str>) -> &str {
        self.uri_for(RedirectTarget::for_host(host))
    }

    /// Allow-list check for redirect URIs that arrive from outside, e.g. inside a state token.
    pub fn is_registered(&self, uri: &str) -> bool {
        uri == self.local || uri == self.production
    }
}

/// `localhost:3000` -> `localhost`. Bracketed IPv6 literals are left alone.
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return host;
    }
    host.split(':').next().unwrap_or(host)
}
