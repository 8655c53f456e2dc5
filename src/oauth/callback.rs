use serde::Deserialize;
use url::Url;

use super::error::OAuthError;
use crate::config::AppConfig;

/// Query parameters Spotify appends when redirecting back.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub state: Option<String>,
}

impl CallbackParams {
    /// The code to exchange. A denial, or a callback without a code, ends the flow here.
    pub fn authorization_code(&self) -> Result<&str, OAuthError> {
        if let Some(reason) = &self.error {
            return Err(OAuthError::ConsentDenied {
                reason: reason.clone(),
            });
        }
        match self.code.as_deref() {
            Some(code) if !code.trim().is_empty() => Ok(code),
            _ => Err(OAuthError::MissingCode),
        }
    }
}

/// Who started the flow: the browser directly, or the embedding mini-app host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationOrigin {
    Direct,
    EmbeddedHost,
}

impl InvocationOrigin {
    /// Exact host comparison of the referer against the configured embedding hosts
    /// (subdomains included). Anything unparseable is a direct call.
    pub fn from_referer(referer: Option<&str>, embedded_hosts: &[String]) -> Self {
        let host = referer
            .and_then(|r| Url::parse(r).ok())
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase));

        match host {
            Some(host)
                if embedded_hosts.iter().any(|allowed| {
                    let allowed = allowed.to_ascii_lowercase();
                    host == allowed || host.ends_with(&format!(".{}", allowed))
                }) =>
            {
                InvocationOrigin::EmbeddedHost
            }
            _ => InvocationOrigin::Direct,
        }
    }
}

/// Why the callback could not connect the account, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackFailure {
    AccessDenied,
    TokenError,
}

impl CallbackFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackFailure::AccessDenied => "access_denied",
            CallbackFailure::TokenError => "token_error",
        }
    }
}

impl From<&OAuthError> for CallbackFailure {
    fn from(e: &OAuthError) -> Self {
        match e {
            OAuthError::ConsentDenied { .. } | OAuthError::MissingCode => {
                CallbackFailure::AccessDenied
            }
            _ => CallbackFailure::TokenError,
        }
    }
}

/// Decides where the browser goes after the callback.
#[derive(Debug, Clone)]
pub struct PostLoginRedirects {
    success_path: String,
    error_path: String,
    embedded_app_url: Option<String>,
}

impl PostLoginRedirects {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            success_path: config.success_path.clone(),
            error_path: config.error_path.clone(),
            embedded_app_url: config.embedded.as_ref().map(|e| e.app_url.clone()),
        }
    }

    fn embedded_url(&self, origin: InvocationOrigin) -> Option<&str> {
        match origin {
            InvocationOrigin::EmbeddedHost => self.embedded_app_url.as_deref(),
            InvocationOrigin::Direct => None,
        }
    }

    pub fn success(&self, origin: InvocationOrigin) -> String {
        self.embedded_url(origin)
            .unwrap_or(&self.success_path)
            .to_string()
    }

    pub fn failure(&self, origin: InvocationOrigin, failure: CallbackFailure) -> String {
        let base = self.embedded_url(origin).unwrap_or(&self.error_path);
        with_error_param(base, failure.as_str())
    }
}

/// Appends `error=<code>` to an absolute URL or a relative path, keeping any existing query.
fn with_error_param(base: &str, error: &str) -> String {
    if let Ok(mut url) = Url::parse(base) {
        url.query_pairs_mut().append_pair("error", error);
        return url.into();
    }
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}error={}", base, separator, error)
}
