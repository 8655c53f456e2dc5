use serde::Serialize;

/// Where a browser stands in the Spotify connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Unauthenticated,
    AuthorizationRequested,
    CodeReceived,
    Authenticated,
    Expired,
    AuthorizationDenied,
}

/// Something that happened to the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    AuthorizationStarted,
    CodeIssued,
    ConsentDenied,
    ExchangeSucceeded,
    ExchangeFailed,
    AccessExpired,
    RefreshSucceeded,
    RefreshFailed,
    /// The user retries after a failure.
    Reset,
}

impl ConnectionState {
    /// Applies `event`. Events that make no sense in the current state leave it unchanged.
    pub fn next(self, event: FlowEvent) -> ConnectionState {
        use ConnectionState::*;
        use FlowEvent::*;

        match (self, event) {
            (_, Reset) => Unauthenticated,
            (Unauthenticated, AuthorizationStarted) => AuthorizationRequested,
            (AuthorizationDenied, AuthorizationStarted) => AuthorizationRequested,
            (AuthorizationRequested, CodeIssued) => CodeReceived,
            (AuthorizationRequested, ConsentDenied) => AuthorizationDenied,
            (CodeReceived, ExchangeSucceeded) => Authenticated,
            (CodeReceived, ExchangeFailed) => AuthorizationDenied,
            (Authenticated, AccessExpired) => Expired,
            (Expired, RefreshSucceeded) => Authenticated,
            (Expired, RefreshFailed) => Unauthenticated,
            (state, _) => state,
        }
    }

    /// What the browser's cookies say, since the server keeps no state between requests.
    pub fn from_cookies(has_access_token: bool, has_refresh_token: bool) -> ConnectionState {
        match (has_access_token, has_refresh_token) {
            (true, _) => ConnectionState::Authenticated,
            (false, true) => ConnectionState::Expired,
            (false, false) => ConnectionState::Unauthenticated,
        }
    }

    pub fn is_connected(self) -> bool {
        self == ConnectionState::Authenticated
    }
}
