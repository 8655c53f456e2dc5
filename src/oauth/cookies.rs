use axum::http::header::COOKIE;
use axum::http::HeaderMap;

use crate::config::CookieConfig;
use crate::models::TokenPair;

fn set_cookie(config: &CookieConfig, name: &str, value: &str, max_age: u64) -> String {
    let mut cookie = format!("{}={}; Max-Age={}; Path=/; HttpOnly", name, value, max_age);
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie.push_str("; SameSite=Lax");
    cookie
}

/// `Set-Cookie` value for the access token, living exactly as long as the token.
pub fn access_token_cookie(config: &CookieConfig, access_token: &str, expires_in: u64) -> String {
    set_cookie(config, &config.access_token_name, access_token, expires_in)
}

pub fn refresh_token_cookie(config: &CookieConfig, refresh_token: &str) -> String {
    set_cookie(
        config,
        &config.refresh_token_name,
        refresh_token,
        config.refresh_max_age_secs,
    )
}

/// Both cookies for a freshly exchanged token pair.
pub fn token_pair_cookies(config: &CookieConfig, pair: &TokenPair) -> [String; 2] {
    [
        access_token_cookie(config, &pair.access_token, pair.expires_in),
        refresh_token_cookie(config, &pair.refresh_token),
    ]
}

/// Expires both token cookies.
pub fn clearing_cookies(config: &CookieConfig) -> [String; 2] {
    [
        set_cookie(config, &config.access_token_name, "", 0),
        set_cookie(config, &config.refresh_token_name, "", 0),
    ]
}

/// Reads a cookie value from the request's `Cookie` headers. Empty values count as absent.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}
