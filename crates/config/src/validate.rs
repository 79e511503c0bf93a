//! Config validation: collect problems instead of failing on the first one.

use crate::schema::SlackMcpConfig;

/// Validate a loaded config, returning a human-readable problem list.
///
/// An empty list means the config is usable.
#[must_use]
pub fn validate(config: &SlackMcpConfig) -> Vec<String> {
    let mut problems = Vec::new();

    let auth = &config.auth;
    let has_oauth = auth.oauth_token.is_some();
    let has_browser = auth.session_token.is_some() && auth.session_cookie.is_some();

    if !has_oauth && !has_browser {
        if auth.session_token.is_some() || auth.session_cookie.is_some() {
            problems.push(
                "auth: browser mode needs both session_token (xoxc) and session_cookie (xoxd)"
                    .to_string(),
            );
        } else {
            problems.push(
                "auth: no credentials configured (set oauth_token, or session_token + session_cookie)"
                    .to_string(),
            );
        }
    }

    if config.history.default_limit == 0 {
        problems.push("history: default_limit must be at least 1".to_string());
    }
    if config.history.default_limit > config.history.max_limit {
        problems.push(format!(
            "history: default_limit {} exceeds max_limit {}",
            config.history.default_limit, config.history.max_limit
        ));
    }

    problems
}
