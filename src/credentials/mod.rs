pub mod prompt;

use crate::config::Config;

/// Environment variable name for providing an API token
pub const ENV_TOKEN_VAR: &str = "PROPERTIFI_API_TOKEN";

pub use prompt::prompt_for_token;

/// Where the resolved token came from. The token itself is never logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Env,
    Config,
    None,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Check for a token in the PROPERTIFI_API_TOKEN environment variable.
/// Returns Some(token) if the env var is set and non-empty, None otherwise.
pub fn get_token_from_env() -> Option<String> {
    non_empty(std::env::var(ENV_TOKEN_VAR).ok().as_deref())
}

/// Env var first, then `api.token`. Public endpoints work without one.
pub fn resolve_token(config: &Config) -> (Option<String>, TokenSource) {
    resolve_token_from(get_token_from_env(), config)
}

fn resolve_token_from(env: Option<String>, config: &Config) -> (Option<String>, TokenSource) {
    if let Some(token) = non_empty(env.as_deref()) {
        return (Some(token), TokenSource::Env);
    }
    let from_config = config.api.as_ref().and_then(|api| non_empty(api.token.as_deref()));
    match from_config {
        Some(token) => (Some(token), TokenSource::Config),
        None => (None, TokenSource::None),
    }
}
