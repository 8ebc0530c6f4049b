use thiserror::Error;

/// Errors surfaced by fallible facade operations.
///
/// Most of the polling API never fails: unknown keys, slots, actions, or
/// trackers simply report neutral values. Errors are reserved for parsing
/// external data (mapping strings, action profiles) where the caller handed
/// us something malformed and needs to know.
#[derive(Debug, Error)]
pub enum InputError {
    /// A joypad mapping string did not match the `guid,name,...` layout.
    #[error("malformed joypad mapping: {0}")]
    MalformedMapping(String),

    /// An action profile failed structural validation after parsing.
    #[error("invalid action profile: {0}")]
    InvalidProfile(String),

    /// Reading a profile file from disk failed.
    #[error("profile I/O error")]
    Io(#[from] std::io::Error),

    /// A TOML profile failed to parse.
    #[error("profile TOML parse error")]
    Toml(#[from] toml::de::Error),

    /// A JSON profile or event trace failed to parse.
    #[error("profile JSON parse error")]
    Json(#[from] serde_json::Error),
}
