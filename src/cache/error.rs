use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("invalid cache configuration for `{key}`: {reason}")]
    Configuration { key: &'static str, reason: String },
    #[error("cache `{name}` has been closed")]
    InvalidHandle { name: String },
}

impl CacheError {
    pub fn configuration(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            key,
            reason: reason.into(),
        }
    }

    pub fn invalid_handle(name: impl Into<String>) -> Self {
        Self::InvalidHandle { name: name.into() }
    }
}
