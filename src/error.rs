use thiserror::Error;

/// Failure taxonomy for a single provider fetch.
///
/// Transport, format, and timeout failures are caught at the resolver
/// boundary and downgraded to an empty series, so one misbehaving agency
/// degrades only its own row. `NoCoverage` is a normal state: agency
/// coverage of the (country, indicator) space is intentionally sparse.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network or HTTP-level failure.
    #[error("{provider}: transport error: {msg}")]
    Transport { provider: &'static str, msg: String },

    /// The payload did not match the provider's wire format.
    #[error("{provider}: unexpected payload shape: {msg}")]
    Format { provider: &'static str, msg: String },

    /// A fetch task exceeded its deadline.
    #[error("{provider}: request timed out")]
    Timeout { provider: &'static str },

    /// The agency does not publish this (country, indicator) combination.
    #[error("no coverage for {indicator} in {country}")]
    NoCoverage { country: String, indicator: String },
}

impl SourceError {
    pub fn transport(provider: &'static str, msg: impl Into<String>) -> Self {
        Self::Transport {
            provider,
            msg: msg.into(),
        }
    }

    pub fn format(provider: &'static str, msg: impl Into<String>) -> Self {
        Self::Format {
            provider,
            msg: msg.into(),
        }
    }
}
