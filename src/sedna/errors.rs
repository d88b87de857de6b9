//! Error types for the Sedna client and page extractors.

use crate::sedna::models::Listing;

/// Failures surfaced to callers of the Sedna client and extractors.
///
/// Per-line anomalies inside a planning page are not represented here: they
/// are dropped during the scan (see [`crate::sedna::schedule::SkipReason`]).
#[derive(Debug, thiserror::Error)]
pub enum SednaError {
    /// The portal could not be reached or answered with a non-2xx status.
    #[error("Sedna request failed: {message}")]
    Transport { message: String, status: Option<u16> },
    /// The page parsed fine but yielded no records.
    #[error("no {} found in Sedna response", .listing.as_str())]
    EmptyResult { listing: Listing },
    /// The planning page bytes are not valid in the legacy encoding.
    #[error("failed to decode Sedna page as {encoding}: {message}")]
    Decode {
        encoding: &'static str,
        message: String,
    },
}

impl SednaError {
    /// Flattens a transport-library error into the crate's single transport channel.
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };
        Self::Transport {
            message,
            status: err.status().map(|status| status.as_u16()),
        }
    }

    /// HTTP status reported by the portal, when the failure carried one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}
