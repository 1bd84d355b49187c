//! [`Gateway`]-related implementations.

#[cfg(test)]
pub mod fake;
#[cfg(feature = "http")]
pub mod http;

use derive_more::{Debug, Display, Error as StdError, From};
use secrecy::{ExposeSecret as _, SecretString};

#[cfg(test)]
pub use self::fake::Fake;
#[cfg(feature = "http")]
pub use self::http::Http;

/// Operation on the remote rental services behind the API gateway.
pub use common::Handler as Gateway;

/// Bearer token forwarded to the remote services on behalf of a user.
#[derive(Clone, Debug)]
pub struct Token(#[debug("***")] SecretString);

impl Token {
    /// Wraps the provided raw bearer token.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(SecretString::from(raw.into()))
    }

    /// Exposes the raw value of this [`Token`].
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// [`Gateway`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Request could not be sent or its response could not be read.
    #[cfg(feature = "http")]
    #[display("request failed: {_0}")]
    Transport(reqwest::Error),

    /// Remote service responded with an unexpected status.
    #[display("remote service responded with `{status}`: {body}")]
    #[from(ignore)]
    Status {
        /// HTTP status code of the response.
        status: u16,

        /// Body of the response.
        body: String,
    },

    /// Response body could not be decoded.
    #[display("failed to decode response: {_0}")]
    Decode(serde_json::Error),
}

impl Error {
    /// Indicates whether this [`Error`] means the remote service could not
    /// be reached or failed on its own side.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match self {
            #[cfg(feature = "http")]
            Self::Transport(..) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode(..) => false,
        }
    }

    /// Indicates whether this [`Error`] is a rejection of the request
    /// by the remote service.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            Self::Status { status, .. } if (400..500).contains(status),
        )
    }
}
