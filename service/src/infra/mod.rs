//! Infrastructure layer.

pub mod gateway;
pub mod scratch;

pub use self::{gateway::Gateway, scratch::Scratch};
#[cfg(feature = "http")]
pub use self::gateway::Http;
