//! Marker types describing the meaning of a [`DateTimeOf`].
//!
//! [`DateTimeOf`]: crate::DateTimeOf

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an entity issuance.
#[derive(Clone, Copy, Debug)]
pub struct Issuance;

/// Marker type describing the beginning of a period.
#[derive(Clone, Copy, Debug)]
pub struct Beginning;

/// Marker type describing the ending of a period.
#[derive(Clone, Copy, Debug)]
pub struct Ending;
