//! [`Handler`] abstractions.
//!
//! Every command, query, gateway call and scratch store access in the
//! workspace is expressed as a [`Handler`] of some operation type, so the
//! same shape serves both production backends and test fakes.

use std::future::Future;

/// Executable handler of `Args` operation.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
