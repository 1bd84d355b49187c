//! GraphQL API definitions.

pub mod contract;
pub mod fleet;
mod mutation;
pub mod payment;
mod query;
pub mod rental;
pub mod scalar;
pub mod settlement;
pub mod trip;
pub mod user;
pub mod workforce;

use juniper::EmptySubscription;

use crate::Context;

pub use self::{
    contract::Contract, mutation::Mutation, payment::Payment, query::Query,
    rental::Rental, settlement::Settlement, user::User,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

/// Creates a new [`Schema`].
#[must_use]
pub fn schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
