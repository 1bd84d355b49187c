//! Background [`Task`]s definitions.

mod background;
pub mod expire_payment_intents;

pub use common::Handler as Task;

pub use self::{
    background::Background, expire_payment_intents::ExpirePaymentIntents,
};
