//! [`ExpirePaymentIntents`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Delete, Perform, Start};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::payment::{intent, Intent},
    infra::{scratch, Scratch},
    Service,
};

use super::Task;

/// Configuration for [`ExpirePaymentIntents`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between sweeps of expired [`Intent`]s.
    pub interval: time::Duration,

    /// Timeout after which an [`Intent`] is considered expired.
    pub timeout: time::Duration,
}

/// [`Task`] for removing the payment [`Intent`]s the gateway never reported
/// back about.
#[derive(Clone, Copy, Debug)]
pub struct ExpirePaymentIntents<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Gw, Sc> Task<Start<By<ExpirePaymentIntents<Self>, Config>>>
    for Service<Gw, Sc>
where
    ExpirePaymentIntents<Self>:
        Task<Perform<()>, Ok = Vec<Intent>, Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<ExpirePaymentIntents<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = ExpirePaymentIntents {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(expired) => {
                    for i in expired {
                        log::info!(
                            "expired `{}` payment intent of `Rental(id: {})`",
                            i.kind,
                            i.rental_id,
                        );
                    }
                }
                Err(e) => {
                    log::error!("`task::ExpirePaymentIntents` failed: {e}");
                }
            }
        }
    }
}

impl<Gw, Sc> Task<Perform<()>> for ExpirePaymentIntents<Service<Gw, Sc>>
where
    Sc: Scratch<
        Delete<By<Vec<Intent>, intent::IssuanceDateTime>>,
        Ok = Vec<Intent>,
        Err = Traced<scratch::Error>,
    >,
{
    type Ok = Vec<Intent>;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let deadline =
            intent::IssuanceDateTime::now() - self.config.timeout;
        self.service
            .scratch()
            .execute(Delete(By::new(deadline)))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`ExpirePaymentIntents`] execution.
pub type ExecutionError = Traced<scratch::Error>;
