//! Background environment for running [`Task`]s.

use std::{
    error::Error,
    future::{Future, IntoFuture},
    iter,
};

use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;
use tracing as log;

#[cfg(doc)]
use crate::Task;

/// Error of a failed background [`Task`].
type TaskError = Box<dyn Error + 'static>;

/// Background environment running [`Task`]s on the current thread.
///
/// Resolves once all the spawned [`Task`]s finish, or as soon as any of
/// them fails.
#[derive(Debug, Default)]
pub struct Background {
    /// Local set of tasks.
    set: task::LocalSet,

    /// Handles of spawned tasks.
    tasks: Vec<task::JoinHandle<Result<(), TaskError>>>,
}

impl Background {
    /// Spawns a new named [`Task`] inside the [`Background`] environment.
    pub fn spawn<F, E>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        log::debug!("spawning background task `{name}`");
        self.tasks.push(self.set.spawn_local(future.map_err(move |e| {
            log::error!("background task `{name}` failed: {e}");
            TaskError::from(Box::new(e))
        })));
    }

    /// Returns the number of spawned [`Task`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Indicates whether no [`Task`]s are spawned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl IntoFuture for Background {
    type Output = Result<(), TaskError>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, tasks } = self;
        let joined = tasks.into_iter().map(|h| {
            h.map(|r| r.unwrap_or_else(|e| Err(TaskError::from(Box::new(e)))))
                .boxed_local()
        });
        let set = set.map(Ok).boxed_local();
        future::try_join_all(iter::once(set).chain(joined))
            .map_ok(drop)
            .boxed_local()
    }
}

#[cfg(test)]
mod spec {
    use std::io;

    use super::Background;

    #[tokio::test]
    async fn completes_with_finished_tasks() {
        let mut bg = Background::default();
        bg.spawn("noop", async { Ok::<_, io::Error>(()) });
        assert_eq!(bg.len(), 1);

        bg.await.unwrap();
    }

    #[tokio::test]
    async fn fails_with_failed_task() {
        let mut bg = Background::default();
        bg.spawn("noop", async { Ok::<_, io::Error>(()) });
        bg.spawn("broken", async { Err::<(), _>(io::Error::other("boom")) });

        let err = bg.await.unwrap_err();

        assert_eq!(err.to_string(), "boom");
    }
}
