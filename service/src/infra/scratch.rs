//! [`Scratch`] store of the in-progress payment state.
//!
//! Keeps the pending gateway payment [`Intent`]s and the [`Checkpoint`]s of
//! unfinished two-step transitions, at most one of each per [`Rental`]. The
//! state is held in memory and, if a file path is configured, mirrored into
//! a JSON document rewritten atomically on every change.

use std::{io, path::PathBuf, sync::Arc};

use common::operations::{By, Delete, Insert, Select};
use derive_more::{Display, Error as StdError, From};
use serde::{Deserialize, Serialize};
use tokio::{fs, sync::Mutex};
use tracerr::Traced;

use crate::domain::{
    payment::{intent::IssuanceDateTime, Checkpoint, Intent},
    rental,
};
#[cfg(doc)]
use crate::domain::Rental;

/// Operation on the [`Store`].
pub use common::Handler as Scratch;

/// [`Scratch`] store error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Failed to read or write the backing file.
    #[display("scratch file I/O failed: {_0}")]
    Io(io::Error),

    /// Backing file contains malformed JSON.
    #[display("scratch file is malformed: {_0}")]
    Json(serde_json::Error),
}

/// Content of the [`Store`].
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    /// Pending payment [`Intent`]s, at most one per [`rental::Id`].
    #[serde(default)]
    intents: Vec<Intent>,

    /// Unfinished [`Checkpoint`]s, at most one per [`rental::Id`].
    #[serde(default)]
    checkpoints: Vec<Checkpoint>,
}

/// [`Scratch`] store.
#[derive(Clone, Debug, Default)]
pub struct Store {
    /// Current [`Document`].
    document: Arc<Mutex<Document>>,

    /// Path of the file mirroring the [`Document`], if any.
    path: Option<Arc<PathBuf>>,
}

impl Store {
    /// Creates a new [`Store`] living in memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens a [`Store`] mirrored into the file at the provided `path`,
    /// loading its current content if the file exists.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or is malformed.
    pub async fn open(
        path: impl Into<PathBuf>,
    ) -> Result<Self, Traced<Error>> {
        let path = path.into();
        let document = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(tracerr::from_and_wrap!(=> Error))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Document::default()
            }
            Err(e) => return Err(tracerr::new!(Error::Io(e))),
        };
        Ok(Self {
            document: Arc::new(Mutex::new(document)),
            path: Some(Arc::new(path)),
        })
    }

    /// Applies the provided change to the [`Document`], persisting it before
    /// it becomes visible.
    async fn modify<R>(
        &self,
        change: impl FnOnce(&mut Document) -> R,
    ) -> Result<R, Traced<Error>> {
        let mut current = self.document.lock().await;
        let mut next = current.clone();
        let out = change(&mut next);
        self.persist(&next).await?;
        *current = next;
        Ok(out)
    }

    /// Writes the provided [`Document`] into the backing file, if any.
    async fn persist(&self, doc: &Document) -> Result<(), Traced<Error>> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(doc)
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        fs::rename(&tmp, path)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
    }
}

impl Scratch<Insert<Intent>> for Store {
    type Ok = ();
    type Err = Traced<Error>;

    /// Stores the provided [`Intent`], replacing the previous one of the
    /// same [`Rental`].
    async fn execute(
        &self,
        Insert(intent): Insert<Intent>,
    ) -> Result<Self::Ok, Self::Err> {
        self.modify(|doc| {
            doc.intents.retain(|i| i.rental_id != intent.rental_id);
            doc.intents.push(intent);
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Scratch<Select<By<Option<Intent>, (rental::Id, IssuanceDateTime)>>>
    for Store
{
    type Ok = Option<Intent>;
    type Err = Traced<Error>;

    /// Returns the [`Intent`] of the [`Rental`], unless it is stale at the
    /// provided deadline.
    async fn execute(
        &self,
        Select(by): Select<
            By<Option<Intent>, (rental::Id, IssuanceDateTime)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (rental_id, deadline) = by.into_inner();
        Ok(self
            .document
            .lock()
            .await
            .intents
            .iter()
            .find(|i| i.rental_id == rental_id && i.is_fresh(deadline))
            .cloned())
    }
}

impl Scratch<Delete<By<Option<Intent>, rental::Id>>> for Store {
    type Ok = Option<Intent>;
    type Err = Traced<Error>;

    /// Removes the [`Intent`] of the [`Rental`], whatever it is.
    async fn execute(
        &self,
        Delete(by): Delete<By<Option<Intent>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let rental_id = by.into_inner();
        self.modify(|doc| {
            let pos = doc.intents.iter().position(|i| i.rental_id == rental_id);
            pos.map(|p| doc.intents.remove(p))
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Scratch<Delete<By<Option<Intent>, Intent>>> for Store {
    type Ok = Option<Intent>;
    type Err = Traced<Error>;

    /// Removes the provided [`Intent`], unless it has been replaced by a
    /// newer one already.
    async fn execute(
        &self,
        Delete(by): Delete<By<Option<Intent>, Intent>>,
    ) -> Result<Self::Ok, Self::Err> {
        let intent = by.into_inner();
        if !self.document.lock().await.intents.contains(&intent) {
            return Ok(None);
        }
        self.modify(|doc| {
            let pos = doc.intents.iter().position(|i| i == &intent);
            pos.map(|p| doc.intents.remove(p))
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Scratch<Delete<By<Vec<Intent>, IssuanceDateTime>>> for Store {
    type Ok = Vec<Intent>;
    type Err = Traced<Error>;

    /// Removes all the [`Intent`]s being stale at the provided deadline.
    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<Intent>, IssuanceDateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        let deadline = by.into_inner();
        if self
            .document
            .lock()
            .await
            .intents
            .iter()
            .all(|i| i.is_fresh(deadline))
        {
            return Ok(Vec::new());
        }
        self.modify(|doc| {
            let (fresh, stale): (Vec<_>, Vec<_>) = doc
                .intents
                .drain(..)
                .partition(|i| i.is_fresh(deadline));
            doc.intents = fresh;
            stale
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Scratch<Insert<Checkpoint>> for Store {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(checkpoint): Insert<Checkpoint>,
    ) -> Result<Self::Ok, Self::Err> {
        self.modify(|doc| {
            doc.checkpoints.retain(|c| c.rental_id != checkpoint.rental_id);
            doc.checkpoints.push(checkpoint);
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Scratch<Select<By<Option<Checkpoint>, rental::Id>>> for Store {
    type Ok = Option<Checkpoint>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Checkpoint>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let rental_id = by.into_inner();
        Ok(self
            .document
            .lock()
            .await
            .checkpoints
            .iter()
            .find(|c| c.rental_id == rental_id)
            .cloned())
    }
}

impl Scratch<Delete<By<Option<Checkpoint>, rental::Id>>> for Store {
    type Ok = Option<Checkpoint>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Option<Checkpoint>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let rental_id = by.into_inner();
        self.modify(|doc| {
            let pos =
                doc.checkpoints.iter().position(|c| c.rental_id == rental_id);
            pos.map(|p| doc.checkpoints.remove(p))
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
