//! Background walk over a backend.

use std::collections::VecDeque;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use remdu_core::{Backend, BackendError};

use crate::dir::Dir;

/// Fatal discovery errors. Anything non-fatal is recorded on the tree
/// nodes instead.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The root of the backend could not be listed.
    #[error("failed to list root: {source}")]
    Root {
        #[source]
        source: BackendError,
    },
}

/// Channels handed to the consumer of a scan.
///
/// `root` yields the root node exactly once, after its listing succeeded.
/// `done` yields exactly once: `Ok(())` on completion or a fatal error (in
/// which case `root` never yields). `updates` fires whenever some subtree
/// changed; signals are coalesced, the payload is only "something changed".
pub struct ScanHandle {
    pub root: oneshot::Receiver<Arc<Dir>>,
    pub done: oneshot::Receiver<Result<(), ScanError>>,
    pub updates: mpsc::Receiver<()>,
}

/// Start discovering `backend` in a background task.
pub fn scan(backend: Arc<dyn Backend>) -> ScanHandle {
    let (root_tx, root_rx) = oneshot::channel();
    let (done_tx, done_rx) = oneshot::channel();
    let (update_tx, update_rx) = mpsc::channel(1);

    tokio::task::spawn_blocking(move || {
        let result = walk(backend.as_ref(), root_tx, &update_tx);
        let _ = done_tx.send(result);
    });

    ScanHandle {
        root: root_rx,
        done: done_rx,
        updates: update_rx,
    }
}

fn walk(
    backend: &dyn Backend,
    root_tx: oneshot::Sender<Arc<Dir>>,
    updates: &mpsc::Sender<()>,
) -> Result<(), ScanError> {
    let root = Dir::new_root();
    let listing = backend
        .list("")
        .map_err(|source| ScanError::Root { source })?;
    let mut queue: VecDeque<Arc<Dir>> = root.populate(listing).into();

    // the consumer only gets the root once it holds a real listing
    let _ = root_tx.send(Arc::clone(&root));
    let _ = updates.try_send(());

    while let Some(dir) = queue.pop_front() {
        // the consumer went away, stop walking
        if updates.is_closed() {
            break;
        }
        match backend.list(&dir.path()) {
            Ok(listing) => queue.extend(dir.populate(listing)),
            Err(err) => {
                tracing::warn!(path = %dir.path(), error = %err, "directory listing failed");
                dir.mark_unreadable(err.to_string());
            }
        }
        let _ = updates.try_send(());
    }
    tracing::debug!("walk finished");
    Ok(())
}
