// Worker thread that preloads windows queued by navigation
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use tracing::{debug, trace};

use crate::cache::ThumbnailCache;
use crate::loader::ImageLoader;
use crate::scanner::FileEntry;

/// Message from navigation to the worker
enum PreloadRequest {
    Window {
        entries: Arc<[FileEntry]>,
        focus_index: usize,
    },
    /// Ends the worker once the window in flight is done
    Stop,
}

/// Runs `ensure_preloaded` on a dedicated thread.
///
/// `request` only enqueues. When the worker wakes it drains the queue and
/// preloads the newest window; older ones are dropped. Loaded images go
/// straight into the shared cache.
pub struct BackgroundPreloader {
    request_tx: Sender<PreloadRequest>,
    thread_handle: Option<JoinHandle<()>>,
    /// List and focus of the most recent send
    last_requested: Option<(Arc<[FileEntry]>, usize)>,
}

impl BackgroundPreloader {
    /// Start the worker thread for `cache`
    pub fn spawn<L>(cache: Arc<ThumbnailCache<L>>) -> Self
    where
        L: ImageLoader + 'static,
    {
        let (request_tx, request_rx) = unbounded();

        let thread_handle = thread::Builder::new()
            .name("thumbcache-preload".into())
            .spawn(move || preload_thread_main(cache, request_rx))
            .ok();

        if thread_handle.is_none() {
            tracing::error!("failed to spawn preload thread; preloading disabled");
        }

        Self {
            request_tx,
            thread_handle,
            last_requested: None,
        }
    }

    /// Queue the window around `focus_index`. Repeating the previous list
    /// and focus is a no-op.
    pub fn request(&mut self, entries: Arc<[FileEntry]>, focus_index: usize) {
        if let Some((last_entries, last_focus)) = &self.last_requested {
            if Arc::ptr_eq(last_entries, &entries) && *last_focus == focus_index {
                return;
            }
        }

        self.last_requested = Some((Arc::clone(&entries), focus_index));
        let _ = self.request_tx.send(PreloadRequest::Window {
            entries,
            focus_index,
        });
    }

    /// Allow the previous window to be queued again, for use after the
    /// cache was cleared
    pub fn reset(&mut self) {
        self.last_requested = None;
    }

    /// Stop the worker and wait for it to finish its current window
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(handle) = self.thread_handle.take() {
            let _ = self.request_tx.send(PreloadRequest::Stop);
            let _ = handle.join();
        }
    }
}

impl Drop for BackgroundPreloader {
    fn drop(&mut self) {
        self.stop();
    }
}

fn preload_thread_main<L: ImageLoader>(
    cache: Arc<ThumbnailCache<L>>,
    request_rx: Receiver<PreloadRequest>,
) {
    loop {
        let Ok(mut latest) = request_rx.recv() else {
            break;
        };

        // stale windows are dropped; a queued Stop wins
        loop {
            match request_rx.try_recv() {
                Ok(PreloadRequest::Stop) => return,
                Ok(newer) => {
                    trace!("superseded preload request dropped");
                    latest = newer;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        match latest {
            PreloadRequest::Stop => break,

            PreloadRequest::Window {
                entries,
                focus_index,
            } => {
                let outcome = cache.ensure_preloaded(&entries, focus_index);
                debug!(
                    focus_index,
                    requested = outcome.requested,
                    loaded = outcome.loaded,
                    failed = outcome.failed,
                    "background preload finished"
                );
            }
        }
    }
}
