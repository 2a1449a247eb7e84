use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use log::{debug, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;
use tokio::time::{interval, Duration};

use crate::models::stream::StreamSummary;
use crate::services::live_directory::LiveDirectory;

/// Emitted whenever the tracked live set changes.
#[derive(Debug, Clone)]
pub enum DirectoryEvent {
    WentLive(StreamSummary),
    WentOffline(StreamSummary),
}

/// Drives a [`LiveDirectory`] from a periodic poll.
///
/// The first successful poll only seeds the directory; events are
/// emitted from the second poll on, so starting the watcher does not
/// replay every already-live channel as a fresh notification.
pub struct StreamWatcher {
    directory: Arc<RwLock<LiveDirectory>>,
    running: Arc<RwLock<bool>>,
}

impl StreamWatcher {
    pub fn new() -> Self {
        Self {
            directory: Arc::new(RwLock::new(LiveDirectory::new())),
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// Shared handle to the directory this watcher maintains.
    pub fn directory(&self) -> Arc<RwLock<LiveDirectory>> {
        self.directory.clone()
    }

    /// Start the poll loop. `source` produces the current live set,
    /// usually a `HelixService` call wrapped by the caller. A failed
    /// poll is logged and skipped; the next tick tries again.
    pub async fn start<F, Fut>(
        &self,
        poll_interval: Duration,
        mut source: F,
        events: UnboundedSender<DirectoryEvent>,
    ) -> Result<()>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<StreamSummary>>> + Send,
    {
        {
            let mut running = self.running.write().await;
            if *running {
                return Ok(());
            }
            *running = true;
        }

        let directory = self.directory.clone();
        let running = self.running.clone();

        tokio::spawn(async move {
            let mut ticker = interval(poll_interval);
            let mut first_run = true;

            loop {
                ticker.tick().await;

                if !*running.read().await {
                    break;
                }

                let polled = match source().await {
                    Ok(streams) => streams,
                    Err(e) => {
                        warn!("[StreamWatcher] poll failed: {}", e);
                        continue;
                    }
                };

                let delta = directory.write().await.apply_poll(polled);

                if first_run {
                    first_run = false;
                    continue;
                }

                for stream in delta.went_live {
                    let _ = events.send(DirectoryEvent::WentLive(stream));
                }
                for stream in delta.went_offline {
                    let _ = events.send(DirectoryEvent::WentOffline(stream));
                }
            }

            debug!("[StreamWatcher] poll loop stopped");
        });

        Ok(())
    }

    pub async fn stop(&self) {
        *self.running.write().await = false;
    }
}
