//! Background reconnection
//!
//! Single-flight retry loop that reopens a shared [`DeviceStream`] in the
//! background while the foreground keeps serving last-known state. The loop
//! checks for cancellation before every attempt and sleeps a fixed interval
//! between failures, so a stop request is observed within one interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::stream::DeviceStream;

/// Delay between reopen attempts.
pub const RETRY_INTERVAL: Duration = Duration::from_millis(250);

/// Drives background reopen attempts for one [`DeviceStream`].
///
/// "Is running" and "request stop" are the same flag: the worker keeps
/// going only while it is set, and clears it on the way out.
pub struct Reconnector {
    stream: Arc<DeviceStream>,
    active: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Reconnector {
    pub fn new(stream: Arc<DeviceStream>) -> Self {
        Self {
            stream,
            active: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }

    /// Whether a reconnection loop is currently in flight.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Spawn the retry loop. Returns `false` without spawning when one is
    /// already in flight.
    pub fn start(&self) -> bool {
        if self.active.swap(true, Ordering::SeqCst) {
            return false;
        }
        // any previous worker has already exited; join it before replacing
        self.reap();

        let stream = Arc::clone(&self.stream);
        let active = Arc::clone(&self.active);
        let handle = thread::spawn(move || {
            tracing::info!(
                "reconnection loop started for {}",
                stream.path().display()
            );
            loop {
                if !active.load(Ordering::SeqCst) {
                    tracing::info!("reconnection cancelled");
                    break;
                }
                match stream.reopen() {
                    Ok(fd) => {
                        tracing::info!(
                            "reconnected {} as fd {}",
                            stream.path().display(),
                            fd
                        );
                        break;
                    }
                    Err(_) => thread::sleep(RETRY_INTERVAL),
                }
            }
            active.store(false, Ordering::SeqCst);
        });
        if let Ok(mut worker) = self.worker.lock() {
            *worker = Some(handle);
        }
        true
    }

    /// Request stop and wait for the worker to exit.
    pub fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
        self.reap();
    }

    /// Join a worker that has finished or been told to stop.
    pub(crate) fn reap(&self) {
        let handle = self
            .worker
            .lock()
            .map(|mut worker| worker.take())
            .unwrap_or(None);
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::error!("reconnection worker panicked");
            }
        }
    }
}

impl Drop for Reconnector {
    fn drop(&mut self) {
        self.stop();
    }
}
