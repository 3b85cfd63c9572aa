//! Background loading of row sets.
//!
//! [`RowFetcher`] reads a [`Source`] on a worker thread and hands the parsed
//! rows back over an mpsc channel, so the UI thread can keep drawing the
//! loading skeleton while it waits.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::LoadError;
use crate::loader::{self, Format};
use crate::row::Row;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a row set comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
    /// Already-read text (e.g. stdin)
    Text(String),
}

impl Source {
    /// An `http(s)://` URL, otherwise a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            Source::Url(arg.to_string())
        } else {
            Source::File(PathBuf::from(arg))
        }
    }

    /// Short name for logs and titles.
    pub fn label(&self) -> String {
        match self {
            Source::File(path) => path.display().to_string(),
            Source::Url(url) => url.clone(),
            Source::Text(_) => "stdin".to_string(),
        }
    }

    /// Read the raw text of the source. Blocks.
    pub fn read(&self) -> Result<String, LoadError> {
        match self {
            Source::File(path) => fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            }),
            Source::Url(url) => {
                let http = |message: String| LoadError::Http {
                    url: url.clone(),
                    message,
                };
                ureq::get(url)
                    .timeout(HTTP_TIMEOUT)
                    .call()
                    .map_err(|e| http(e.to_string()))?
                    .into_string()
                    .map_err(|e| http(e.to_string()))
            }
            Source::Text(text) => Ok(text.clone()),
        }
    }

    /// Read and parse the source. Blocks.
    pub fn load(&self, format: Format) -> Result<Vec<Row>, LoadError> {
        let text = self.read()?;
        loader::parse_rows(&text, format)
    }
}

struct InFlight {
    receiver: Receiver<Result<Vec<Row>, LoadError>>,
    cancelled: Arc<AtomicBool>,
}

/// Loads a [`Source`] on a background thread.
///
/// Only one load is in flight at a time; starting another supersedes the
/// previous one and its result is dropped.
pub struct RowFetcher {
    source: Source,
    format: Format,
    in_flight: Option<InFlight>,
}

impl RowFetcher {
    pub fn new(source: Source, format: Format) -> Self {
        Self {
            source,
            format,
            in_flight: None,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Start a background load.
    pub fn refetch(&mut self) -> Result<(), LoadError> {
        self.cancel();

        let (sender, receiver) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let cancelled_clone = Arc::clone(&cancelled);
        let source = self.source.clone();
        let format = self.format;

        thread::Builder::new()
            .name("row-fetcher".to_string())
            .spawn(move || {
                let started = Instant::now();
                let result = source.load(format);
                if cancelled_clone.load(Ordering::Relaxed) {
                    return;
                }
                match &result {
                    Ok(rows) => info!(
                        source = %source.label(),
                        rows = rows.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "load complete"
                    ),
                    Err(e) => warn!(source = %source.label(), error = %e, "load failed"),
                }
                // Receiver gone means the fetcher was dropped
                let _ = sender.send(result);
            })
            .map_err(LoadError::Spawn)?;

        self.in_flight = Some(InFlight {
            receiver,
            cancelled,
        });
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Non-blocking check for a finished load.
    pub fn poll(&mut self) -> Option<Result<Vec<Row>, LoadError>> {
        let in_flight = self.in_flight.as_ref()?;
        let result = match in_flight.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(LoadError::Interrupted),
        };
        self.in_flight = None;
        Some(result)
    }

    /// Block until the current load finishes.
    pub fn wait(&mut self) -> Option<Result<Vec<Row>, LoadError>> {
        let in_flight = self.in_flight.take()?;
        Some(
            in_flight
                .receiver
                .recv()
                .unwrap_or(Err(LoadError::Interrupted)),
        )
    }

    /// Abandon the load in flight, if any.
    pub fn cancel(&mut self) {
        // The worker is not joined: a stalled request must not block the UI
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancelled.store(true, Ordering::Relaxed);
        }
    }
}

impl Drop for RowFetcher {
    fn drop(&mut self) {
        self.cancel();
    }
}
