//! Worker protocol
//!
//! Process mode talks to `slugline-worker` over JSON lines: one frame per
//! line on the worker's stdin and stdout. The parent sends one `configure`
//! frame, waits for `ready`, then sends any number of `chunk` frames and
//! reads one `slugs` (or `error`) frame for each. Closing stdin ends the
//! worker.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use slugline_core::{SlugConfig, Slugger};
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Parent-to-worker frame
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Set the configuration for every following chunk
    Configure {
        /// Validated again on the worker side
        config: SlugConfig,
    },
    /// Slugify a contiguous run of items
    Chunk {
        /// Batch index of the first item
        start: usize,
        /// Texts to slugify
        items: Vec<String>,
    },
}

/// Worker-to-parent frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Configuration accepted
    Ready,
    /// Slugs for one chunk
    Slugs {
        /// Batch index of the first item
        start: usize,
        /// One slug per requested item
        slugs: Vec<String>,
    },
    /// The request could not be served
    Error {
        /// Human-readable reason
        message: String,
    },
}

/// Write one frame followed by a newline and flush
pub fn write_frame<W: Write, T: Serialize>(writer: &mut W, frame: &T) -> Result<()> {
    serde_json::to_writer(&mut *writer, frame)
        .map_err(|e| EngineError::Protocol(e.to_string()))?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|e| EngineError::WorkerFailed(e.to_string()))
}

/// Read one frame; `None` on end of stream
pub fn read_frame<R: BufRead, T: for<'de> Deserialize<'de>>(reader: &mut R) -> Result<Option<T>> {
    let mut line = String::new();
    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .map_err(|e| EngineError::WorkerFailed(e.to_string()))?;
        if read == 0 {
            return Ok(None);
        }
        if !line.trim().is_empty() {
            break;
        }
    }
    serde_json::from_str(line.trim_end())
        .map(Some)
        .map_err(|e| EngineError::Protocol(format!("{e}: {}", line.trim_end())))
}

/// Serve requests from `reader` until it is exhausted
///
/// Malformed frames and chunks sent before `configure` are answered with an
/// `error` frame; the worker keeps serving. Only I/O failures end the loop
/// early.
pub fn serve<R: BufRead, W: Write>(mut reader: R, mut writer: W) -> Result<()> {
    let mut slugger: Option<Slugger> = None;
    let mut served = 0usize;

    loop {
        let request = match read_frame::<_, Request>(&mut reader) {
            Ok(Some(request)) => request,
            Ok(None) => break,
            Err(EngineError::Protocol(message)) => {
                log::warn!("rejected frame: {message}");
                write_frame(&mut writer, &Response::Error { message })?;
                continue;
            }
            Err(e) => return Err(e),
        };

        let response = match request {
            Request::Configure { config } => {
                log::debug!("configured: {config:?}");
                slugger = Some(Slugger::new(Arc::new(config)));
                Response::Ready
            }
            Request::Chunk { start, items } => match &slugger {
                Some(slugger) => {
                    served += items.len();
                    Response::Slugs {
                        start,
                        slugs: items.iter().map(|text| slugger.slugify(text)).collect(),
                    }
                }
                None => Response::Error {
                    message: "chunk received before configure".to_string(),
                },
            },
        };

        write_frame(&mut writer, &response)?;
    }

    log::debug!("input closed after {served} items");
    Ok(())
}
