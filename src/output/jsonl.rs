//! JSON-lines output sink
//!
//! Appends one JSON object per page to `<directory>/crawl-<session>.jsonl`.
//! The file is created on the first emitted page, so a crawl that emits
//! nothing leaves nothing behind.

use crate::output::traits::{OutputResult, OutputSink, PageRecord};
use chrono::{DateTime, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Builds a crawl session identifier
///
/// Format: `<UTC timestamp>-<first 8 hex chars of the config hash>`, e.g.
/// `20260301T120000Z-3fa1c09b`.
pub fn session_id(config_hash: &str, started_at: DateTime<Utc>) -> String {
    let fingerprint: String = config_hash.chars().take(8).collect();
    format!("{}-{}", started_at.format("%Y%m%dT%H%M%SZ"), fingerprint)
}

/// Default [`OutputSink`]: appends JSON lines to a per-session file
#[derive(Debug)]
pub struct JsonlSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl JsonlSink {
    /// Creates a sink writing to `directory/crawl-<session>.jsonl`
    pub fn for_session(directory: impl AsRef<Path>, session: &str) -> Self {
        Self::new(
            directory
                .as_ref()
                .join(format!("crawl-{}.jsonl", session)),
        )
    }

    /// Creates a sink appending to an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
        }
    }

    /// Path of the output file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn writer(&mut self) -> OutputResult<&mut BufWriter<File>> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => {
                if let Some(parent) = self.path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?;
                tracing::info!("Writing crawl output to {}", self.path.display());
                BufWriter::new(file)
            }
        };

        Ok(self.writer.insert(writer))
    }
}

impl OutputSink for JsonlSink {
    fn emit(&mut self, page: &PageRecord) -> OutputResult<()> {
        let line = serde_json::to_string(page)?;
        let writer = self.writer()?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for JsonlSink {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::error!("Failed to flush {}: {}", self.path.display(), e);
        }
    }
}
