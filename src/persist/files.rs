//! Flat-file access: directory setup, whole-file rewrite, append.
//!
//! Saves never fail the caller. A file that cannot be written is logged
//! with `warn!` and the in-memory state stays authoritative until the next
//! successful save.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// Name of the scratch file used to probe directory writability
const WRITE_PROBE: &str = ".test_writable";

/// Paths and I/O for one data directory.
#[derive(Debug, Clone)]
pub struct DataFiles {
    root: PathBuf,
    database: PathBuf,
    shipments: PathBuf,
}

impl DataFiles {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            root: config.data_dir.clone(),
            database: config.database_dir(),
            shipments: config.shipments_path(),
        }
    }

    /// Data directory root
    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<name>`
    #[inline]
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    #[inline]
    pub fn shipments_path(&self) -> &Path {
        &self.shipments
    }

    /// Create the data and database directories and prove both writable.
    ///
    /// # Returns
    ///
    /// * `Err(StoreError::DataDirUnwritable)` - a directory cannot be
    ///   created or written; callers treat this as fatal
    pub fn ensure_directories(&self) -> StoreResult<()> {
        for dir in [&self.root, &self.database] {
            if let Err(err) = fs::create_dir_all(dir) {
                warn!(path = ?dir, error = %err, "Failed to create data directory");
                return Err(StoreError::DataDirUnwritable { path: dir.clone() });
            }
            if let Err(err) = probe_writable(dir) {
                warn!(path = ?dir, error = %err, "Data directory is not writable");
                return Err(StoreError::DataDirUnwritable { path: dir.clone() });
            }
        }
        debug!(root = ?self.root, "Data directories ready");
        Ok(())
    }

    /// Non-blank lines of a file.
    ///
    /// # Returns
    ///
    /// `None` when the file does not exist or cannot be read (the latter
    /// is logged)
    pub fn read_lines(&self, path: &Path) -> Option<Vec<String>> {
        if !path.exists() {
            debug!(?path, "File not found, nothing to load");
            return None;
        }

        match read_non_blank_lines(path) {
            Ok(lines) => Some(lines),
            Err(err) => {
                warn!(?path, error = %err, "Could not read file");
                None
            }
        }
    }

    /// Replace a file's contents with `lines`.
    ///
    /// # Returns
    ///
    /// `true` if the file was written; failures are logged
    pub fn save<I>(&self, path: &Path, lines: I) -> bool
    where
        I: IntoIterator<Item = String>,
    {
        match write_lines(path, lines) {
            Ok(count) => {
                debug!(?path, records = count, "Saved");
                true
            }
            Err(err) => {
                warn!(?path, error = %err, "Error saving file");
                false
            }
        }
    }

    /// Append a single line.
    ///
    /// # Returns
    ///
    /// `true` if the line was written; failures are logged
    pub fn append(&self, path: &Path, line: &str) -> bool {
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| writeln!(file, "{}", line));

        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(?path, error = %err, "Error appending to file");
                false
            }
        }
    }
}

fn probe_writable(dir: &Path) -> io::Result<()> {
    let probe = dir.join(WRITE_PROBE);
    File::create(&probe)?;
    fs::remove_file(&probe)
}

fn read_non_blank_lines(path: &Path) -> io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim_end_matches('\r');
        if !trimmed.trim().is_empty() {
            lines.push(trimmed.to_string());
        }
    }
    Ok(lines)
}

fn write_lines<I>(path: &Path, lines: I) -> io::Result<usize>
where
    I: IntoIterator<Item = String>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    let mut count = 0;
    for line in lines {
        writeln!(writer, "{}", line)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

// ============================================================================
// Unit Tests
// ============================================================================
