//! Size-based rotating log file
//!
//! `<dir>/<app>.log` is the live file. When a write would push it past the
//! size limit it becomes `<app>.log.1`, the previous `.1` becomes `.2`, and
//! so on; files beyond `max_backups` are deleted.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

use crate::error::{KitError, Result};

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug)]
struct RotateState {
    path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    writer: BufWriter<File>,
    written: u64,
}

/// Rotating file writer, shareable across threads
#[derive(Debug, Clone)]
pub struct RotatingFile {
    state: Arc<Mutex<RotateState>>,
}

impl RotatingFile {
    /// Open (append) `path`, rotating once it exceeds `max_bytes`
    pub fn new(path: impl Into<PathBuf>, max_bytes: u64, max_backups: usize) -> Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| KitError::Logger {
                reason: format!("cannot create log dir '{}': {e}", dir.display()),
            })?;
        }
        let (writer, written) = open_append(&path)?;
        Ok(Self {
            state: Arc::new(Mutex::new(RotateState {
                path,
                max_bytes: max_bytes.max(1),
                max_backups,
                writer,
                written,
            })),
        })
    }

    /// `<dir>/<app_name>.log` with the limit given in megabytes
    pub fn for_app(
        dir: impl AsRef<Path>,
        app_name: &str,
        max_size_mb: u64,
        max_backups: usize,
    ) -> Result<Self> {
        let path = dir.as_ref().join(format!("{app_name}.log"));
        Self::new(path, max_size_mb.saturating_mul(BYTES_PER_MB), max_backups)
    }

    pub fn path(&self) -> PathBuf {
        self.state.lock().path.clone()
    }
}

fn open_append(path: &Path) -> Result<(BufWriter<File>, u64)> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| KitError::File {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    let written = file.metadata()?.len();
    Ok((BufWriter::new(file), written))
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

impl RotateState {
    fn rotate(&mut self) -> io::Result<()> {
        self.writer.flush()?;

        if self.max_backups == 0 {
            fs::remove_file(&self.path)?;
        } else {
            let oldest = backup_path(&self.path, self.max_backups);
            if oldest.exists() {
                fs::remove_file(&oldest)?;
            }
            for index in (1..self.max_backups).rev() {
                let from = backup_path(&self.path, index);
                if from.exists() {
                    fs::rename(&from, backup_path(&self.path, index + 1))?;
                }
            }
            fs::rename(&self.path, backup_path(&self.path, 1))?;
        }

        let (writer, written) =
            open_append(&self.path).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        self.writer = writer;
        self.written = written;
        Ok(())
    }
}

impl Write for RotateState {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        self.writer.write_all(buf)?;
        self.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Locked handle handed out per event; flushes when dropped
pub struct RotatingWriter<'a>(MutexGuard<'a, RotateState>);

impl Write for RotatingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl Drop for RotatingWriter<'_> {
    fn drop(&mut self) {
        let _ = self.0.flush();
    }
}

impl<'a> MakeWriter<'a> for RotatingFile {
    type Writer = RotatingWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingWriter(self.state.lock())
    }
}
