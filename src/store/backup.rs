use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Local;
use tracing::{debug, warn};

use crate::error::StoreError;

/// Side task run by the store right before each mutation.
pub trait Backup: Send + Sync {
    /// Called under the guard. An `Err` aborts the mutation.
    fn before_mutation(&self, data_file: &Path) -> Result<(), StoreError>;
}

/// Backups disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBackup;

impl Backup for NoBackup {
    fn before_mutation(&self, _data_file: &Path) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Copies the catalog into `dir` as `<file>_<timestamp>.bak` and keeps only
/// the `retain` most recent copies.
///
/// By default a failed copy aborts the mutation it precedes; `lenient`
/// turns that into a logged warning. Pruning failures are always only
/// logged.
#[derive(Debug, Clone)]
pub struct DirectoryBackup {
    dir: PathBuf,
    retain: usize,
    lenient: bool,
}

impl DirectoryBackup {
    pub const DEFAULT_RETAIN: usize = 5;

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectoryBackup {
            dir: dir.into(),
            retain: Self::DEFAULT_RETAIN,
            lenient: false,
        }
    }

    pub fn retain(mut self, retain: usize) -> Self {
        self.retain = retain;
        self
    }

    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn prefix(data_file: &Path) -> String {
        let name = data_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "catalog".to_string());
        format!("{name}_")
    }

    /// Copy `data_file` into the backup directory. Returns `None` when there
    /// is nothing to back up yet.
    pub fn create_backup(&self, data_file: &Path) -> io::Result<Option<PathBuf>> {
        if !data_file.exists() {
            return Ok(None);
        }
        fs::create_dir_all(&self.dir)?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S_%3f");
        let base = format!("{}{stamp}", Self::prefix(data_file));
        let mut target = self.dir.join(format!("{base}.bak"));
        let mut n = 1;
        while target.exists() {
            target = self.dir.join(format!("{base}_{n}.bak"));
            n += 1;
        }

        fs::copy(data_file, &target)?;
        debug!(backup = %target.display(), "catalog backed up");
        Ok(Some(target))
    }

    /// Delete all but the `retain` newest backups of `data_file`, newest by
    /// modification time. Returns how many were removed.
    pub fn cleanup_backups(&self, data_file: &Path) -> io::Result<usize> {
        let prefix = Self::prefix(data_file);
        let mut backups: Vec<(SystemTime, PathBuf)> = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !(name.starts_with(&prefix) && name.ends_with(".bak")) {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            backups.push((modified, entry.path()));
        }

        // Newest first; names embed the timestamp and break mtime ties.
        backups.sort_by(|a, b| b.cmp(a));

        let mut removed = 0;
        for (_, path) in backups.iter().skip(self.retain) {
            fs::remove_file(path)?;
            removed += 1;
        }
        Ok(removed)
    }
}

impl Backup for DirectoryBackup {
    fn before_mutation(&self, data_file: &Path) -> Result<(), StoreError> {
        match self.create_backup(data_file) {
            Ok(None) => return Ok(()),
            Ok(Some(_)) => {}
            Err(err) if self.lenient => {
                warn!(%err, dir = %self.dir.display(), "backup failed, continuing without it");
                return Ok(());
            }
            Err(err) => return Err(StoreError::Backup(err.to_string())),
        }

        if let Err(err) = self.cleanup_backups(data_file) {
            warn!(%err, dir = %self.dir.display(), "backup cleanup failed");
        }
        Ok(())
    }
}
