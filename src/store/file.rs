use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::backup::{Backup, NoBackup};
use super::{ModifyMode, ModifyReport, ReadBooks, WriteBooks};
use crate::book::{Book, Field};
use crate::error::StoreError;
use crate::lock::{InMemoryLock, Lock, LockGuard};

/// Outcome of [`FileStore::recover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// No side file was present.
    Clean,
    /// The catalog was missing and the side file took its place.
    Promoted,
    /// A leftover side file was removed; the catalog was kept.
    DiscardedStale,
}

/// Catalog stored as one pipe-delimited line per book.
///
/// A missing file is an empty table. Rewrites go to `<path>.tmp` and are
/// renamed over the catalog, so readers see either the old or the new
/// content, never a partial one.
pub struct FileStore<L: Lock = InMemoryLock> {
    path: PathBuf,
    side_path: PathBuf,
    lock: L,
    backup: Box<dyn Backup>,
}

impl FileStore<InMemoryLock> {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut side = OsString::from(path.as_os_str());
        side.push(".tmp");
        FileStore {
            path,
            side_path: PathBuf::from(side),
            lock: InMemoryLock::new(),
            backup: Box::new(NoBackup),
        }
    }
}

impl<L: Lock> FileStore<L> {
    /// Swap the guard implementation.
    pub fn with_lock<M: Lock>(self, lock: M) -> FileStore<M> {
        FileStore {
            path: self.path,
            side_path: self.side_path,
            lock,
            backup: self.backup,
        }
    }

    /// Run `backup` before every mutation.
    pub fn with_backup(mut self, backup: impl Backup + 'static) -> Self {
        self.backup = Box::new(backup);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Side file used by rewrites.
    pub fn side_path(&self) -> &Path {
        &self.side_path
    }

    /// Startup housekeeping after a crash mid-rewrite: promote the side file
    /// when the catalog itself is gone, otherwise delete the leftover.
    pub fn recover(&self) -> Result<Recovery, StoreError> {
        let _held = LockGuard::acquire(&self.lock)?;

        if !self.side_path.exists() {
            return Ok(Recovery::Clean);
        }
        if self.path.exists() {
            fs::remove_file(&self.side_path).map_err(StoreError::io("remove stale side file"))?;
            warn!(side = %self.side_path.display(), "removed stale side file");
            Ok(Recovery::DiscardedStale)
        } else {
            fs::rename(&self.side_path, &self.path)
                .map_err(StoreError::io("promote side file"))?;
            warn!(path = %self.path.display(), "catalog restored from side file");
            Ok(Recovery::Promoted)
        }
    }

    fn reader(&self) -> Result<Option<BufReader<File>>, StoreError> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(BufReader::new(file))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::io("open catalog")(err)),
        }
    }

    /// Calls `visit` with the 1-based line number of every non-empty line
    /// until it breaks or the file ends.
    fn scan<F>(&self, mut visit: F) -> Result<(), StoreError>
    where
        F: FnMut(usize, &str) -> Result<ControlFlow<()>, StoreError>,
    {
        let Some(reader) = self.reader()? else {
            return Ok(());
        };
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(StoreError::io("read catalog"))?;
            if line.trim().is_empty() {
                continue;
            }
            if visit(index + 1, &line)?.is_break() {
                break;
            }
        }
        Ok(())
    }

    fn write_side(&self) -> Result<BufWriter<File>, StoreError> {
        let file = File::create(&self.side_path).map_err(StoreError::io("create side file"))?;
        Ok(BufWriter::new(file))
    }

    fn discard_side(&self) {
        if let Err(err) = fs::remove_file(&self.side_path) {
            if err.kind() != io::ErrorKind::NotFound {
                warn!(%err, side = %self.side_path.display(), "could not remove side file");
            }
        }
    }

    /// Flush the side file to disk and rename it over the catalog.
    fn swap(&self, writer: BufWriter<File>) -> Result<(), StoreError> {
        let file = writer
            .into_inner()
            .map_err(|err| StoreError::io("flush side file")(err.into_error()))?;
        file.sync_all().map_err(StoreError::io("sync side file"))?;
        drop(file);
        fs::rename(&self.side_path, &self.path).map_err(StoreError::io("replace catalog"))
    }

    fn rewrite_matching(
        &self,
        reader: BufReader<File>,
        writer: &mut BufWriter<File>,
        targets: &HashMap<&str, &Book>,
        mode: ModifyMode,
    ) -> Result<Vec<Book>, StoreError> {
        let mut affected = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(StoreError::io("read catalog"))?;
            if line.trim().is_empty() {
                continue;
            }
            let stored = parse(index + 1, &line)?;
            match (targets.get(stored.id.as_str()), mode) {
                (Some(replacement), ModifyMode::Update) => {
                    writeln!(writer, "{}", replacement.to_line())
                        .map_err(StoreError::io("write side file"))?;
                    affected.push((*replacement).clone());
                }
                (Some(_), ModifyMode::Delete) => affected.push(stored),
                (None, _) => {
                    writeln!(writer, "{line}").map_err(StoreError::io("write side file"))?;
                }
            }
        }
        Ok(affected)
    }

    fn write_table(&self, books: &[Book]) -> Result<(), StoreError> {
        let mut writer = self.write_side()?;
        let written = books.iter().try_for_each(|book| {
            writeln!(writer, "{}", book.to_line()).map_err(StoreError::io("write side file"))
        });
        match written.and_then(|()| self.swap(writer)) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.discard_side();
                Err(err)
            }
        }
    }
}

fn parse(line_no: usize, line: &str) -> Result<Book, StoreError> {
    Book::from_line(line).map_err(|err| StoreError::MalformedRecord {
        line: line_no,
        found: err.found,
    })
}

/// `true` for an empty file or one whose last byte is `\n`.
fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn joined_ids(targets: &[Book]) -> String {
    targets
        .iter()
        .map(|book| book.id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl<L: Lock> ReadBooks for FileStore<L> {
    fn next_id(&self) -> Result<u64, StoreError> {
        let mut last: Option<(usize, String)> = None;
        self.scan(|line_no, line| {
            last = Some((line_no, line.to_string()));
            Ok(ControlFlow::Continue(()))
        })?;

        let Some((line_no, line)) = last else {
            return Ok(1);
        };
        let book = parse(line_no, &line)?;
        book.id
            .parse::<u64>()
            .ok()
            .and_then(|id| id.checked_add(1))
            .ok_or(StoreError::InvalidId(book.id))
    }

    fn is_unique(&self, book: &Book) -> Result<bool, StoreError> {
        let mut unique = true;
        self.scan(|line_no, line| {
            let stored = parse(line_no, line)?;
            if stored.name == book.name && stored.authors == book.authors {
                unique = false;
                return Ok(ControlFlow::Break(()));
            }
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(unique)
    }

    fn read_all(&self) -> Result<Vec<Book>, StoreError> {
        let mut books = Vec::new();
        self.scan(|line_no, line| {
            books.push(parse(line_no, line)?);
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(books)
    }

    fn search(&self, field: Field, value: &str) -> Result<Vec<Book>, StoreError> {
        let needle = value.to_lowercase();
        let mut found = Vec::new();
        self.scan(|line_no, line| {
            let book = parse(line_no, line)?;
            let stored = book.get(field);
            if field.is_exact_match() {
                if stored == value {
                    found.push(book);
                    if field == Field::Id {
                        return Ok(ControlFlow::Break(()));
                    }
                }
            } else if stored.to_lowercase().contains(&needle) {
                found.push(book);
            }
            Ok(ControlFlow::Continue(()))
        })?;
        debug!(%field, value, matches = found.len(), "search");
        Ok(found)
    }
}

impl<L: Lock> WriteBooks for FileStore<L> {
    fn create(&self, mut book: Book) -> Result<Book, StoreError> {
        let _held = LockGuard::acquire(&self.lock)?;
        self.backup.before_mutation(&self.path)?;

        book.id = self.next_id()?.to_string();
        if !self.is_unique(&book)? {
            return Err(StoreError::DuplicateRecord {
                name: book.name,
                authors: book.authors,
            });
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(StoreError::io("open catalog for append"))?;

        let mut record = String::new();
        if !ends_with_newline(&mut file).map_err(StoreError::io("inspect catalog tail"))? {
            warn!(path = %self.path.display(), "catalog lacked a final newline");
            record.push('\n');
        }
        record.push_str(&book.to_line());
        record.push('\n');
        file.write_all(record.as_bytes())
            .map_err(StoreError::io("append record"))?;
        file.sync_data().map_err(StoreError::io("sync catalog"))?;

        info!(id = %book.id, name = %book.name, "book created");
        Ok(book)
    }

    fn modify(&self, targets: &[Book], mode: ModifyMode) -> Result<ModifyReport, StoreError> {
        let _held = LockGuard::acquire(&self.lock)?;
        self.backup.before_mutation(&self.path)?;

        let Some(reader) = self.reader()? else {
            return Err(StoreError::NotFound(joined_ids(targets)));
        };
        let by_id: HashMap<&str, &Book> = targets
            .iter()
            .map(|book| (book.id.as_str(), book))
            .collect();

        let mut writer = self.write_side()?;
        let affected = match self.rewrite_matching(reader, &mut writer, &by_id, mode) {
            Ok(affected) => affected,
            Err(err) => {
                drop(writer);
                self.discard_side();
                return Err(err);
            }
        };

        if affected.is_empty() {
            drop(writer);
            self.discard_side();
            return Err(StoreError::NotFound(joined_ids(targets)));
        }
        if let Err(err) = self.swap(writer) {
            self.discard_side();
            return Err(err);
        }

        info!(?mode, count = affected.len(), "catalog rewritten");
        Ok(ModifyReport { mode, affected })
    }

    fn update(&self, book: Book) -> Result<Book, StoreError> {
        let _held = LockGuard::acquire(&self.lock)?;
        self.backup.before_mutation(&self.path)?;

        let mut books = self.read_all()?;
        let Some(position) = books.iter().position(|stored| stored.id == book.id) else {
            return Err(StoreError::NotFound(book.id));
        };
        let clashes = books.iter().any(|stored| {
            stored.id != book.id && stored.name == book.name && stored.authors == book.authors
        });
        if clashes {
            return Err(StoreError::DuplicateRecord {
                name: book.name,
                authors: book.authors,
            });
        }

        books[position] = book.clone();
        self.write_table(&books)?;

        info!(id = %book.id, name = %book.name, "book updated");
        Ok(book)
    }
}
