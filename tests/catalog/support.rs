//! Fixtures shared by the catalog suites.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use book_catalog::session::{drive, StreamTransport};
use book_catalog::{Book, FileStore, Session};
use tempfile::TempDir;

/// A store over a fresh file in its own temp dir. Keep the dir alive for as
/// long as the store is used.
pub fn temp_store() -> (TempDir, FileStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("books"));
    (dir, store)
}

pub fn data_file(dir: &TempDir) -> PathBuf {
    dir.path().join("books")
}

/// A fully valid record; ids are assigned by the store.
pub fn book(name: &str, authors: &str) -> Book {
    Book {
        name: name.into(),
        year: "2000".into(),
        authors: authors.into(),
        genres: "novel".into(),
        width: "120".into(),
        height: "180".into(),
        cover: "soft".into(),
        source: "purchase".into(),
        added: "01-01-2020".into(),
        ..Book::default()
    }
}

/// Create-flow answers for `book(name, authors)`, confirmation included.
pub fn create_script<'a>(name: &'a str, authors: &'a str) -> Vec<&'a str> {
    vec![
        "1", "1", name, authors, "novel", "2000", "120", "180", "soft", "purchase", "01-01-2020",
        "", "", "y", "exit",
    ]
}

/// Feed `input` to a fresh session and return everything it sent back,
/// greeting included.
pub fn transcript(store: Arc<FileStore>, input: &[&str]) -> String {
    let mut script = input.join("\n");
    script.push('\n');

    let mut session = Session::new(store);
    let mut transport = StreamTransport::new(Cursor::new(script.into_bytes()), Vec::new());
    drive(&mut session, &mut transport).unwrap();
    let (_, output) = transport.into_parts();
    String::from_utf8(output).unwrap()
}
