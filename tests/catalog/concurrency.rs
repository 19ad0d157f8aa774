//! Writers from many sessions at once.

use std::collections::BTreeSet;
use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;

use book_catalog::{FileStore, ReadBooks, TokenLock, WriteBooks};

use crate::support::{book, data_file, temp_store};

const WRITERS: usize = 16;

#[test]
fn concurrent_creates_get_distinct_consecutive_ids() {
    let (dir, store) = temp_store();
    let store = Arc::new(store);
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = (0..WRITERS)
        .map(|n| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.create(book(&format!("Book {n}"), "Author")).unwrap()
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let ids: BTreeSet<u64> = store
        .read_all()
        .unwrap()
        .iter()
        .map(|book| book.id.parse().unwrap())
        .collect();
    assert_eq!(ids, (1..=WRITERS as u64).collect());

    let content = fs::read_to_string(data_file(&dir)).unwrap();
    assert_eq!(content.lines().count(), WRITERS);
    assert!(content.lines().all(|line| line.split('|').count() == 12));
}

#[test]
fn racing_duplicates_store_exactly_one() {
    let (_dir, store) = temp_store();
    let store = Arc::new(store);
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.create(book("Same", "Author")).is_ok()
            })
        })
        .collect();
    let stored = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(stored, 1);
    assert_eq!(store.read_all().unwrap().len(), 1);
}

#[test]
fn readers_never_see_a_partial_rewrite() {
    let (_dir, store) = temp_store();
    for n in 0..20 {
        store.create(book(&format!("Book {n}"), "Author")).unwrap();
    }
    let store = Arc::new(store);

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for id in (1..=20).rev().step_by(2) {
                store.delete(&[&id.to_string()]).unwrap();
            }
        })
    };
    let reader = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..50 {
                let books = store.read_all().unwrap();
                assert!(books.len() >= 10 && books.len() <= 20);
            }
        })
    };
    writer.join().unwrap();
    reader.join().unwrap();

    assert_eq!(store.read_all().unwrap().len(), 10);
}

#[test]
fn channel_token_serializes_writers_too() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::open(dir.path().join("books")).with_lock(TokenLock::new()));

    let handles: Vec<_> = (0..WRITERS)
        .map(|n| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.create(book(&format!("Book {n}"), "Author")).unwrap())
        })
        .collect();
    let mut ids: Vec<u64> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap().id.parse().unwrap())
        .collect();
    ids.sort_unstable();

    assert_eq!(ids, (1..=WRITERS as u64).collect::<Vec<_>>());
}
