//! Record store behavior on disk.

use std::fs;

use book_catalog::{
    Book, DirectoryBackup, Field, FileStore, ModifyMode, ReadBooks, StoreError, WriteBooks,
};

use crate::support::{book, data_file, temp_store};

// ============================================================================
// Create
// ============================================================================

#[test]
fn created_records_read_back_unchanged() {
    let (_dir, store) = temp_store();
    let mut original = book("Dead Souls", "Gogol");
    original.read = "05-05-2021".into();
    original.rating = "9/10 - Sharp".into();

    let created = store.create(original.clone()).unwrap();
    assert_eq!(created.id, "1");

    original.id = "1".into();
    assert_eq!(store.read_all().unwrap(), vec![original]);
}

#[test]
fn duplicate_name_and_authors_is_rejected() {
    let (dir, store) = temp_store();
    store.create(book("Dead Souls", "Gogol")).unwrap();
    let before = fs::read(data_file(&dir)).unwrap();

    let err = store.create(book("Dead Souls", "Gogol")).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateRecord { .. }));
    assert_eq!(store.read_all().unwrap().len(), 1);
    assert_eq!(fs::read(data_file(&dir)).unwrap(), before);

    // Same title, different authors is a different book.
    assert_eq!(store.create(book("Dead Souls", "Someone Else")).unwrap().id, "2");
}

#[test]
fn ids_follow_the_last_record() {
    let (_dir, store) = temp_store();
    for name in ["A", "B", "C"] {
        store.create(book(name, "Author")).unwrap();
    }
    store.delete(&["2"]).unwrap();

    let next = store.create(book("D", "Author")).unwrap();
    assert_eq!(next.id, "4");
}

#[test]
fn create_after_unterminated_last_line_keeps_both_records() {
    let (dir, store) = temp_store();
    let mut first = book("A", "Author");
    first.id = "1".into();
    fs::write(data_file(&dir), first.to_line()).unwrap();

    let second = store.create(book("B", "Author")).unwrap();
    assert_eq!(second.id, "2");
    assert_eq!(store.read_all().unwrap(), vec![first, second]);

    let content = fs::read_to_string(data_file(&dir)).unwrap();
    assert!(content.ends_with('\n'));
    assert!(content.lines().all(|line| line.split('|').count() == 12));
}

#[test]
fn empty_table_restarts_at_one() {
    let (_dir, store) = temp_store();
    store.create(book("A", "Author")).unwrap();
    store.delete(&["1"]).unwrap();
    assert!(store.read_all().unwrap().is_empty());

    assert_eq!(store.create(book("B", "Author")).unwrap().id, "1");
}

// ============================================================================
// Modify / delete / update
// ============================================================================

#[test]
fn deleting_absent_id_leaves_file_untouched() {
    let (dir, store) = temp_store();
    store.create(book("A", "Author")).unwrap();
    store.create(book("B", "Author")).unwrap();
    let before = fs::read(data_file(&dir)).unwrap();

    let err = store.delete(&["42"]).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref ids) if ids == "42"));
    assert_eq!(fs::read(data_file(&dir)).unwrap(), before);
    assert!(!store.side_path().exists());
}

#[test]
fn deleting_present_id_keeps_the_rest_in_order() {
    let (_dir, store) = temp_store();
    let a = store.create(book("A", "Author")).unwrap();
    store.create(book("B", "Author")).unwrap();
    let c = store.create(book("C", "Author")).unwrap();

    let report = store.delete(&["2"]).unwrap();
    assert_eq!(report.mode, ModifyMode::Delete);
    assert_eq!(report.affected.len(), 1);
    assert_eq!(report.affected[0].name, "B");
    assert_eq!(store.read_all().unwrap(), vec![a, c]);
}

#[test]
fn modify_on_missing_file_is_not_found() {
    let (_dir, store) = temp_store();
    let err = store
        .modify(&[Book::with_id("1")], ModifyMode::Delete)
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn modify_in_update_mode_replaces_lines() {
    let (_dir, store) = temp_store();
    store.create(book("A", "Author")).unwrap();
    let mut b = store.create(book("B", "Author")).unwrap();

    b.cover = "hard".into();
    let report = store.modify(&[b.clone()], ModifyMode::Update).unwrap();
    assert_eq!(report.affected, vec![b.clone()]);
    assert_eq!(store.search(Field::Id, "2").unwrap(), vec![b]);
}

#[test]
fn update_replaces_the_matching_record() {
    let (_dir, store) = temp_store();
    store.create(book("A", "Author")).unwrap();
    let mut b = store.create(book("B", "Author")).unwrap();

    b.name = "B revised".into();
    store.update(b.clone()).unwrap();

    let books = store.read_all().unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[1], b);
}

#[test]
fn update_refuses_to_clash_with_another_book() {
    let (_dir, store) = temp_store();
    store.create(book("A", "Author")).unwrap();
    let mut b = store.create(book("B", "Author")).unwrap();

    b.name = "A".into();
    assert!(matches!(
        store.update(b),
        Err(StoreError::DuplicateRecord { .. })
    ));
}

#[test]
fn update_of_unknown_id_is_not_found() {
    let (_dir, store) = temp_store();
    store.create(book("A", "Author")).unwrap();
    let mut ghost = book("Ghost", "Nobody");
    ghost.id = "9".into();
    assert!(matches!(store.update(ghost), Err(StoreError::NotFound(_))));
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn search_by_year_is_exact() {
    let (_dir, store) = temp_store();
    let a = store.create(book("A", "Author")).unwrap();
    let mut older = book("B", "Author");
    older.year = "1999".into();
    store.create(older).unwrap();

    assert_eq!(store.search(Field::Year, "2000").unwrap(), vec![a]);
    assert!(store.search(Field::Year, "200").unwrap().is_empty());
}

#[test]
fn text_search_is_case_insensitive_containment() {
    let (_dir, store) = temp_store();
    store.create(book("Dead Souls", "Nikolai Gogol")).unwrap();
    store.create(book("War and Peace", "Leo Tolstoy")).unwrap();

    let found = store.search(Field::Authors, "gogol").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Dead Souls");
    assert_eq!(store.search(Field::Name, "A").unwrap().len(), 2);
}

#[test]
fn unknown_field_name_matches_nothing() {
    let (_dir, store) = temp_store();
    store.create(book("A", "Author")).unwrap();
    assert!(store.search_by_name("publisher", "A").unwrap().is_empty());
    assert_eq!(store.search_by_name("name", "a").unwrap().len(), 1);
}

#[test]
fn malformed_line_aborts_the_read() {
    let (dir, store) = temp_store();
    store.create(book("A", "Author")).unwrap();
    let mut content = fs::read_to_string(data_file(&dir)).unwrap();
    content.push_str("2|broken\n");
    fs::write(data_file(&dir), content).unwrap();

    assert!(matches!(
        store.read_all(),
        Err(StoreError::MalformedRecord { line: 2, found: 2 })
    ));
    assert!(matches!(
        store.search(Field::Name, "zzz"),
        Err(StoreError::MalformedRecord { .. })
    ));
}

// ============================================================================
// Backups
// ============================================================================

#[test]
fn mutations_are_backed_up() {
    let dir = tempfile::tempdir().unwrap();
    let backups = dir.path().join("backups");
    let store =
        FileStore::open(dir.path().join("books")).with_backup(DirectoryBackup::new(&backups));

    // Nothing to copy before the first record exists.
    store.create(book("A", "Author")).unwrap();
    assert!(!backups.exists());

    store.create(book("B", "Author")).unwrap();
    let copies: Vec<_> = fs::read_dir(&backups).unwrap().collect();
    assert_eq!(copies.len(), 1);
}

#[test]
fn strict_backup_failure_blocks_the_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let blocked = dir.path().join("not-a-dir");
    fs::write(&blocked, "").unwrap();
    let store =
        FileStore::open(dir.path().join("books")).with_backup(DirectoryBackup::new(&blocked));

    store.create(book("A", "Author")).unwrap();
    assert!(matches!(
        store.create(book("B", "Author")),
        Err(StoreError::Backup(_))
    ));
    assert_eq!(store.read_all().unwrap().len(), 1);
}
