use std::fmt::Write;

use crate::book::Book;
use crate::store::{ModifyMode, ModifyReport};

const RULE_WIDTH: usize = 50;

/// Full listing used by Read and Search.
pub fn book_list(books: &[Book]) -> String {
    if books.is_empty() {
        return "The book list is empty".to_string();
    }

    let rule = "-".repeat(RULE_WIDTH);
    let mut out = format!("\nBook list:\n{rule}\n");
    for book in books {
        let _ = write!(
            out,
            "ID: {}\nTitle: {}\nAuthors: {}\nYear: {}\nGenres: {}\n\
             Size: {}x{} mm\nCover: {}\nSource: {}\n\
             Added: {}\nRead: {}\nRating: {}\n{rule}\n",
            book.id,
            book.name,
            book.authors,
            book.year,
            book.genres,
            book.width,
            book.height,
            book.cover,
            book.source,
            book.added,
            book.read,
            book.rating,
        );
    }
    let _ = writeln!(out, "Total books: {}", books.len());
    out
}

/// Pending record shown before a create or update is confirmed.
pub fn summary(book: &Book) -> String {
    format!(
        "\nID: {}\nTitle: {}\nAuthors: {}\nGenres: {}\nYear: {}\nSize: {}x{} mm\n\
         Cover: {}\nSource: {}\nDate added: {}\nDate read: {}\nRating: {}\n",
        book.id,
        book.name,
        book.authors,
        book.genres,
        book.year,
        book.width,
        book.height,
        book.cover,
        book.source,
        book.added,
        book.read,
        book.rating,
    )
}

pub fn delete_preview(books: &[Book]) -> String {
    let mut out = String::from("Books found for deletion:\n");
    for book in books {
        let _ = writeln!(
            out,
            "ID: {}, Title: {}, Authors: {}",
            book.id, book.name, book.authors
        );
    }
    out.push_str("Confirm deletion (y/n):");
    out
}

pub fn modify_report(report: &ModifyReport) -> String {
    let verb = match report.mode {
        ModifyMode::Update => "Updated",
        ModifyMode::Delete => "Deleted",
    };
    report
        .affected
        .iter()
        .map(|book| format!("{verb} book: {} (ID: {})", book.name, book.id))
        .collect::<Vec<_>>()
        .join("\n")
}
