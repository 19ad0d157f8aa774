//! Static text blocks and prompts of the line protocol.

use crate::book::Field;

pub const WELCOME: &str = "Connected to the book catalog server!";
pub const FAREWELL: &str = "Goodbye!";
pub const BACK_TO_TOP: &str = "Returning to the main menu";
pub const MENU_HINT: &str = "Send '0' to view the menu";
pub const INVALID_TOP: &str = "Invalid choice. Try again.";
pub const INVALID_SUB: &str = "Invalid choice in submenu. Try again.";

pub const TOP: &str = "
 -----------------
| Choose an action |
 -----------------
0 - Menu
1 - Create
2 - Read
3 - Search
4 - Update
5 - Delete
exit - Quit
";

pub const CREATE: &str = "
 ------------
| Add a book |
 ------------
1/
|---- 0 - Menu
|---- 1 - Enter a book
|---- exit - Back
";

pub const READ: &str = "
 ------------
| View books |
 ------------
2/
|---- 0 - Menu
|---- 1 - List all books
|---- exit - Back
";

pub const SEARCH: &str = "
 --------------
| Search books |
 --------------
3/
|---- 0 - Menu
|---- 1 - Find books
|---- exit - Back
";

pub const FILTER: &str = "
 ---------------
| Find books by |
 ---------------
---- 3/1/
|---- ---- 0 - Menu
|---- ---- 1 - Field 'id'
|---- ---- 2 - Field 'name'
|---- ---- 3 - Field 'year'
|---- ---- 4 - Field 'authors'
|---- ---- 5 - Field 'genres'
|---- ---- 6 - Field 'width'
|---- ---- 7 - Field 'height'
|---- ---- 8 - Field 'cover'
|---- ---- 9 - Field 'source'
|---- ---- 10 - Field 'added'
|---- ---- 11 - Field 'read'
|---- ---- 12 - Field 'rating'
|---- ---- exit - Back
";

pub const UPDATE: &str = "
 --------------
| Update books |
 --------------
4/
|---- 0 - Menu
|---- 1 - Update a book
|---- exit - Back
";

pub const DELETE: &str = "
 --------------
| Delete books |
 --------------
5/
|---- 0 - Menu
|---- 1 - Delete books
|---- exit - Back
";

/// Prompt for a field while creating a book.
pub fn create_prompt(field: Field) -> &'static str {
    match field {
        Field::Id => "Enter the book id:",
        Field::Name => "Enter the book title:",
        Field::Authors => "Enter the authors (comma-separated):",
        Field::Genres => "Enter the genres (comma-separated):",
        Field::Year => "Enter the publication year:",
        Field::Width => "Enter the book width (mm):",
        Field::Height => "Enter the book height (mm):",
        Field::Cover => "Enter the cover type (soft/hard):",
        Field::Source => "Enter the source (purchase/gift/inheritance):",
        Field::Added => "Enter the date added (DD-MM-YYYY):",
        Field::Read => "Enter the date read (DD-MM-YYYY) or leave empty:",
        Field::Rating => "Enter the rating (N/10 - comment) or leave empty:",
    }
}

/// Prompt for a field while editing, showing the value it will keep on an
/// empty line.
pub fn update_prompt(field: Field, current: &str) -> String {
    let label = match field {
        Field::Id => "Id",
        Field::Name => "Title",
        Field::Authors => "Authors (comma-separated)",
        Field::Genres => "Genres (comma-separated)",
        Field::Year => "Publication year",
        Field::Width => "Width (mm)",
        Field::Height => "Height (mm)",
        Field::Cover => "Cover type (soft/hard)",
        Field::Source => "Source (purchase/gift/inheritance)",
        Field::Added => "Date added (DD-MM-YYYY)",
        Field::Read => "Date read (DD-MM-YYYY) or empty",
        Field::Rating => "Rating (N/10 - comment) or empty",
    };
    format!("{label}: (current: {current})")
}

pub fn search_prompt(field: Field) -> String {
    format!("Enter a value to search by field '{field}':")
}
