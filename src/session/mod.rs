//! Session protocol state machine: one instance per connection.
//!
//! The machine is driven one input line at a time through
//! [`Session::handle_line`], which returns the lines to send back. It never
//! reads from a socket itself, so a scripted `Vec` of lines exercises it
//! exactly like a live client does.
//!
//! Menu levels are explicit states. Each sub-menu handler returns a
//! [`Signal`] telling the dispatcher whether to stay at that level (with its
//! next step) or go back to the top menu.
//!
//! ```text
//! Top ─┬─ 1 Create ── field loop ── confirm
//!      ├─ 2 Read
//!      ├─ 3 Search ── field menu ── value
//!      ├─ 4 Update ── id ── field loop ── confirm
//!      └─ 5 Delete ── ids ── confirm
//! ```

pub mod menu;
mod render;
mod transport;

pub use render::{book_list, delete_preview, modify_report, summary};
pub use transport::{drive, LineTransport, StreamTransport};

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::book::{Book, Field};
use crate::error::StoreError;
use crate::store::{BookStore, ModifyMode};

/// Lines produced in answer to one input line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    lines: Vec<String>,
    close: bool,
}

impl Reply {
    fn say(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The transport should close after sending these lines.
    pub fn closes(&self) -> bool {
        self.close
    }
}

/// What a sub-menu asks the dispatcher to do after handling a line.
enum Signal<S> {
    /// Remain at this menu level, at the given step.
    Stay(S),
    /// Leave for the top menu.
    Parent,
}

enum CreateStep {
    Menu,
    Collect { draft: Book, next: usize },
    Confirm(Book),
}

enum SearchStep {
    Menu,
    Fields,
    Value(Field),
}

enum UpdateStep {
    Menu,
    AwaitId,
    Collect { book: Book, next: usize },
    Confirm(Book),
}

enum DeleteStep {
    Menu,
    AwaitIds,
    Confirm(Vec<Book>),
}

enum State {
    Top,
    Create(CreateStep),
    Read,
    Search(SearchStep),
    Update(UpdateStep),
    Delete(DeleteStep),
    Closed,
}

fn is_yes(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "y" | "д")
}

fn settle<S>(signal: Signal<S>, wrap: fn(S) -> State, reply: &mut Reply) -> State {
    match signal {
        Signal::Stay(step) => wrap(step),
        Signal::Parent => {
            reply.say(menu::BACK_TO_TOP);
            reply.say(menu::TOP);
            State::Top
        }
    }
}

/// One client's run through the menus.
pub struct Session<S> {
    store: Arc<S>,
    state: State,
    peer: String,
}

impl<S: BookStore> Session<S> {
    pub fn new(store: Arc<S>) -> Self {
        Session {
            store,
            state: State::Top,
            peer: String::from("local"),
        }
    }

    /// Label used in log records for this session.
    pub fn with_peer(mut self, peer: impl Into<String>) -> Self {
        self.peer = peer.into();
        self
    }

    /// Lines sent once, before any input.
    pub fn greeting(&self) -> Reply {
        let mut reply = Reply::default();
        reply.say(menu::WELCOME);
        reply.say(menu::TOP);
        reply
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// Advance the machine by one input line. Surrounding whitespace is
    /// ignored. Input after the session closed produces nothing.
    pub fn handle_line(&mut self, line: &str) -> Reply {
        let input = line.trim();
        debug!(peer = %self.peer, input, "received");

        let mut reply = Reply::default();
        let state = std::mem::replace(&mut self.state, State::Closed);
        self.state = match state {
            State::Top => self.on_top(input, &mut reply),
            State::Create(step) => {
                let signal = self.on_create(step, input, &mut reply);
                settle(signal, State::Create, &mut reply)
            }
            State::Read => {
                let signal = self.on_read(input, &mut reply);
                settle(signal, |()| State::Read, &mut reply)
            }
            State::Search(step) => {
                let signal = self.on_search(step, input, &mut reply);
                settle(signal, State::Search, &mut reply)
            }
            State::Update(step) => {
                let signal = self.on_update(step, input, &mut reply);
                settle(signal, State::Update, &mut reply)
            }
            State::Delete(step) => {
                let signal = self.on_delete(step, input, &mut reply);
                settle(signal, State::Delete, &mut reply)
            }
            State::Closed => State::Closed,
        };
        reply.close = self.is_closed();
        reply
    }

    fn on_top(&self, input: &str, reply: &mut Reply) -> State {
        reply.say(format!("You selected: {input}"));
        match input {
            "exit" => {
                reply.say(menu::FAREWELL);
                info!(peer = %self.peer, "session ended by client");
                State::Closed
            }
            "0" => {
                reply.say(menu::TOP);
                State::Top
            }
            "1" => {
                reply.say(menu::CREATE);
                State::Create(CreateStep::Menu)
            }
            "2" => {
                reply.say(menu::READ);
                State::Read
            }
            "3" => {
                reply.say(menu::SEARCH);
                State::Search(SearchStep::Menu)
            }
            "4" => {
                reply.say(menu::UPDATE);
                State::Update(UpdateStep::Menu)
            }
            "5" => {
                reply.say(menu::DELETE);
                State::Delete(DeleteStep::Menu)
            }
            _ => {
                reply.say(menu::INVALID_TOP);
                State::Top
            }
        }
    }

    fn on_create(&self, step: CreateStep, input: &str, reply: &mut Reply) -> Signal<CreateStep> {
        match step {
            CreateStep::Menu => match input {
                "exit" => Signal::Parent,
                "0" => {
                    reply.say(menu::CREATE);
                    Signal::Stay(CreateStep::Menu)
                }
                "1" => {
                    reply.say(menu::create_prompt(Field::EDITABLE[0]));
                    Signal::Stay(CreateStep::Collect {
                        draft: Book::new(),
                        next: 0,
                    })
                }
                _ => {
                    reply.say(menu::INVALID_SUB);
                    Signal::Stay(CreateStep::Menu)
                }
            },
            CreateStep::Collect { mut draft, next } => {
                let field = Field::EDITABLE[next];
                let accepted = if field.is_optional() && input.is_empty() {
                    Ok(())
                } else {
                    draft.set_validated(field, input)
                };
                if let Err(err) = accepted {
                    reply.say(format!("Invalid input: {err}"));
                    reply.say(menu::create_prompt(field));
                    return Signal::Stay(CreateStep::Collect { draft, next });
                }

                match Field::EDITABLE.get(next + 1) {
                    Some(following) => {
                        reply.say(menu::create_prompt(*following));
                        Signal::Stay(CreateStep::Collect {
                            draft,
                            next: next + 1,
                        })
                    }
                    None => {
                        reply.say(render::summary(&draft));
                        reply.say("Add this book? (y/n):");
                        Signal::Stay(CreateStep::Confirm(draft))
                    }
                }
            }
            CreateStep::Confirm(draft) => {
                if is_yes(input) {
                    reply.say("Adding the book...");
                    match self.store.create(draft) {
                        Ok(book) => {
                            reply.say(format!("Book added: {} (ID: {})", book.name, book.id))
                        }
                        Err(err) => self.report_failure("add the book", err, reply),
                    }
                } else {
                    reply.say("Adding cancelled.");
                }
                reply.say(menu::MENU_HINT);
                Signal::Stay(CreateStep::Menu)
            }
        }
    }

    fn on_read(&self, input: &str, reply: &mut Reply) -> Signal<()> {
        match input {
            "exit" => return Signal::Parent,
            "0" => reply.say(menu::READ),
            "1" => {
                reply.say("Listing all books...");
                match self.store.read_all() {
                    Ok(books) => reply.say(render::book_list(&books)),
                    Err(err) => self.report_failure("read the book list", err, reply),
                }
                reply.say(menu::MENU_HINT);
            }
            _ => reply.say(menu::INVALID_SUB),
        }
        Signal::Stay(())
    }

    fn on_search(&self, step: SearchStep, input: &str, reply: &mut Reply) -> Signal<SearchStep> {
        match step {
            SearchStep::Menu => match input {
                "exit" => Signal::Parent,
                "0" => {
                    reply.say(menu::SEARCH);
                    Signal::Stay(SearchStep::Menu)
                }
                "1" => {
                    reply.say(menu::FILTER);
                    Signal::Stay(SearchStep::Fields)
                }
                _ => {
                    reply.say(menu::INVALID_SUB);
                    Signal::Stay(SearchStep::Menu)
                }
            },
            SearchStep::Fields => match input {
                "exit" => {
                    reply.say("Returning to the search menu");
                    reply.say(menu::SEARCH);
                    Signal::Stay(SearchStep::Menu)
                }
                "0" => {
                    reply.say(menu::FILTER);
                    Signal::Stay(SearchStep::Fields)
                }
                _ => match input.parse().ok().and_then(Field::from_index) {
                    Some(field) => {
                        reply.say(menu::search_prompt(field));
                        Signal::Stay(SearchStep::Value(field))
                    }
                    None => {
                        reply.say(menu::INVALID_SUB);
                        Signal::Stay(SearchStep::Fields)
                    }
                },
            },
            SearchStep::Value(field) => {
                if field.requires_integer() && input.parse::<i64>().is_err() {
                    reply.say("Must be an integer. Try again:");
                    return Signal::Stay(SearchStep::Value(field));
                }
                match self.store.search(field, input) {
                    Ok(books) if books.is_empty() => reply.say("No books found"),
                    Ok(books) => {
                        reply.say("Books found:");
                        reply.say(render::book_list(&books));
                    }
                    Err(err) => self.report_failure("search", err, reply),
                }
                Signal::Stay(SearchStep::Fields)
            }
        }
    }

    fn on_update(&self, step: UpdateStep, input: &str, reply: &mut Reply) -> Signal<UpdateStep> {
        match step {
            UpdateStep::Menu => match input {
                "exit" => Signal::Parent,
                "0" => {
                    reply.say(menu::UPDATE);
                    Signal::Stay(UpdateStep::Menu)
                }
                "1" => {
                    reply.say("Enter the id of the book to update:");
                    Signal::Stay(UpdateStep::AwaitId)
                }
                _ => {
                    reply.say(menu::INVALID_SUB);
                    Signal::Stay(UpdateStep::Menu)
                }
            },
            UpdateStep::AwaitId => match self.store.search(Field::Id, input) {
                Ok(mut found) if !found.is_empty() => {
                    let book = found.remove(0);
                    let first = Field::EDITABLE[0];
                    reply.say(format!("Found book: {}", book.name));
                    reply.say("Enter new values (leave empty to keep the current one)");
                    reply.say(menu::update_prompt(first, book.get(first)));
                    Signal::Stay(UpdateStep::Collect { book, next: 0 })
                }
                Ok(_) => {
                    reply.say("Book not found");
                    reply.say(menu::MENU_HINT);
                    Signal::Stay(UpdateStep::Menu)
                }
                Err(err) => {
                    self.report_failure("look up the book", err, reply);
                    reply.say(menu::MENU_HINT);
                    Signal::Stay(UpdateStep::Menu)
                }
            },
            UpdateStep::Collect { mut book, next } => {
                let field = Field::EDITABLE[next];
                let accepted = if !input.is_empty() {
                    book.set_validated(field, input)
                } else if field.depends_on_siblings() && !book.get(field).is_empty() {
                    // An edited year or added date may have invalidated the kept value.
                    let kept = book.get(field).to_string();
                    book.set_validated(field, &kept)
                } else {
                    Ok(())
                };
                if let Err(err) = accepted {
                    reply.say(format!("Validation error: {err}"));
                    reply.say("Please enter the value again");
                    reply.say(menu::update_prompt(field, book.get(field)));
                    return Signal::Stay(UpdateStep::Collect { book, next });
                }

                match Field::EDITABLE.get(next + 1) {
                    Some(following) => {
                        reply.say(menu::update_prompt(*following, book.get(*following)));
                        Signal::Stay(UpdateStep::Collect {
                            book,
                            next: next + 1,
                        })
                    }
                    None => {
                        reply.say("Changes:");
                        reply.say(render::summary(&book));
                        reply.say("Confirm the update (y/n):");
                        Signal::Stay(UpdateStep::Confirm(book))
                    }
                }
            }
            UpdateStep::Confirm(book) => {
                if is_yes(input) {
                    match self.store.update(book) {
                        Ok(book) => {
                            reply.say(format!("Book with ID {} updated successfully", book.id))
                        }
                        Err(err) => self.report_failure("update the book", err, reply),
                    }
                } else {
                    reply.say("Update cancelled");
                }
                reply.say(menu::MENU_HINT);
                Signal::Stay(UpdateStep::Menu)
            }
        }
    }

    fn on_delete(&self, step: DeleteStep, input: &str, reply: &mut Reply) -> Signal<DeleteStep> {
        match step {
            DeleteStep::Menu => match input {
                "exit" => Signal::Parent,
                "0" => {
                    reply.say(menu::DELETE);
                    Signal::Stay(DeleteStep::Menu)
                }
                "1" => {
                    reply.say("Enter the ids of the books to delete (comma-separated):");
                    Signal::Stay(DeleteStep::AwaitIds)
                }
                _ => {
                    reply.say(menu::INVALID_SUB);
                    Signal::Stay(DeleteStep::Menu)
                }
            },
            DeleteStep::AwaitIds => {
                let ids: Vec<&str> = input
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .collect();
                let candidates = match self.store.read_all() {
                    Ok(books) => books
                        .into_iter()
                        .filter(|book| ids.contains(&book.id.as_str()))
                        .collect::<Vec<_>>(),
                    Err(err) => {
                        self.report_failure("read the book list", err, reply);
                        reply.say(menu::MENU_HINT);
                        return Signal::Stay(DeleteStep::Menu);
                    }
                };

                if candidates.is_empty() {
                    reply.say("No books found to delete");
                    reply.say(menu::MENU_HINT);
                    return Signal::Stay(DeleteStep::Menu);
                }
                reply.say(render::delete_preview(&candidates));
                Signal::Stay(DeleteStep::Confirm(candidates))
            }
            DeleteStep::Confirm(candidates) => {
                if is_yes(input) {
                    match self.store.modify(&candidates, ModifyMode::Delete) {
                        Ok(report) => reply.say(render::modify_report(&report)),
                        Err(err) => self.report_failure("delete the books", err, reply),
                    }
                } else {
                    reply.say("Deletion cancelled");
                }
                reply.say(menu::MENU_HINT);
                Signal::Stay(DeleteStep::Menu)
            }
        }
    }

    /// Turn a store error into the one line the client sees.
    fn report_failure(&self, action: &str, err: StoreError, reply: &mut Reply) {
        match err {
            StoreError::DuplicateRecord { name, authors } => {
                info!(peer = %self.peer, %name, %authors, "duplicate book rejected");
                reply.say(format!("Book already exists: {name} by {authors}"));
            }
            StoreError::NotFound(ids) => {
                info!(peer = %self.peer, %ids, "no matching books");
                reply.say("No books found to modify");
            }
            err => {
                error!(peer = %self.peer, %err, action, "store operation failed");
                reply.say(format!("Failed to {action}: {err}"));
            }
        }
    }
}
