//! The client state controller: one value holds the last-fetched lists, the
//! active filters and the note form; every user action and network completion
//! arrives as a [`Msg`], and [`Controller::update`] answers with the requests
//! to issue next. No I/O happens here, which keeps every transition testable
//! without a server or a rendering surface.

use crate::model::{Category, Note};

/// Which request a form submit produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    /// The id is captured when the edit begins and scopes the update request,
    /// even if the list is reloaded underneath the form.
    Edit { id: i64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteForm {
    pub mode: FormMode,
    pub title: String,
    pub content: String,
    pub category_id: Option<i64>,
}

impl NoteForm {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient user-visible notification, the toast of the browser client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// A discrete user action or network completion.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    NotesLoaded(Vec<Note>),
    CategoriesLoaded(Vec<Category>),
    NoteSaved,
    NoteDeleted(i64),
    CategoryCreated,
    RequestFailed(String),

    SearchChanged(String),
    CategoryFilterChanged(Option<i64>),
    TitleChanged(String),
    ContentChanged(String),
    CategoryPicked(Option<i64>),
    EditRequested(i64),
    CancelEdit,
    SubmitRequested,
    DeleteRequested(i64),
    DeleteConfirmed,
    DeleteCancelled,
    NewCategoryNameChanged(String),
    AddCategoryRequested,
}

/// A request the driver must issue against the API on the controller's
/// behalf; its completion comes back as a [`Msg`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LoadNotes,
    LoadCategories,
    CreateNote {
        title: String,
        content: String,
        category_id: Option<i64>,
    },
    UpdateNote {
        id: i64,
        title: String,
        content: String,
        category_id: Option<i64>,
    },
    DeleteNote(i64),
    CreateCategory {
        name: String,
    },
}

#[derive(Debug, Default)]
pub struct Controller {
    pub notes: Vec<Note>,
    pub categories: Vec<Category>,
    pub search: String,
    pub category_filter: Option<i64>,
    pub form: NoteForm,
    pub pending_delete: Option<i64>,
    pub new_category_name: String,
    notice: Option<Notice>,
}

impl Controller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands to run once at startup: fetch both authoritative lists.
    #[must_use]
    pub fn startup() -> Vec<Command> {
        vec![Command::LoadNotes, Command::LoadCategories]
    }

    /// Applies one message and returns the commands to issue. Mutations never
    /// patch the in-memory lists; they reload them wholesale instead, so the
    /// last full reload always wins.
    pub fn update(&mut self, msg: Msg) -> Vec<Command> {
        match msg {
            Msg::NotesLoaded(notes) => {
                self.notes = notes;
                Vec::new()
            }
            Msg::CategoriesLoaded(categories) => {
                self.categories = categories;
                Vec::new()
            }
            Msg::NoteSaved => {
                let verb = match self.form.mode {
                    FormMode::Create => "created",
                    FormMode::Edit { .. } => "updated",
                };
                self.form.reset();
                self.notice = Some(Notice::success(format!("Note {verb} successfully")));
                Self::startup()
            }
            Msg::NoteDeleted(id) => {
                if self.form.mode == (FormMode::Edit { id }) {
                    self.form.reset();
                }
                self.notice = Some(Notice::success("Note deleted successfully"));
                Self::startup()
            }
            Msg::CategoryCreated => {
                self.new_category_name.clear();
                self.notice = Some(Notice::success("Category added successfully"));
                Self::startup()
            }
            Msg::RequestFailed(message) => {
                self.notice = Some(Notice::error(message));
                Vec::new()
            }
            Msg::SearchChanged(term) => {
                self.search = term;
                Vec::new()
            }
            Msg::CategoryFilterChanged(category_id) => {
                self.category_filter = category_id;
                Vec::new()
            }
            Msg::TitleChanged(title) => {
                self.form.title = title;
                Vec::new()
            }
            Msg::ContentChanged(content) => {
                self.form.content = content;
                Vec::new()
            }
            Msg::CategoryPicked(category_id) => {
                self.form.category_id = category_id;
                Vec::new()
            }
            Msg::EditRequested(id) => {
                if let Some(note) = self.notes.iter().find(|n| n.id == id) {
                    self.form = NoteForm {
                        mode: FormMode::Edit { id },
                        title: note.title.clone(),
                        content: note.content.clone(),
                        category_id: note.category_id,
                    };
                } else {
                    self.notice = Some(Notice::error(format!("No note with id {id}")));
                }
                Vec::new()
            }
            Msg::CancelEdit => {
                self.form.reset();
                Vec::new()
            }
            Msg::SubmitRequested => {
                if self.form.title.trim().is_empty() || self.form.content.trim().is_empty() {
                    self.notice = Some(Notice::error("Please enter both title and content"));
                    return Vec::new();
                }

                match self.form.mode {
                    FormMode::Create => vec![Command::CreateNote {
                        title: self.form.title.clone(),
                        content: self.form.content.clone(),
                        category_id: self.form.category_id,
                    }],
                    FormMode::Edit { id } => vec![Command::UpdateNote {
                        id,
                        title: self.form.title.clone(),
                        content: self.form.content.clone(),
                        category_id: self.form.category_id,
                    }],
                }
            }
            Msg::DeleteRequested(id) => {
                self.pending_delete = Some(id);
                Vec::new()
            }
            Msg::DeleteConfirmed => match self.pending_delete.take() {
                Some(id) => vec![Command::DeleteNote(id)],
                None => Vec::new(),
            },
            Msg::DeleteCancelled => {
                self.pending_delete = None;
                Vec::new()
            }
            Msg::NewCategoryNameChanged(name) => {
                self.new_category_name = name;
                Vec::new()
            }
            Msg::AddCategoryRequested => {
                let name = self.new_category_name.trim();
                if name.is_empty() {
                    self.notice = Some(Notice::error("Please enter a category name"));
                    return Vec::new();
                }

                vec![Command::CreateCategory {
                    name: name.to_string(),
                }]
            }
        }
    }

    /// The displayed subset: category filter AND case-insensitive substring
    /// search over title and content, both optional. Pure derivation over the
    /// in-memory list; never touches the network.
    #[must_use]
    pub fn visible_notes(&self) -> Vec<&Note> {
        let term = self.search.to_lowercase();

        self.notes
            .iter()
            .filter(|note| {
                self.category_filter
                    .is_none_or(|id| note.category_id == Some(id))
            })
            .filter(|note| {
                term.is_empty()
                    || note.title.to_lowercase().contains(&term)
                    || note.content.to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Hands the current notice to the renderer, clearing it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}
