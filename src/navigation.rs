//! Breadcrumb navigation state.

use crate::types::ListingContext;
use serde::Serialize;

pub const ROOT_LABEL: &str = "Home";

/// One breadcrumb. The root crumb has no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub id: Option<String>,
    pub name: String,
}

impl Crumb {
    fn root() -> Self {
        Self {
            id: None,
            name: ROOT_LABEL.to_string(),
        }
    }
}

/// Navigation requested by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationIntent {
    /// Open a folder below the current position.
    Enter { id: String, name: String },
    /// One level up.
    Back,
    /// Truncate the path to breadcrumb `index`.
    JumpTo(usize),
    Home,
}

/// Ordered path from root to the current folder. Never empty; the first crumb
/// is always root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    path: Vec<Crumb>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationState {
    pub fn new() -> Self {
        Self {
            path: vec![Crumb::root()],
        }
    }

    pub fn enter(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.path.push(Crumb {
            id: Some(id.into()),
            name: name.into(),
        });
    }

    /// Returns `false` when already at root.
    pub fn back(&mut self) -> bool {
        if self.path.len() > 1 {
            self.path.pop();
            true
        } else {
            false
        }
    }

    /// Returns `false` for an index past the last crumb.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.path.len() {
            return false;
        }
        self.path.truncate(index + 1);
        true
    }

    pub fn reset(&mut self) {
        self.path.truncate(1);
    }

    /// Apply `intent`; returns whether the position changed.
    pub fn apply(&mut self, intent: NavigationIntent) -> bool {
        let before = self.path.len();
        match intent {
            NavigationIntent::Enter { id, name } => {
                self.enter(id, name);
                true
            }
            NavigationIntent::Back => self.back(),
            NavigationIntent::JumpTo(index) => self.jump_to(index) && self.path.len() != before,
            NavigationIntent::Home => {
                self.reset();
                before != 1
            }
        }
    }

    pub fn crumbs(&self) -> &[Crumb] {
        &self.path
    }

    pub fn current_folder(&self) -> Option<&str> {
        self.path.last().and_then(|c| c.id.as_deref())
    }

    pub fn context(&self) -> ListingContext {
        match self.current_folder() {
            Some(id) => ListingContext::Folder(id.to_string()),
            None => ListingContext::Root,
        }
    }

    pub fn is_root(&self) -> bool {
        self.current_folder().is_none()
    }
}
