//! Render boundary between the session and whatever UI drives it.
//!
//! The session never builds UI itself. It pushes frames, progress and admin
//! prompts into a [`ViewSink`].

use crate::cache::Freshness;
use crate::types::{Item, ListingContext, ViewMode};
use crate::upload::UploadProgress;
use parking_lot::Mutex;

/// Where a rendered listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderSource {
    /// Optimistic pass from the listing cache.
    Cache(Freshness),
    /// Authoritative listing that passed the token check.
    Storage,
}

/// A full replacement of the listing on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub token: u64,
    pub context: ListingContext,
    pub source: RenderSource,
    /// Filtered, sorted items.
    pub items: Vec<Item>,
    pub view_mode: ViewMode,
    /// Whether mutation affordances should be shown.
    pub admin_controls: bool,
}

impl RenderFrame {
    pub fn is_authoritative(&self) -> bool {
        self.source == RenderSource::Storage
    }

    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(Item::name).collect()
    }
}

/// Reason the admin modal is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminPrompt {
    /// Gate is locked; ask for the password.
    Locked,
    /// No secret configured; mutations cannot be unlocked.
    NotConfigured,
}

pub trait ViewSink: Send + Sync {
    /// Storage frames are rendered while the fetch tokens are held, so an
    /// implementation may read the current token but must not start a refresh.
    fn render(&self, frame: &RenderFrame);

    fn upload_progress(&self, _progress: &UploadProgress) {}

    fn admin_prompt(&self, _prompt: AdminPrompt) {}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ViewSink for NullSink {
    fn render(&self, _frame: &RenderFrame) {}
}

/// Keeps every notification for inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    frames: Mutex<Vec<RenderFrame>>,
    progress: Mutex<Vec<UploadProgress>>,
    prompts: Mutex<Vec<AdminPrompt>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<RenderFrame> {
        self.frames.lock().clone()
    }

    pub fn last_frame(&self) -> Option<RenderFrame> {
        self.frames.lock().last().cloned()
    }

    /// Frames rendered from storage only.
    pub fn authoritative_frames(&self) -> Vec<RenderFrame> {
        self.frames
            .lock()
            .iter()
            .filter(|f| f.is_authoritative())
            .cloned()
            .collect()
    }

    pub fn progress(&self) -> Vec<UploadProgress> {
        self.progress.lock().clone()
    }

    pub fn prompts(&self) -> Vec<AdminPrompt> {
        self.prompts.lock().clone()
    }

    pub fn clear(&self) {
        self.frames.lock().clear();
        self.progress.lock().clear();
        self.prompts.lock().clear();
    }
}

impl ViewSink for RecordingSink {
    fn render(&self, frame: &RenderFrame) {
        self.frames.lock().push(frame.clone());
    }

    fn upload_progress(&self, progress: &UploadProgress) {
        self.progress.lock().push(progress.clone());
    }

    fn admin_prompt(&self, prompt: AdminPrompt) {
        self.prompts.lock().push(prompt);
    }
}
