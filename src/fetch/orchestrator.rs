//! Listing refresh state machine: Idle -> Fetching -> Committed | Superseded.

use super::tokens::FetchTokens;
use crate::cache::ListingCache;
use crate::error::StorageError;
use crate::listing::{self, infer_file_type, FilterType};
use crate::marker::read_marker;
use crate::storage::{ObjectStorage, StorageLayout};
use crate::types::{Item, ListingContext, ViewMode};
use crate::view::{RenderFrame, RenderSource, ViewSink};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// View settings a listing is projected through before rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingView {
    pub filter: FilterType,
    /// Normalized (trimmed, lowercased) search text.
    pub query: String,
    pub view_mode: ViewMode,
    pub admin_controls: bool,
}

#[derive(Debug)]
pub enum RefreshOutcome {
    /// Rendered and cached. `items` is the rendered (filtered) list.
    Committed { token: u64, items: Vec<Item> },
    /// A newer refresh was issued; nothing was rendered or cached.
    Superseded { token: u64 },
    /// The listing call failed. Whatever was on screen stays there.
    Failed { token: u64, error: StorageError },
}

impl RefreshOutcome {
    pub fn token(&self) -> u64 {
        match self {
            RefreshOutcome::Committed { token, .. }
            | RefreshOutcome::Superseded { token }
            | RefreshOutcome::Failed { token, .. } => *token,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, RefreshOutcome::Committed { .. })
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, RefreshOutcome::Superseded { .. })
    }
}

pub struct FetchOrchestrator {
    storage: Arc<dyn ObjectStorage>,
    layout: StorageLayout,
    cache: Arc<ListingCache>,
    tokens: FetchTokens,
}

impl FetchOrchestrator {
    pub fn new(storage: Arc<dyn ObjectStorage>, layout: StorageLayout, cache: Arc<ListingCache>) -> Self {
        Self {
            storage,
            layout,
            cache,
            tokens: FetchTokens::new(),
        }
    }

    pub fn tokens(&self) -> &FetchTokens {
        &self.tokens
    }

    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }

    fn frame(
        token: u64,
        context: &ListingContext,
        source: RenderSource,
        items: Vec<Item>,
        view: &ListingView,
    ) -> RenderFrame {
        RenderFrame {
            token,
            context: context.clone(),
            source,
            items,
            view_mode: view.view_mode,
            admin_controls: view.admin_controls,
        }
    }

    /// Refresh the listing of `context`.
    ///
    /// Any cached entry is rendered right away, fresh or stale. The storage
    /// listing then races against cancellation by a newer refresh; if it wins
    /// and its token is still current, the result is rendered and cached.
    pub async fn refresh(
        &self,
        context: &ListingContext,
        view: &ListingView,
        sink: &dyn ViewSink,
    ) -> RefreshOutcome {
        let ticket = self.tokens.issue();
        let token = ticket.token;
        debug!(token, context = %context, "Refresh issued");

        if let Some(cached) = self.cache.get(context) {
            let items = listing::project(&cached.items, view.filter, &view.query, context);
            sink.render(&Self::frame(
                token,
                context,
                RenderSource::Cache(cached.freshness),
                items,
                view,
            ));
        }

        let fetched = tokio::select! {
            biased;
            _ = ticket.cancel.cancelled() => {
                debug!(token, context = %context, "Refresh cancelled by a newer one");
                return RefreshOutcome::Superseded { token };
            }
            result = self.list_context(context) => result,
        };

        let prepared = match fetched {
            Ok(items) => listing::prepare(items),
            Err(error) => {
                if !self.tokens.is_current(token) {
                    return RefreshOutcome::Superseded { token };
                }
                warn!(token, context = %context, error = %error, "Listing failed");
                return RefreshOutcome::Failed { token, error };
            }
        };
        let rendered = listing::project(&prepared, view.filter, &view.query, context);

        let committed = self.tokens.commit_if_current(token, || {
            sink.render(&Self::frame(
                token,
                context,
                RenderSource::Storage,
                rendered.clone(),
                view,
            ));
            self.cache.put(context.clone(), prepared);
        });

        match committed {
            Some(()) => {
                debug!(token, context = %context, count = rendered.len(), "Refresh committed");
                RefreshOutcome::Committed {
                    token,
                    items: rendered,
                }
            }
            None => {
                debug!(token, context = %context, "Refresh superseded");
                RefreshOutcome::Superseded { token }
            }
        }
    }

    /// Load a folder's files without taking a token, refreshing its cache entry.
    pub async fn load_folder_files(&self, folder_id: &str) -> Result<Vec<Item>, StorageError> {
        let items = listing::prepare(self.list_folder_files(folder_id).await?);
        self.cache
            .put(ListingContext::Folder(folder_id.to_string()), items.clone());
        Ok(items)
    }

    async fn list_context(&self, context: &ListingContext) -> Result<Vec<Item>, StorageError> {
        match context {
            ListingContext::Root => self.list_root_folders().await,
            ListingContext::Folder(id) => self.list_folder_files(id).await,
        }
    }

    /// Root listing: one folder per prefix, named from its marker.
    async fn list_root_folders(&self) -> Result<Vec<Item>, StorageError> {
        let root = self.layout.root_prefix();
        debug!(prefix = root, "Listing root folders");
        let listing = self.storage.list(root).await?;

        let folders = join_all(listing.folders.into_iter().map(|id| async move {
            let name = match read_marker(self.storage.as_ref(), &self.layout, &id).await {
                Ok(Some(marker)) => marker.display_name().map(str::to_string),
                Ok(None) => None,
                Err(e) => {
                    warn!(folder = %id, error = %e, "Could not read folder marker");
                    None
                }
            };
            let name = name.unwrap_or_else(|| id.clone());
            Item::folder(id, name)
        }))
        .await;

        Ok(folders)
    }

    async fn list_folder_files(&self, folder_id: &str) -> Result<Vec<Item>, StorageError> {
        let prefix = self.layout.folder_prefix(folder_id);
        debug!(prefix = %prefix, "Listing folder files");
        let listing = self.storage.list(&prefix).await?;

        Ok(listing
            .files
            .into_iter()
            .filter(|entry| !StorageLayout::is_marker(&entry.name))
            .map(|entry| {
                let file_type = infer_file_type(&entry.name);
                Item::file(
                    format!("{}/{}", folder_id, entry.name),
                    entry.name,
                    file_type,
                    entry.path,
                )
            })
            .collect())
    }
}
