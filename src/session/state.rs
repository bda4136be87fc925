use crate::auth::User;
use crate::fetch::ListingView;
use crate::listing::{normalize_query, FilterType};
use crate::navigation::NavigationState;
use crate::types::{ListingContext, ViewMode};

/// Per-session UI state.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub navigation: NavigationState,
    pub filter: FilterType,
    /// Normalized search text.
    pub query: String,
    pub view_mode: ViewMode,
    pub user: Option<User>,
}

impl SessionState {
    pub fn context(&self) -> ListingContext {
        self.navigation.context()
    }

    pub fn set_query(&mut self, raw: &str) {
        self.query = normalize_query(raw);
    }

    pub fn listing_view(&self, admin_controls: bool) -> ListingView {
        ListingView {
            filter: self.filter,
            query: self.query.clone(),
            view_mode: self.view_mode,
            admin_controls,
        }
    }
}
