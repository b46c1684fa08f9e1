use std::sync::Arc;

use log::debug;

use crate::catalog::story_filter::StoryFilter;
use crate::catalog::types::{StoryPage, StoryQuery};
use crate::error_handling::types::CatalogError;
use crate::storage::storage_trait::RecordStore;
use crate::storage::types::Story;

/// Read side of the catalog: filtered pages and lookups by id.
///
/// Never writes to the store.
pub struct QueryEngine {
    store: Arc<dyn RecordStore>,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Returns the requested page of stories matching the query filters.
    ///
    /// A page past the end yields empty `data` with the real totals.
    pub fn query(&self, query: &StoryQuery) -> Result<StoryPage, CatalogError> {
        query.validate()?;
        let stories = self.store.load()?;
        let page = paginate(stories, query);
        debug!(
            "Query page {} (limit {}) matched {} story(ies)",
            page.page, query.limit, page.total
        );
        Ok(page)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Story, CatalogError> {
        self.store
            .load()?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }
}

/// Filters the catalog snapshot and cuts out one page.
///
/// Expects a validated query (`page` and `limit` at least 1).
fn paginate(stories: Vec<Story>, query: &StoryQuery) -> StoryPage {
    let filter = StoryFilter::new(query.generation.as_deref(), query.search.as_deref());
    let filtered = filter.apply(stories);
    let total = filtered.len();
    let total_pages = total.div_ceil(query.limit);
    let offset = query.page.saturating_sub(1).saturating_mul(query.limit);
    let data = filtered.into_iter().skip(offset).take(query.limit).collect();

    StoryPage {
        total,
        page: query.page,
        total_pages,
        data,
    }
}
