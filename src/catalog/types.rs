use serde::{Deserialize, Serialize};

use crate::error_handling::types::CatalogError;
use crate::storage::types::Story;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 5;

/// A validated catalog query.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryQuery {
    pub page: usize,
    pub limit: usize,
    pub generation: Option<String>,
    pub search: Option<String>,
}

impl Default for StoryQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            generation: None,
            search: None,
        }
    }
}

impl StoryQuery {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page,
            limit,
            ..Default::default()
        }
    }

    pub fn with_generation<S: Into<String>>(mut self, generation: S) -> Self {
        self.generation = Some(generation.into());
        self
    }

    pub fn with_search<S: Into<String>>(mut self, search: S) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Builds a query from raw request parameters.
    ///
    /// Missing or non-numeric `page`/`limit` fall back to the defaults;
    /// numbers below 1 are rejected with `BadRequest`. Empty `generation` and
    /// `search` values disable the corresponding filter.
    pub fn from_params(
        page: Option<&str>,
        limit: Option<&str>,
        generation: Option<&str>,
        search: Option<&str>,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            page: positive_or_default("page", page, DEFAULT_PAGE)?,
            limit: positive_or_default("limit", limit, DEFAULT_LIMIT)?,
            generation: non_empty(generation),
            search: non_empty(search),
        })
    }

    /// Rejects queries that cannot describe a page.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.page == 0 {
            return Err(CatalogError::BadRequest("page must be at least 1".into()));
        }
        if self.limit == 0 {
            return Err(CatalogError::BadRequest("limit must be at least 1".into()));
        }
        Ok(())
    }
}

fn positive_or_default(field: &str, raw: Option<&str>, default: usize) -> Result<usize, CatalogError> {
    let Some(parsed) = raw.and_then(|r| r.trim().parse::<i64>().ok()) else {
        return Ok(default);
    };
    if parsed < 1 {
        return Err(CatalogError::BadRequest(format!("{} must be at least 1", field)));
    }
    usize::try_from(parsed)
        .map_err(|_| CatalogError::BadRequest(format!("{} is too large", field)))
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !s.is_empty()).map(String::from)
}

/// One page of filtered results, serialized as the list endpoint body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPage {
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub data: Vec<Story>,
}

/// Fields of a story submission as received from the client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewStory {
    pub name: Option<String>,
    pub generation: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub contact: Option<String>,
}

impl NewStory {
    pub fn new<N: Into<String>, T: Into<String>, C: Into<String>>(name: N, title: T, content: C) -> Self {
        Self {
            name: Some(name.into()),
            title: Some(title.into()),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn with_generation<S: Into<String>>(mut self, generation: S) -> Self {
        self.generation = Some(generation.into());
        self
    }

    pub fn with_contact<S: Into<String>>(mut self, contact: S) -> Self {
        self.contact = Some(contact.into());
        self
    }

    /// Names of the required fields that are absent or empty.
    ///
    /// Only presence is checked; a whitespace-only value counts as given.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [("name", &self.name), ("title", &self.title), ("content", &self.content)]
            .into_iter()
            .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
            .map(|(field, _)| field)
            .collect()
    }
}
