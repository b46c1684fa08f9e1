//! Story matching used by the catalog query engine.
//!
//! Generation is an exact match. Search is a case-insensitive substring match
//! against the title or the content.

use crate::storage::types::Story;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryFilter {
    pub generation: Option<String>,
    search_lower: Option<String>,
}

impl StoryFilter {
    pub fn new(generation: Option<&str>, search: Option<&str>) -> Self {
        Self {
            generation: generation.map(String::from),
            search_lower: search.map(str::to_lowercase),
        }
    }

    pub fn matches(&self, story: &Story) -> bool {
        if let Some(ref generation) = self.generation {
            if story.generation.as_deref() != Some(generation.as_str()) {
                return false;
            }
        }
        if let Some(ref needle) = self.search_lower {
            return story.title.to_lowercase().contains(needle.as_str())
                || story.content.to_lowercase().contains(needle.as_str());
        }
        true
    }

    /// Keeps matching stories, preserving catalog order.
    pub fn apply(&self, stories: Vec<Story>) -> Vec<Story> {
        stories.into_iter().filter(|s| self.matches(s)).collect()
    }
}

/// Build a `StoryFilter` that matches stories by exact generation label.
pub fn by_generation<S: AsRef<str>>(generation: S) -> StoryFilter {
    StoryFilter::new(Some(generation.as_ref()), None)
}

/// Build a `StoryFilter` that matches stories whose title or content contain `term`.
pub fn by_search<S: AsRef<str>>(term: S) -> StoryFilter {
    StoryFilter::new(None, Some(term.as_ref()))
}
