use chrono::{DateTime, Utc};

use crate::util::host_of;

/// One link found in one post, the unit every pipeline stage works on.
///
/// `id`, `updated` and `ordinal` are fixed at construction. `url` is the only
/// field the resolver rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    id: String,
    /// Link target. Starts as the posted URL, may be replaced by its resolved destination.
    pub url: String,
    /// Post text with short links and RT/MT prefixes removed
    pub title: String,
    /// HTML snippet with the author and full post text
    pub content: String,
    updated: DateTime<Utc>,
    pub author_name: String,
    ordinal: usize,
}

impl LinkEntry {
    pub fn new(id: impl Into<String>, url: impl Into<String>, updated: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: String::new(),
            content: String::new(),
            updated,
            author_name: String::new(),
            ordinal: 0,
        }
    }

    /// Sets the extraction position used to break ties between equal timestamps.
    pub fn with_ordinal(mut self, ordinal: usize) -> Self {
        self.ordinal = ordinal;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Creation time of the originating post.
    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Normalized host of the current `url`, if it parses.
    pub fn host(&self) -> Option<String> {
        host_of(&self.url)
    }
}
