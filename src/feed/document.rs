use chrono::{DateTime, Utc};

use crate::links::LinkEntry;
use crate::source::WEB_BASE_URL;

/// A feed ready for rendering: metadata plus entries in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedDocument {
    pub title: String,
    /// Canonical web page the feed mirrors; doubles as the feed id
    pub link: String,
    /// Newest entry time, or the assembly time for an empty feed
    pub updated: DateTime<Utc>,
    pub entries: Vec<LinkEntry>,
    /// Set only by [`FeedDocument::error`]
    error: bool,
}

impl FeedDocument {
    /// Wraps already sequenced entries. Entry order is kept as given.
    pub fn new(title: impl Into<String>, link: impl Into<String>, entries: Vec<LinkEntry>) -> Self {
        let updated = entries
            .iter()
            .map(LinkEntry::updated)
            .max()
            .unwrap_or_else(Utc::now);
        Self {
            title: title.into(),
            link: link.into(),
            updated,
            entries,
            error: false,
        }
    }

    /// A single-entry feed describing a failure.
    ///
    /// Used in place of an empty or broken document so feed readers show
    /// the problem instead of silently failing.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        let now = Utc::now();

        let mut entry = LinkEntry::new(
            format!("{WEB_BASE_URL}/#error-{}", now.timestamp()),
            WEB_BASE_URL,
            now,
        );
        entry.title = format!("Error: {message}");
        entry.content = message;
        entry.author_name = env!("CARGO_PKG_NAME").to_string();

        Self {
            error: true,
            ..Self::new("Error", WEB_BASE_URL, vec![entry])
        }
    }

    pub fn is_error(&self) -> bool {
        self.error
    }
}
