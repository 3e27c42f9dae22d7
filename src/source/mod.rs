//! Raw post source: the upstream timeline API and the posts it returns.
//!
//! - `post` - the decoded post model and payload normalization
//! - `resource` - the catalogue of upstream resources (search, lists, timelines)
//! - `client` - the [`PostSource`] seam and its HTTP implementation

mod client;
mod post;
mod resource;

pub use client::{HttpPostSource, PostSource, SourceError};
pub use post::{decode_posts, parse_created_at, Author, Post, UrlReference};
pub(crate) use resource::WEB_BASE_URL;
pub use resource::Resource;
