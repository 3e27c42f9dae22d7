//! Feed assembly and rendering.
//!
//! - `document` - the renderable feed model built from sequenced entries
//! - `atom` - Atom 1.0 serialization of that model

mod atom;
mod document;

pub use atom::{AtomRenderer, FeedRenderer, RenderError};
pub use document::FeedDocument;
