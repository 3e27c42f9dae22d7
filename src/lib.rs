//! Turns tweets into an Atom feed of the links they share.
//!
//! A [`pipeline::LinkPipeline`] fetches posts from a [`source::PostSource`],
//! extracts one entry per shared link, drops blacklisted domains, optionally
//! resolves shortened links with a bounded window of concurrent probes, and
//! orders the result newest first for [`feed::AtomRenderer`].

pub mod config;
pub mod feed;
pub mod links;
pub mod pipeline;
pub mod source;
pub mod util;
