//! The link pipeline stages.
//!
//! Posts flow through these in order:
//!
//! - `extract` - one [`LinkEntry`] per URL reference
//! - `filter` - drop entries whose host is blacklisted
//! - `resolver` - optional unshortening through a bounded HTTP fan-out
//! - `sequence` - deterministic newest-first ordering
//!
//! Only the resolver suspends on I/O. Everything else is a plain data
//! transform over owned `Vec`s.

mod entry;
mod extract;
mod filter;
mod resolver;
mod sequence;

pub use entry::LinkEntry;
pub use extract::{clean_title, extract_links};
pub use filter::{filter_entries, DomainBlacklist};
pub use resolver::{
    ProbeTransport, ReqwestProbe, Resolution, ResolutionError, Resolver, ResolverSettings,
    DEFAULT_USER_AGENT,
};
pub use sequence::sequence;
