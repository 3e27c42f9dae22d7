//! Request orchestration: fetch → extract → filter/resolve → sequence → feed.
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;

use crate::feed::{FeedDocument, FeedRenderer, RenderError};
use crate::links::{extract_links, filter_entries, sequence, DomainBlacklist, LinkEntry, Resolver};
use crate::source::{PostSource, Resource, SourceError};

/// Query parameter that asks for link resolution, as accepted by the
/// original query-string interface. It is consumed here and never forwarded
/// to the upstream API.
pub const UNSHORTEN_PARAM: &str = "unshorten_links";

/// Where the domain blacklist runs relative to link resolution.
///
/// Filtering before resolution sees the shortened host (`bit.ly`), after
/// resolution the final destination. When resolution does not run, the
/// filter runs exactly once whatever this says.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOrder {
    #[default]
    BeforeResolution,
    AfterResolution,
    Both,
}

impl FilterOrder {
    fn filters_before(self) -> bool {
        matches!(self, FilterOrder::BeforeResolution | FilterOrder::Both)
    }

    fn filters_after(self) -> bool {
        matches!(self, FilterOrder::AfterResolution | FilterOrder::Both)
    }
}

impl FromStr for FilterOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "before_resolution" | "before" => Ok(FilterOrder::BeforeResolution),
            "after_resolution" | "after" => Ok(FilterOrder::AfterResolution),
            "both" => Ok(FilterOrder::Both),
            other => Err(format!(
                "unknown filter order '{other}' (expected before_resolution, after_resolution or both)"
            )),
        }
    }
}

/// One feed request: which resource, extra API parameters, and whether to
/// resolve links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub resource: Resource,
    pub params: Vec<(String, String)>,
    pub unshorten: bool,
}

impl FeedRequest {
    /// Builds a request from raw parameters.
    ///
    /// An `unshorten_links` parameter is removed from `params` and turns
    /// resolution on when its value is `1` or `true`.
    pub fn new(resource: Resource, params: Vec<(String, String)>) -> Self {
        let mut unshorten = false;
        let params = params
            .into_iter()
            .filter(|(key, value)| {
                if key == UNSHORTEN_PARAM {
                    unshorten = matches!(value.as_str(), "1" | "true");
                    false
                } else {
                    true
                }
            })
            .collect();

        Self {
            resource,
            params,
            unshorten,
        }
    }

    pub fn with_unshorten(mut self, unshorten: bool) -> Self {
        self.unshorten = unshorten;
        self
    }
}

/// Turns a [`FeedRequest`] into sequenced link entries and feed documents.
///
/// Holds only read-only collaborators, so a single pipeline can serve many
/// requests at once.
pub struct LinkPipeline {
    source: Arc<dyn PostSource>,
    resolver: Option<Resolver>,
    blacklist: Option<DomainBlacklist>,
    filter_order: FilterOrder,
}

impl LinkPipeline {
    pub fn new(source: Arc<dyn PostSource>) -> Self {
        Self {
            source,
            resolver: None,
            blacklist: None,
            filter_order: FilterOrder::default(),
        }
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_blacklist(mut self, blacklist: DomainBlacklist) -> Self {
        self.blacklist = (!blacklist.is_empty()).then_some(blacklist);
        self
    }

    pub fn with_filter_order(mut self, filter_order: FilterOrder) -> Self {
        self.filter_order = filter_order;
        self
    }

    /// Fetches posts and runs every link stage.
    ///
    /// # Errors
    ///
    /// Returns the [`SourceError`] if the upstream fetch fails. Resolution
    /// failures never surface here; affected entries keep their URLs.
    pub async fn links(&self, request: &FeedRequest) -> Result<Vec<LinkEntry>, SourceError> {
        let posts = self.source.fetch(&request.resource, &request.params).await?;
        let mut entries = extract_links(&posts);
        let blacklist = self.blacklist.as_ref();

        let resolver = match (request.unshorten, self.resolver.as_ref()) {
            (true, Some(resolver)) => Some(resolver),
            (true, None) => {
                tracing::warn!("Link resolution requested but no resolver is configured");
                None
            }
            (false, _) => None,
        };

        match resolver {
            Some(resolver) => {
                if self.filter_order.filters_before() {
                    entries = filter_entries(entries, blacklist);
                }
                entries = resolver.resolve(entries).await.entries;
                if self.filter_order.filters_after() {
                    entries = filter_entries(entries, blacklist);
                }
            }
            None => entries = filter_entries(entries, blacklist),
        }

        Ok(sequence(entries))
    }

    /// Builds the feed document for a request.
    ///
    /// A failed fetch yields the single-entry error feed instead of an
    /// error, so callers always get something renderable.
    pub async fn feed(&self, request: &FeedRequest) -> FeedDocument {
        match self.links(request).await {
            Ok(entries) => FeedDocument::new(
                request.resource.feed_title(),
                request.resource.feed_link(),
                entries,
            ),
            Err(e) => {
                tracing::error!(resource = %request.resource, error = %e, "Failed to fetch posts");
                FeedDocument::error(format!("Could not fetch {}: {e}", request.resource))
            }
        }
    }

    /// Builds and renders the feed for a request.
    pub async fn render(
        &self,
        request: &FeedRequest,
        renderer: &dyn FeedRenderer,
    ) -> Result<String, RenderError> {
        renderer.render(&self.feed(request).await)
    }
}
