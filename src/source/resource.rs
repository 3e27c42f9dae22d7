use std::fmt;

use url::form_urlencoded;

/// Public web address used for feed links and entry ids.
pub(crate) const WEB_BASE_URL: &str = "https://twitter.com";

/// An upstream resource a feed can be built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// Tweets matching a search query.
    Search { query: String },
    /// Tweets from a list, identified by owner handle and list slug.
    List { owner: String, slug: String },
    /// The authenticated user's home timeline.
    HomeTimeline,
    /// Tweets posted by a given user.
    UserTimeline { user: String },
    /// Tweets mentioning the authenticated user.
    Mentions,
}

impl Resource {
    /// API path relative to the configured base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Resource::Search { .. } => "search/tweets.json",
            Resource::List { .. } => "lists/statuses.json",
            Resource::HomeTimeline => "statuses/home_timeline.json",
            Resource::UserTimeline { .. } => "statuses/user_timeline.json",
            Resource::Mentions => "statuses/mentions_timeline.json",
        }
    }

    /// Builds the API query parameters for this resource.
    ///
    /// Caller-supplied parameters come first; the resource's own parameters
    /// replace any caller parameter with the same key.
    pub fn api_params(&self, extra: &[(String, String)]) -> Vec<(String, String)> {
        let own: Vec<(String, String)> = match self {
            Resource::Search { query } => {
                // Twitter ignores a repeated filter, so appending is always safe
                vec![("q".to_string(), format!("{query} filter:links"))]
            }
            Resource::List { owner, slug } => vec![
                ("slug".to_string(), slug.clone()),
                ("owner_screen_name".to_string(), owner.clone()),
            ],
            Resource::UserTimeline { user } => vec![("screen_name".to_string(), user.clone())],
            Resource::HomeTimeline | Resource::Mentions => Vec::new(),
        };

        let mut params: Vec<(String, String)> = extra
            .iter()
            .filter(|(key, _)| !own.iter().any(|(own_key, _)| own_key == key))
            .cloned()
            .collect();
        params.extend(own);
        params
    }

    /// Human-readable feed title.
    pub fn feed_title(&self) -> String {
        match self {
            Resource::Search { query } => format!("Twitter search: {query}"),
            Resource::List { owner, slug } => format!("{slug} list by {owner}"),
            Resource::HomeTimeline => "Twitter Timeline".to_string(),
            Resource::UserTimeline { user } => format!("Twitter: @{user}"),
            Resource::Mentions => "Twitter Mentions".to_string(),
        }
    }

    /// Canonical web page the feed mirrors.
    pub fn feed_link(&self) -> String {
        match self {
            Resource::Search { query } => {
                let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
                format!("{WEB_BASE_URL}/search?q={encoded}")
            }
            Resource::List { owner, slug } => format!("{WEB_BASE_URL}/{owner}/lists/{slug}"),
            Resource::HomeTimeline => WEB_BASE_URL.to_string(),
            Resource::UserTimeline { user } => format!("{WEB_BASE_URL}/{user}"),
            Resource::Mentions => format!("{WEB_BASE_URL}/mentions"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Search { query } => write!(f, "search({query})"),
            Resource::List { owner, slug } => write!(f, "list({owner}/{slug})"),
            Resource::HomeTimeline => f.write_str("home_timeline"),
            Resource::UserTimeline { user } => write!(f, "user_timeline({user})"),
            Resource::Mentions => f.write_str("mentions"),
        }
    }
}
