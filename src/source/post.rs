use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::SourceError;

/// Timestamp format used by the v1.1 API, e.g. `Wed Aug 27 13:08:45 +0000 2008`.
const API_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// A single post (tweet) as returned by the upstream API.
///
/// Only the fields the link pipeline needs are kept. Construction goes
/// through [`decode_posts`], which skips items missing any of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub author: Author,
    pub text: String,
    /// Creation time, normalized to UTC at ingestion.
    pub created_at: DateTime<Utc>,
    /// URL references in the order the API lists them.
    pub urls: Vec<UrlReference>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Display name, e.g. "Henry Todd"
    pub name: String,
    /// Handle without the leading `@`
    pub handle: String,
}

/// A tracked short link embedded in a post's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlReference {
    /// The platform short link as it appears in the text (`https://t.co/...`)
    pub url: String,
    /// The URL the author originally posted, if the API expanded it
    pub expanded_url: Option<String>,
    /// Character offsets `[start, end)` of the short link within the text
    pub indices: Option<(usize, usize)>,
}

impl UrlReference {
    /// The link target: the expanded URL when present, else the short link.
    ///
    /// Returns `None` when neither carries any text.
    pub fn target(&self) -> Option<&str> {
        self.expanded_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .or_else(|| Some(self.url.trim()).filter(|u| !u.is_empty()))
    }
}

#[derive(Debug, Deserialize)]
struct RawPost {
    id_str: Option<String>,
    id: Option<u64>,
    text: Option<String>,
    full_text: Option<String>,
    created_at: Option<String>,
    user: Option<RawUser>,
    #[serde(default)]
    entities: RawEntities,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    name: Option<String>,
    screen_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEntities {
    #[serde(default)]
    urls: Vec<RawUrl>,
}

#[derive(Debug, Deserialize)]
struct RawUrl {
    #[serde(default)]
    url: String,
    expanded_url: Option<String>,
    #[serde(default)]
    indices: Vec<usize>,
}

impl RawPost {
    /// Presence checks. Returns the name of the first missing field on failure.
    fn into_post(self) -> Result<Post, &'static str> {
        let id = self
            .id_str
            .filter(|s| !s.is_empty())
            .or_else(|| self.id.map(|n| n.to_string()))
            .ok_or("id_str")?;
        let text = self.full_text.or(self.text).ok_or("text")?;
        let created_at = self
            .created_at
            .as_deref()
            .and_then(parse_created_at)
            .ok_or("created_at")?;
        let user = self.user.ok_or("user")?;
        let handle = user
            .screen_name
            .filter(|s| !s.is_empty())
            .ok_or("user.screen_name")?;
        let name = user.name.unwrap_or_else(|| handle.clone());

        let urls = self
            .entities
            .urls
            .into_iter()
            .map(|raw| UrlReference {
                url: raw.url,
                expanded_url: raw.expanded_url,
                indices: match raw.indices.as_slice() {
                    [start, end] => Some((*start, *end)),
                    _ => None,
                },
            })
            .collect();

        Ok(Post {
            id,
            author: Author { name, handle },
            text,
            created_at,
            urls,
        })
    }
}

/// Parses a post timestamp and converts it to UTC.
///
/// Accepts the API's native format as well as RFC 3339 and RFC 2822, since
/// proxies and archives of the API tend to rewrite it. The offset in the
/// string is always honored; nothing depends on the local timezone.
pub fn parse_created_at(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    DateTime::parse_from_str(s, API_TIMESTAMP_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Decodes an API response body into posts.
///
/// Timeline and list endpoints return a bare JSON array of statuses while
/// the search endpoint wraps the array in an object under `statuses`. Both
/// shapes are normalized to the same `Vec<Post>`.
///
/// Individual items that fail the presence checks are skipped with a
/// warning; they never fail the whole response.
///
/// # Errors
///
/// - [`SourceError::Api`] if the body is an API error object (`{"errors": [...]}`)
/// - [`SourceError::Malformed`] if the body is not JSON or has neither shape
pub fn decode_posts(body: &[u8]) -> Result<Vec<Post>, SourceError> {
    let payload: Value =
        serde_json::from_slice(body).map_err(|e| SourceError::Malformed(e.to_string()))?;

    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("statuses") {
            Some(Value::Array(items)) => items,
            _ => {
                if let Some(message) = api_error_message(&map) {
                    return Err(SourceError::Api(message));
                }
                return Err(SourceError::Malformed(
                    "expected an array of statuses".to_string(),
                ));
            }
        },
        _ => {
            return Err(SourceError::Malformed(
                "expected an array of statuses".to_string(),
            ))
        }
    };

    let total = items.len();
    let posts: Vec<Post> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let raw: RawPost = match serde_json::from_value(item) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping undecodable post");
                    return None;
                }
            };
            match raw.into_post() {
                Ok(post) => Some(post),
                Err(field) => {
                    tracing::warn!(index, field, "Skipping post with missing field");
                    None
                }
            }
        })
        .collect();

    if posts.len() < total {
        tracing::debug!(total, kept = posts.len(), "Some posts were skipped");
    }

    Ok(posts)
}

/// Extracts the first message from an API error object.
fn api_error_message(map: &serde_json::Map<String, Value>) -> Option<String> {
    let errors = map.get("errors")?.as_array()?;
    let first = errors.first()?;
    let message = first.get("message").and_then(Value::as_str)?;
    match first.get("code").and_then(Value::as_i64) {
        Some(code) => Some(format!("{message} (code {code})")),
        None => Some(message.to_string()),
    }
}
