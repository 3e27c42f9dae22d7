use regex::Regex;
use std::sync::LazyLock;

use super::LinkEntry;
use crate::source::{Post, WEB_BASE_URL};

/// Auto-generated t.co short links, including any trailing slashes.
static SHORT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://t\.co/[A-Za-z0-9]+/*").expect("short link pattern"));

/// A leading retweet / modified-tweet marker at the start of a line.
static RT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[RM]T:* ").expect("RT prefix pattern"));

/// Flattens posts into one [`LinkEntry`] per URL reference.
///
/// Posts without references contribute nothing. References whose target is
/// empty are skipped so every entry carries a usable `url`. Entries are
/// numbered in the order they are produced; the sequencer uses that number
/// to order entries that share a timestamp.
pub fn extract_links(posts: &[Post]) -> Vec<LinkEntry> {
    let mut entries = Vec::new();

    for post in posts {
        let title = clean_title(&post.text);
        let content = render_content(post);
        let base_id = format!(
            "{WEB_BASE_URL}/{}/statuses/{}",
            post.author.handle, post.id
        );

        for (index, reference) in post.urls.iter().enumerate() {
            let Some(target) = reference.target() else {
                tracing::debug!(post_id = %post.id, index, "Skipping URL reference without a target");
                continue;
            };

            // The first link keeps the plain status URL as its id
            let id = if index == 0 {
                base_id.clone()
            } else {
                format!("{base_id}#link-{}", index + 1)
            };

            let mut entry =
                LinkEntry::new(id, target, post.created_at).with_ordinal(entries.len());
            entry.title = title.clone();
            entry.content = content.clone();
            entry.author_name = post.author.name.clone();
            entries.push(entry);
        }
    }

    tracing::debug!(posts = posts.len(), entries = entries.len(), "Extracted links");
    entries
}

/// Makes post text presentable as an entry title.
///
/// Removes every t.co short link, trims, strips a single `RT`/`MT` marker
/// from the start of any line, and trims again. The API delivers text with
/// `&amp;`, `&lt;` and `&gt;` escaped; those are decoded so the renderer does
/// not escape them twice.
///
/// # Examples
///
/// ```
/// use tweetfeed::links::clean_title;
///
/// assert_eq!(clean_title("RT: check this http://t.co/abc"), "check this");
/// assert_eq!(clean_title("MT @a: Q&amp;A https://t.co/x1/ "), "@a: Q&A");
/// ```
pub fn clean_title(text: &str) -> String {
    let without_links = SHORT_LINK.replace_all(text, "");
    let trimmed = without_links.trim();
    let without_prefix = RT_PREFIX.replace_all(trimmed, "");
    let title = without_prefix.trim();

    match quick_xml::escape::unescape(title) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => title.to_string(),
    }
}

/// `<b>Name (@handle):</b> text`, as shown in the entry body.
fn render_content(post: &Post) -> String {
    format!(
        "<b>{} (@{}):</b> {}",
        quick_xml::escape::escape(post.author.name.as_str()),
        post.author.handle,
        post.text
    )
}
