use std::collections::HashSet;

use super::LinkEntry;
use crate::util::normalize_host;

/// A set of hostnames whose links are dropped from the feed.
///
/// Matching is exact on the normalized host: blocking `spam.example` does
/// not block `www.spam.example`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainBlacklist {
    hosts: HashSet<String>,
}

impl DomainBlacklist {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts = hosts
            .into_iter()
            .map(|h| normalize_host(h.as_ref()))
            .filter(|h| !h.is_empty())
            .collect();
        Self { hosts }
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Whether the entry's current URL points at a blacklisted host.
    ///
    /// URLs that do not parse or carry no host are never blocked.
    pub fn blocks(&self, entry: &LinkEntry) -> bool {
        entry
            .host()
            .is_some_and(|host| self.hosts.contains(&host))
    }
}

/// Drops entries whose current URL host is blacklisted.
///
/// Runs against whatever `url` each entry holds right now. Before resolution
/// that is the shortened link, so a shortener host can be blocked but the
/// final destination cannot; see `FilterOrder` for running it afterwards.
///
/// A missing or empty blacklist returns the input untouched.
pub fn filter_entries(
    entries: Vec<LinkEntry>,
    blacklist: Option<&DomainBlacklist>,
) -> Vec<LinkEntry> {
    let Some(blacklist) = blacklist.filter(|b| !b.is_empty()) else {
        return entries;
    };

    let before = entries.len();
    let kept: Vec<LinkEntry> = entries
        .into_iter()
        .filter(|entry| {
            let blocked = blacklist.blocks(entry);
            if blocked {
                tracing::debug!(id = %entry.id(), url = %entry.url, "Dropping blacklisted link");
            }
            !blocked
        })
        .collect();

    if kept.len() < before {
        tracing::info!(dropped = before - kept.len(), kept = kept.len(), "Filtered blacklisted links");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn entry(url: &str) -> LinkEntry {
        LinkEntry::new(
            format!("https://twitter.com/a/statuses/{url}"),
            url,
            Utc.with_ymd_and_hms(2013, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_exact_host_removed() {
        let blacklist = DomainBlacklist::new(["spam.example"]);
        let kept = filter_entries(
            vec![
                entry("http://spam.example/buy"),
                entry("https://good.example/read"),
            ],
            Some(&blacklist),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].url, "https://good.example/read");
    }

    #[test]
    fn test_subdomain_not_matched() {
        let blacklist = DomainBlacklist::new(["spam.example"]);
        let kept = filter_entries(
            vec![entry("http://www.spam.example/"), entry("http://example/")],
            Some(&blacklist),
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_host_case_is_normalized() {
        let blacklist = DomainBlacklist::new(["Spam.EXAMPLE"]);
        let kept = filter_entries(vec![entry("http://SPAM.example:8080/x")], Some(&blacklist));
        assert!(kept.is_empty());
    }

    #[test]
    fn test_absent_or_empty_blacklist_passes_through() {
        let input = vec![entry("http://spam.example/"), entry("not a url")];
        assert_eq!(filter_entries(input.clone(), None), input);
        assert_eq!(
            filter_entries(input.clone(), Some(&DomainBlacklist::default())),
            input
        );
    }

    #[test]
    fn test_unparseable_url_kept() {
        let blacklist = DomainBlacklist::new(["spam.example"]);
        let kept = filter_entries(vec![entry("spam.example/no-scheme")], Some(&blacklist));
        assert_eq!(kept.len(), 1);
    }

    fn host_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["a.example", "b.example", "sho.rt", "spam.example"])
            .prop_map(str::to_string)
    }

    proptest! {
        #[test]
        fn prop_filter_is_idempotent(
            hosts in prop::collection::vec(host_strategy(), 0..20),
            blocked in prop::collection::hash_set(host_strategy(), 0..3),
        ) {
            let blacklist = DomainBlacklist::new(&blocked);
            let entries: Vec<LinkEntry> = hosts
                .iter()
                .map(|h| entry(&format!("http://{h}/x")))
                .collect();

            let once = filter_entries(entries, Some(&blacklist));
            let twice = filter_entries(once.clone(), Some(&blacklist));
            prop_assert_eq!(&once, &twice);
        }

        #[test]
        fn prop_filter_removes_exactly_blacklisted(
            hosts in prop::collection::vec(host_strategy(), 0..20),
            blocked in prop::collection::hash_set(host_strategy(), 0..3),
        ) {
            let blacklist = DomainBlacklist::new(&blocked);
            let entries: Vec<LinkEntry> = hosts
                .iter()
                .map(|h| entry(&format!("http://{h}/x")))
                .collect();

            let kept = filter_entries(entries, Some(&blacklist));
            let expected = hosts.iter().filter(|h| !blocked.contains(*h)).count();
            prop_assert_eq!(kept.len(), expected);
            for e in &kept {
                let host = e.host().unwrap();
                prop_assert!(!blocked.contains(&host));
            }
        }
    }
}
