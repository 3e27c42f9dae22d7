use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use super::LinkEntry;
use crate::util::{is_public_ip, validate_url};

/// Default `User-Agent` sent with every probe.
pub const DEFAULT_USER_AGENT: &str = concat!("tweetfeed/", env!("CARGO_PKG_VERSION"));

/// Errors from a single resolution probe.
///
/// None of these are fatal: the entry keeps the URL it had before the probe.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The probe did not finish within its timeout
    #[error("Probe timed out")]
    Timeout,
    /// Network-level error (DNS, connection, TLS, redirect loop, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The URL is unparseable or points somewhere probes may not go
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// The batch deadline passed before the probe could run
    #[error("Batch deadline exceeded")]
    DeadlineExceeded,
}

impl ResolutionError {
    /// Returns true if this error is transient and the probe should be retried.
    fn is_retryable(&self) -> bool {
        match self {
            ResolutionError::Timeout => true,
            ResolutionError::Network(e) => !e.is_redirect() && !e.is_builder(),
            ResolutionError::InvalidUrl(_) | ResolutionError::DeadlineExceeded => false,
        }
    }
}

/// Follows a URL's redirects and reports where it ends up.
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    /// Returns the effective URL after following redirects.
    ///
    /// Implementations should not download response bodies.
    async fn probe(
        &self,
        url: &str,
        headers: &HeaderMap,
        timeout: Duration,
    ) -> Result<String, ResolutionError>;
}

/// [`ProbeTransport`] over `reqwest`, using `HEAD` requests.
///
/// Servers that refuse `HEAD` with 405 get a `GET` whose body is never read.
/// Whatever status the final hop answers with, the URL it was reached at is
/// the destination.
///
/// Links come from arbitrary post text, so unless private hosts are allowed
/// both the starting URL and every redirect hop must pass [`validate_url`].
/// A hop that fails validation stops the chain at the previous URL. The
/// starting host is also looked up and rejected if any of its addresses is
/// not public. Redirect hops are only checked for literal addresses: the
/// redirect policy runs synchronously and cannot do DNS lookups.
pub struct ReqwestProbe {
    client: reqwest::Client,
    allow_private_hosts: bool,
}

impl ReqwestProbe {
    pub fn new(max_redirects: usize, allow_private_hosts: bool) -> Result<Self, reqwest::Error> {
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= max_redirects {
                attempt.error("too many redirects")
            } else if !allow_private_hosts && validate_url(attempt.url().as_str()).is_err() {
                tracing::debug!(url = %attempt.url(), "Refusing to follow redirect to private host");
                attempt.stop()
            } else {
                attempt.follow()
            }
        });

        let client = reqwest::Client::builder().redirect(policy).build()?;
        Ok(Self {
            client,
            allow_private_hosts,
        })
    }
}

#[async_trait]
impl ProbeTransport for ReqwestProbe {
    async fn probe(
        &self,
        url: &str,
        headers: &HeaderMap,
        timeout: Duration,
    ) -> Result<String, ResolutionError> {
        let deadline = Instant::now() + timeout;

        if self.allow_private_hosts {
            url::Url::parse(url).map_err(|e| ResolutionError::InvalidUrl(e.to_string()))?;
        } else {
            let parsed =
                validate_url(url).map_err(|e| ResolutionError::InvalidUrl(e.to_string()))?;
            tokio::time::timeout_at(deadline, ensure_public_host(&parsed))
                .await
                .map_err(|_| ResolutionError::Timeout)??;
        }

        let response =
            tokio::time::timeout_at(deadline, self.client.head(url).headers(headers.clone()).send())
                .await
                .map_err(|_| ResolutionError::Timeout)??;

        if response.status() != reqwest::StatusCode::METHOD_NOT_ALLOWED {
            return Ok(response.url().to_string());
        }

        tracing::trace!(url = %url, "HEAD not allowed, retrying probe with GET");
        let response =
            tokio::time::timeout_at(deadline, self.client.get(url).headers(headers.clone()).send())
                .await
                .map_err(|_| ResolutionError::Timeout)??;

        // Dropping the response closes the connection before the body is read
        Ok(response.url().to_string())
    }
}

/// Rejects a domain host that resolves to any non-public address.
async fn ensure_public_host(url: &url::Url) -> Result<(), ResolutionError> {
    let Some(url::Host::Domain(domain)) = url.host() else {
        return Ok(());
    };
    let port = url.port_or_known_default().unwrap_or(80);

    let addrs = tokio::net::lookup_host((domain, port))
        .await
        .map_err(|e| ResolutionError::InvalidUrl(format!("cannot resolve {domain}: {e}")))?;

    match first_non_public(addrs.map(|addr| addr.ip())) {
        Some(ip) => Err(ResolutionError::InvalidUrl(format!(
            "{domain} resolves to non-public address {ip}"
        ))),
        None => Ok(()),
    }
}

fn first_non_public(addrs: impl IntoIterator<Item = IpAddr>) -> Option<IpAddr> {
    addrs.into_iter().find(|ip| !is_public_ip(*ip))
}

/// Tuning for one [`Resolver`].
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Maximum probes in flight at once. Values below 1 are treated as 1.
    pub window: usize,
    /// Upper bound for a single probe attempt
    pub probe_timeout: Duration,
    /// Upper bound for the whole batch. Probes that would start after it are skipped.
    pub batch_deadline: Option<Duration>,
    /// Extra attempts for timeouts and network errors
    pub retries: u32,
    /// Delay before the first retry, doubled for each further one
    pub retry_delay: Duration,
    /// Headers sent with every probe
    pub headers: HeaderMap,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        Self {
            window: 10,
            probe_timeout: Duration::from_secs(10),
            batch_deadline: Some(Duration::from_secs(60)),
            retries: 1,
            retry_delay: Duration::from_millis(500),
            headers,
        }
    }
}

/// Outcome of one [`Resolver::resolve`] call.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Every submitted entry, in completion order
    pub entries: Vec<LinkEntry>,
    /// Entries whose URL changed
    pub resolved: usize,
    /// Entries whose probe failed and kept their original URL
    pub failed: usize,
}

/// Unshortens entry URLs with a bounded number of concurrent probes.
///
/// Holds no per-batch state: every [`resolve`](Resolver::resolve) call is an
/// independent fan-out, so one resolver can serve concurrent requests.
pub struct Resolver {
    transport: Arc<dyn ProbeTransport>,
    settings: ResolverSettings,
}

impl Resolver {
    pub fn new(transport: Arc<dyn ProbeTransport>, settings: ResolverSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Resolves every entry's `url` to its final destination.
    ///
    /// Probes run concurrently, never more than `window` at a time; a new
    /// probe starts as soon as one finishes. The call returns once every
    /// entry has been probed or skipped.
    ///
    /// # Returns
    ///
    /// A [`Resolution`] holding all input entries, no more and no fewer, in
    /// the order their probes completed. Callers that need a stable order
    /// must run [`sequence`](super::sequence) afterwards.
    ///
    /// # Behavior
    ///
    /// - A failed probe leaves that entry's `url` unchanged and does not
    ///   affect any other probe
    /// - Timeouts and network errors are retried up to `retries` times with
    ///   exponential backoff
    /// - Once `batch_deadline` has passed, remaining entries are returned
    ///   unprobed and in-flight probes are cut short
    pub async fn resolve(&self, entries: Vec<LinkEntry>) -> Resolution {
        if entries.is_empty() {
            return Resolution::default();
        }

        let total = entries.len();
        let window = self.settings.window.max(1);
        let deadline = self.settings.batch_deadline.map(|d| Instant::now() + d);

        tracing::debug!(total, window, "Resolving links");

        let outcomes: Vec<(LinkEntry, Result<bool, ResolutionError>)> = stream::iter(entries)
            .map(|entry| self.resolve_one(entry, deadline))
            .buffer_unordered(window)
            .collect()
            .await;

        let mut resolution = Resolution {
            entries: Vec::with_capacity(total),
            resolved: 0,
            failed: 0,
        };
        for (entry, outcome) in outcomes {
            match outcome {
                Ok(true) => resolution.resolved += 1,
                Ok(false) => {}
                Err(_) => resolution.failed += 1,
            }
            resolution.entries.push(entry);
        }

        tracing::info!(
            total,
            resolved = resolution.resolved,
            failed = resolution.failed,
            "Link resolution finished"
        );
        resolution
    }

    /// Probes one entry and hands it back, reporting whether its URL changed.
    async fn resolve_one(
        &self,
        mut entry: LinkEntry,
        deadline: Option<Instant>,
    ) -> (LinkEntry, Result<bool, ResolutionError>) {
        match self.probe_with_retry(&entry.url, deadline).await {
            Ok(final_url) if !final_url.is_empty() && final_url != entry.url => {
                tracing::debug!(from = %entry.url, to = %final_url, "Resolved link");
                entry.url = final_url;
                (entry, Ok(true))
            }
            Ok(_) => (entry, Ok(false)),
            Err(e) => {
                tracing::warn!(url = %entry.url, error = %e, "Link resolution failed, keeping original URL");
                (entry, Err(e))
            }
        }
    }

    async fn probe_with_retry(
        &self,
        url: &str,
        deadline: Option<Instant>,
    ) -> Result<String, ResolutionError> {
        let mut retry_count = 0;

        loop {
            let timeout = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Err(ResolutionError::DeadlineExceeded);
                    }
                    remaining.min(self.settings.probe_timeout)
                }
                None => self.settings.probe_timeout,
            };

            // Transports may ignore their timeout argument
            let attempt = tokio::time::timeout(
                timeout,
                self.transport.probe(url, &self.settings.headers, timeout),
            )
            .await
            .unwrap_or(Err(ResolutionError::Timeout));

            match attempt {
                Ok(final_url) => return Ok(final_url),
                Err(e) if e.is_retryable() && retry_count < self.settings.retries => {
                    let delay = self
                        .settings
                        .retry_delay
                        .saturating_mul(2u32.saturating_pow(retry_count));
                    // A retry that would start after the deadline is never made
                    if let Some(deadline) = deadline {
                        if delay >= deadline.saturating_duration_since(Instant::now()) {
                            tracing::debug!(url = %url, error = %e, "No time left before batch deadline to retry");
                            return Err(ResolutionError::DeadlineExceeded);
                        }
                    }
                    tracing::debug!(
                        url = %url,
                        error = %e,
                        retry = retry_count + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying link probe after transient error"
                    );
                    tokio::time::sleep(delay).await;
                    retry_count += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn entries(n: usize) -> Vec<LinkEntry> {
        (0..n)
            .map(|i| {
                LinkEntry::new(
                    format!("id-{i}"),
                    format!("http://sho.rt/{i}"),
                    Utc.with_ymd_and_hms(2013, 1, 1, 0, 0, i as u32).unwrap(),
                )
                .with_ordinal(i)
            })
            .collect()
    }

    fn settings(window: usize) -> ResolverSettings {
        ResolverSettings {
            window,
            retries: 0,
            retry_delay: Duration::from_millis(1),
            ..ResolverSettings::default()
        }
    }

    /// Appends `/final` after a short sleep, tracking concurrent calls.
    #[derive(Default)]
    struct CountingTransport {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ProbeTransport for CountingTransport {
        async fn probe(
            &self,
            url: &str,
            _headers: &HeaderMap,
            _timeout: Duration,
        ) -> Result<String, ResolutionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if url.contains("/bad") {
                return Err(ResolutionError::InvalidUrl(url.to_string()));
            }
            Ok(format!("{url}/final"))
        }
    }

    #[tokio::test]
    async fn test_window_bounds_concurrency() {
        let transport = Arc::new(CountingTransport::default());
        let resolver = Resolver::new(transport.clone(), settings(3));

        let resolution = resolver.resolve(entries(10)).await;

        assert_eq!(transport.max_in_flight.load(Ordering::SeqCst), 3);
        assert_eq!(resolution.entries.len(), 10);
        assert_eq!(resolution.resolved, 10);
        assert_eq!(resolution.failed, 0);

        let mut ids: Vec<&str> = resolution.entries.iter().map(LinkEntry::id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
        assert!(resolution
            .entries
            .iter()
            .all(|e| e.url.ends_with("/final")));
    }

    #[tokio::test]
    async fn test_zero_window_treated_as_one() {
        let transport = Arc::new(CountingTransport::default());
        let resolver = Resolver::new(transport.clone(), settings(0));

        let resolution = resolver.resolve(entries(4)).await;
        assert_eq!(transport.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(resolution.entries.len(), 4);
    }

    #[tokio::test]
    async fn test_failed_probe_keeps_original_url() {
        let transport = Arc::new(CountingTransport::default());
        let resolver = Resolver::new(transport, settings(2));

        let mut input = entries(3);
        input[1].url = "http://sho.rt/bad".to_string();

        let resolution = resolver.resolve(input).await;
        assert_eq!(resolution.entries.len(), 3);
        assert_eq!(resolution.failed, 1);
        assert_eq!(resolution.resolved, 2);

        let failed = resolution
            .entries
            .iter()
            .find(|e| e.id() == "id-1")
            .unwrap();
        assert_eq!(failed.url, "http://sho.rt/bad");
    }

    #[tokio::test]
    async fn test_resolution_never_changes_updated() {
        let transport = Arc::new(CountingTransport::default());
        let resolver = Resolver::new(transport, settings(4));
        let input = entries(5);
        let before: HashMap<String, _> = input
            .iter()
            .map(|e| (e.id().to_string(), e.updated()))
            .collect();

        let resolution = resolver.resolve(input).await;
        for entry in &resolution.entries {
            assert_eq!(before[entry.id()], entry.updated());
        }
    }

    #[tokio::test]
    async fn test_empty_input() {
        let transport = Arc::new(CountingTransport::default());
        let resolver = Resolver::new(transport.clone(), settings(3));
        let resolution = resolver.resolve(Vec::new()).await;
        assert!(resolution.entries.is_empty());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    struct HangingTransport;

    #[async_trait]
    impl ProbeTransport for HangingTransport {
        async fn probe(
            &self,
            _url: &str,
            _headers: &HeaderMap,
            _timeout: Duration,
        ) -> Result<String, ResolutionError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("http://never.example/".to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_timeout_enforced() {
        let resolver = Resolver::new(
            Arc::new(HangingTransport),
            ResolverSettings {
                probe_timeout: Duration::from_millis(50),
                ..settings(2)
            },
        );

        let resolution = resolver.resolve(entries(2)).await;
        assert_eq!(resolution.failed, 2);
        assert!(resolution
            .entries
            .iter()
            .all(|e| e.url.starts_with("http://sho.rt/")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_deadline_skips_remaining() {
        let transport = Arc::new(CountingTransport::default());
        let resolver = Resolver::new(
            transport.clone(),
            ResolverSettings {
                batch_deadline: Some(Duration::ZERO),
                ..settings(2)
            },
        );

        let resolution = resolver.resolve(entries(5)).await;
        assert_eq!(resolution.entries.len(), 5);
        assert_eq!(resolution.failed, 5);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    /// Times out the first `failures` calls per URL, then succeeds.
    struct FlakyTransport {
        failures: usize,
        seen: Mutex<HashMap<String, usize>>,
    }

    #[async_trait]
    impl ProbeTransport for FlakyTransport {
        async fn probe(
            &self,
            url: &str,
            _headers: &HeaderMap,
            _timeout: Duration,
        ) -> Result<String, ResolutionError> {
            let attempt = {
                let mut seen = self.seen.lock().unwrap();
                let count = seen.entry(url.to_string()).or_insert(0);
                *count += 1;
                *count
            };
            if attempt <= self.failures {
                Err(ResolutionError::Timeout)
            } else {
                Ok("http://dest.example/".to_string())
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_retried() {
        let resolver = Resolver::new(
            Arc::new(FlakyTransport {
                failures: 2,
                seen: Mutex::new(HashMap::new()),
            }),
            ResolverSettings {
                retries: 2,
                ..settings(3)
            },
        );

        let resolution = resolver.resolve(entries(3)).await;
        assert_eq!(resolution.resolved, 3);
        assert!(resolution
            .entries
            .iter()
            .all(|e| e.url == "http://dest.example/"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_exhausted() {
        let resolver = Resolver::new(
            Arc::new(FlakyTransport {
                failures: 5,
                seen: Mutex::new(HashMap::new()),
            }),
            ResolverSettings {
                retries: 1,
                ..settings(3)
            },
        );

        let resolution = resolver.resolve(entries(2)).await;
        assert_eq!(resolution.failed, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_backoff_respects_batch_deadline() {
        let resolver = Resolver::new(
            Arc::new(FlakyTransport {
                failures: usize::MAX,
                seen: Mutex::new(HashMap::new()),
            }),
            ResolverSettings {
                batch_deadline: Some(Duration::from_secs(1)),
                retries: 1,
                retry_delay: Duration::from_secs(120),
                ..settings(1)
            },
        );

        let started = Instant::now();
        let resolution = resolver.resolve(entries(1)).await;

        assert_eq!(resolution.failed, 1);
        assert!(started.elapsed() <= Duration::from_secs(1));
        assert!(resolution.entries[0].url.starts_with("http://sho.rt/"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_retry_delay_saturates() {
        let resolver = Resolver::new(
            Arc::new(FlakyTransport {
                failures: usize::MAX,
                seen: Mutex::new(HashMap::new()),
            }),
            ResolverSettings {
                batch_deadline: Some(Duration::from_secs(5)),
                retries: 40,
                retry_delay: Duration::from_secs(u64::MAX / 4),
                ..settings(1)
            },
        );

        let resolution = resolver.resolve(entries(1)).await;
        assert_eq!(resolution.failed, 1);
    }

    // --- ReqwestProbe against a mock server ---

    #[tokio::test]
    async fn test_reqwest_probe_follows_redirects_with_head() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/short"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header("Location", format!("{}/final", mock_server.uri()).as_str()),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/final"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let probe = ReqwestProbe::new(10, true).unwrap();
        let final_url = probe
            .probe(
                &format!("{}/short", mock_server.uri()),
                &HeaderMap::new(),
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        assert_eq!(final_url, format!("{}/final", mock_server.uri()));
    }

    #[tokio::test]
    async fn test_reqwest_probe_falls_back_to_get_on_405() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/legacy"))
            .respond_with(ResponseTemplate::new(405))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/legacy"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/dest"))
            .mount(&mock_server)
            .await;
        Mock::given(path("/dest"))
            .respond_with(ResponseTemplate::new(200).set_body_string("body is never read"))
            .mount(&mock_server)
            .await;

        let probe = ReqwestProbe::new(10, true).unwrap();
        let final_url = probe
            .probe(
                &format!("{}/legacy", mock_server.uri()),
                &HeaderMap::new(),
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        assert_eq!(final_url, format!("{}/dest", mock_server.uri()));
    }

    #[tokio::test]
    async fn test_reqwest_probe_sends_user_agent() {
        use wiremock::matchers::header;

        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(header("user-agent", DEFAULT_USER_AGENT))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let probe = ReqwestProbe::new(10, true).unwrap();
        let headers = ResolverSettings::default().headers;
        probe
            .probe(&mock_server.uri(), &headers, Duration::from_secs(5))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reqwest_probe_rejects_private_hosts_by_default() {
        let mock_server = MockServer::start().await;
        let probe = ReqwestProbe::new(10, false).unwrap();
        let result = probe
            .probe(&mock_server.uri(), &HeaderMap::new(), Duration::from_secs(5))
            .await;
        assert!(matches!(result, Err(ResolutionError::InvalidUrl(_))));
    }

    #[test]
    fn test_first_non_public_flags_any_internal_address() {
        let public: IpAddr = "93.184.216.34".parse().unwrap();
        let internal: IpAddr = "10.0.0.7".parse().unwrap();
        assert_eq!(first_non_public([public]), None);
        assert_eq!(first_non_public([public, internal]), Some(internal));
        assert_eq!(
            first_non_public(["::1".parse::<IpAddr>().unwrap()]),
            Some("::1".parse().unwrap())
        );
    }

    #[tokio::test]
    async fn test_ensure_public_host_skips_literal_addresses() {
        // Literal hosts are covered by validate_url; no lookup happens
        let url = url::Url::parse("http://93.184.216.34/x").unwrap();
        assert!(ensure_public_host(&url).await.is_ok());
    }

    #[tokio::test]
    async fn test_reqwest_probe_redirect_loop_is_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/loop"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
            .mount(&mock_server)
            .await;

        let probe = ReqwestProbe::new(3, true).unwrap();
        let result = probe
            .probe(
                &format!("{}/loop", mock_server.uri()),
                &HeaderMap::new(),
                Duration::from_secs(5),
            )
            .await;
        assert!(matches!(result, Err(ResolutionError::Network(_))));
    }
}
