use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::common::error::ApiError;

/// Cache key built from the full parameter tuple of a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryKey(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        prefix.len() <= self.0.len() && self.0.iter().zip(prefix).all(|(have, want)| have == want)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

struct CacheEntry {
    value: Value,
    fetched_at: Instant,
    stale_time: Duration,
    invalidated: bool,
}

impl CacheEntry {
    fn is_fresh(&self) -> bool {
        !self.invalidated && self.fetched_at.elapsed() < self.stale_time
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32) -> Self {
        Self { retries, base_delay: Duration::from_millis(500) }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Shared query cache with keyed entries, prefix invalidation and bounded retries.
#[derive(Clone)]
pub struct QueryClient {
    entries: Arc<Mutex<HashMap<QueryKey, CacheEntry>>>,
    retry: RetryPolicy,
}

impl QueryClient {
    pub fn new(retry: RetryPolicy) -> Self {
        Self { entries: Arc::new(Mutex::new(HashMap::new())), retry }
    }

    /// Returns the cached value while fresh, otherwise runs `fetcher`.
    ///
    /// Transient failures are retried up to the policy bound before the error
    /// is surfaced. Other failures surface immediately.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: QueryKey,
        stale_time: Duration,
        fetcher: F,
    ) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(value) = self.fresh_value(&key) {
            match serde_json::from_value::<T>(value) {
                Ok(hit) => {
                    debug!("[QUERY] cache hit {}", key);
                    return Ok(hit);
                }
                Err(e) => warn!("[QUERY] dropping unreadable cache entry {}: {}", key, e),
            }
        }

        let result = self.with_retry(&key, &fetcher).await?;
        match serde_json::to_value(&result) {
            Ok(value) => {
                let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
                entries.insert(
                    key,
                    CacheEntry { value, fetched_at: Instant::now(), stale_time, invalidated: false },
                );
            }
            Err(e) => warn!("[QUERY] result for {} not cacheable: {}", key, e),
        }
        Ok(result)
    }

    async fn with_retry<T, F, Fut>(&self, key: &QueryKey, fetcher: &F) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempt = 0;
        loop {
            match fetcher().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.retry.retries => {
                    let delay = self.retry.delay_for(attempt);
                    attempt += 1;
                    warn!(
                        "[QUERY] {} failed ({}), retry {}/{} in {:?}",
                        key, err, attempt, self.retry.retries, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn fresh_value(&self, key: &QueryKey) -> Option<Value> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).filter(|e| e.is_fresh()).map(|e| e.value.clone())
    }

    /// Last known value for `key`, fresh or not.
    pub fn cached<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .and_then(|e| serde_json::from_value(e.value.clone()).ok())
    }

    /// Marks every entry under `prefix` stale so the next read refetches.
    pub fn invalidate_prefix(&self, prefix: &[&str]) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let mut count = 0;
        for (key, entry) in entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.invalidated = true;
                count += 1;
            }
        }
        debug!("[QUERY] invalidated {} entries under {:?}", count, prefix);
        count
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// Read-side view a screen renders: `{data, is_loading, error}`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<ApiError>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self { data: None, is_loading: false, error: None }
    }
}

impl<T> QueryState<T> {
    /// Keeps previous data visible while a refetch is outstanding.
    pub fn start(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn finish(&mut self, result: Result<T, ApiError>) {
        self.is_loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(err) => self.error = Some(err),
        }
    }
}

/// Write-side view: `{is_pending, error}` with at most one request in flight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationState {
    pub is_pending: bool,
    pub error: Option<ApiError>,
}

impl MutationState {
    /// Returns `false` when a request is already outstanding.
    pub fn begin(&mut self) -> bool {
        if self.is_pending {
            return false;
        }
        self.is_pending = true;
        self.error = None;
        true
    }

    pub fn finish<T>(&mut self, result: &Result<T, ApiError>) {
        self.is_pending = false;
        self.error = result.as_ref().err().cloned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn client(retries: u32) -> QueryClient {
        QueryClient::new(RetryPolicy { retries, base_delay: Duration::ZERO })
    }

    #[test]
    fn key_prefix_matching() {
        let key = QueryKey::new(["appointments", "patient", "PENDING", "1"]);
        assert!(key.starts_with(&["appointments"]));
        assert!(key.starts_with(&["appointments", "patient"]));
        assert!(!key.starts_with(&["appointments", "doctor"]));
        assert!(!QueryKey::new(["appointments"]).starts_with(&["appointments", "patient"]));
    }

    #[tokio::test]
    async fn distinct_keys_cache_independently() {
        let queries = client(0);
        let calls = &AtomicU32::new(0);
        for page in [1u32, 2, 1] {
            let key = QueryKey::new([
                "appointments".to_string(),
                "patient".to_string(),
                "ALL".to_string(),
                page.to_string(),
            ]);
            let items = queries
                .fetch(key, Duration::from_secs(60), move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ApiError>(vec![page])
                })
                .await
                .unwrap();
            assert_eq!(items, vec![page]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidation_forces_refetch() {
        let queries = client(0);
        let calls = &AtomicU32::new(0);
        let key = QueryKey::new(["appointments", "doctor", "", "PENDING", "1"]);
        for _ in 0..2 {
            queries
                .fetch(key.clone(), Duration::from_secs(60), move || async move {
                    Ok::<_, ApiError>(calls.fetch_add(1, Ordering::SeqCst))
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(queries.invalidate_prefix(&["appointments"]), 1);
        let value = queries
            .fetch(key.clone(), Duration::from_secs(60), move || async move {
                Ok::<_, ApiError>(calls.fetch_add(1, Ordering::SeqCst))
            })
            .await
            .unwrap();
        assert_eq!(value, 1);
        assert_eq!(queries.cached::<u32>(&key), Some(1));
    }

    #[tokio::test]
    async fn transient_errors_retry_twice_then_surface() {
        let queries = client(2);
        let calls = &AtomicU32::new(0);
        let result: Result<u32, ApiError> = queries
            .fetch(QueryKey::new(["doctors"]), Duration::from_secs(60), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::Network("connection refused".into()))
            })
            .await;
        assert!(matches!(result, Err(ApiError::Network(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn rejections_are_not_retried() {
        let queries = client(2);
        let calls = &AtomicU32::new(0);
        let result: Result<u32, ApiError> = queries
            .fetch(QueryKey::new(["doctors"]), Duration::from_secs(60), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::Rejected { status: Some(400), message: "bad filter".into() })
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovers_after_transient_failure() {
        let queries = client(2);
        let calls = &AtomicU32::new(0);
        let result = queries
            .fetch(QueryKey::new(["specializations"]), Duration::from_secs(60), move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ApiError::Network("reset".into()))
                } else {
                    Ok(vec!["Cardiology".to_string()])
                }
            })
            .await;
        assert_eq!(result.unwrap(), vec!["Cardiology".to_string()]);
    }

    #[test]
    fn mutation_state_allows_one_in_flight() {
        let mut state = MutationState::default();
        assert!(state.begin());
        assert!(!state.begin());
        state.finish::<()>(&Err(ApiError::Network("down".into())));
        assert!(!state.is_pending);
        assert!(state.error.is_some());
        assert!(state.begin());
        assert!(state.error.is_none());
    }

    #[test]
    fn query_state_keeps_data_on_error() {
        let mut state = QueryState::default();
        state.start();
        state.finish(Ok(vec![1, 2]));
        state.start();
        assert!(state.is_loading);
        state.finish(Err(ApiError::Network("down".into())));
        assert_eq!(state.data, Some(vec![1, 2]));
        assert!(state.error.is_some());
    }
}
