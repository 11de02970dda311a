use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::client::services::api_client::ApiClient;
use crate::client::services::query_client::{QueryClient, QueryKey};
use crate::common::error::ApiError;
use crate::common::models::{Doctor, DoctorQuery};

const SPECIALIZATIONS_STALE: Duration = Duration::from_secs(60 * 60);

#[derive(Clone)]
pub struct DoctorsService {
    api: Arc<dyn ApiClient>,
    queries: QueryClient,
    fetch_limit: u32,
    stale_time: Duration,
}

impl DoctorsService {
    pub fn new(api: Arc<dyn ApiClient>, queries: QueryClient, fetch_limit: u32, stale_time: Duration) -> Self {
        Self { api, queries, fetch_limit, stale_time }
    }

    /// The full doctor list; search and specialization filtering happen locally.
    ///
    /// `fetch_limit` is the per-request page size. Pages are followed until
    /// the server's `totalPages` is reached.
    pub async fn doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        let limit = self.fetch_limit;
        let key = QueryKey::new(["doctors".to_string(), "all".to_string(), limit.to_string()]);
        let api = self.api.clone();
        self.queries
            .fetch(key, self.stale_time, move || {
                let api = api.clone();
                async move { fetch_all_doctors(api.as_ref(), limit).await }
            })
            .await
    }

    pub async fn specializations(&self) -> Result<Vec<String>, ApiError> {
        let api = self.api.clone();
        self.queries
            .fetch(QueryKey::new(["specializations"]), SPECIALIZATIONS_STALE, move || {
                let api = api.clone();
                async move { api.list_specializations().await }
            })
            .await
    }
}

async fn fetch_all_doctors(api: &dyn ApiClient, limit: u32) -> Result<Vec<Doctor>, ApiError> {
    let mut query = DoctorQuery::all(limit);
    let mut doctors = Vec::new();
    loop {
        let page = api.list_doctors(&query).await?;
        let last = page.items.is_empty() || query.page >= page.total_pages;
        doctors.extend(page.items);
        if last {
            debug!("[DOCTORS] fetched {} doctors over {} page(s)", doctors.len(), query.page);
            return Ok(doctors);
        }
        query.page += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::doctor_search::DoctorSearch;
    use crate::client::services::fake_api::FakeApi;
    use crate::client::services::query_client::RetryPolicy;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn doctor_list_is_cached_between_reads() {
        let fake = Arc::new(FakeApi::with_doctors(&[
            ("d1", "Anna", "Cardiology"),
            ("d2", "Bob", "Dermatology"),
        ]));
        let service = DoctorsService::new(
            fake.clone(),
            QueryClient::new(RetryPolicy::new(0)),
            100,
            Duration::from_secs(60),
        );
        assert_eq!(service.doctors().await.unwrap().len(), 2);
        assert_eq!(service.doctors().await.unwrap().len(), 2);
        assert_eq!(fake.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            service.specializations().await.unwrap(),
            vec!["Cardiology".to_string(), "Dermatology".to_string()]
        );
    }

    #[tokio::test]
    async fn outage_shorter_than_retry_budget_is_absorbed() {
        let fake = Arc::new(FakeApi::with_doctors(&[("d1", "Anna", "Cardiology")]));
        fake.transient_failures.store(2, Ordering::SeqCst);
        let service = DoctorsService::new(
            fake.clone(),
            QueryClient::new(RetryPolicy { retries: 2, base_delay: Duration::ZERO }),
            100,
            Duration::from_secs(60),
        );
        assert_eq!(service.doctors().await.unwrap().len(), 1);
        assert_eq!(fake.list_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn search_reaches_doctors_beyond_first_page() {
        let names: Vec<(String, String)> = (0..150)
            .map(|i| (format!("d{}", i), format!("Dana {}", i)))
            .collect();
        let rows: Vec<(&str, &str, &str)> = names
            .iter()
            .map(|(id, name)| (id.as_str(), name.as_str(), "Cardiology"))
            .collect();
        let fake = Arc::new(FakeApi::with_doctors(&rows));
        let service = DoctorsService::new(
            fake.clone(),
            QueryClient::new(RetryPolicy::new(0)),
            100,
            Duration::from_secs(60),
        );

        let doctors = service.doctors().await.unwrap();
        assert_eq!(doctors.len(), 150);
        assert_eq!(fake.list_calls.load(Ordering::SeqCst), 2);

        let mut search = DoctorSearch::new(6);
        search.set_query("Dana 14");
        // "Dana 14" plus "Dana 140" through "Dana 149"
        assert_eq!(search.filter(&doctors).len(), 11);
        assert_eq!(search.page_count(&doctors), 2);
    }
}
