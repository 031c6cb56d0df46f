//! Client side of the io-service HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::types::{CategoryRecord, CreatedId, HousePatch, HouseRecord, NewHouse};
use configs::IoServiceConfig;
use reqwest::{Client, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::retry::{retry_with_policy, RetryPolicy, Retryable};

#[derive(Debug, Error)]
pub enum IoError {
    /// io-service answered with a non-success status.
    #[error("io-service responded with {0}")]
    Status(StatusCode),
    #[error("io-service unreachable: {0}")]
    Transport(String),
    #[error("unexpected io-service payload: {0}")]
    Decode(String),
}

impl Retryable for IoError {
    fn is_retryable(&self) -> bool {
        match self {
            IoError::Transport(_) => true,
            IoError::Status(s) => matches!(
                *s,
                StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
            ),
            IoError::Decode(_) => false,
        }
    }
}

impl From<reqwest::Error> for IoError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            IoError::Decode(e.to_string())
        } else {
            IoError::Transport(e.to_string())
        }
    }
}

/// Operations business-service needs from io-service.
#[async_trait]
pub trait IoApi: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, IoError>;
    async fn create_category(&self, name: &str) -> Result<i32, IoError>;
    async fn list_houses(&self) -> Result<Vec<HouseRecord>, IoError>;
    async fn get_house(&self, id: i32) -> Result<HouseRecord, IoError>;
    async fn create_house(&self, house: &NewHouse) -> Result<i32, IoError>;
    async fn update_house(&self, id: i32, patch: &HousePatch) -> Result<HouseRecord, IoError>;
    async fn delete_house(&self, id: i32) -> Result<(), IoError>;
}

/// [`IoApi`] over HTTP. Reads are retried per the configured policy, writes
/// go out exactly once.
#[derive(Clone)]
pub struct HttpIoClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

fn check(res: Response) -> Result<Response, IoError> {
    let status = res.status();
    if status.is_success() {
        Ok(res)
    } else {
        Err(IoError::Status(status))
    }
}

impl HttpIoClient {
    pub fn new(cfg: &IoServiceConfig) -> Result<Self, IoError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, &cfg.base_url, RetryPolicy::from_config(&cfg.retry)))
    }

    pub fn with_client(client: Client, base_url: &str, retry: RetryPolicy) -> Self {
        Self { client, base_url: base_url.trim_end_matches('/').to_string(), retry }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, IoError> {
        let client = &self.client;
        let url = self.url(path);
        let url = url.as_str();
        retry_with_policy(&self.retry, move || async move {
            debug!(%url, "GET io-service");
            let res = check(client.get(url).send().await?)?;
            Ok::<T, IoError>(res.json::<T>().await?)
        })
        .await
    }

    async fn send<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> Result<Response, IoError> {
        let url = self.url(path);
        debug!(%method, %url, "write to io-service");
        check(self.client.request(method, &url).json(body).send().await?)
    }
}

#[async_trait]
impl IoApi for HttpIoClient {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, IoError> {
        self.get_json("/io/categories").await
    }

    async fn create_category(&self, name: &str) -> Result<i32, IoError> {
        let res = self.send(Method::POST, "/io/category", &serde_json::json!({ "name": name })).await?;
        Ok(res.json::<CreatedId>().await?.id)
    }

    async fn list_houses(&self) -> Result<Vec<HouseRecord>, IoError> {
        self.get_json("/io/houses").await
    }

    async fn get_house(&self, id: i32) -> Result<HouseRecord, IoError> {
        self.get_json(&format!("/io/house/{id}")).await
    }

    async fn create_house(&self, house: &NewHouse) -> Result<i32, IoError> {
        let res = self.send(Method::POST, "/io/houses", house).await?;
        Ok(res.json::<CreatedId>().await?.id)
    }

    async fn update_house(&self, id: i32, patch: &HousePatch) -> Result<HouseRecord, IoError> {
        let res = self.send(Method::PUT, &format!("/io/house/{id}"), patch).await?;
        Ok(res.json::<HouseRecord>().await?)
    }

    async fn delete_house(&self, id: i32) -> Result<(), IoError> {
        let url = self.url(&format!("/io/house/{id}"));
        debug!(%url, "DELETE io-service");
        check(self.client.delete(&url).send().await?)?;
        Ok(())
    }
}

/// In-memory io-service with the same status behaviour, for gateway tests.
pub mod mock {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Store {
        categories: Vec<CategoryRecord>,
        houses: Vec<(i32, NewHouse)>,
        next_category: i32,
        next_house: i32,
    }

    impl Store {
        fn category_name(&self, id: i32) -> Option<&str> {
            self.categories.iter().find(|c| c.id == id).map(|c| c.name.as_str())
        }

        fn record(&self, id: i32, h: &NewHouse) -> HouseRecord {
            HouseRecord {
                id,
                house: h.house.clone(),
                price: h.price,
                surface: h.surface,
                description: h.description.clone(),
                category: self.category_name(h.category_id).unwrap_or_default().to_string(),
                username: h.username.clone(),
            }
        }

        fn insert_category(&mut self, name: &str) -> i32 {
            self.next_category += 1;
            let id = self.next_category;
            self.categories.push(CategoryRecord { id, name: name.to_string() });
            id
        }
    }

    #[derive(Default)]
    pub struct MockIo {
        store: Mutex<Store>,
        offline: AtomicBool,
        race_next_category: AtomicBool,
        list_calls: AtomicUsize,
    }

    impl MockIo {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every call fail as if io-service were down.
        pub fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        /// The next category create stores the row and still answers 409, as
        /// when a concurrent request wins the insert.
        pub fn race_next_category(&self) {
            self.race_next_category.store(true, Ordering::SeqCst);
        }

        pub fn list_category_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        pub async fn seed_category(&self, name: &str) -> i32 {
            self.store.lock().await.insert_category(name)
        }

        pub async fn seed_house(&self, house: NewHouse) -> i32 {
            let mut store = self.store.lock().await;
            store.next_house += 1;
            let id = store.next_house;
            store.houses.push((id, house));
            id
        }

        pub async fn categories(&self) -> Vec<CategoryRecord> {
            self.store.lock().await.categories.clone()
        }

        fn online(&self) -> Result<(), IoError> {
            if self.offline.load(Ordering::SeqCst) {
                Err(IoError::Transport("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl IoApi for MockIo {
        async fn list_categories(&self) -> Result<Vec<CategoryRecord>, IoError> {
            self.online()?;
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.store.lock().await.categories.clone())
        }

        async fn create_category(&self, name: &str) -> Result<i32, IoError> {
            self.online()?;
            let mut store = self.store.lock().await;
            if self.race_next_category.swap(false, Ordering::SeqCst) {
                store.insert_category(name);
                return Err(IoError::Status(StatusCode::CONFLICT));
            }
            if store.categories.iter().any(|c| c.name == name) {
                return Err(IoError::Status(StatusCode::CONFLICT));
            }
            Ok(store.insert_category(name))
        }

        async fn list_houses(&self) -> Result<Vec<HouseRecord>, IoError> {
            self.online()?;
            let store = self.store.lock().await;
            Ok(store.houses.iter().map(|(id, h)| store.record(*id, h)).collect())
        }

        async fn get_house(&self, id: i32) -> Result<HouseRecord, IoError> {
            self.online()?;
            let store = self.store.lock().await;
            store
                .houses
                .iter()
                .find(|(hid, _)| *hid == id)
                .map(|(hid, h)| store.record(*hid, h))
                .ok_or(IoError::Status(StatusCode::NOT_FOUND))
        }

        async fn create_house(&self, house: &NewHouse) -> Result<i32, IoError> {
            self.online()?;
            if self.store.lock().await.category_name(house.category_id).is_none() {
                return Err(IoError::Status(StatusCode::NOT_FOUND));
            }
            Ok(self.seed_house(house.clone()).await)
        }

        async fn update_house(&self, id: i32, patch: &HousePatch) -> Result<HouseRecord, IoError> {
            self.online()?;
            let mut store = self.store.lock().await;
            if let Some(cid) = patch.category_id {
                if store.category_name(cid).is_none() {
                    return Err(IoError::Status(StatusCode::BAD_REQUEST));
                }
            }
            let (_, h) = store
                .houses
                .iter_mut()
                .find(|(hid, _)| *hid == id)
                .ok_or(IoError::Status(StatusCode::NOT_FOUND))?;
            if let Some(v) = &patch.house { h.house = v.clone(); }
            if let Some(v) = patch.price { h.price = v; }
            if let Some(v) = patch.surface { h.surface = v; }
            if let Some(v) = &patch.description { h.description = v.clone(); }
            if let Some(v) = patch.category_id { h.category_id = v; }
            let updated = h.clone();
            Ok(store.record(id, &updated))
        }

        async fn delete_house(&self, id: i32) -> Result<(), IoError> {
            self.online()?;
            let mut store = self.store.lock().await;
            let before = store.houses.len();
            store.houses.retain(|(hid, _)| *hid != id);
            if store.houses.len() == before {
                return Err(IoError::Status(StatusCode::NOT_FOUND));
            }
            Ok(())
        }
    }
}
