//! HTTP client for the pose catalog, sequence and practice API.

use std::time::Duration;

use asana_studio_core::services::{
    CategoryCount, GeneratedSequence, NewSequence, PoseCatalog, PoseDetail, Practice,
    PracticeDraft, PracticeStorage, PracticeSummary, SavedSequence, SavedSequenceSummary,
    SearchFilters, SearchPage, SequenceGenerator, SequenceStyle, TagCount,
};
use asana_studio_core::{PoseId, ServiceError};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ApiConfig;

const CATALOG: &str = "pose catalog";
const SEQUENCES: &str = "sequence generator";
const PRACTICES: &str = "practice storage";

#[derive(Debug, Deserialize)]
struct Created {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    style: &'a str,
    duration_minutes: u32,
    difficulty: u8,
}

/// One client serves all three collaborator traits; they share a base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Box<dyn std::error::Error>> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("asana-studio/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        Self::new(&config.base_url, config.timeout())
    }

    fn url(&self, service: &'static str, path: &str) -> Result<Url, ServiceError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ServiceError::Request {
                service: service.into(),
                message: e.to_string(),
            })
    }

    async fn send<B>(
        &self,
        service: &'static str,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<Response, ServiceError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(service, path)?;
        tracing::debug!(%method, %url, "api request");

        let mut request = self.client.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| ServiceError::Unavailable {
            service: service.into(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound {
                service: service.into(),
                what: path.to_string(),
            });
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(ErrorBody {
                detail: serde_json::Value::String(detail),
            }) => detail,
            Ok(ErrorBody { detail }) => detail.to_string(),
            Err(_) if !text.trim().is_empty() => format!("{status}: {}", text.trim()),
            Err(_) => status.to_string(),
        };
        tracing::warn!(service, %status, %message, "api request failed");
        Err(ServiceError::Request {
            service: service.into(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(
        service: &'static str,
        response: Response,
    ) -> Result<T, ServiceError> {
        response.json::<T>().await.map_err(|e| ServiceError::Decode {
            service: service.into(),
            message: e.to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        service: &'static str,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ServiceError> {
        let response = self
            .send::<()>(service, Method::GET, path, query, None)
            .await?;
        Self::decode(service, response).await
    }

    async fn post<B, T>(&self, service: &'static str, path: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(service, Method::POST, path, &[], Some(body))
            .await?;
        Self::decode(service, response).await
    }
}

impl PoseCatalog for ApiClient {
    async fn search(&self, filters: &SearchFilters) -> Result<SearchPage, ServiceError> {
        self.get(CATALOG, "poses", &filters.query_pairs()).await
    }

    async fn get_by_id(&self, id: PoseId) -> Result<PoseDetail, ServiceError> {
        self.get(CATALOG, &format!("poses/{id}"), &[]).await
    }

    async fn list_categories(&self) -> Result<Vec<CategoryCount>, ServiceError> {
        self.get(CATALOG, "poses/categories", &[]).await
    }

    async fn list_tags(&self) -> Result<Vec<TagCount>, ServiceError> {
        self.get(CATALOG, "poses/tags", &[]).await
    }
}

impl SequenceGenerator for ApiClient {
    async fn styles(&self) -> Result<Vec<SequenceStyle>, ServiceError> {
        self.get(SEQUENCES, "sequences/styles", &[]).await
    }

    async fn generate(
        &self,
        style: &str,
        duration_minutes: u32,
        difficulty: u8,
    ) -> Result<GeneratedSequence, ServiceError> {
        let body = GenerateRequest {
            style,
            duration_minutes,
            difficulty,
        };
        self.post(SEQUENCES, "sequences/generate", &body).await
    }

    async fn save(&self, sequence: &NewSequence) -> Result<i64, ServiceError> {
        let created: Created = self.post(SEQUENCES, "sequences", sequence).await?;
        Ok(created.id)
    }

    async fn list(&self) -> Result<Vec<SavedSequenceSummary>, ServiceError> {
        self.get(SEQUENCES, "sequences", &[]).await
    }

    async fn get_by_id(&self, id: i64) -> Result<SavedSequence, ServiceError> {
        self.get(SEQUENCES, &format!("sequences/{id}"), &[]).await
    }
}

impl PracticeStorage for ApiClient {
    async fn create(&self, practice: &PracticeDraft) -> Result<i64, ServiceError> {
        let created: Created = self.post(PRACTICES, "practices", practice).await?;
        Ok(created.id)
    }

    async fn list(&self) -> Result<Vec<PracticeSummary>, ServiceError> {
        self.get(PRACTICES, "practices", &[]).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Practice, ServiceError> {
        self.get(PRACTICES, &format!("practices/{id}"), &[]).await
    }

    async fn update(&self, id: i64, practice: &PracticeDraft) -> Result<(), ServiceError> {
        self.send(
            PRACTICES,
            Method::PUT,
            &format!("practices/{id}"),
            &[],
            Some(practice),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.send::<()>(
            PRACTICES,
            Method::DELETE,
            &format!("practices/{id}"),
            &[],
            None,
        )
        .await?;
        Ok(())
    }
}
