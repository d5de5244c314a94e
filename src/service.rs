//! Remote location service
//!
//! CRUD against the remote locations collection. Every request carries the
//! installation API key; anything other than HTTP 200 counts as a failure.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header::CONTENT_TYPE};
use tracing::{debug, info, instrument, warn};

use crate::config::ServiceConfig;
use crate::models::{Location, LocationsResponse};
use crate::settings::ApiKey;
use crate::{LocationError, Result};

/// Header carrying the installation API key
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// The three remote operations the synchronizer depends on
#[async_trait]
pub trait LocationService: Send + Sync {
    /// List all locations in server order
    async fn fetch_locations(&self) -> Result<Vec<Location>>;
    /// Create a location on the server
    async fn add_location(&self, location: &Location) -> Result<()>;
    /// Delete the location with the given id
    async fn remove_location(&self, id: &str) -> Result<()>;
}

/// `LocationService` over HTTP using reqwest
pub struct HttpLocationService {
    client: Client,
    collection_url: String,
    api_key: ApiKey,
}

impl HttpLocationService {
    /// Create a new client for the configured endpoint
    pub fn new(config: &ServiceConfig, api_key: ApiKey) -> Result<Self> {
        let base_url = config.base_url.trim();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(LocationError::config(
                "Service base URL must start with http:// or https://",
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(format!("weather-locations/{}", crate::VERSION))
            .build()?;

        Ok(Self {
            client,
            collection_url: config.collection_url(),
            api_key,
        })
    }

    /// URL of the locations collection
    #[must_use]
    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn location_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url, urlencoding::encode(id))
    }

    /// Send a request with the API key attached. Returns the response only
    /// for status 200, `default_error` for any other status.
    async fn send(
        &self,
        request: RequestBuilder,
        default_error: fn() -> LocationError,
    ) -> Result<Response> {
        let start_time = Instant::now();
        let response = request
            .header(API_KEY_HEADER, self.api_key.as_str())
            .send()
            .await
            .map_err(|e| {
                warn!("Request failed before a response arrived: {}", e);
                LocationError::Transport(e)
            })?;

        let status = response.status();
        debug!(
            status = status.as_u16(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Response received"
        );

        if status != StatusCode::OK {
            warn!("Unexpected status {} from {}", status, response.url());
            return Err(default_error());
        }
        Ok(response)
    }
}

#[async_trait]
impl LocationService for HttpLocationService {
    #[instrument(skip(self), fields(url = %self.collection_url))]
    async fn fetch_locations(&self) -> Result<Vec<Location>> {
        let response = self
            .send(self.client.get(&self.collection_url), || {
                LocationError::Generic
            })
            .await?;

        let body = response.bytes().await?;
        if body.is_empty() {
            warn!("Empty body in location list response");
            return Err(LocationError::Generic);
        }

        let decoded: LocationsResponse =
            serde_json::from_slice(&body).map_err(LocationError::Decode)?;
        info!("Fetched {} locations", decoded.locations.len());
        Ok(decoded.locations)
    }

    #[instrument(skip(self, location), fields(id = %location.id))]
    async fn add_location(&self, location: &Location) -> Result<()> {
        let body = serde_json::to_vec(location).map_err(LocationError::Encode)?;

        let request = self
            .client
            .post(&self.collection_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        self.send(request, || LocationError::CannotAdd).await?;

        info!("Added location '{}'", location.name);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_location(&self, id: &str) -> Result<()> {
        let request = self.client.delete(self.location_url(id));
        self.send(request, || LocationError::CannotRemove).await?;

        info!("Removed location {}", id);
        Ok(())
    }
}
