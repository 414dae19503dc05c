// REST client for the hotel inventory backend
// Four resource groups (hotels, room types, accommodations, hotel rooms), each
// behind its own trait so views can run against any backend implementation

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

use crate::models::{
    Accommodation, ErrorBody, Hotel, HotelData, HotelRoom, HotelRoomData, Id, RoomType,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {status_code}{}", message_suffix(.message))]
    ApiResponseError {
        status_code: u16,
        message: Option<String>,
    },

    #[error("Decode error: {0}")]
    DecodeError(String),
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(message) if !message.is_empty() => format!(" - {message}"),
        _ => String::new(),
    }
}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::ApiResponseError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    // Message supplied by the backend, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::ApiResponseError {
                message: Some(message),
                ..
            } if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    // Builds the error for a non-success response, keeping the body's
    // `message` field when the body is JSON
    pub fn from_response(status_code: u16, body: &Bytes) -> Self {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.message);
        ApiError::ApiResponseError {
            status_code,
            message,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::DecodeError(err.to_string())
        } else {
            ApiError::NetworkError(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    // None keeps the transport default
    pub timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: None,
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ClientError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ClientError::ConfigError("base URL is empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::ConfigError(format!(
                "base URL must start with http:// or https://, got {url}"
            )));
        }
        if self.timeout_ms == Some(0) {
            return Err(ClientError::ConfigError(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
pub trait HotelsApi: Send + Sync + 'static {
    async fn list_hotels(&self) -> Result<Vec<Hotel>, ApiError>;
    async fn get_hotel(&self, id: Id) -> Result<Hotel, ApiError>;
    async fn create_hotel(&self, data: &HotelData) -> Result<Hotel, ApiError>;
    async fn update_hotel(&self, id: Id, data: &HotelData) -> Result<Hotel, ApiError>;
    async fn delete_hotel(&self, id: Id) -> Result<(), ApiError>;

    // Room configurations of one hotel, with room type and accommodation embedded
    async fn hotel_rooms(&self, id: Id) -> Result<Vec<HotelRoom>, ApiError>;
}

#[async_trait]
pub trait RoomTypesApi: Send + Sync + 'static {
    async fn list_room_types(&self) -> Result<Vec<RoomType>, ApiError>;

    // Backend-side pairing table; the forms use `rules` instead
    async fn room_type_accommodations(&self, id: Id) -> Result<Vec<Accommodation>, ApiError>;
}

#[async_trait]
pub trait AccommodationsApi: Send + Sync + 'static {
    async fn list_accommodations(&self) -> Result<Vec<Accommodation>, ApiError>;
}

#[async_trait]
pub trait HotelRoomsApi: Send + Sync + 'static {
    async fn list_hotel_rooms(&self) -> Result<Vec<HotelRoom>, ApiError>;
    async fn get_hotel_room(&self, id: Id) -> Result<HotelRoom, ApiError>;
    async fn create_hotel_room(&self, data: &HotelRoomData) -> Result<HotelRoom, ApiError>;
    async fn update_hotel_room(&self, id: Id, data: &HotelRoomData)
        -> Result<HotelRoom, ApiError>;
    async fn delete_hotel_room(&self, id: Id) -> Result<(), ApiError>;
}

// Everything the console needs from a backend
pub trait Backend: HotelsApi + RoomTypesApi + AccommodationsApi + HotelRoomsApi {}

impl<T> Backend for T where T: HotelsApi + RoomTypesApi + AccommodationsApi + HotelRoomsApi {}

pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.endpoint(path);
        debug!(%method, %url, "sending request");
        self.http.request(method, url)
    }

    async fn send_raw(&self, request: RequestBuilder) -> Result<Bytes, ApiError> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, "request failed");
            ApiError::from(e)
        })?;
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            Ok(body)
        } else {
            let err = ApiError::from_response(status.as_u16(), &body);
            error!(status = status.as_u16(), error = %err, "backend rejected request");
            Err(err)
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_raw(request).await?;
        serde_json::from_slice(&body).map_err(|e| {
            error!(error = %e, "could not decode response body");
            ApiError::DecodeError(e.to_string())
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    // DELETE responses may be empty, so the body is discarded
    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send_raw(self.request(Method::DELETE, path))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl HotelsApi for RestClient {
    async fn list_hotels(&self) -> Result<Vec<Hotel>, ApiError> {
        self.get("/hotels").await
    }

    async fn get_hotel(&self, id: Id) -> Result<Hotel, ApiError> {
        self.get(&format!("/hotels/{id}")).await
    }

    async fn create_hotel(&self, data: &HotelData) -> Result<Hotel, ApiError> {
        self.post("/hotels", data).await
    }

    async fn update_hotel(&self, id: Id, data: &HotelData) -> Result<Hotel, ApiError> {
        self.put(&format!("/hotels/{id}"), data).await
    }

    async fn delete_hotel(&self, id: Id) -> Result<(), ApiError> {
        self.delete(&format!("/hotels/{id}")).await
    }

    async fn hotel_rooms(&self, id: Id) -> Result<Vec<HotelRoom>, ApiError> {
        self.get(&format!("/hotels/{id}/rooms")).await
    }
}

#[async_trait]
impl RoomTypesApi for RestClient {
    async fn list_room_types(&self) -> Result<Vec<RoomType>, ApiError> {
        self.get("/room-types").await
    }

    async fn room_type_accommodations(&self, id: Id) -> Result<Vec<Accommodation>, ApiError> {
        self.get(&format!("/room-types/{id}/accommodations")).await
    }
}

#[async_trait]
impl AccommodationsApi for RestClient {
    async fn list_accommodations(&self) -> Result<Vec<Accommodation>, ApiError> {
        self.get("/accommodations").await
    }
}

#[async_trait]
impl HotelRoomsApi for RestClient {
    async fn list_hotel_rooms(&self) -> Result<Vec<HotelRoom>, ApiError> {
        self.get("/hotel-rooms").await
    }

    async fn get_hotel_room(&self, id: Id) -> Result<HotelRoom, ApiError> {
        self.get(&format!("/hotel-rooms/{id}")).await
    }

    async fn create_hotel_room(&self, data: &HotelRoomData) -> Result<HotelRoom, ApiError> {
        self.post("/hotel-rooms", data).await
    }

    async fn update_hotel_room(
        &self,
        id: Id,
        data: &HotelRoomData,
    ) -> Result<HotelRoom, ApiError> {
        self.put(&format!("/hotel-rooms/{id}"), data).await
    }

    async fn delete_hotel_room(&self, id: Id) -> Result<(), ApiError> {
        self.delete(&format!("/hotel-rooms/{id}")).await
    }
}
