//! The photos search endpoint.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use photoloft_core::errors::ApiError;

use crate::client::ApiClient;
use crate::order::ApiOrder;

/// A photo as returned by `GET /api/v1/photos`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub struct PhotoDto {
    #[serde(rename = "UID")]
    pub uid: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "Type", default)]
    pub media_type: String,
    pub taken_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub hash: String,
}

/// Typed access to the photos endpoint.
#[derive(Clone)]
pub struct PhotosService {
    client: ApiClient,
}

impl PhotosService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetches one page of the photo search.
    ///
    /// `query` is the server-side search expression; `None` lists everything.
    pub async fn get_photos(
        &self,
        count: u32,
        offset: u32,
        order: ApiOrder,
        query: Option<&str>,
    ) -> Result<Vec<PhotoDto>, ApiError> {
        let mut params = vec![
            ("count", count.to_string()),
            ("offset", offset.to_string()),
            ("order", order.as_str().to_string()),
            ("merged", "true".to_string()),
        ];
        if let Some(query) = query {
            params.push(("q", query.to_string()));
        }
        self.client.get_json("photos", &params).await
    }
}
