//! The albums endpoint.

use serde::Deserialize;

use photoloft_core::errors::ApiError;

use crate::client::ApiClient;
use crate::order::ApiOrder;

/// An album as returned by `GET /api/v1/albums`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct AlbumDto {
    #[serde(rename = "UID")]
    pub uid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub favorite: bool,
    #[serde(rename = "Type", default)]
    pub album_type: String,
}

/// Typed access to the albums endpoint.
#[derive(Clone)]
pub struct AlbumsService {
    client: ApiClient,
}

impl AlbumsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetches one page of albums of the given type (`"album"`, `"folder"`).
    pub async fn get_albums(
        &self,
        count: u32,
        offset: u32,
        order: ApiOrder,
        album_type: &str,
    ) -> Result<Vec<AlbumDto>, ApiError> {
        let params = [
            ("count", count.to_string()),
            ("offset", offset.to_string()),
            ("order", order.as_str().to_string()),
            ("type", album_type.to_string()),
        ];
        self.client.get_json("albums", &params).await
    }
}
