//! Paged photo repository over the photos search endpoint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use photoloft_api::photos::{PhotoDto, PhotosService};
use photoloft_core::domain::{DataPage, PagingOrder};
use photoloft_core::errors::ApiError;

use crate::freshness::FreshnessPolicy;
use crate::paged::{PagedDataRepository, PageSource};

/// A photo as cached by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Photo {
    pub uid: String,
    pub title: String,
    pub media_type: String,
    pub taken_at: Option<DateTime<Utc>>,
    pub is_favorite: bool,
}

impl From<PhotoDto> for Photo {
    fn from(dto: PhotoDto) -> Self {
        Self {
            uid: dto.uid,
            title: dto.title,
            media_type: dto.media_type,
            taken_at: dto.taken_at,
            is_favorite: dto.favorite,
        }
    }
}

/// Serves photo pages for one search query, using numeric offsets as
/// cursors.
pub struct PhotosSource {
    service: PhotosService,
    query: Option<String>,
}

impl PhotosSource {
    pub fn new(service: PhotosService, query: Option<String>) -> Self {
        Self { service, query }
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

#[async_trait]
impl PageSource for PhotosSource {
    type Item = Photo;

    async fn get_page(
        &self,
        limit: u32,
        cursor: Option<String>,
        order: PagingOrder,
    ) -> Result<DataPage<Photo>, ApiError> {
        let offset: u32 = match cursor {
            Some(cursor) => cursor.parse().map_err(|_| {
                ApiError::invariant(format!("malformed page cursor '{cursor}'"))
            })?,
            None => 0,
        };

        let photos = self
            .service
            .get_photos(limit, offset, order.into(), self.query.as_deref())
            .await?;

        // The server has no explicit end-of-collection marker; a short page
        // is the only signal.
        let is_last = (photos.len() as u32) < limit;
        Ok(DataPage::new(
            photos.into_iter().map(Photo::from).collect(),
            Some((offset + limit).to_string()),
            is_last,
        ))
    }
}

/// Paged photo cache for one search query.
pub type PhotosRepository = PagedDataRepository<PhotosSource>;

impl PhotosRepository {
    /// Builds a repository over `service` for `query` (`None` lists the
    /// whole library).
    pub fn for_search(
        service: PhotosService,
        query: Option<String>,
        order: PagingOrder,
        page_limit: u32,
        policy: FreshnessPolicy,
    ) -> Self {
        PagedDataRepository::new(PhotosSource::new(service, query), order, page_limit, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_from_dto() {
        let dto = PhotoDto {
            uid: "p1".to_string(),
            title: "Beach".to_string(),
            media_type: "image".to_string(),
            taken_at: None,
            favorite: true,
            hash: "abc".to_string(),
        };

        let photo = Photo::from(dto);
        assert_eq!(photo.uid, "p1");
        assert!(photo.is_favorite);
    }
}
