//! Albums repository: the whole album list, favorites first.

use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use photoloft_api::albums::{AlbumDto, AlbumsService};
use photoloft_api::order::ApiOrder;
use photoloft_core::domain::DataPage;
use photoloft_core::errors::ApiError;

use crate::freshness::FreshnessPolicy;
use crate::loader::PagedCollectionLoader;
use crate::repository::{CollectionRepository, CollectionSource};

pub const ALBUM_TYPE: &str = "album";
pub const FOLDER_TYPE: &str = "folder";

/// An album or folder as cached by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Album {
    pub uid: String,
    pub title: String,
    pub is_favorite: bool,
    /// `"album"` or `"folder"`.
    pub kind: String,
}

impl From<AlbumDto> for Album {
    fn from(dto: AlbumDto) -> Self {
        Self {
            uid: dto.uid,
            title: dto.title,
            is_favorite: dto.favorite,
            kind: dto.album_type,
        }
    }
}

/// Loads the complete album list (optionally including folders) by draining
/// the paged endpoint, then sorts favorites first.
pub struct AlbumsSource {
    service: AlbumsService,
    page_limit: u32,
    include_folders: AtomicBool,
}

impl AlbumsSource {
    pub fn new(service: AlbumsService, page_limit: u32) -> Self {
        Self {
            service,
            page_limit,
            include_folders: AtomicBool::new(false),
        }
    }

    pub fn include_folders(&self) -> bool {
        self.include_folders.load(Ordering::Acquire)
    }

    pub fn set_include_folders(&self, include: bool) {
        self.include_folders.store(include, Ordering::Release);
    }

    async fn load_kind(&self, album_type: &str) -> Result<Vec<Album>, ApiError> {
        let limit = self.page_limit;
        PagedCollectionLoader::new(|cursor: Option<String>| {
            async move {
                let offset: u32 = match cursor {
                    Some(cursor) => cursor.parse().map_err(|_| {
                        ApiError::invariant(format!("malformed page cursor '{cursor}'"))
                    })?,
                    None => 0,
                };
                let albums = self
                    .service
                    .get_albums(limit, offset, ApiOrder::Newest, album_type)
                    .await?;
                let is_last = (albums.len() as u32) < limit;
                Ok(DataPage::new(
                    albums.into_iter().map(Album::from).collect(),
                    Some((offset + limit).to_string()),
                    is_last,
                ))
            }
        })
        .load_all()
        .await
    }
}

#[async_trait]
impl CollectionSource for AlbumsSource {
    type Item = Album;

    async fn get_collection(&self) -> Result<Vec<Album>, ApiError> {
        let mut albums = self.load_kind(ALBUM_TYPE).await?;
        if self.include_folders() {
            albums.extend(self.load_kind(FOLDER_TYPE).await?);
        }

        // Favorites on top, alphabetical within each group.
        albums.sort_by(|a, b| {
            b.is_favorite
                .cmp(&a.is_favorite)
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(albums)
    }
}

/// The album list repository.
///
/// Derefs to the underlying [`CollectionRepository`], adding album-specific
/// accessors on top.
pub struct AlbumsRepository {
    inner: CollectionRepository<AlbumsSource>,
}

impl AlbumsRepository {
    pub fn new(service: AlbumsService, page_limit: u32, policy: FreshnessPolicy) -> Self {
        Self {
            inner: CollectionRepository::new(AlbumsSource::new(service, page_limit), policy),
        }
    }

    /// Switches folder visibility. Already-loaded data is refetched so the
    /// cached list matches the new setting; an untouched repository stays
    /// untouched.
    pub async fn set_include_folders(&self, include: bool) -> Result<(), ApiError> {
        if self.inner.source().include_folders() == include {
            return Ok(());
        }
        self.inner.source().set_include_folders(include);
        self.inner.invalidate();
        self.inner.update_if_ever_updated().await
    }

    pub fn include_folders(&self) -> bool {
        self.inner.source().include_folders()
    }

    /// Looks an album up in the cached list.
    pub fn loaded_album(&self, uid: &str) -> Option<Album> {
        self.inner.items_list().into_iter().find(|a| a.uid == uid)
    }
}

impl Deref for AlbumsRepository {
    type Target = CollectionRepository<AlbumsSource>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
