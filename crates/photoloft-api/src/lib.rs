//! Photoloft API client
//!
//! A resilient, session-aware HTTP client for a photo library server:
//!
//! - [`chain`] - an explicit interceptor chain composed around the transport
//! - [`interceptors`] - lazy header injection, session attach and session
//!   expiry detection
//! - [`renewal`] - single-flight session renewal with exactly-one retry per
//!   failed request
//! - [`client`] - the call adapter mapping non-2xx responses to structured
//!   errors, plus the [`client::ApiClientBuilder`] wiring everything together
//! - [`session_service`], [`photos`], [`albums`] - typed remote services
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use photoloft_api::client::ApiClientBuilder;
//! use photoloft_api::photos::PhotosService;
//! use photoloft_core::domain::{ConnectionParams, SessionHolder};
//!
//! # async fn example() -> Result<(), photoloft_core::errors::ApiError> {
//! let connection = ConnectionParams::new(
//!     url::Url::parse("https://photos.example.com").expect("valid URL"),
//!     None,
//!     None,
//! )?;
//! let session = SessionHolder::new();
//! let client = ApiClientBuilder::new(connection)
//!     .with_session(session)
//!     .build()?;
//! let photos = PhotosService::new(client);
//! # Ok(())
//! # }
//! ```

pub mod albums;
pub mod chain;
pub mod client;
pub mod interceptors;
pub mod order;
pub mod photos;
pub mod renewal;
pub mod request;
pub mod session_service;
pub mod transport;
