//! Photoloft Core - domain model for the photo library client
//!
//! This crate contains the pieces shared by every other Photoloft crate:
//! - **Domain entities** - `Session`, `Credentials`, `ConnectionParams`, `DataPage`
//! - **Error taxonomy** - [`errors::ApiError`], the single error type flowing
//!   through the API access layer
//! - **Ports** - the [`ports::ObjectPersistence`] trait implemented by storage
//!   adapters
//! - **Configuration** - typed config with YAML loading and defaults
//!
//! # Architecture
//!
//! The core crate has no HTTP or storage dependencies. The `photoloft-api`
//! crate implements the transport and interceptor chain, `photoloft-store`
//! implements persistence adapters, and `photoloft-repo` builds observable
//! repositories on top of both.

pub mod config;
pub mod domain;
pub mod errors;
pub mod ports;
