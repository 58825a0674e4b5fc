//! arsip Core Library
//!
//! This crate provides the core functionality for arsip, a small administrative
//! client for archive ("arsip") records kept by a REST backend.
//!
//! # Architecture
//!
//! - **Client**: thin transport adapter for the `/arsip/` resource collection
//! - **Store**: client-side view of the record list with loading/error state
//!
//! The store is the only stateful piece. Everything the presentation layer
//! renders comes from a `StoreState` snapshot.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let store = ArchiveStore::new(HttpArchiveClient::from_config(&config)?);
//!
//! store.refresh().await;
//! let input = ArchiveInput::new("Surat A", "2024-01-01".parse()?);
//! store.create(&input).await?;
//! ```
//!
//! # Modules
//!
//! - `client`: `ArchiveApi` trait and the HTTP implementation
//! - `store`: synchronization store (main entry point)
//! - `models`: archive record types
//! - `view`: client-side search and pagination
//! - `config`: application configuration

pub mod client;
pub mod config;
pub mod models;
pub mod store;
pub mod view;

pub use client::{ArchiveApi, HttpArchiveClient, ListQuery, TransportError};
pub use config::Config;
pub use models::{ArchiveId, ArchiveInput, ArchiveRecord};
pub use store::{ArchiveStore, ErrorInfo, Operation, StoreState};
pub use view::{ListView, Page};
