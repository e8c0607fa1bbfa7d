//! Catalog session and admin submission flows on top of the Lumizo API.

pub mod admin;
pub mod backend;
pub mod session;

pub use admin::{submit_bulk_create, submit_bulk_update, upload_files, AdminError};
pub use backend::{AdminBackend, CatalogBackend};
pub use session::{CatalogSession, DataSource, FetchTicket, Notice, NoticeLevel};
