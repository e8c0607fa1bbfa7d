pub mod client;
pub mod error;
pub(crate) mod retry;
pub mod types;

pub use client::{LumizoClient, UploadKind};
pub use error::ApiError;
pub use retry::RetryPolicy;
pub use types::{CategoryNode, UploadedFile};
