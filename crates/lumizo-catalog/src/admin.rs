//! Admin submission flows.
//!
//! Wizards are validated locally first; a payload that fails validation
//! never produces a request. Uploads run strictly one after another.

use std::path::{Path, PathBuf};

use lumizo_api::{ApiError, UploadKind, UploadedFile};
use lumizo_core::{BulkCreateWizard, BulkError, BulkOutcome, BulkUpdateWizard};
use thiserror::Error;

use crate::backend::AdminBackend;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Bulk(#[from] BulkError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("upload of {path} failed: {source}")]
    Upload {
        path: PathBuf,
        #[source]
        source: ApiError,
    },
}

/// Validates the wizard and sends one `PUT /products/bulk`.
///
/// # Errors
///
/// [`AdminError::Bulk`] when the wizard is incomplete (no request is made),
/// or [`AdminError::Api`] when the request fails.
pub async fn submit_bulk_update<B: AdminBackend>(
    backend: &B,
    wizard: &BulkUpdateWizard,
) -> Result<BulkOutcome, AdminError> {
    let payload = wizard.build_payload()?;
    tracing::info!(
        products = payload.product_ids.len(),
        fields = payload.updates.len(),
        "submitting bulk update"
    );
    let outcome = backend.bulk_update_products(&payload).await?;
    log_outcome("bulk update", &outcome);
    Ok(outcome)
}

/// Validates the wizard and sends one `POST /products/bulk`.
///
/// # Errors
///
/// [`AdminError::Bulk`] when the wizard is incomplete (no request is made),
/// or [`AdminError::Api`] when the request fails.
pub async fn submit_bulk_create<B: AdminBackend>(
    backend: &B,
    wizard: &BulkCreateWizard,
) -> Result<BulkOutcome, AdminError> {
    let payload = wizard.build_payload()?;
    tracing::info!(rows = payload.products.len(), "submitting bulk create");
    let outcome = backend.bulk_create_products(&payload).await?;
    log_outcome("bulk create", &outcome);
    Ok(outcome)
}

/// Uploads `paths` in order, awaiting each before starting the next.
/// Stops at the first failure.
///
/// # Errors
///
/// [`AdminError::Upload`] naming the file that failed.
pub async fn upload_files<B, P>(
    backend: &B,
    kind: UploadKind,
    paths: &[P],
) -> Result<Vec<UploadedFile>, AdminError>
where
    B: AdminBackend,
    P: AsRef<Path>,
{
    let mut uploaded = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let file = backend
            .upload(kind, path)
            .await
            .map_err(|source| AdminError::Upload {
                path: path.to_path_buf(),
                source,
            })?;
        uploaded.push(file);
    }
    Ok(uploaded)
}

fn log_outcome(operation: &str, outcome: &BulkOutcome) {
    if outcome.failed > 0 {
        tracing::warn!(
            operation,
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "batch partially failed"
        );
    } else {
        tracing::info!(operation, succeeded = outcome.succeeded, "batch completed");
    }
}
