//! Admin submission flows against a recording backend.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use lumizo_api::{ApiError, UploadKind, UploadedFile};
use lumizo_catalog::{submit_bulk_create, submit_bulk_update, upload_files, AdminBackend, AdminError};
use lumizo_core::{
    BulkCreatePayload, BulkCreateWizard, BulkError, BulkField, BulkOutcome, BulkUpdatePayload,
    BulkUpdateWizard, NewProductRow,
};

#[derive(Default)]
struct RecordingBackend {
    calls: Cell<u32>,
    uploads: RefCell<Vec<PathBuf>>,
    fail_upload: Option<PathBuf>,
}

impl AdminBackend for RecordingBackend {
    async fn bulk_update_products(
        &self,
        payload: &BulkUpdatePayload,
    ) -> Result<BulkOutcome, ApiError> {
        self.calls.set(self.calls.get() + 1);
        Ok(BulkOutcome {
            succeeded: payload.product_ids.len() as u64,
            failed: 0,
            errors: Vec::new(),
        })
    }

    async fn bulk_create_products(
        &self,
        payload: &BulkCreatePayload,
    ) -> Result<BulkOutcome, ApiError> {
        self.calls.set(self.calls.get() + 1);
        Ok(BulkOutcome {
            succeeded: payload.products.len() as u64 - 1,
            failed: 1,
            errors: vec!["duplicate model".to_owned()],
        })
    }

    async fn upload(&self, _kind: UploadKind, path: &Path) -> Result<UploadedFile, ApiError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail_upload.as_deref() == Some(path) {
            return Err(ApiError::UnexpectedStatus {
                status: 413,
                url: "/upload/product-image".to_owned(),
                body: "file too large".to_owned(),
            });
        }
        self.uploads.borrow_mut().push(path.to_path_buf());
        Ok(UploadedFile {
            url: format!("https://cdn.example.com/{}", path.display()),
            public_id: None,
        })
    }
}

#[tokio::test]
async fn bulk_update_with_zero_fields_makes_no_request() {
    let backend = RecordingBackend::default();
    let mut wizard = BulkUpdateWizard::new();
    wizard.select_products(["p1", "p2"]);

    let err = submit_bulk_update(&backend, &wizard).await.unwrap_err();
    assert!(matches!(err, AdminError::Bulk(BulkError::NoFieldsSelected)));
    assert_eq!(backend.calls.get(), 0);
}

#[tokio::test]
async fn bulk_update_with_missing_value_makes_no_request() {
    let backend = RecordingBackend::default();
    let mut wizard = BulkUpdateWizard::new();
    wizard.select_products(["p1"]);
    wizard.toggle_field(BulkField::Mrp);

    let err = submit_bulk_update(&backend, &wizard).await.unwrap_err();
    assert!(matches!(
        err,
        AdminError::Bulk(BulkError::MissingValue(BulkField::Mrp))
    ));
    assert_eq!(backend.calls.get(), 0);
}

#[tokio::test]
async fn complete_bulk_update_sends_one_request() {
    let backend = RecordingBackend::default();
    let mut wizard = BulkUpdateWizard::new();
    wizard.select_products(["p1", "p2", "p3"]);
    wizard.next().unwrap();
    wizard.toggle_field(BulkField::IsSpecial);
    wizard.next().unwrap();
    wizard.set_value(BulkField::IsSpecial, "true").unwrap();

    let outcome = submit_bulk_update(&backend, &wizard).await.unwrap();
    assert_eq!(outcome.succeeded, 3);
    assert_eq!(backend.calls.get(), 1);
}

#[tokio::test]
async fn bulk_create_reports_partial_failure() {
    let backend = RecordingBackend::default();
    let mut wizard = BulkCreateWizard::new();
    wizard.next();
    for name in ["Panel A", "Panel B"] {
        wizard
            .add_row(NewProductRow {
                name: name.to_owned(),
                ..NewProductRow::default()
            })
            .unwrap();
    }

    let outcome = submit_bulk_create(&backend, &wizard).await.unwrap();
    assert_eq!(outcome.summary(), "1 succeeded, 1 failed");
    assert_eq!(backend.calls.get(), 1);
}

#[tokio::test]
async fn uploads_run_in_order_and_stop_at_first_failure() {
    let backend = RecordingBackend {
        fail_upload: Some(PathBuf::from("b.png")),
        ..RecordingBackend::default()
    };
    let paths = ["a.png", "b.png", "c.png"];

    let err = upload_files(&backend, UploadKind::ProductImage, &paths)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Upload { ref path, .. } if path == Path::new("b.png")));
    assert_eq!(*backend.uploads.borrow(), vec![PathBuf::from("a.png")]);
    assert_eq!(backend.calls.get(), 2);
}

#[tokio::test]
async fn uploads_return_urls_in_input_order() {
    let backend = RecordingBackend::default();
    let files = upload_files(&backend, UploadKind::ProductImage, &["x.png", "y.png"])
        .await
        .unwrap();
    let urls: Vec<&str> = files.iter().map(|f| f.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["https://cdn.example.com/x.png", "https://cdn.example.com/y.png"]
    );
}
