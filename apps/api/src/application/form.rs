use axum::extract::multipart::{Field, Multipart};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::storage::{StoredFile, UploadStore};

use super::models::{ApplicationForm, RESUME_FIELD};

/// Walks the multipart body, streaming the résumé to disk and collecting the
/// text fields.
///
/// A part is treated as a file when it carries a filename. A file part with
/// an empty filename is what a browser sends when no file was picked; it is
/// skipped without touching the store. Only one file, named `resume`, is
/// accepted; any other file part is an upload error. Text parts with unknown
/// names are skipped, and a repeated text field keeps its last value.
pub async fn parse_form(
    mut multipart: Multipart,
    store: &UploadStore,
) -> Result<ApplicationForm, AppError> {
    let mut form = ApplicationForm::default();

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name() {
            if file_name.is_empty() {
                debug!(field = %name, "Skipping file part with no file selected");
                continue;
            }
            if name != RESUME_FIELD || form.resume.is_some() {
                return Err(AppError::Upload(format!("unexpected file field '{name}'")));
            }
            form.resume = Some(store_resume(field, store).await?);
            continue;
        }

        let value = field.text().await.map_err(upload_error)?;
        if !form.set_text(&name, value) {
            debug!(field = %name, "Ignoring unknown form field");
        }
    }

    Ok(form)
}

async fn store_resume(mut field: Field<'_>, store: &UploadStore) -> Result<StoredFile, AppError> {
    let original_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);

    let mut upload = store.begin(&original_name, content_type.as_deref()).await?;

    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                upload.abort().await;
                return Err(upload_error(e));
            }
        };

        if let Err(e) = upload.write_chunk(&chunk).await {
            upload.abort().await;
            return Err(e.into());
        }
    }

    let stored = upload.finish().await?;
    info!(
        stored_name = %stored.stored_name,
        size = stored.size,
        "Stored uploaded resume"
    );
    Ok(stored)
}

fn upload_error(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Upload(err.body_text())
}
