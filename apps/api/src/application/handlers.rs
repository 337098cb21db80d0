use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use tracing::{info, warn};

use crate::application::form::parse_form;
use crate::application::models::{ApplicationForm, SubmissionResponse};
use crate::application::templates::{admin_notification, applicant_confirmation};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /send-email
///
/// A body that is not multipart carries no résumé and is rejected as such;
/// a multipart content type the extractor cannot use (e.g. no boundary) is
/// an upload error.
/// The admin notification is only attempted after the applicant confirmation
/// has been accepted by the transport; neither is retried or rolled back.
pub async fn handle_submit_application(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let form = match multipart {
        Ok(multipart) => parse_form(multipart, &state.uploads).await?,
        Err(rejection) if is_form_data(&headers) => {
            return Err(AppError::Upload(rejection.body_text()));
        }
        Err(rejection) => {
            warn!("Request body is not multipart: {rejection}");
            ApplicationForm::default()
        }
    };

    let submission = form.validate()?;
    let resume_content = submission.resume.read().await?;

    let confirmation =
        applicant_confirmation(&submission, &state.config.applicant_mailer.username)?;
    let notification = admin_notification(
        &submission,
        &state.config.admin_mailer.username,
        &state.config.admin_email,
        resume_content,
    )?;

    state.applicant_mailer.send(&confirmation).await?;
    info!(to = %submission.email, "Sent applicant confirmation");

    state.admin_mailer.send(&notification).await?;
    info!(
        resume = %submission.resume.stored_name,
        "Sent administrator notification"
    );

    Ok(Json(SubmissionResponse::success()))
}

/// True when the request declares `multipart/form-data`, whatever its parameters.
fn is_form_data(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("multipart/form-data"))
}
