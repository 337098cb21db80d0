use std::sync::Arc;

use crate::config::Config;
use crate::mail::Mailer;
use crate::storage::UploadStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub uploads: UploadStore,
    /// Sends the confirmation to the applicant (first sender identity).
    pub applicant_mailer: Arc<dyn Mailer>,
    /// Sends the notification to the administrator (second sender identity).
    pub admin_mailer: Arc<dyn Mailer>,
}
