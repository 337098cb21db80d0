use serde::Serialize;

use crate::errors::{AppError, ValidationFailure};
use crate::storage::StoredFile;

pub const FULL_NAME_FIELD: &str = "fullName";
pub const EMAIL_FIELD: &str = "email";
pub const MOBILE_FIELD: &str = "mobile";
pub const GENDER_FIELD: &str = "gender";
pub const LANGUAGES_FIELD: &str = "languages";
pub const DESIGNATION_FIELD: &str = "designation";
pub const RESUME_FIELD: &str = "resume";

pub const SUCCESS_MESSAGE: &str = "Application submitted successfully!";

/// Raw form contents as parsed from the multipart body, before validation.
#[derive(Debug, Default)]
pub struct ApplicationForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub gender: Option<String>,
    pub languages: Option<String>,
    pub designation: Option<String>,
    pub resume: Option<StoredFile>,
}

impl ApplicationForm {
    /// Stores a text field by its wire name. Returns `false` for names the
    /// form does not know; the caller ignores those.
    pub fn set_text(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            FULL_NAME_FIELD => &mut self.full_name,
            EMAIL_FIELD => &mut self.email,
            MOBILE_FIELD => &mut self.mobile,
            GENDER_FIELD => &mut self.gender,
            LANGUAGES_FIELD => &mut self.languages,
            DESIGNATION_FIELD => &mut self.designation,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// The résumé is checked before the text fields, so a request missing
    /// both is reported as missing the résumé.
    pub fn validate(self) -> Result<ApplicationSubmission, AppError> {
        let resume = self
            .resume
            .ok_or(AppError::Validation(ValidationFailure::ResumeRequired))?;

        let required = |value: Option<String>| {
            value
                .filter(|v| !v.is_empty())
                .ok_or(AppError::Validation(ValidationFailure::FieldsRequired))
        };

        Ok(ApplicationSubmission {
            full_name: required(self.full_name)?,
            email: required(self.email)?,
            mobile: required(self.mobile)?,
            gender: required(self.gender)?,
            languages: required(self.languages)?,
            designation: required(self.designation)?,
            resume,
        })
    }
}

/// A validated application. Lives only for the duration of the request.
#[derive(Debug, Clone)]
pub struct ApplicationSubmission {
    pub full_name: String,
    /// Not format-checked; the mail transport rejects unusable addresses.
    pub email: String,
    pub mobile: String,
    pub gender: String,
    /// Free text, passed through as submitted.
    pub languages: String,
    pub designation: String,
    pub resume: StoredFile,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub message: &'static str,
}

impl SubmissionResponse {
    pub fn success() -> Self {
        Self {
            message: SUCCESS_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn stored_resume() -> StoredFile {
        StoredFile {
            original_name: "resume.pdf".into(),
            stored_name: "1700000000000-resume.pdf".into(),
            path: PathBuf::from("uploads/1700000000000-resume.pdf"),
            content_type: "application/pdf".into(),
            size: 2_000_000,
        }
    }

    fn complete_form() -> ApplicationForm {
        let mut form = ApplicationForm::default();
        for (name, value) in [
            (FULL_NAME_FIELD, "Jane Doe"),
            (EMAIL_FIELD, "jane@x.com"),
            (MOBILE_FIELD, "555-0100"),
            (GENDER_FIELD, "F"),
            (LANGUAGES_FIELD, "English"),
            (DESIGNATION_FIELD, "Intern"),
        ] {
            assert!(form.set_text(name, value.to_string()));
        }
        form.resume = Some(stored_resume());
        form
    }

    fn failure(result: Result<ApplicationSubmission, AppError>) -> ValidationFailure {
        match result {
            Err(AppError::Validation(f)) => f,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_form_validates() {
        let submission = complete_form().validate().unwrap();
        assert_eq!(submission.full_name, "Jane Doe");
        assert_eq!(submission.email, "jane@x.com");
        assert_eq!(submission.designation, "Intern");
        assert_eq!(submission.resume.original_name, "resume.pdf");
    }

    #[test]
    fn test_missing_resume_reported_first() {
        let form = ApplicationForm::default();
        assert_eq!(failure(form.validate()), ValidationFailure::ResumeRequired);

        let mut form = complete_form();
        form.resume = None;
        assert_eq!(failure(form.validate()), ValidationFailure::ResumeRequired);
    }

    #[test]
    fn test_each_missing_field_rejected() {
        for name in [
            FULL_NAME_FIELD,
            EMAIL_FIELD,
            MOBILE_FIELD,
            GENDER_FIELD,
            LANGUAGES_FIELD,
            DESIGNATION_FIELD,
        ] {
            let mut form = complete_form();
            form.set_text(name, String::new());
            assert_eq!(
                failure(form.validate()),
                ValidationFailure::FieldsRequired,
                "empty {name} should be rejected"
            );
        }
    }

    #[test]
    fn test_absent_field_rejected() {
        let mut form = complete_form();
        form.mobile = None;
        assert_eq!(failure(form.validate()), ValidationFailure::FieldsRequired);
    }

    #[test]
    fn test_unknown_field_ignored() {
        let mut form = ApplicationForm::default();
        assert!(!form.set_text("coverLetter", "hello".into()));
    }

    #[test]
    fn test_success_body() {
        let body = serde_json::to_value(SubmissionResponse::success()).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "Application submitted successfully!" }));
    }
}
