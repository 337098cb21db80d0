// Fixed email templates for the intake pipeline.
// {full_name} and friends are substituted with the submitted values in a single pass.

use crate::mail::{Email, EmailAttachment, MailError};

use super::models::ApplicationSubmission;

pub const APPLICANT_SUBJECT: &str = "Internship Application Received - Elevix";

pub const APPLICANT_BODY: &str = "\
Hello {full_name},

Thank you for applying for the internship opportunity at Elevix. We have successfully received your application and will begin reviewing it shortly.

Our team carefully reviews all applications, and we will get back to you as soon as possible with the next steps. If your profile matches the requirements for the role, we will contact you directly to arrange an interview.

We appreciate your interest in joining Elevix and your patience throughout this process.

Thank you again, and we look forward to being in touch soon!
Best regards,
elvix";

pub const ADMIN_SUBJECT: &str = "New Application Received from {full_name}";

pub const ADMIN_BODY: &str = "\
A new application has been submitted. Here are the details:

Name: {full_name}
Email: {email}
Mobile: {mobile}
Gender: {gender}
Designation: {designation}
Languages Known: {languages}

Please find the attached resume.";

/// Confirmation sent from the applicant-facing identity to the submitted address.
pub fn applicant_confirmation(
    submission: &ApplicationSubmission,
    sender: &str,
) -> Result<Email, MailError> {
    Email::builder()
        .from(sender)
        .to(&submission.email)
        .subject(APPLICANT_SUBJECT)
        .text(render(APPLICANT_BODY, &[("full_name", submission.full_name.as_str())]))
        .build()
}

/// Notification to the administrator with every submitted field and the
/// résumé attached under its original filename.
pub fn admin_notification(
    submission: &ApplicationSubmission,
    sender: &str,
    admin_email: &str,
    resume_content: Vec<u8>,
) -> Result<Email, MailError> {
    let body = render(
        ADMIN_BODY,
        &[
            ("full_name", submission.full_name.as_str()),
            ("email", submission.email.as_str()),
            ("mobile", submission.mobile.as_str()),
            ("gender", submission.gender.as_str()),
            ("designation", submission.designation.as_str()),
            ("languages", submission.languages.as_str()),
        ],
    );

    Email::builder()
        .from(sender)
        .to(admin_email)
        .subject(render(ADMIN_SUBJECT, &[("full_name", submission.full_name.as_str())]))
        .text(body)
        .attach(EmailAttachment {
            filename: submission.resume.original_name.clone(),
            content_type: submission.resume.content_type.clone(),
            content: resume_content,
        })
        .build()
}

/// Fills `{key}` placeholders in one pass over the template. Substituted
/// values are never rescanned, so braces in submitted text come out verbatim.
/// Unknown placeholders are left as written.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });

        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
