// Application intake: the POST /send-email pipeline.
// parse multipart (store résumé) -> validate -> confirm to applicant -> notify admin.
// Every request is independent; nothing outlives the request except the stored file.

pub mod form;
pub mod handlers;
pub mod models;
pub mod templates;
