pub mod contact_message;
pub mod form_fields;
pub mod service_request;
pub mod submission;
