pub mod contact_message;
pub mod history;
pub mod service_request;
pub mod sqlx_repo;
