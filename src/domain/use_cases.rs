pub mod abuse_guard;
pub mod contact;
pub mod service_request;
