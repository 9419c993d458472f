use actix_web::{
    error::{JsonPayloadError, UrlencodedError},
    web,
};

use crate::errors::AppError;

const MAX_BODY_BYTES: usize = 64 * 1024;

/// Unreadable bodies answer with the same envelope as a failed validation.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_BODY_BYTES)
            .error_handler(|err, _req| json_error(err).into()),
    );
    cfg.app_data(
        web::FormConfig::default()
            .limit(MAX_BODY_BYTES)
            .error_handler(|err, _req| form_error(err).into()),
    );
}

fn json_error(err: JsonPayloadError) -> AppError {
    AppError::invalid_field("body", format!("JSON payload error: {}", err))
}

fn form_error(err: UrlencodedError) -> AppError {
    AppError::invalid_field("body", format!("Form payload error: {}", err))
}
