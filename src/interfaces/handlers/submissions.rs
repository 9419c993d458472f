use actix_web::{web, Either, HttpRequest, HttpResponse};

use crate::{
    dns::mx::MailDomainVerifier,
    entities::{contact_message::ContactMessageForm, service_request::ServiceRequestForm},
    errors::AppError,
    repositories::{contact_message::ContactMessageRepository, service_request::ServiceRequestRepository},
    utils::client_ip::get_client_ip,
    AppState,
};

/// Browser forms post urlencoded bodies, scripts post JSON. Both are accepted.
pub type FormPayload<T> = Either<web::Json<T>, web::Form<T>>;

fn into_form<T>(payload: FormPayload<T>) -> T {
    match payload {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    }
}

pub async fn submit_contact<C, S, M>(
    req: HttpRequest,
    state: web::Data<AppState<C, S, M>>,
    payload: FormPayload<ContactMessageForm>,
) -> Result<HttpResponse, AppError>
where
    C: ContactMessageRepository + 'static,
    S: ServiceRequestRepository + 'static,
    M: MailDomainVerifier + ?Sized + 'static,
{
    let client_ip = get_client_ip(&req, state.trust_x_forwarded_for);

    let response = state.contact_handler
        .submit(into_form(payload), &client_ip)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

pub async fn submit_service_request<C, S, M>(
    req: HttpRequest,
    state: web::Data<AppState<C, S, M>>,
    payload: FormPayload<ServiceRequestForm>,
) -> Result<HttpResponse, AppError>
where
    C: ContactMessageRepository + 'static,
    S: ServiceRequestRepository + 'static,
    M: MailDomainVerifier + ?Sized + 'static,
{
    let client_ip = get_client_ip(&req, state.trust_x_forwarded_for);

    let response = state.service_handler
        .submit(into_form(payload), &client_ip)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}
