use actix_web::web;

use crate::{
    dns::mx::MailDomainVerifier,
    handlers::{
        home::home,
        submissions::{submit_contact, submit_service_request},
        system::health_check,
    },
    repositories::{contact_message::ContactMessageRepository, service_request::ServiceRequestRepository},
};

mod payload_errors;

/// Registers every route for an `AppState<C, S, M>` stored as app data.
pub fn configure_routes<C, S, M>(cfg: &mut web::ServiceConfig)
where
    C: ContactMessageRepository + 'static,
    S: ServiceRequestRepository + 'static,
    M: MailDomainVerifier + ?Sized + 'static,
{
    cfg.service(home);

    cfg.service(web::resource("/health").route(web::get().to(health_check::<C, S, M>)));
    cfg.service(web::resource("/contact").route(web::post().to(submit_contact::<C, S, M>)));
    cfg.service(
        web::resource("/request-service").route(web::post().to(submit_service_request::<C, S, M>))
    );

    cfg.configure(payload_errors::config_routes);
}
