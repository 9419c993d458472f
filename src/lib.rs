use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{entities, use_cases, validation};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{db, dns, limiter, utils, web};

use dns::mx::{DnsMailVerifier, MailDomainVerifier};
use repositories::{
    contact_message::ContactMessageRepository,
    service_request::ServiceRequestRepository,
    sqlx_repo::{SqlxContactMessageRepo, SqlxServiceRequestRepo},
};
use settings::AppConfig;
use use_cases::{abuse_guard::AbuseGuard, contact::ContactHandler, service_request::ServiceRequestHandler};

/// Shared request state. The type parameters let tests swap the Postgres
/// repositories and the DNS verifier for in-process doubles.
pub struct AppState<C = SqlxContactMessageRepo, S = SqlxServiceRequestRepo, M = DnsMailVerifier>
where
    C: ContactMessageRepository,
    S: ServiceRequestRepository,
    M: MailDomainVerifier + ?Sized,
{
    pub contact_handler: ContactHandler<C, M>,
    pub service_handler: ServiceRequestHandler<S, M>,
    pub trust_x_forwarded_for: bool,
}

impl<C, S, M> AppState<C, S, M>
where
    C: ContactMessageRepository,
    S: ServiceRequestRepository,
    M: MailDomainVerifier + ?Sized,
{
    /// Wires both intake pipelines around one abuse guard so the IP window spans both forms.
    pub fn from_parts(
        config: &AppConfig,
        contact_repo: C,
        service_repo: S,
        mail_verifier: Arc<M>,
        guard: AbuseGuard,
    ) -> Self {
        let contact_handler = ContactHandler::new(contact_repo, mail_verifier.clone(), guard.clone());
        let service_handler = ServiceRequestHandler::new(service_repo, mail_verifier, guard)
            .with_recent_entries(config.recent_requests_limit, config.expose_recent_requests);

        AppState {
            contact_handler,
            service_handler,
            trust_x_forwarded_for: config.trust_x_forwarded_for,
        }
    }
}

impl AppState {
    pub fn new(config: &AppConfig, pool: sqlx::PgPool, guard: AbuseGuard) -> Self {
        let mail_verifier = if config.verify_mx {
            DnsMailVerifier::new(config.dns_timeout())
        } else {
            DnsMailVerifier::disabled()
        };

        AppState::from_parts(
            config,
            SqlxContactMessageRepo::new(pool.clone()),
            SqlxServiceRequestRepo::new(pool),
            Arc::new(mail_verifier),
            guard,
        )
    }
}
