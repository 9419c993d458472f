use std::sync::Arc;

use validator::Validate;

use crate::{
    constants::HONEYPOT_FIELD,
    dns::mx::MailDomainVerifier,
    entities::{
        service_request::{ServiceRequestForm, ServiceRequestInsert},
        submission::{SubmissionKind, SubmissionResponse},
    },
    errors::AppError,
    repositories::service_request::ServiceRequestRepository,
    use_cases::abuse_guard::{AbuseGuard, Admission},
    validation::verify_mail_domain,
};

pub struct ServiceRequestHandler<R, M>
where
    R: ServiceRequestRepository,
    M: MailDomainVerifier + ?Sized,
{
    pub service_repo: R,
    pub mail_verifier: Arc<M>,
    pub guard: AbuseGuard,
    pub recent_limit: i64,
    pub expose_recent: bool,
}

impl<R, M> ServiceRequestHandler<R, M>
where
    R: ServiceRequestRepository,
    M: MailDomainVerifier + ?Sized,
{
    pub fn new(service_repo: R, mail_verifier: Arc<M>, guard: AbuseGuard) -> Self {
        ServiceRequestHandler {
            service_repo,
            mail_verifier,
            guard,
            recent_limit: 10,
            expose_recent: false,
        }
    }

    pub fn with_recent_entries(mut self, limit: i64, expose: bool) -> Self {
        self.recent_limit = limit;
        self.expose_recent = expose;
        self
    }

    /// Runs a service request through honeypot, validation, abuse guard and store.
    pub async fn submit(
        &self,
        form: ServiceRequestForm,
        client_ip: &str,
    ) -> Result<SubmissionResponse, AppError> {
        if form.is_spam() {
            tracing::warn!(ip = client_ip, field = HONEYPOT_FIELD, kind = %SubmissionKind::ServiceRequest, "spam detected");
            return Err(AppError::SpamDetected);
        }

        let form = form.normalized();
        form.validate()?;
        let new_request: ServiceRequestInsert = form.try_into()?;

        verify_mail_domain(self.mail_verifier.as_ref(), &new_request.email).await?;

        let admission = self.guard
            .admit(client_ip, &new_request.email, SubmissionKind::ServiceRequest, &self.service_repo)
            .await?;
        if let Admission::Denied(reason) = admission {
            return Err(reason.into());
        }

        let id = self.service_repo.create_service_request(&new_request).await?;
        tracing::info!(id, ip = client_ip, service = %new_request.service, "service request stored");

        let mut response = SubmissionResponse::success("Service request submitted successfully.", id);

        if self.recent_limit > 0 {
            // The row is already committed; a failed read must not turn it into an error
            match self.service_repo.list_recent_service_requests(self.recent_limit).await {
                Ok(entries) => {
                    tracing::debug!(count = entries.len(), "recent service requests: {:?}", entries);
                    if self.expose_recent {
                        response.recent_entries = Some(entries);
                    }
                }
                Err(e) => tracing::warn!("could not load recent service requests: {}", e),
            }
        }

        Ok(response)
    }
}
