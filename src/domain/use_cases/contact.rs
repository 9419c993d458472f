use std::sync::Arc;

use validator::Validate;

use crate::{
    constants::HONEYPOT_FIELD,
    dns::mx::MailDomainVerifier,
    entities::{
        contact_message::{ContactMessageForm, ContactMessageInsert},
        submission::{InsertOutcome, SubmissionKind, SubmissionResponse},
    },
    errors::AppError,
    repositories::contact_message::ContactMessageRepository,
    use_cases::abuse_guard::{AbuseGuard, Admission},
    validation::verify_mail_domain,
};

pub struct ContactHandler<R, M>
where
    R: ContactMessageRepository,
    M: MailDomainVerifier + ?Sized,
{
    pub contact_repo: R,
    pub mail_verifier: Arc<M>,
    pub guard: AbuseGuard,
}

impl<R, M> ContactHandler<R, M>
where
    R: ContactMessageRepository,
    M: MailDomainVerifier + ?Sized,
{
    pub fn new(contact_repo: R, mail_verifier: Arc<M>, guard: AbuseGuard) -> Self {
        ContactHandler { contact_repo, mail_verifier, guard }
    }

    /// Runs a contact form through honeypot, validation, abuse guard and store.
    pub async fn submit(
        &self,
        form: ContactMessageForm,
        client_ip: &str,
    ) -> Result<SubmissionResponse, AppError> {
        if form.is_spam() {
            tracing::warn!(ip = client_ip, field = HONEYPOT_FIELD, kind = %SubmissionKind::Contact, "spam detected");
            return Err(AppError::SpamDetected);
        }

        let form = form.normalized();
        form.validate()?;
        let new_msg = ContactMessageInsert::from(form);

        verify_mail_domain(self.mail_verifier.as_ref(), &new_msg.email).await?;

        let admission = self.guard
            .admit(client_ip, &new_msg.email, SubmissionKind::Contact, &self.contact_repo)
            .await?;
        if let Admission::Denied(reason) = admission {
            return Err(reason.into());
        }

        match self.contact_repo.create_contact_message(&new_msg).await? {
            InsertOutcome::Inserted(id) => {
                tracing::info!(id, ip = client_ip, "contact message stored");
                Ok(SubmissionResponse::success("Message submitted successfully.", id))
            }
            InsertOutcome::DuplicateIgnored => {
                tracing::info!(ip = client_ip, "duplicate contact message ignored");
                Ok(SubmissionResponse::duplicate("This message was already received earlier."))
            }
        }
    }
}
