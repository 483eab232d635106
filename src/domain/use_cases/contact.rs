use std::sync::Arc;

use validator::Validate;

use crate::{
    entities::{
        contact::{Contact, MarkReadRequest, NewContactForm, CONTACT_FIELDS},
        list_query::{ListQuery, ResultPage},
    },
    errors::AppError,
    limiter::rate_limiter::{RateDecision, RateLimiterStore},
    mail::{templates, Mailer},
    repositories::contact::ContactRepository,
    use_cases::advanced_results::advanced_results,
    utils::valid_uuid::{not_found, valid_uuid},
};

const RESOURCE: &str = "Contact";

pub struct ContactHandler<R>
where
    R: ContactRepository + ?Sized,
{
    pub contact_repo: Arc<R>,
    pub mailer: Arc<dyn Mailer>,
    pub admin_email: String,
    pub limiter: RateLimiterStore,
}

impl<R> ContactHandler<R>
where
    R: ContactRepository + ?Sized,
{
    pub fn new(
        contact_repo: Arc<R>,
        mailer: Arc<dyn Mailer>,
        admin_email: String,
        limiter: RateLimiterStore,
    ) -> Self {
        ContactHandler { contact_repo, mailer, admin_email, limiter }
    }

    /// Saves the submission, then notifies the admin and the submitter.
    /// A mail failure is reported after the record has been kept.
    pub async fn submit_contact(&self, client_key: &str, form: NewContactForm) -> Result<Contact, AppError> {
        if let RateDecision::Limited { retry_after_secs } = self.limiter.check(client_key) {
            tracing::warn!(client = client_key, retry_after_secs, "Contact submission rate limited");
            return Err(AppError::RateLimited(
                "Too many messages. Please try again later.".to_string(),
            ));
        }

        let form = form.normalized();
        form.validate()?;

        let contact = self.contact_repo.create_contact(&form).await?;
        tracing::info!(contact_id = %contact.id, "Contact submission saved");

        self.mailer
            .send(&templates::admin_notification(&self.admin_email, &form))
            .await?;
        self.mailer
            .send(&templates::submitter_confirmation(&form))
            .await?;

        Ok(contact)
    }

    pub async fn list_contacts(&self, params: &[(String, String)]) -> Result<ResultPage, AppError> {
        let query = ListQuery::from_params(params, CONTACT_FIELDS);
        advanced_results::<Contact, _>(self.contact_repo.as_ref(), &query).await
    }

    /// The first view marks the contact as read; later views only read.
    pub async fn view_contact(&self, id: &str) -> Result<Contact, AppError> {
        let contact_id = valid_uuid(id, RESOURCE)?;

        let mut contact = self
            .contact_repo
            .get_contact_by_id(&contact_id)
            .await?
            .ok_or_else(|| not_found(RESOURCE, id))?;

        if !contact.is_read {
            contact = match self.contact_repo.mark_first_read(&contact_id).await? {
                Some(updated) => updated,
                // a concurrent view got there first
                None => Contact { is_read: true, ..contact },
            };
        }

        Ok(contact)
    }

    pub async fn mark_read(&self, id: &str, request: MarkReadRequest) -> Result<Contact, AppError> {
        let contact_id = valid_uuid(id, RESOURCE)?;

        self.contact_repo
            .set_read(&contact_id, request.is_read)
            .await?
            .ok_or_else(|| not_found(RESOURCE, id))
    }

    pub async fn delete_contact(&self, id: &str) -> Result<(), AppError> {
        let contact_id = valid_uuid(id, RESOURCE)?;

        if self.contact_repo.delete_contact(&contact_id).await? {
            Ok(())
        } else {
            Err(not_found(RESOURCE, id))
        }
    }
}
