use std::sync::Arc;
use crate::core::RequestAction;
use crate::error::AppError;
use crate::models::{DonationRequest, RequestStatus};
use crate::services::mailer::{acceptance_email, Notifier};
use crate::services::store::Store;

/// Creates requests on behalf of receivers and resolves them on behalf of donors
#[derive(Clone)]
pub struct RequestService {
    store: Arc<dyn Store>,
    notifier: Arc<dyn Notifier>,
}

impl RequestService {
    pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// A receiver asks a donor for blood
    pub async fn send(&self, receiver_id: i64, donor_id: i64) -> Result<DonationRequest, AppError> {
        let request = self.store.insert_request(donor_id, receiver_id).await?;

        tracing::info!(
            "Receiver {} sent request {} to donor {}",
            receiver_id,
            request.id,
            donor_id
        );

        Ok(request)
    }

    pub async fn accept(&self, donor_id: i64, request_id: i64) -> Result<DonationRequest, AppError> {
        self.resolve(donor_id, request_id, RequestAction::Accept).await
    }

    pub async fn reject(&self, donor_id: i64, request_id: i64) -> Result<DonationRequest, AppError> {
        self.resolve(donor_id, request_id, RequestAction::Reject).await
    }

    async fn resolve(
        &self,
        donor_id: i64,
        request_id: i64,
        action: RequestAction,
    ) -> Result<DonationRequest, AppError> {
        // Someone else's request looks exactly like a missing one
        let owned = self
            .store
            .find_owned_request(request_id, donor_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("request not found or you are not authorized".to_string())
            })?;

        let next = owned.request.status.apply(action)?;

        if !self
            .store
            .transition_request(request_id, RequestStatus::Pending, next)
            .await?
        {
            // Lost a race with another transition of the same request
            return Err(AppError::Conflict(
                "request has already been resolved".to_string(),
            ));
        }

        tracing::info!("Donor {} {} request {}", donor_id, next, request_id);

        if action == RequestAction::Accept {
            let email = acceptance_email(
                &owned.receiver_email,
                &owned.receiver_name,
                &owned.donor_name,
            );
            if let Err(e) = self.notifier.send(&email).await {
                tracing::warn!(
                    "Request {} accepted but notifying {} failed: {}",
                    request_id,
                    owned.receiver_email,
                    e
                );
            }
        }

        Ok(DonationRequest {
            status: next,
            ..owned.request
        })
    }
}
