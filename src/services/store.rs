use async_trait::async_trait;
use thiserror::Error;
use crate::models::{
    Credentials, DonationRequest, Donor, DonorInboxEntry, DonorUpdate, Hospital, NewDonor,
    NewHospital, NewReceiver, OwnedRequest, Receiver, RequestStatus, Role, SentRequest,
};

/// Errors that can occur when reading or writing persistent state
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// Persistence for accounts and donation requests
///
/// Implemented by [`PostgresStore`](crate::services::PostgresStore) in
/// production and by [`MemoryStore`](crate::services::MemoryStore) for tests
/// and local runs without a database.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with `Conflict` when the email is taken
    async fn insert_donor(&self, donor: NewDonor) -> Result<Donor, StoreError>;

    /// Fails with `Conflict` when the email is taken
    async fn insert_receiver(&self, receiver: NewReceiver) -> Result<Receiver, StoreError>;

    /// Fails with `Conflict` when the email or hospital id is taken
    async fn insert_hospital(&self, hospital: NewHospital) -> Result<Hospital, StoreError>;

    async fn find_credentials(
        &self,
        role: Role,
        email: &str,
    ) -> Result<Option<Credentials>, StoreError>;

    async fn get_donor(&self, id: i64) -> Result<Option<Donor>, StoreError>;

    async fn get_receiver(&self, id: i64) -> Result<Option<Receiver>, StoreError>;

    async fn get_hospital(&self, id: i64) -> Result<Option<Hospital>, StoreError>;

    /// All donors, in id order
    async fn list_donors(&self) -> Result<Vec<Donor>, StoreError>;

    async fn update_donor(&self, id: i64, update: DonorUpdate) -> Result<Donor, StoreError>;

    /// Create a pending request
    ///
    /// Fails with `Conflict` if the pair already has a request and with
    /// `NotFound` if either side does not exist.
    async fn insert_request(
        &self,
        donor_id: i64,
        receiver_id: i64,
    ) -> Result<DonationRequest, StoreError>;

    /// Donor ids this receiver has already sent a request to
    async fn requested_donor_ids(&self, receiver_id: i64) -> Result<Vec<i64>, StoreError>;

    /// Load a request only if it is addressed to `donor_id`
    async fn find_owned_request(
        &self,
        request_id: i64,
        donor_id: i64,
    ) -> Result<Option<OwnedRequest>, StoreError>;

    /// Move a request from `from` to `to`
    ///
    /// Returns `false` when the request is no longer in `from`, so two
    /// concurrent transitions cannot both succeed.
    async fn transition_request(
        &self,
        request_id: i64,
        from: RequestStatus,
        to: RequestStatus,
    ) -> Result<bool, StoreError>;

    /// Requests addressed to a donor, newest first
    async fn donor_inbox(&self, donor_id: i64) -> Result<Vec<DonorInboxEntry>, StoreError>;

    /// Requests sent by a receiver, newest first
    async fn sent_requests(&self, receiver_id: i64) -> Result<Vec<SentRequest>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
