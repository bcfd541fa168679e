use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use crate::config::DatabaseSettings;
use crate::models::{
    Credentials, DonationRequest, Donor, DonorInboxEntry, DonorUpdate, Hospital, NewDonor,
    NewHospital, NewReceiver, OwnedRequest, Receiver, RequestStatus, Role, SentRequest,
};
use crate::services::store::{Store, StoreError};

/// PostgreSQL-backed store
///
/// Every call checks a connection out of the pool, runs its statements and
/// returns it. No transaction is held across calls.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect to PostgreSQL and run pending migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool whose schema is already migrated
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new store from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        tracing::info!(
            "Connecting to PostgreSQL (max: {}, min: {} connections)",
            settings.max_connections,
            settings.min_connections
        );

        Self::new(
            &settings.url,
            settings.max_connections,
            settings.min_connections,
            Duration::from_secs(settings.acquire_timeout_secs),
            Duration::from_secs(settings.idle_timeout_secs),
        )
        .await
    }
}

/// Translate constraint violations into domain conflicts
fn map_write_error(err: sqlx::Error, conflict: &str, missing: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Conflict(conflict.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::NotFound(missing.to_string());
        }
    }
    StoreError::SqlxError(err)
}

/// Foreign key from `requests.receiver_id`, named in the initial migration
const REQUEST_RECEIVER_FKEY: &str = "requests_receiver_fkey";

/// Which side of a request a foreign-key violation points at
fn missing_request_party(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(REQUEST_RECEIVER_FKEY) => "receiver",
        _ => "donor",
    }
}

const DONOR_COLUMNS: &str = r#"
    id, name, email, password_hash, contact, blood_group, age,
    latitude, longitude, last_donation_month, created_at
"#;

const RECEIVER_COLUMNS: &str = r#"
    id, name, email, password_hash, contact, hospital_name,
    latitude, longitude, created_at
"#;

const HOSPITAL_COLUMNS: &str = r#"
    id, hospital_id, name, email, password_hash, contact,
    latitude, longitude, created_at
"#;

#[async_trait]
impl Store for PostgresStore {
    async fn insert_donor(&self, donor: NewDonor) -> Result<Donor, StoreError> {
        let query = format!(
            r#"
            INSERT INTO donors (name, email, password_hash, contact, blood_group, age,
                                latitude, longitude, last_donation_month)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            DONOR_COLUMNS
        );

        let created = sqlx::query_as::<_, Donor>(&query)
            .bind(&donor.name)
            .bind(&donor.email)
            .bind(&donor.password_hash)
            .bind(&donor.contact)
            .bind(&donor.blood_group)
            .bind(donor.age)
            .bind(donor.location.latitude)
            .bind(donor.location.longitude)
            .bind(&donor.last_donation_month)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "email already exists", "donor"))?;

        tracing::debug!("Inserted donor {} ({})", created.id, created.email);

        Ok(created)
    }

    async fn insert_receiver(&self, receiver: NewReceiver) -> Result<Receiver, StoreError> {
        let query = format!(
            r#"
            INSERT INTO receivers (name, email, password_hash, contact, hospital_name,
                                   latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            RECEIVER_COLUMNS
        );

        let created = sqlx::query_as::<_, Receiver>(&query)
            .bind(&receiver.name)
            .bind(&receiver.email)
            .bind(&receiver.password_hash)
            .bind(&receiver.contact)
            .bind(&receiver.hospital_name)
            .bind(receiver.location.latitude)
            .bind(receiver.location.longitude)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "email already exists", "receiver"))?;

        tracing::debug!("Inserted receiver {} ({})", created.id, created.email);

        Ok(created)
    }

    async fn insert_hospital(&self, hospital: NewHospital) -> Result<Hospital, StoreError> {
        let query = format!(
            r#"
            INSERT INTO hospitals (hospital_id, name, email, password_hash, contact,
                                   latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            HOSPITAL_COLUMNS
        );

        let created = sqlx::query_as::<_, Hospital>(&query)
            .bind(&hospital.hospital_id)
            .bind(&hospital.name)
            .bind(&hospital.email)
            .bind(&hospital.password_hash)
            .bind(&hospital.contact)
            .bind(hospital.location.latitude)
            .bind(hospital.location.longitude)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "email or hospital id already exists", "hospital"))?;

        tracing::debug!("Inserted hospital {} ({})", created.id, created.hospital_id);

        Ok(created)
    }

    async fn find_credentials(
        &self,
        role: Role,
        email: &str,
    ) -> Result<Option<Credentials>, StoreError> {
        let table = match role {
            Role::Donor => "donors",
            Role::Receiver => "receivers",
            Role::Hospital => "hospitals",
        };
        let query = format!(
            "SELECT id, name, password_hash FROM {} WHERE email = $1",
            table
        );

        let credentials = sqlx::query_as::<_, Credentials>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(credentials)
    }

    async fn get_donor(&self, id: i64) -> Result<Option<Donor>, StoreError> {
        let query = format!("SELECT {} FROM donors WHERE id = $1", DONOR_COLUMNS);

        Ok(sqlx::query_as::<_, Donor>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_receiver(&self, id: i64) -> Result<Option<Receiver>, StoreError> {
        let query = format!("SELECT {} FROM receivers WHERE id = $1", RECEIVER_COLUMNS);

        Ok(sqlx::query_as::<_, Receiver>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_hospital(&self, id: i64) -> Result<Option<Hospital>, StoreError> {
        let query = format!("SELECT {} FROM hospitals WHERE id = $1", HOSPITAL_COLUMNS);

        Ok(sqlx::query_as::<_, Hospital>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_donors(&self) -> Result<Vec<Donor>, StoreError> {
        let query = format!("SELECT {} FROM donors ORDER BY id", DONOR_COLUMNS);

        let donors = sqlx::query_as::<_, Donor>(&query)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Loaded {} donors", donors.len());

        Ok(donors)
    }

    async fn update_donor(&self, id: i64, update: DonorUpdate) -> Result<Donor, StoreError> {
        let query = format!(
            r#"
            UPDATE donors
            SET blood_group = $1, contact = $2, age = $3, latitude = $4, longitude = $5,
                last_donation_month = $6
            WHERE id = $7
            RETURNING {}
            "#,
            DONOR_COLUMNS
        );

        sqlx::query_as::<_, Donor>(&query)
            .bind(&update.blood_group)
            .bind(&update.contact)
            .bind(update.age)
            .bind(update.location.latitude)
            .bind(update.location.longitude)
            .bind(&update.last_donation_month)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("donor {}", id)))
    }

    async fn insert_request(
        &self,
        donor_id: i64,
        receiver_id: i64,
    ) -> Result<DonationRequest, StoreError> {
        let query = r#"
            INSERT INTO requests (donor_id, receiver_id)
            VALUES ($1, $2)
            RETURNING id, donor_id, receiver_id, status, created_at
        "#;

        let request = sqlx::query_as::<_, DonationRequest>(query)
            .bind(donor_id)
            .bind(receiver_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                let missing = match &e {
                    sqlx::Error::Database(db_err) => missing_request_party(db_err.constraint()),
                    _ => "donor",
                };
                map_write_error(e, "a request has already been sent to this donor", missing)
            })?;

        tracing::debug!(
            "Inserted request {}: receiver {} -> donor {}",
            request.id,
            receiver_id,
            donor_id
        );

        Ok(request)
    }

    async fn requested_donor_ids(&self, receiver_id: i64) -> Result<Vec<i64>, StoreError> {
        let query = r#"
            SELECT donor_id
            FROM requests
            WHERE receiver_id = $1
        "#;

        let ids: Vec<i64> = sqlx::query_scalar(query)
            .bind(receiver_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }

    async fn find_owned_request(
        &self,
        request_id: i64,
        donor_id: i64,
    ) -> Result<Option<OwnedRequest>, StoreError> {
        let query = r#"
            SELECT req.id, req.donor_id, req.receiver_id, req.status, req.created_at,
                   rec.name AS receiver_name,
                   rec.email AS receiver_email,
                   don.name AS donor_name
            FROM requests req
            JOIN receivers rec ON req.receiver_id = rec.id
            JOIN donors don ON req.donor_id = don.id
            WHERE req.id = $1 AND req.donor_id = $2
        "#;

        Ok(sqlx::query_as::<_, OwnedRequest>(query)
            .bind(request_id)
            .bind(donor_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn transition_request(
        &self,
        request_id: i64,
        from: RequestStatus,
        to: RequestStatus,
    ) -> Result<bool, StoreError> {
        let query = r#"
            UPDATE requests
            SET status = $1
            WHERE id = $2 AND status = $3
        "#;

        let result = sqlx::query(query)
            .bind(to)
            .bind(request_id)
            .bind(from)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn donor_inbox(&self, donor_id: i64) -> Result<Vec<DonorInboxEntry>, StoreError> {
        let query = r#"
            SELECT r.id, r.status, r.created_at,
                   rec.name AS receiver_name,
                   rec.contact AS receiver_contact,
                   rec.email AS receiver_email,
                   rec.hospital_name
            FROM requests r
            JOIN receivers rec ON r.receiver_id = rec.id
            WHERE r.donor_id = $1
            ORDER BY r.created_at DESC, r.id DESC
        "#;

        Ok(sqlx::query_as::<_, DonorInboxEntry>(query)
            .bind(donor_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn sent_requests(&self, receiver_id: i64) -> Result<Vec<SentRequest>, StoreError> {
        let query = r#"
            SELECT r.id, r.status, r.created_at,
                   d.id AS donor_id,
                   d.name AS donor_name,
                   d.email AS donor_email,
                   d.contact AS donor_contact,
                   d.blood_group AS donor_blood_group
            FROM requests r
            JOIN donors d ON r.donor_id = d.id
            WHERE r.receiver_id = $1
            ORDER BY r.created_at DESC, r.id DESC
        "#;

        Ok(sqlx::query_as::<_, SentRequest>(query)
            .bind(receiver_id)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_pass_through() {
        let err = map_write_error(sqlx::Error::RowNotFound, "taken", "donor");
        assert!(matches!(err, StoreError::SqlxError(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn test_request_foreign_keys_name_the_missing_party() {
        assert_eq!(missing_request_party(Some("requests_receiver_fkey")), "receiver");
        assert_eq!(missing_request_party(Some("requests_donor_fkey")), "donor");
        assert_eq!(missing_request_party(None), "donor");
    }
}
