use std::sync::Arc;
use validator::Validate;
use crate::core::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::requests::normalize_month;
use crate::models::{
    Donor, DonorUpdate, Hospital, LoginRequest, LoginResponse, NewDonor, NewHospital, NewReceiver,
    Receiver, RegisterDonorRequest, RegisterHospitalRequest, RegisterReceiverRequest,
    UpdateDonorRequest,
};
use crate::services::store::Store;
use crate::services::tokens::TokenIssuer;

/// Registration, login and profile maintenance
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
    tokens: Arc<TokenIssuer>,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, tokens: Arc<TokenIssuer>) -> Self {
        Self { store, tokens }
    }

    pub async fn register_donor(&self, req: RegisterDonorRequest) -> Result<Donor, AppError> {
        req.validate()?;

        let location = req.location();
        let donor = self
            .store
            .insert_donor(NewDonor {
                name: req.name,
                email: req.email,
                password_hash: hash_password(&req.password),
                contact: req.contact,
                blood_group: req.blood_group,
                age: req.age,
                location,
                last_donation_month: normalize_month(req.last_donation_month),
            })
            .await?;

        tracing::info!("Registered donor {} ({})", donor.id, donor.blood_group);

        Ok(donor)
    }

    pub async fn register_receiver(
        &self,
        req: RegisterReceiverRequest,
    ) -> Result<Receiver, AppError> {
        req.validate()?;

        let location = req.location();
        let receiver = self
            .store
            .insert_receiver(NewReceiver {
                name: req.name,
                email: req.email,
                password_hash: hash_password(&req.password),
                contact: req.contact,
                hospital_name: req.hospital_name,
                location,
            })
            .await?;

        tracing::info!("Registered receiver {}", receiver.id);

        Ok(receiver)
    }

    pub async fn register_hospital(
        &self,
        req: RegisterHospitalRequest,
    ) -> Result<Hospital, AppError> {
        req.validate()?;

        let location = req.location();
        let hospital = self
            .store
            .insert_hospital(NewHospital {
                hospital_id: req.hospital_id,
                name: req.name,
                email: req.email,
                password_hash: hash_password(&req.password),
                contact: req.contact,
                location,
            })
            .await?;

        tracing::info!("Registered hospital {} ({})", hospital.id, hospital.hospital_id);

        Ok(hospital)
    }

    /// Check credentials for the requested role and issue a session token
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        req.validate()?;

        let credentials = self
            .store
            .find_credentials(req.user_type, &req.email)
            .await?
            .filter(|c| verify_password(&req.password, &c.password_hash))
            .ok_or_else(|| {
                tracing::info!("Failed {} login for {}", req.user_type, req.email);
                AppError::Unauthorized("invalid credentials".to_string())
            })?;

        let issued = self
            .tokens
            .issue(credentials.id, req.user_type, &credentials.name)
            .map_err(|e| AppError::Internal(format!("failed to issue token: {}", e)))?;

        tracing::info!("{} {} logged in", req.user_type, credentials.id);

        Ok(LoginResponse {
            token: issued.token,
            user_type: req.user_type,
            user_id: credentials.id,
            name: credentials.name,
            expires_at: issued.expires_at,
        })
    }

    pub async fn update_donor(
        &self,
        donor_id: i64,
        req: UpdateDonorRequest,
    ) -> Result<Donor, AppError> {
        req.validate()?;

        let location = req.location();
        let donor = self
            .store
            .update_donor(
                donor_id,
                DonorUpdate {
                    blood_group: req.blood_group,
                    contact: req.contact,
                    age: req.age,
                    location,
                    last_donation_month: normalize_month(req.last_donation_month),
                },
            )
            .await?;

        tracing::info!("Donor {} updated their profile", donor_id);

        Ok(donor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::services::MemoryStore;

    fn service() -> AccountService {
        AccountService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(TokenIssuer::new("test-secret", 3600).unwrap()),
        )
    }

    fn donor_request(email: &str) -> RegisterDonorRequest {
        RegisterDonorRequest {
            name: "Ravi".to_string(),
            email: email.to_string(),
            password: "hunter2".to_string(),
            contact: "555-0101".to_string(),
            blood_group: "B+".to_string(),
            age: 28,
            latitude: 12.97,
            longitude: 77.59,
            last_donation_month: Some(String::new()),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let accounts = service();
        let donor = accounts.register_donor(donor_request("ravi@example.com")).await.unwrap();

        assert_eq!(donor.password_hash, hash_password("hunter2"));
        assert_eq!(donor.last_donation_month, None);
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_payload() {
        let accounts = service();
        let mut req = donor_request("not-an-email");
        req.age = 0;

        let err = accounts.register_donor(req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_duplicate_hospital_id() {
        let accounts = service();
        let hospital = |email: &str| RegisterHospitalRequest {
            hospital_id: "HOSP-001".to_string(),
            name: "City Hospital".to_string(),
            email: email.to_string(),
            password: "pw".to_string(),
            contact: "555-0199".to_string(),
            latitude: 12.9,
            longitude: 77.6,
        };

        accounts.register_hospital(hospital("a@example.com")).await.unwrap();
        let err = accounts.register_hospital(hospital("b@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_login_checks_role_and_password() {
        let accounts = service();
        let donor = accounts.register_donor(donor_request("ravi@example.com")).await.unwrap();

        let ok = accounts
            .login(LoginRequest {
                email: "ravi@example.com".to_string(),
                password: "hunter2".to_string(),
                user_type: Role::Donor,
            })
            .await
            .unwrap();
        assert_eq!(ok.user_id, donor.id);
        assert_eq!(ok.name, "Ravi");

        let wrong_password = accounts
            .login(LoginRequest {
                email: "ravi@example.com".to_string(),
                password: "nope".to_string(),
                user_type: Role::Donor,
            })
            .await;
        assert!(matches!(wrong_password, Err(AppError::Unauthorized(_))));

        let wrong_role = accounts
            .login(LoginRequest {
                email: "ravi@example.com".to_string(),
                password: "hunter2".to_string(),
                user_type: Role::Receiver,
            })
            .await;
        assert!(matches!(wrong_role, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_update_donor() {
        let accounts = service();
        let donor = accounts.register_donor(donor_request("ravi@example.com")).await.unwrap();

        let updated = accounts
            .update_donor(
                donor.id,
                UpdateDonorRequest {
                    blood_group: "O-".to_string(),
                    contact: "555-0202".to_string(),
                    age: 29,
                    latitude: 13.0,
                    longitude: 77.5,
                    last_donation_month: Some("2024-05".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.blood_group, "O-");
        assert_eq!(updated.last_donation_month.as_deref(), Some("2024-05"));
        assert_eq!(updated.email, "ravi@example.com");
    }
}
