use std::collections::HashSet;
use std::sync::Arc;
use crate::core::{exclude_ids, rank_by_distance};
use crate::error::AppError;
use crate::models::{DonorDashboard, DonorSummary, HospitalDashboard, ReceiverDashboard};
use crate::services::store::Store;

/// Builds the per-role dashboard views
#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn Store>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// The donor's profile and every request addressed to them
    pub async fn donor(&self, donor_id: i64) -> Result<DonorDashboard, AppError> {
        let donor = self
            .store
            .get_donor(donor_id)
            .await?
            .ok_or_else(|| AppError::NotFound("donor account not found".to_string()))?;

        let requests = self.store.donor_inbox(donor_id).await?;

        Ok(DonorDashboard { donor, requests })
    }

    /// Donors ranked by distance from the receiver, minus those already asked
    pub async fn receiver(&self, receiver_id: i64) -> Result<ReceiverDashboard, AppError> {
        let receiver = self
            .store
            .get_receiver(receiver_id)
            .await?
            .ok_or_else(|| AppError::NotFound("receiver account not found".to_string()))?;

        let requested: HashSet<i64> = self
            .store
            .requested_donor_ids(receiver_id)
            .await?
            .into_iter()
            .collect();

        let candidates = exclude_ids(self.store.list_donors().await?, &requested);
        let donors = rank_by_distance(receiver.location(), candidates);
        let sent_requests = self.store.sent_requests(receiver_id).await?;

        tracing::debug!(
            "Receiver {} dashboard: {} donors available, {} already requested",
            receiver_id,
            donors.len(),
            requested.len()
        );

        Ok(ReceiverDashboard {
            receiver,
            donors,
            sent_requests,
        })
    }

    /// Every donor ranked by distance from the hospital
    pub async fn hospital(&self, hospital_id: i64) -> Result<HospitalDashboard, AppError> {
        let hospital = self
            .store
            .get_hospital(hospital_id)
            .await?
            .ok_or_else(|| AppError::NotFound("hospital account not found".to_string()))?;

        let summaries: Vec<DonorSummary> = self
            .store
            .list_donors()
            .await?
            .into_iter()
            .map(DonorSummary::from)
            .collect();
        let donors = rank_by_distance(hospital.location(), summaries);

        Ok(HospitalDashboard { hospital, donors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoPoint, NewDonor, NewHospital, NewReceiver};
    use crate::services::MemoryStore;

    fn donor(email: &str, lon: f64) -> NewDonor {
        NewDonor {
            name: email.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            contact: "555-0101".to_string(),
            blood_group: "A+".to_string(),
            age: 30,
            location: GeoPoint::new(0.0, lon),
            last_donation_month: None,
        }
    }

    #[tokio::test]
    async fn test_receiver_dashboard_excludes_requested() {
        let store = Arc::new(MemoryStore::new());
        let far = store.insert_donor(donor("far@example.com", 3.0)).await.unwrap();
        let near = store.insert_donor(donor("near@example.com", 1.0)).await.unwrap();
        let asked = store.insert_donor(donor("asked@example.com", 0.5)).await.unwrap();
        let receiver = store
            .insert_receiver(NewReceiver {
                name: "Meera".to_string(),
                email: "meera@example.com".to_string(),
                password_hash: "hash".to_string(),
                contact: "555-0102".to_string(),
                hospital_name: "City Hospital".to_string(),
                location: GeoPoint::new(0.0, 0.0),
            })
            .await
            .unwrap();
        store.insert_request(asked.id, receiver.id).await.unwrap();

        let dashboard = DashboardService::new(store).receiver(receiver.id).await.unwrap();

        let ids: Vec<i64> = dashboard.donors.iter().map(|m| m.candidate.id).collect();
        assert_eq!(ids, vec![near.id, far.id]);
        assert_eq!(dashboard.donors[0].distance_km, 111.19);
        assert_eq!(dashboard.sent_requests.len(), 1);
        assert_eq!(dashboard.sent_requests[0].donor_id, asked.id);
    }

    #[tokio::test]
    async fn test_hospital_dashboard_ranks_all_donors() {
        let store = Arc::new(MemoryStore::new());
        store.insert_donor(donor("b@example.com", 2.0)).await.unwrap();
        store.insert_donor(donor("a@example.com", 1.0)).await.unwrap();
        let hospital = store
            .insert_hospital(NewHospital {
                hospital_id: "HOSP-1".to_string(),
                name: "City Hospital".to_string(),
                email: "city@example.com".to_string(),
                password_hash: "hash".to_string(),
                contact: "555-0199".to_string(),
                location: GeoPoint::new(0.0, 0.0),
            })
            .await
            .unwrap();

        let dashboard = DashboardService::new(store).hospital(hospital.id).await.unwrap();

        let names: Vec<&str> = dashboard.donors.iter().map(|m| m.candidate.name.as_str()).collect();
        assert_eq!(names, vec!["a@example.com", "b@example.com"]);
    }

    #[tokio::test]
    async fn test_missing_account() {
        let service = DashboardService::new(Arc::new(MemoryStore::new()));
        assert!(matches!(service.donor(7).await, Err(AppError::NotFound(_))));
    }
}
