use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use crate::models::{
    Credentials, DonationRequest, Donor, DonorInboxEntry, DonorUpdate, Hospital, NewDonor,
    NewHospital, NewReceiver, OwnedRequest, Receiver, RequestStatus, Role, SentRequest,
};
use crate::services::store::{Store, StoreError};

#[derive(Debug, Default)]
struct Tables {
    donors: Vec<Donor>,
    receivers: Vec<Receiver>,
    hospitals: Vec<Hospital>,
    requests: Vec<DonationRequest>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn donor(&self, id: i64) -> Option<&Donor> {
        self.donors.iter().find(|d| d.id == id)
    }

    fn receiver(&self, id: i64) -> Option<&Receiver> {
        self.receivers.iter().find(|r| r.id == id)
    }
}

/// In-process store with the same constraints as the PostgreSQL schema
///
/// Used by the test suites and for running the service without a database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first, falling back to id when timestamps collide
fn newest_first(requests: &mut [DonationRequest]) {
    requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_donor(&self, donor: NewDonor) -> Result<Donor, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.donors.iter().any(|d| d.email == donor.email) {
            return Err(StoreError::Conflict("email already exists".to_string()));
        }

        let created = Donor {
            id: tables.next_id(),
            name: donor.name,
            email: donor.email,
            password_hash: donor.password_hash,
            contact: donor.contact,
            blood_group: donor.blood_group,
            age: donor.age,
            latitude: donor.location.latitude,
            longitude: donor.location.longitude,
            last_donation_month: donor.last_donation_month,
            created_at: Utc::now(),
        };
        tables.donors.push(created.clone());

        Ok(created)
    }

    async fn insert_receiver(&self, receiver: NewReceiver) -> Result<Receiver, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.receivers.iter().any(|r| r.email == receiver.email) {
            return Err(StoreError::Conflict("email already exists".to_string()));
        }

        let created = Receiver {
            id: tables.next_id(),
            name: receiver.name,
            email: receiver.email,
            password_hash: receiver.password_hash,
            contact: receiver.contact,
            hospital_name: receiver.hospital_name,
            latitude: receiver.location.latitude,
            longitude: receiver.location.longitude,
            created_at: Utc::now(),
        };
        tables.receivers.push(created.clone());

        Ok(created)
    }

    async fn insert_hospital(&self, hospital: NewHospital) -> Result<Hospital, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables
            .hospitals
            .iter()
            .any(|h| h.email == hospital.email || h.hospital_id == hospital.hospital_id)
        {
            return Err(StoreError::Conflict(
                "email or hospital id already exists".to_string(),
            ));
        }

        let created = Hospital {
            id: tables.next_id(),
            hospital_id: hospital.hospital_id,
            name: hospital.name,
            email: hospital.email,
            password_hash: hospital.password_hash,
            contact: hospital.contact,
            latitude: hospital.location.latitude,
            longitude: hospital.location.longitude,
            created_at: Utc::now(),
        };
        tables.hospitals.push(created.clone());

        Ok(created)
    }

    async fn find_credentials(
        &self,
        role: Role,
        email: &str,
    ) -> Result<Option<Credentials>, StoreError> {
        let tables = self.tables.lock().await;
        let found = match role {
            Role::Donor => tables.donors.iter().find(|d| d.email == email).map(|d| Credentials {
                id: d.id,
                name: d.name.clone(),
                password_hash: d.password_hash.clone(),
            }),
            Role::Receiver => tables
                .receivers
                .iter()
                .find(|r| r.email == email)
                .map(|r| Credentials {
                    id: r.id,
                    name: r.name.clone(),
                    password_hash: r.password_hash.clone(),
                }),
            Role::Hospital => tables
                .hospitals
                .iter()
                .find(|h| h.email == email)
                .map(|h| Credentials {
                    id: h.id,
                    name: h.name.clone(),
                    password_hash: h.password_hash.clone(),
                }),
        };

        Ok(found)
    }

    async fn get_donor(&self, id: i64) -> Result<Option<Donor>, StoreError> {
        Ok(self.tables.lock().await.donor(id).cloned())
    }

    async fn get_receiver(&self, id: i64) -> Result<Option<Receiver>, StoreError> {
        Ok(self.tables.lock().await.receiver(id).cloned())
    }

    async fn get_hospital(&self, id: i64) -> Result<Option<Hospital>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.hospitals.iter().find(|h| h.id == id).cloned())
    }

    async fn list_donors(&self) -> Result<Vec<Donor>, StoreError> {
        Ok(self.tables.lock().await.donors.clone())
    }

    async fn update_donor(&self, id: i64, update: DonorUpdate) -> Result<Donor, StoreError> {
        let mut tables = self.tables.lock().await;
        let donor = tables
            .donors
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("donor {}", id)))?;

        donor.blood_group = update.blood_group;
        donor.contact = update.contact;
        donor.age = update.age;
        donor.latitude = update.location.latitude;
        donor.longitude = update.location.longitude;
        donor.last_donation_month = update.last_donation_month;

        Ok(donor.clone())
    }

    async fn insert_request(
        &self,
        donor_id: i64,
        receiver_id: i64,
    ) -> Result<DonationRequest, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.donor(donor_id).is_none() {
            return Err(StoreError::NotFound("donor".to_string()));
        }
        if tables.receiver(receiver_id).is_none() {
            return Err(StoreError::NotFound("receiver".to_string()));
        }
        if tables
            .requests
            .iter()
            .any(|r| r.donor_id == donor_id && r.receiver_id == receiver_id)
        {
            return Err(StoreError::Conflict(
                "a request has already been sent to this donor".to_string(),
            ));
        }

        let request = DonationRequest {
            id: tables.next_id(),
            donor_id,
            receiver_id,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        };
        tables.requests.push(request.clone());

        Ok(request)
    }

    async fn requested_donor_ids(&self, receiver_id: i64) -> Result<Vec<i64>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .requests
            .iter()
            .filter(|r| r.receiver_id == receiver_id)
            .map(|r| r.donor_id)
            .collect())
    }

    async fn find_owned_request(
        &self,
        request_id: i64,
        donor_id: i64,
    ) -> Result<Option<OwnedRequest>, StoreError> {
        let tables = self.tables.lock().await;
        let Some(request) = tables
            .requests
            .iter()
            .find(|r| r.id == request_id && r.donor_id == donor_id)
        else {
            return Ok(None);
        };

        let (Some(receiver), Some(donor)) =
            (tables.receiver(request.receiver_id), tables.donor(request.donor_id))
        else {
            return Ok(None);
        };

        Ok(Some(OwnedRequest {
            request: request.clone(),
            receiver_name: receiver.name.clone(),
            receiver_email: receiver.email.clone(),
            donor_name: donor.name.clone(),
        }))
    }

    async fn transition_request(
        &self,
        request_id: i64,
        from: RequestStatus,
        to: RequestStatus,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        match tables
            .requests
            .iter_mut()
            .find(|r| r.id == request_id && r.status == from)
        {
            Some(request) => {
                request.status = to;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn donor_inbox(&self, donor_id: i64) -> Result<Vec<DonorInboxEntry>, StoreError> {
        let tables = self.tables.lock().await;
        let mut requests: Vec<DonationRequest> = tables
            .requests
            .iter()
            .filter(|r| r.donor_id == donor_id)
            .cloned()
            .collect();
        newest_first(&mut requests);

        Ok(requests
            .into_iter()
            .filter_map(|r| {
                tables.receiver(r.receiver_id).map(|rec| DonorInboxEntry {
                    id: r.id,
                    status: r.status,
                    receiver_name: rec.name.clone(),
                    receiver_contact: rec.contact.clone(),
                    receiver_email: rec.email.clone(),
                    hospital_name: rec.hospital_name.clone(),
                    created_at: r.created_at,
                })
            })
            .collect())
    }

    async fn sent_requests(&self, receiver_id: i64) -> Result<Vec<SentRequest>, StoreError> {
        let tables = self.tables.lock().await;
        let mut requests: Vec<DonationRequest> = tables
            .requests
            .iter()
            .filter(|r| r.receiver_id == receiver_id)
            .cloned()
            .collect();
        newest_first(&mut requests);

        Ok(requests
            .into_iter()
            .filter_map(|r| {
                tables.donor(r.donor_id).map(|d| SentRequest {
                    id: r.id,
                    status: r.status,
                    donor_id: d.id,
                    donor_name: d.name.clone(),
                    donor_email: d.email.clone(),
                    donor_contact: d.contact.clone(),
                    donor_blood_group: d.blood_group.clone(),
                    created_at: r.created_at,
                })
            })
            .collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
