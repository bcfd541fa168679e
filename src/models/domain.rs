use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role, used both for login dispatch and for guarding handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Receiver,
    Hospital,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Donor => "donor",
            Role::Receiver => "receiver",
            Role::Hospital => "hospital",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "donor" => Ok(Role::Donor),
            "receiver" => Ok(Role::Receiver),
            "hospital" => Ok(Role::Hospital),
            other => Err(format!("unknown user type: {}", other)),
        }
    }
}

/// A position on the globe, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Great-circle distance to `other` in kilometers
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        crate::core::distance::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

/// Registered blood donor
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub contact: String,
    pub blood_group: String,
    pub age: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub last_donation_month: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Donor {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Person (or family member) looking for a donor
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Receiver {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub contact: String,
    pub hospital_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

impl Receiver {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: i64,
    /// Externally issued registration identifier, unique across hospitals
    pub hospital_id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub contact: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

impl Hospital {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Lifecycle state of a donation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl Default for RequestStatus {
    fn default() -> Self {
        RequestStatus::Pending
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request from a receiver to a donor
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    pub id: i64,
    pub donor_id: i64,
    pub receiver_id: i64,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// A request as seen from the donor's dashboard
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DonorInboxEntry {
    pub id: i64,
    pub status: RequestStatus,
    pub receiver_name: String,
    pub receiver_contact: String,
    pub receiver_email: String,
    pub hospital_name: String,
    pub created_at: DateTime<Utc>,
}

/// A request as seen from the receiver's dashboard
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SentRequest {
    pub id: i64,
    pub status: RequestStatus,
    pub donor_id: i64,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_contact: String,
    pub donor_blood_group: String,
    pub created_at: DateTime<Utc>,
}

/// A request loaded together with what the donor needs to act on it
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnedRequest {
    #[sqlx(flatten)]
    pub request: DonationRequest,
    pub receiver_name: String,
    pub receiver_email: String,
    pub donor_name: String,
}

/// Login lookup result
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Credentials {
    pub id: i64,
    pub name: String,
    pub password_hash: String,
}

/// Subset of donor fields shown to hospitals
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorSummary {
    pub id: i64,
    pub name: String,
    pub blood_group: String,
    pub age: i32,
    pub contact: String,
    #[serde(skip)]
    pub location: GeoPoint,
}

impl From<Donor> for DonorSummary {
    fn from(donor: Donor) -> Self {
        let location = donor.location();
        Self {
            id: donor.id,
            name: donor.name,
            blood_group: donor.blood_group,
            age: donor.age,
            contact: donor.contact,
            location,
        }
    }
}

/// Donor row to insert
#[derive(Debug, Clone)]
pub struct NewDonor {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub contact: String,
    pub blood_group: String,
    pub age: i32,
    pub location: GeoPoint,
    pub last_donation_month: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewReceiver {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub contact: String,
    pub hospital_name: String,
    pub location: GeoPoint,
}

#[derive(Debug, Clone)]
pub struct NewHospital {
    pub hospital_id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub contact: String,
    pub location: GeoPoint,
}

/// Fields a donor may change on their own profile
#[derive(Debug, Clone)]
pub struct DonorUpdate {
    pub blood_group: String,
    pub contact: String,
    pub age: i32,
    pub location: GeoPoint,
    pub last_donation_month: Option<String>,
}

/// Blood groups accepted at registration and profile update
pub const BLOOD_GROUPS: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];
