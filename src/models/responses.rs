use serde::{Deserialize, Serialize};
use crate::core::ranker::RankedMatch;
use crate::models::domain::{
    DonationRequest, Donor, DonorInboxEntry, DonorSummary, Hospital, Receiver, Role, SentRequest,
};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Issued after a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_type: Role,
    pub user_id: i64,
    pub name: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredResponse {
    pub id: i64,
    pub user_type: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorDashboard {
    pub donor: Donor,
    pub requests: Vec<DonorInboxEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiverDashboard {
    pub receiver: Receiver,
    /// Donors not yet asked by this receiver, closest first
    pub donors: Vec<RankedMatch<Donor>>,
    pub sent_requests: Vec<SentRequest>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalDashboard {
    pub hospital: Hospital,
    pub donors: Vec<RankedMatch<DonorSummary>>,
}

/// Returned after creating or transitioning a request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponse {
    pub request: DonationRequest,
}
