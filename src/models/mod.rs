// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Credentials, DonationRequest, Donor, DonorInboxEntry, DonorSummary, DonorUpdate, GeoPoint,
    Hospital, NewDonor, NewHospital, NewReceiver, OwnedRequest, Receiver, RequestStatus, Role,
    SentRequest, BLOOD_GROUPS,
};
pub use requests::{
    LoginRequest, RegisterDonorRequest, RegisterHospitalRequest, RegisterReceiverRequest,
    SendRequestPayload, UpdateDonorRequest,
};
pub use responses::{
    DonorDashboard, ErrorResponse, HealthResponse, HospitalDashboard, LoginResponse,
    MessageResponse, ReceiverDashboard, RegisteredResponse, RequestResponse,
};
