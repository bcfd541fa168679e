//! Bloodlink - donor, receiver and hospital matching for blood donation requests
//!
//! Receivers and hospitals browse donors ranked by great-circle distance;
//! receivers send requests that the addressed donor accepts or rejects.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{haversine_distance, rank_by_distance, RankedMatch, RequestAction};
pub use error::AppError;
pub use models::{DonationRequest, Donor, GeoPoint, Hospital, Receiver, RequestStatus, Role};
pub use routes::AppState;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert!(haversine_distance(0.0, 0.0, 0.0, 1.0) > 111.0);
        assert!(rank_by_distance::<Donor>(origin, vec![]).is_empty());
    }
}
