// Core algorithm exports
pub mod distance;
pub mod lifecycle;
pub mod password;
pub mod ranker;

pub use distance::{haversine_distance, round_km, EARTH_RADIUS_KM};
pub use lifecycle::{LifecycleError, RequestAction};
pub use password::{hash_password, verify_password};
pub use ranker::{exclude_ids, rank_by_distance, Candidate, RankedMatch};
