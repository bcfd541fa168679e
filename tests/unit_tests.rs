// Unit tests for Bloodlink

use bloodlink::core::{
    distance::{haversine_distance, round_km, EARTH_RADIUS_KM},
    exclude_ids, hash_password, rank_by_distance, verify_password, LifecycleError, RequestAction,
};
use bloodlink::models::{DonorSummary, GeoPoint, RequestStatus};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashSet;

fn summary(id: i64, lat: f64, lon: f64) -> DonorSummary {
    DonorSummary {
        id,
        name: format!("Donor {}", id),
        blood_group: "B+".to_string(),
        age: 30,
        contact: "555-0100".to_string(),
        location: GeoPoint::new(lat, lon),
    }
}

fn random_point(rng: &mut StdRng) -> (f64, f64) {
    (rng.gen_range(-90.0..=90.0), rng.gen_range(-180.0..=180.0))
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(12.9716, 77.5946, 12.9716, 77.5946);
    assert!(distance < 0.01);
}

#[test]
fn test_haversine_distance_bangalore_to_chennai() {
    // Roughly 290 km as the crow flies
    let distance = haversine_distance(12.9716, 77.5946, 13.0827, 80.2707);
    assert!(distance > 280.0 && distance < 300.0, "got {}", distance);
}

#[test]
fn test_one_degree_along_equator() {
    assert_eq!(round_km(haversine_distance(0.0, 0.0, 0.0, 1.0)), 111.19);
}

#[test]
fn test_distance_properties_on_random_points() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..1_000 {
        let (lat1, lon1) = random_point(&mut rng);
        let (lat2, lon2) = random_point(&mut rng);

        let forward = haversine_distance(lat1, lon1, lat2, lon2);
        let backward = haversine_distance(lat2, lon2, lat1, lon1);

        assert!(forward >= 0.0);
        assert!(forward <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        assert!((forward - backward).abs() < 1e-9);
        assert!(haversine_distance(lat1, lon1, lat1, lon1) < 1e-9);
    }
}

#[test]
fn test_ranking_is_non_decreasing() {
    let mut rng = StdRng::seed_from_u64(42);
    let donors: Vec<DonorSummary> = (0..500)
        .map(|id| {
            let (lat, lon) = random_point(&mut rng);
            summary(id, lat, lon)
        })
        .collect();

    let ranked = rank_by_distance(GeoPoint::new(12.97, 77.59), donors);

    assert_eq!(ranked.len(), 500);
    assert!(ranked
        .windows(2)
        .all(|pair| pair[0].distance_km <= pair[1].distance_km));
}

#[test]
fn test_ranking_rounds_to_two_decimals() {
    let ranked = rank_by_distance(
        GeoPoint::new(0.0, 0.0),
        vec![summary(1, 0.0, 1.0), summary(2, 0.0, 0.5)],
    );

    assert_eq!(ranked[0].candidate.id, 2);
    assert_eq!(ranked[1].distance_km, 111.19);
    for entry in &ranked {
        assert_eq!(entry.distance_km, (entry.distance_km * 100.0).round() / 100.0);
    }
}

#[test]
fn test_exclusion_before_ranking() {
    let donors = vec![
        summary(1, 0.0, 0.1),
        summary(2, 0.0, 0.2),
        summary(3, 0.0, 0.3),
    ];
    let asked: HashSet<i64> = [1].into_iter().collect();

    let ranked = rank_by_distance(GeoPoint::new(0.0, 0.0), exclude_ids(donors, &asked));
    let ids: Vec<i64> = ranked.iter().map(|m| m.candidate.id).collect();

    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn test_ranked_summary_serializes_distance() {
    let ranked = rank_by_distance(GeoPoint::new(0.0, 0.0), vec![summary(9, 0.0, 1.0)]);
    let json = serde_json::to_value(&ranked[0]).unwrap();

    assert_eq!(json["id"], 9);
    assert_eq!(json["bloodGroup"], "B+");
    assert_eq!(json["distance"], 111.19);
    assert!(json.get("location").is_none());
}

#[test]
fn test_request_lifecycle() {
    assert_eq!(
        RequestStatus::Pending.apply(RequestAction::Accept),
        Ok(RequestStatus::Accepted)
    );
    assert_eq!(
        RequestStatus::Pending.apply(RequestAction::Reject),
        Ok(RequestStatus::Rejected)
    );
    assert_eq!(
        RequestStatus::Rejected.apply(RequestAction::Accept),
        Err(LifecycleError::AlreadyResolved(RequestStatus::Rejected))
    );
    assert!(RequestStatus::Accepted.is_terminal());
    assert!(!RequestStatus::Pending.is_terminal());
}

#[test]
fn test_password_digest() {
    let stored = hash_password("s3cret!");

    assert_eq!(stored.len(), 64);
    assert!(verify_password("s3cret!", &stored));
    assert!(!verify_password("s3cret", &stored));
}

#[test]
fn test_memory_store_starts_empty() {
    use bloodlink::services::{MemoryStore, Store};

    let store = MemoryStore::new();

    tokio_test::block_on(async {
        assert!(store.health_check().await.unwrap());
        assert!(store.list_donors().await.unwrap().is_empty());
        assert!(store.get_receiver(1).await.unwrap().is_none());
    });
}
