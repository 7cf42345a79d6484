//! Synthetic count history
//!
//! History series are illustrative: they are drawn around a base level that
//! depends on the facility's current compliance status. The random stream is
//! seeded from the facility id and the current time bucket, so repeated reads
//! within the same bucket return the same series.

use crate::facility::Facility;
use crate::types::ComplianceStatus;
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Base level as a fraction of capacity for a violating facility
pub const VIOLATING_BASE_FACTOR: f64 = 1.1;
/// Base level as a fraction of capacity for a compliant facility
pub const COMPLIANT_BASE_FACTOR: f64 = 0.7;
/// Relative spread applied around the base level
pub const HISTORY_VARIANCE: f64 = 0.1;

/// One point of a count history series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountHistoryPoint {
    /// Time of the point
    pub timestamp: DateTime<Utc>,
    /// Vehicle count at that time
    pub vehicle_count: u32,
}

/// Synthesize a chronological history series ending at `now`
pub fn synthesize_history(
    facility: &Facility,
    status: ComplianceStatus,
    now: DateTime<Utc>,
    points: usize,
    step_minutes: i64,
) -> Vec<CountHistoryPoint> {
    let step_minutes = step_minutes.max(1);
    let mut rng = StdRng::seed_from_u64(history_seed(facility, now, step_minutes));

    let factor = if status.is_violating() { VIOLATING_BASE_FACTOR } else { COMPLIANT_BASE_FACTOR };
    let base = facility.capacity as f64 * factor;

    (0..points)
        .rev()
        .map(|steps_back| {
            let spread = rng.gen_range(-HISTORY_VARIANCE..=HISTORY_VARIANCE);
            let count = (base * (1.0 + spread)).round().max(0.0) as u32;
            CountHistoryPoint {
                timestamp: now - Duration::minutes(step_minutes * steps_back as i64),
                vehicle_count: count,
            }
        })
        .collect()
}

fn history_seed(facility: &Facility, now: DateTime<Utc>, step_minutes: i64) -> u64 {
    let bucket = now.timestamp().div_euclid(step_minutes * 60);
    let mut hasher = DefaultHasher::new();
    facility.id.hash(&mut hasher);
    bucket.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn facility() -> Facility {
        Facility::new("Rajouri Garden", "West Parking", 200, 30.0)
    }

    #[test]
    fn test_history_is_chronological_and_sized() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 15, 20, 0).unwrap();
        let history = synthesize_history(&facility(), ComplianceStatus::Compliant, now, 25, 60);

        assert_eq!(history.len(), 25);
        assert_eq!(history.last().unwrap().timestamp, now);
        assert_eq!(history[0].timestamp, now - Duration::hours(24));
        assert!(history.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_history_levels_follow_status() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 15, 20, 0).unwrap();
        let facility = facility();

        for point in synthesize_history(&facility, ComplianceStatus::Compliant, now, 25, 60) {
            // 140 ± 10%
            assert!((126..=154).contains(&point.vehicle_count), "{}", point.vehicle_count);
        }
        for point in synthesize_history(&facility, ComplianceStatus::Violating, now, 25, 60) {
            // 220 ± 10%
            assert!((198..=242).contains(&point.vehicle_count), "{}", point.vehicle_count);
        }
    }

    #[test]
    fn test_history_stable_within_bucket() {
        let facility = facility();
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 15, 5, 0).unwrap();
        let later = now + Duration::minutes(30);

        let a = synthesize_history(&facility, ComplianceStatus::Compliant, now, 10, 60);
        let b = synthesize_history(&facility, ComplianceStatus::Compliant, later, 10, 60);
        let counts_a: Vec<u32> = a.iter().map(|p| p.vehicle_count).collect();
        let counts_b: Vec<u32> = b.iter().map(|p| p.vehicle_count).collect();
        assert_eq!(counts_a, counts_b);
    }

    #[test]
    fn test_empty_history() {
        assert!(synthesize_history(&facility(), ComplianceStatus::Compliant, Utc::now(), 0, 60).is_empty());
    }
}
