//! Tamper-evident evidence records
//!
//! Evidence attached to a violation carries a SHA-256 digest over its own
//! contents so that later readers can detect modification.

use crate::types::EvidenceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Where and how a piece of evidence was captured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceMetadata {
    /// Camera that captured the frame
    pub camera_id: String,
    /// Section of the lot covered by the camera
    pub lot_section: String,
    /// Optional location of the stored image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
}

impl EvidenceMetadata {
    /// Create metadata for a camera and lot section
    pub fn new(camera_id: impl Into<String>, lot_section: impl Into<String>) -> Self {
        Self { camera_id: camera_id.into(), lot_section: lot_section.into(), image_uri: None }
    }

    /// Attach an image location
    pub fn with_image_uri(mut self, uri: impl Into<String>) -> Self {
        self.image_uri = Some(uri.into());
        self
    }
}

/// A single evidence capture attached to a violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// Unique identifier for the evidence
    pub id: EvidenceId,
    /// When the evidence was captured
    pub captured_at: DateTime<Utc>,
    /// Hex-encoded SHA-256 digest of the capture
    pub integrity_hash: String,
    /// Vehicle count visible in the capture
    pub vehicle_count: u32,
    /// Capture metadata
    pub metadata: EvidenceMetadata,
}

impl Evidence {
    /// Capture new evidence, computing its integrity hash
    pub fn capture(captured_at: DateTime<Utc>, vehicle_count: u32, metadata: EvidenceMetadata) -> Self {
        Self::with_id(EvidenceId::new(), captured_at, vehicle_count, metadata)
    }

    /// Capture evidence under a known identifier
    pub fn with_id(
        id: EvidenceId,
        captured_at: DateTime<Utc>,
        vehicle_count: u32,
        metadata: EvidenceMetadata,
    ) -> Self {
        let integrity_hash = compute_integrity_hash(id, captured_at, vehicle_count, &metadata);
        Self { id, captured_at, integrity_hash, vehicle_count, metadata }
    }

    /// Recompute the digest and compare it with the stored one
    pub fn verify_integrity(&self) -> bool {
        compute_integrity_hash(self.id, self.captured_at, self.vehicle_count, &self.metadata)
            == self.integrity_hash
    }
}

fn compute_integrity_hash(
    id: EvidenceId,
    captured_at: DateTime<Utc>,
    vehicle_count: u32,
    metadata: &EvidenceMetadata,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(id.to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(captured_at.to_rfc3339().as_bytes());
    hasher.update(b"|");
    hasher.update(vehicle_count.to_le_bytes());
    hasher.update(b"|");
    hasher.update(metadata.camera_id.as_bytes());
    hasher.update(b"|");
    hasher.update(metadata.lot_section.as_bytes());
    if let Some(uri) = &metadata.image_uri {
        hasher.update(b"|");
        hasher.update(uri.as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Evidence {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        Evidence::capture(at, 118, EvidenceMetadata::new("CAM-07", "North Wing"))
    }

    #[test]
    fn test_capture_produces_hex_digest() {
        let evidence = sample();
        assert_eq!(evidence.integrity_hash.len(), 64);
        assert!(evidence.integrity_hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(evidence.verify_integrity());
    }

    #[test]
    fn test_tampering_is_detected() {
        let mut evidence = sample();
        evidence.vehicle_count = 90;
        assert!(!evidence.verify_integrity());

        let mut evidence = sample();
        evidence.metadata.camera_id = "CAM-08".to_string();
        assert!(!evidence.verify_integrity());
    }

    #[test]
    fn test_same_inputs_same_digest() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let id = EvidenceId::new();
        let meta = EvidenceMetadata::new("CAM-01", "Gate").with_image_uri("s3://bucket/frame.jpg");
        let a = Evidence::with_id(id, at, 10, meta.clone());
        let b = Evidence::with_id(id, at, 10, meta);
        assert_eq!(a.integrity_hash, b.integrity_hash);
    }

    #[test]
    fn test_serialization_keeps_digest_valid() {
        let evidence = sample();
        let json = serde_json::to_string(&evidence).unwrap();
        let back: Evidence = serde_json::from_str(&json).unwrap();
        assert!(back.verify_integrity());
    }
}
