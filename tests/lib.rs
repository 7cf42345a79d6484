// Integration tests test your crate's public API. They only have access to items
// in your crate that are marked pub. See the Cargo Targets page of the Cargo Book
// for more information.
//
//   https://doc.rust-lang.org/cargo/reference/cargo-targets.html#integration-tests
//

use parking_compliance_monitor::*;

mod simulation_lifecycle_tests;

#[test]
fn test_core_id_types() {
    let facility_id = FacilityId::new();
    let violation_id = ViolationId::new();
    let evidence_id = EvidenceId::new();

    assert_ne!(facility_id, FacilityId::new());
    assert_ne!(violation_id, ViolationId::new());

    assert!(facility_id.to_string().starts_with("LOT_"));
    assert!(violation_id.to_string().starts_with("VIO_"));
    assert!(evidence_id.to_string().starts_with("EVD_"));
}

#[test]
fn test_id_json_output_has_prefixes() {
    let violation_id = ViolationId::new();
    let json = serde_json::to_string(&violation_id).unwrap();
    assert!(json.contains("VIO_"));

    let back: ViolationId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, violation_id);
}

#[test]
fn test_enum_display_values() {
    assert_eq!(ViolationStatus::Active.to_string(), "active");
    assert_eq!(ViolationStatus::Resolved.to_string(), "resolved");
    assert_eq!(ComplianceStatus::Violating.to_string(), "violating");
    assert_eq!(SimulationScenario::RushHour.to_string(), "rush_hour");
}

#[test]
fn test_lot_status_serializes_flat() {
    let facility = Facility::new("Flat Lot", "Op", 100, 10.0);
    let status = projection::project(
        &facility,
        120,
        &ViolationLedger::new(),
        chrono::Utc::now(),
        &ProjectionOptions { history_points: 3, history_step_minutes: 60 },
    );

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["name"], "Flat Lot");
    assert_eq!(json["capacity"], 100);
    assert_eq!(json["status"], "violating");
    assert_eq!(json["count_history"].as_array().unwrap().len(), 3);
}
