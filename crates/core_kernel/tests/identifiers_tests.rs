//! Tests for the strongly-typed identifiers

use core_kernel::{CaseId, PersonId, RoleId, UnitId};
use uuid::Uuid;

mod case_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = CaseId::new();
        let id2 = CaseId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_v7_is_time_ordered() {
        let id1 = CaseId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = CaseId::new_v7();
        assert!(id1.as_uuid() < id2.as_uuid());
    }

    #[test]
    fn test_prefix() {
        assert_eq!(CaseId::prefix(), "CASE");
    }

    #[test]
    fn test_display_includes_prefix() {
        let id = CaseId::new();
        assert!(id.to_string().starts_with("CASE-"));
    }

    #[test]
    fn test_round_trip_through_string() {
        let original = CaseId::new();
        let parsed: CaseId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_parses_bare_uuid() {
        let uuid = Uuid::new_v4();
        let parsed: CaseId = uuid.to_string().parse().unwrap();
        assert_eq!(parsed.as_uuid(), &uuid);
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = CaseId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
        let back: CaseId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}

mod org_id_tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert_eq!(UnitId::prefix(), "UNIT");
        assert_eq!(RoleId::prefix(), "ROLE");
        assert_eq!(PersonId::prefix(), "PRSN");
    }

    #[test]
    fn test_uuid_conversion_round_trip() {
        let uuid = Uuid::new_v4();
        let unit: UnitId = uuid.into();
        let back: Uuid = unit.into();
        assert_eq!(uuid, back);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("UNIT-not-a-uuid".parse::<UnitId>().is_err());
    }
}
