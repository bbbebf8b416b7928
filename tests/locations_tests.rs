// tests/locations_tests.rs
// Destination registry: validation, id allocation, commit and reload.

#[cfg(test)]
mod tests {
    use robot_console::core::geometry::Pose2D;
    use robot_console::core::locations::{Destination, LocationRegistry, ValidationError};
    use rstest::rstest;

    fn here() -> Pose2D {
        Pose2D::new(1.5, -2.0, 0.25)
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_names_are_rejected(#[case] name: &str) {
        let mut registry = LocationRegistry::new();
        assert_eq!(registry.add(name, here()).unwrap_err(), ValidationError::EmptyName);
        assert_eq!(registry.editing_len(), 0);
        assert_eq!(registry.next_id(), 0);
    }

    #[test]
    fn duplicate_name_keeps_one_entry() {
        let mut registry = LocationRegistry::new();
        registry.add("Dock", here()).unwrap();
        let err = registry.add("Dock", Pose2D::new(9.0, 9.0, 0.0)).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateName("Dock".to_string()));
        assert_eq!(err.to_string(), "That name is already in use.");
        assert_eq!(registry.editing_len(), 1);
        assert_eq!(registry.editing("Dock").unwrap().x, 1.5);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut registry = LocationRegistry::new();
        assert_eq!(registry.add("A", here()).unwrap().id, 0);
        assert_eq!(registry.add("B", here()).unwrap().id, 1);
        assert!(registry.remove("B"));
        assert!(!registry.remove("B"));
        assert_eq!(registry.add("B", here()).unwrap().id, 2);
        assert_eq!(registry.next_id(), 3);
    }

    #[test]
    fn reopening_the_editor_discards_edits() {
        let mut registry = LocationRegistry::new();
        registry.add("Lab", here()).unwrap();
        registry.commit();
        registry.add("Office", here()).unwrap();
        registry.remove("Lab");

        registry.open_editor();
        assert!(registry.editing("Lab").is_some());
        assert!(registry.editing("Office").is_none());
        // the id handed to the discarded entry stays burnt
        assert_eq!(registry.next_id(), 2);
    }

    #[test]
    fn kitchen_survives_commit_and_reload() {
        let mut registry = LocationRegistry::new();
        registry.load_next_id(3);
        let kitchen = registry.add("Kitchen", Pose2D::new(4.0, 2.0, 1.0)).unwrap().clone();
        assert_eq!(kitchen.id, 3);

        let snapshot = registry.commit();
        assert_eq!(snapshot.next_id, 4);
        assert_eq!(snapshot.locations, vec![kitchen.clone()]);
        assert_eq!(registry.saved("Kitchen"), Some(&kitchen));

        // what the parameter store hands back on the next session
        let stored = serde_json::to_value(&snapshot.locations).unwrap();
        let mut next_session = LocationRegistry::new();
        next_session.load_next_id(snapshot.next_id);
        next_session.load_saved(serde_json::from_value(stored).unwrap());
        assert_eq!(next_session.saved("Kitchen"), Some(&kitchen));
        assert_eq!(next_session.next_id(), 4);
    }

    #[test]
    fn loading_never_moves_the_counter_back() {
        let mut registry = LocationRegistry::new();
        registry.load_saved(vec![Destination {
            id: 7,
            name: "Hall".to_string(),
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }]);
        registry.load_next_id(2);
        assert_eq!(registry.next_id(), 8);
    }

    #[test]
    fn huge_loaded_id_saturates_the_counter() {
        let mut registry = LocationRegistry::new();
        registry.load_saved(vec![Destination {
            id: u64::MAX,
            name: "Far".to_string(),
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }]);
        assert_eq!(registry.next_id(), u64::MAX);
        assert!(registry.saved("Far").is_some());
    }

    #[test]
    fn later_duplicates_win_on_load() {
        let entry = |id, x| Destination {
            id,
            name: "Hall".to_string(),
            x,
            y: 0.0,
            theta: 0.0,
        };
        let mut registry = LocationRegistry::new();
        registry.load_saved(vec![entry(0, 1.0), entry(1, 2.0)]);
        assert_eq!(registry.saved_len(), 1);
        assert_eq!(registry.saved("Hall").unwrap().x, 2.0);
    }

    #[test]
    fn lists_follow_creation_order() {
        let mut registry = LocationRegistry::new();
        for name in ["Zulu", "Alpha", "Mike"] {
            registry.add(name, here()).unwrap();
        }
        let names: Vec<&str> = registry.editing_list().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Zulu", "Alpha", "Mike"]);
    }
}
