#[cfg(test)]
mod tests {
    use crate::condition::*;

    fn types(set: &Conditions) -> Vec<&str> {
        set.iter().map(|c| c.condition_type.as_str()).collect()
    }

    #[test]
    fn test_set_condition_initializes_empty_set() {
        let mut set = Conditions::new();
        assert!(set.find_condition("Ready").is_none());

        let before = chrono::Utc::now();
        set.set_condition(Condition::new("Ready", STATUS_TRUE));

        assert_eq!(set.len(), 1);
        let (index, stored) = set.find_condition("Ready").unwrap();
        assert_eq!(index, 0);
        assert!(stored.last_transition_time >= before);
    }

    #[test]
    fn test_set_identical_condition_keeps_transition_time() {
        let mut set = Conditions::new();
        set.set_condition(
            Condition::new("HookRunning", STATUS_TRUE)
                .with_reason("JobRunning")
                .with_message("waiting"),
        );
        let first = set.find_condition("HookRunning").unwrap().1.last_transition_time;

        set.set_condition(
            Condition::new("HookRunning", STATUS_TRUE)
                .with_reason("JobRunning")
                .with_message("waiting"),
        );

        assert_eq!(set.len(), 1);
        assert_eq!(
            set.find_condition("HookRunning").unwrap().1.last_transition_time,
            first
        );
    }

    #[test]
    fn test_any_changed_field_advances_transition_time() {
        let variants = [
            Condition::new("Ready", STATUS_FALSE),
            Condition::new("Ready", STATUS_TRUE).with_reason("Other"),
            Condition::new("Ready", STATUS_TRUE).with_message("changed"),
        ];

        for changed in variants {
            let mut set = Conditions::new();
            set.set_condition(Condition::new("Ready", STATUS_TRUE));
            let before = set.find_condition("Ready").unwrap().1.last_transition_time;

            set.set_condition(changed.clone());

            let (_, stored) = set.find_condition("Ready").unwrap();
            assert!(stored.last_transition_time > before);
            assert!(stored.same_state(&changed));
        }
    }

    #[test]
    fn test_update_keeps_position() {
        let mut set = Conditions::new();
        set.set_condition(Condition::new("A", STATUS_TRUE));
        set.set_condition(Condition::new("B", STATUS_TRUE));
        set.set_condition(Condition::new("C", STATUS_TRUE));

        set.set_condition(Condition::new("A", STATUS_FALSE));

        assert_eq!(types(&set), vec!["A", "B", "C"]);
        assert_eq!(set.find_condition("A").unwrap().1.status, STATUS_FALSE);
    }

    #[test]
    fn test_delete_condition_preserves_order() {
        let mut set = Conditions::new();
        for t in ["A", "B", "C", "D", "E"] {
            set.set_condition(Condition::new(t, STATUS_TRUE));
        }

        set.delete_condition(&["B", "D"]);

        assert_eq!(types(&set), vec!["A", "C", "E"]);
    }

    #[test]
    fn test_delete_condition_missing_types_is_noop() {
        let mut empty = Conditions::new();
        empty.delete_condition(&["A"]);
        assert!(empty.is_empty());

        let mut set = Conditions::new();
        set.set_condition(Condition::new("A", STATUS_TRUE));
        set.delete_condition(&["Z", "Y"]);
        assert_eq!(types(&set), vec!["A"]);
    }

    #[test]
    fn test_conditions_serialization() {
        let mut set = Conditions::new();
        set.set_condition(Condition::new("Ready", STATUS_TRUE).with_reason("Done"));

        let json = serde_json::to_value(&set).unwrap();
        let entry = &json["conditions"][0];
        assert_eq!(entry["type"], "Ready");
        assert_eq!(entry["reason"], "Done");
        assert!(entry.get("message").is_none());
        assert!(entry.get("lastTransitionTime").is_some());

        let back: Conditions = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);

        let missing: Conditions = serde_json::from_str("{}").unwrap();
        assert!(missing.is_empty());
    }
}
