use crate::classifier::rules::RuleSet;
use crate::types::Outcome;

/// Canonical outcome for a raw result label. Labels outside the table map to
/// None, never to an error.
pub fn map_outcome(label: &str, rules: &RuleSet) -> Option<Outcome> {
    rules
        .outcomes
        .iter()
        .find(|(raw, _)| *raw == label)
        .map(|(_, outcome)| *outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_labels_all_map() {
        let rules = RuleSet::CURRENT_2024;
        let cases = [
            ("Foul", Outcome::Foul),
            ("Make 2 Pts", Outcome::TwoPointMake),
            ("Make 3 Pts", Outcome::ThreePointMake),
            ("Miss 2 Pts", Outcome::TwoPointMiss),
            ("Miss 3 Pts", Outcome::ThreePointMiss),
            ("Turnover", Outcome::Turnover),
            ("1 Pts", Outcome::And1),
            ("0 Pts", Outcome::And1),
        ];
        for (label, expected) in cases {
            assert_eq!(map_outcome(label, &rules), Some(expected), "label {label}");
        }
        assert_eq!(map_outcome("Make 2 Pts", &rules).unwrap().as_str(), "2pMa");
    }

    #[test]
    fn unknown_label_is_none() {
        assert_eq!(map_outcome("Jump Ball", &RuleSet::CURRENT_2024), None);
        assert_eq!(map_outcome("make 2 pts", &RuleSet::CURRENT_2024), None);
    }

    #[test]
    fn legacy_table_has_no_zero_point_and_one() {
        assert_eq!(map_outcome("0 Pts", &RuleSet::LEGACY_2023), None);
        assert_eq!(map_outcome("1 Pts", &RuleSet::LEGACY_2023), Some(Outcome::And1));
    }
}
