use crate::classifier::rules::{RuleSet, OFFENSIVE_REBOUND};
use crate::types::RawPlayRow;

/// Why a row never reaches the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Result label is in the rule set's non-scoring list.
    NonScoringResult,
    /// Legacy rule set only: the possession includes an offensive rebound.
    OffensiveRebound,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::NonScoringResult => write!(f, "non_scoring_result"),
            Rejection::OffensiveRebound => write!(f, "offensive_rebound"),
        }
    }
}

/// Decide whether a raw row is in scope. Pure; no logging.
pub fn admit(row: &RawPlayRow, rules: &RuleSet) -> Result<(), Rejection> {
    if rules.rejected_results.iter().any(|r| *r == row.result) {
        return Err(Rejection::NonScoringResult);
    }
    if rules.reject_offensive_rebounds && row.play_string.contains(OFFENSIVE_REBOUND) {
        return Err(Rejection::OffensiveRebound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(result: &str, play_string: &str) -> RawPlayRow {
        RawPlayRow {
            game: "Bar@RIT".to_string(),
            team: "Bard College".to_string(),
            result: result.to_string(),
            play_string: play_string.to_string(),
            date: "1/12/2024".to_string(),
            sequence_number: Some(1),
            tags: None,
        }
    }

    #[test]
    fn non_scoring_results_rejected() {
        let rules = RuleSet::CURRENT_2024;
        for result in [
            "No Violation",
            "Free Throw",
            "Run Offense",
            "Non Shooting Foul",
            "Kicked Ball",
            "Shot Clock Violation",
            "8 Sec Violation",
            "8-Second Violation",
            "Out of Bound 5 Sec Violation",
            "Out-of-Bounds 5-Second Violation",
        ] {
            assert_eq!(
                admit(&row(result, "5 Smith > ISO"), &rules),
                Err(Rejection::NonScoringResult),
                "{result}"
            );
        }
    }

    #[test]
    fn scoring_results_admitted() {
        let rules = RuleSet::CURRENT_2024;
        assert!(admit(&row("Make 2 Pts", "5 Smith > ISO > Left"), &rules).is_ok());
        assert!(admit(&row("Turnover", "5 Smith > ISO > Turnover"), &rules).is_ok());
        // Unknown labels are not the filter's concern.
        assert!(admit(&row("Jump Ball", "5 Smith > ISO"), &rules).is_ok());
    }

    #[test]
    fn offensive_rebound_rule_is_version_dependent() {
        let r = row("Make 2 Pts", "5 Smith > Offensive Rebound > Short > Scoring Attempt");
        assert_eq!(admit(&r, &RuleSet::LEGACY_2023), Err(Rejection::OffensiveRebound));
        assert_eq!(admit(&r, &RuleSet::CURRENT_2024), Ok(()));
    }

    #[test]
    fn legacy_admits_shot_clock_violations() {
        let r = row("Shot Clock Violation", "5 Smith > ISO");
        assert!(admit(&r, &RuleSet::LEGACY_2023).is_ok());
    }
}
