use crate::classifier::rules::{RuleSet, ShotFallback};
use crate::classifier::tokenizer::PlayString;
use crate::types::{ShotLevel, ShotType};

/// Shot-type decision plus whether the row should be looked at by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotTypeMatch {
    pub shot_type: Option<ShotType>,
    /// Set when no shot rule matched and nothing in the possession explains
    /// the missing shot.
    pub needs_review: bool,
}

/// Priority scan over the whole possession, not per segment.
pub fn classify_shot_type(play: &PlayString<'_>, rules: &RuleSet) -> ShotTypeMatch {
    if let Some(rule) = rules
        .shot_types
        .iter()
        .find(|rule| rule.matcher.matches(|marker| play.contains(marker)))
    {
        return ShotTypeMatch {
            shot_type: Some(rule.shot_type),
            needs_review: false,
        };
    }

    let explained = rules.no_shot_markers.iter().any(|m| play.contains(m));
    let shot_type = match rules.shot_fallback {
        ShotFallback::CatchAll => Some(ShotType::NotApplicable),
        ShotFallback::Strict if explained => Some(ShotType::NotApplicable),
        ShotFallback::Strict => None,
    };
    ShotTypeMatch {
        shot_type,
        needs_review: !explained,
    }
}

/// Distance tier from the range tags; no tag means at the rim.
pub fn classify_shot_level(play: &PlayString<'_>, rules: &RuleSet) -> ShotLevel {
    rules
        .shot_levels
        .iter()
        .find(|rule| play.contains(rule.marker))
        .map_or(ShotLevel::Rim, |rule| rule.level)
}
