use crate::classifier::rules::{PlayTypeRules, RuleSet};
use crate::classifier::tokenizer::Segment;
use crate::types::PlaySegment;

/// First play type, in router order, with a marker present in the segment.
pub fn route(segment: &Segment<'_>, rules: &RuleSet) -> Option<&'static PlayTypeRules> {
    rules
        .play_types
        .iter()
        .find(|table| table.markers.iter().any(|m| segment.contains(m)))
}

/// Route the segment, then run that play type's direction/action tables.
/// Routing matches whole tokens; direction and action tags match anywhere in
/// the segment text.
pub fn classify_segment(segment: &Segment<'_>, rules: &RuleSet) -> PlaySegment {
    let Some(table) = route(segment, rules) else {
        return PlaySegment::UNCLASSIFIED;
    };

    let direction_rule = table.directions.iter().find(|r| segment.mentions(r.marker));
    let action = table
        .actions
        .iter()
        .find(|r| segment.mentions(r.marker))
        .map(|r| r.action)
        .or_else(|| direction_rule.and_then(|r| r.implies));

    PlaySegment {
        play_type: Some(table.play_type),
        direction: direction_rule.map(|r| r.direction),
        action,
    }
}
