//! Play-string grammar.
//!
//! A play string is a `" > "`-delimited list of tags. The first tag of each
//! segment is the acting player, `<jersey> <name words...>`, and some
//! exports fold the first play tag onto it (`"5 Smith High P&R"`). A
//! `" > Ball Delivered > "` marker hands the possession from the primary to
//! the secondary segment.

use crate::config::{BALL_DELIVERED_MARKER, BALL_DELIVERED_TAG, NOT_APPLICABLE, TAG_DELIMITER};

/// Split on the tag delimiter. Empty input yields no tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(TAG_DELIMITER).collect()
}

/// Split at the first hand-off marker into `(primary, secondary)`. Repeated
/// hand-off tags at the start of the secondary part are dropped, so its lead
/// token is always a player.
pub fn split_segments(raw: &str) -> (&str, Option<&str>) {
    let Some((primary, mut secondary)) = raw.split_once(BALL_DELIVERED_MARKER) else {
        return (raw, None);
    };
    while let Some(rest) = secondary
        .strip_prefix(BALL_DELIVERED_TAG)
        .and_then(|r| r.strip_prefix(TAG_DELIMITER))
    {
        secondary = rest;
    }
    if secondary.is_empty() || secondary == BALL_DELIVERED_TAG {
        return (primary, None);
    }
    (primary, Some(secondary))
}

/// One player's part of a possession.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    /// The segment exactly as it appears in the play string.
    pub text: &'a str,
    /// Tokens in order; the first is the player token.
    pub tokens: Vec<&'a str>,
    /// Play tag folded onto the end of the player token, if any.
    pub inline_tag: Option<&'a str>,
}

impl<'a> Segment<'a> {
    /// `inline_markers` are the tags that may trail the player token.
    pub fn parse(text: &'a str, inline_markers: &[&str]) -> Self {
        let tokens = tokenize(text);
        let inline_tag = tokens.first().and_then(|lead| find_inline_tag(lead, inline_markers));
        Self {
            text,
            tokens,
            inline_tag,
        }
    }

    pub fn lead(&self) -> &'a str {
        self.tokens.first().copied().unwrap_or("")
    }

    /// Marker membership: a whole token, or the inline tag.
    pub fn contains(&self, marker: &str) -> bool {
        self.inline_tag == Some(marker) || self.tokens.iter().any(|t| *t == marker)
    }

    /// Substring test over the raw segment text. Direction and action tags
    /// match this way, so `Right` is found inside `Drives Right` and
    /// `Dribble` inside `Dribble Jumper`.
    pub fn mentions(&self, marker: &str) -> bool {
        self.text.contains(marker)
    }

    /// Display name of the acting player: the player token without its
    /// jersey word and without any inline tag.
    pub fn player(&self) -> String {
        let lead = self.lead();
        let name_part = match self.inline_tag {
            Some(tag) => lead[..lead.len() - tag.len()].trim_end(),
            None => lead,
        };
        name_part.split_whitespace().skip(1).collect::<Vec<_>>().join(" ")
    }
}

/// Longest marker that ends the player token after a space.
fn find_inline_tag<'a>(lead: &'a str, markers: &[&str]) -> Option<&'a str> {
    markers
        .iter()
        .filter(|m| {
            lead.len() > m.len()
                && lead.ends_with(**m)
                && lead[..lead.len() - m.len()].ends_with(' ')
        })
        .max_by_key(|m| m.len())
        .map(|m| &lead[lead.len() - m.len()..])
}

/// A whole play string: the full token sequence plus its segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayString<'a> {
    pub tokens: Vec<&'a str>,
    pub primary: Segment<'a>,
    pub secondary: Option<Segment<'a>>,
}

impl<'a> PlayString<'a> {
    pub fn parse(raw: &'a str, inline_markers: &[&str]) -> Self {
        let (primary, secondary) = split_segments(raw);
        Self {
            tokens: tokenize(raw),
            primary: Segment::parse(primary, inline_markers),
            secondary: secondary.map(|s| Segment::parse(s, inline_markers)),
        }
    }

    /// Membership over the whole possession, inline tags included.
    pub fn contains(&self, marker: &str) -> bool {
        self.tokens.iter().any(|t| *t == marker)
            || self.primary.inline_tag == Some(marker)
            || self
                .secondary
                .as_ref()
                .is_some_and(|s| s.inline_tag == Some(marker))
    }

    pub fn primary_player(&self) -> String {
        self.primary.player()
    }

    pub fn secondary_player(&self) -> String {
        self.secondary
            .as_ref()
            .map_or_else(|| NOT_APPLICABLE.to_string(), Segment::player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::rules::RuleSet;

    fn markers() -> Vec<&'static str> {
        RuleSet::CURRENT_2024.inline_markers()
    }

    #[test]
    fn tokenize_splits_on_delimiter_only() {
        assert_eq!(tokenize("5 Smith > ISO > Left"), vec!["5 Smith", "ISO", "Left"]);
        assert_eq!(tokenize("Short to < 17'"), vec!["Short to < 17'"]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn split_without_marker_is_single_segment() {
        assert_eq!(split_segments("12 Jones ISO > Left"), ("12 Jones ISO > Left", None));
    }

    #[test]
    fn split_with_marker_yields_two_segments() {
        let raw = "3 Lee P&R Roll Man > Rolls to Basket > Ball Delivered > 7 Park Cut > Basket";
        let (primary, secondary) = split_segments(raw);
        assert_eq!(primary, "3 Lee P&R Roll Man > Rolls to Basket");
        assert_eq!(secondary, Some("7 Park Cut > Basket"));

        let ps = PlayString::parse(raw, &markers());
        let second = ps.secondary.expect("secondary segment");
        assert_ne!(second.lead(), "Ball Delivered");
        assert_eq!(second.lead(), "7 Park Cut");
    }

    #[test]
    fn marker_needs_surrounding_delimiters() {
        // A trailing "Ball Delivered" with nothing after it is not a hand-off.
        let (_, secondary) = split_segments("5 Smith > P&R Ball Handler > Ball Delivered");
        assert!(secondary.is_none());
    }

    #[test]
    fn repeated_hand_off_tags_are_skipped() {
        let raw = "1 A > ISO > Ball Delivered > Ball Delivered > 2 B > Cut > Basket";
        assert_eq!(split_segments(raw), ("1 A > ISO", Some("2 B > Cut > Basket")));

        let ps = PlayString::parse(raw, &markers());
        let second = ps.secondary.as_ref().expect("secondary segment");
        assert_eq!(second.lead(), "2 B");
        assert_eq!(ps.secondary_player(), "B");
    }

    #[test]
    fn hand_off_with_no_receiver_has_no_secondary() {
        let (primary, secondary) = split_segments("1 A > ISO > Ball Delivered > Ball Delivered");
        assert_eq!(primary, "1 A > ISO");
        assert!(secondary.is_none());
    }

    #[test]
    fn mentions_is_a_substring_test() {
        let seg = Segment::parse("12 Jones > ISO > Left > Drives Right", &markers());
        assert!(seg.mentions("Right"));
        assert!(!seg.contains("Right"));
        assert!(seg.mentions("Jones > ISO"));
    }

    #[test]
    fn inline_tag_is_longest_trailing_marker() {
        let seg = Segment::parse("3 Lee P&R Roll Man > Drives Left", &markers());
        assert_eq!(seg.inline_tag, Some("P&R Roll Man"));
        assert!(seg.contains("P&R Roll Man"));
        assert!(seg.contains("Drives Left"));
        assert!(!seg.contains("Left"));
        assert_eq!(seg.player(), "Lee");
    }

    #[test]
    fn player_without_inline_tag_keeps_all_name_words() {
        let seg = Segment::parse("23 Mary Ann Smith > Spot-Up > No Dribble Jumper", &markers());
        assert_eq!(seg.inline_tag, None);
        assert_eq!(seg.player(), "Mary Ann Smith");
    }

    #[test]
    fn bare_marker_token_is_not_an_inline_tag() {
        let seg = Segment::parse("ISO > Left", &markers());
        assert_eq!(seg.inline_tag, None);
        assert!(seg.contains("ISO"));
        assert_eq!(seg.player(), "");
    }

    #[test]
    fn secondary_player_defaults_to_na() {
        let ps = PlayString::parse("12 Jones ISO > Left", &markers());
        assert_eq!(ps.primary_player(), "Jones");
        assert_eq!(ps.secondary_player(), "N/A");
    }

    #[test]
    fn whole_string_membership_sees_inline_tags() {
        let ps = PlayString::parse(
            "4 Kim > P&R Ball Handler > Ball Delivered > 9 Cole Cut > Basket",
            &markers(),
        );
        assert!(ps.contains("Cut"));
        assert!(ps.contains("P&R Ball Handler"));
        assert!(!ps.contains("Spot-Up"));
    }
}
