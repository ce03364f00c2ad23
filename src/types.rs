use serde::{Deserialize, Serialize, Serializer};

use crate::config::NOT_APPLICABLE;

/// Declares a closed label enum whose `Display` and serde form are the label
/// the downstream store and reports expect.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            #[cfg(test)]
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

/// Render an optional label, falling back to the "N/A" sentinel.
pub fn label_or_na<T: Copy>(value: Option<T>, as_str: fn(T) -> &'static str) -> &'static str {
    value.map_or(NOT_APPLICABLE, as_str)
}

// ---------------------------------------------------------------------------
// Raw input row
// ---------------------------------------------------------------------------

/// One logged possession event, as exported by the tagging service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawPlayRow {
    /// Two-team code, e.g. `Bar@RIT`.
    #[serde(rename = "Game")]
    pub game: String,
    /// Full name of the team with the ball.
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Result")]
    pub result: String,
    #[serde(rename = "Synergy String")]
    pub play_string: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "#", default, deserialize_with = "csv::invalid_option")]
    pub sequence_number: Option<u32>,
    /// Scoring tags (`FTM`, `2FGM`, `3FGM`, ...). Only read for the game score.
    #[serde(rename = "Synergy Tags", default)]
    pub tags: Option<String>,
}

// ---------------------------------------------------------------------------
// Game context
// ---------------------------------------------------------------------------

labelled_enum! {
    pub enum Site {
        Home => "Home",
        Away => "Away",
    }
}

labelled_enum! {
    /// Offense when the row's team is the configured home program.
    pub enum PossessionRole {
        Offense => "Offense",
        Defense => "Defense",
    }
}

// ---------------------------------------------------------------------------
// Outcome / shot classification
// ---------------------------------------------------------------------------

labelled_enum! {
    pub enum Outcome {
        Foul => "Foul",
        TwoPointMake => "2pMa",
        ThreePointMake => "3pMa",
        TwoPointMiss => "2pmi",
        ThreePointMiss => "3pmi",
        Turnover => "Turnover",
        /// Made basket plus a shooting foul, with or without the free throw.
        And1 => "And1",
    }
}

labelled_enum! {
    pub enum ShotType {
        NoDribbleJumper => "No Dribble Jumper",
        DribbleJumper => "Dribble Jumper",
        DropStep => "Drop Step",
        HookShot => "Hook Shot",
        ToBasket => "To Basket",
        /// Fouls, turnovers and violations: no shot was taken.
        NotApplicable => "N/A",
    }
}

/// Coarse shot-distance tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShotLevel {
    /// At or near the rim (no distance tag).
    Rim,
    /// `Short to < 17'`
    ShortMidRange,
    /// `Medium/17' to <3p`
    LongMidRange,
    /// `Long/3pt`
    ThreePoint,
}

impl ShotLevel {
    pub fn tier(self) -> u8 {
        match self {
            ShotLevel::Rim => 1,
            ShotLevel::ShortMidRange => 2,
            ShotLevel::LongMidRange => 3,
            ShotLevel::ThreePoint => 4,
        }
    }

    pub fn is_mid_range(self) -> bool {
        matches!(self, ShotLevel::ShortMidRange | ShotLevel::LongMidRange)
    }
}

impl std::fmt::Display for ShotLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tier())
    }
}

impl Serialize for ShotLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.tier())
    }
}

// ---------------------------------------------------------------------------
// Play taxonomy
// ---------------------------------------------------------------------------

labelled_enum! {
    pub enum PlayType {
        Iso => "Iso",
        SpotUp => "Spot Ups",
        HandOff => "Hand Offs",
        OffScreen => "Off Screens",
        Cut => "Cuts",
        PostUp => "Post",
        Transition => "Transition",
        PnrRollMan => "P&R Roll Man",
        PnrBallHandler => "PNR",
        Misc => "Misc",
    }
}

labelled_enum! {
    pub enum Direction {
        Top => "Top",
        Right => "Right",
        Left => "Left",
        Straight => "Straight",
        High => "High",
        Middle => "Middle",
    }
}

labelled_enum! {
    pub enum Action {
        // Cuts
        Basket => "Basket",
        Screen => "Screen",
        Flash => "Flash",
        // Transition
        BallHandler => "Ball Handler",
        LeftWing => "Left Wing",
        RightWing => "Right Wing",
        Trailer => "Trailer",
        LeakOuts => "Leak Outs",
        FirstMiddle => "First Middle",
        // Off screens
        Curl => "Curl",
        Straight => "Straight",
        Flare => "Flare",
        // Hand offs
        Dribble => "Dribble",
        Stationary => "Stationary",
        // Roll man
        Pop => "Pop",
        Roll => "Roll",
        Slips => "Slips",
        // Spot ups
        Drive => "Drive",
        Shot => "Shot",
        // Ball handler
        Off => "Off",
        Away => "Away",
        // Post ups
        FaceUp => "Face Up",
        /// Legacy label; current tables report the move as `Dribble`.
        DribbleMove => "Dribble Move",
        LeftShoulder => "Left Shoulder",
        RightShoulder => "Right Shoulder",
    }
}

/// Play type, direction and action of one segment. `None` renders as "N/A".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PlaySegment {
    pub play_type: Option<PlayType>,
    pub direction: Option<Direction>,
    pub action: Option<Action>,
}

impl PlaySegment {
    pub const UNCLASSIFIED: PlaySegment = PlaySegment {
        play_type: None,
        direction: None,
        action: None,
    };

    /// `(PlayType, Direction, Action)` exactly as the play-description store
    /// keys it, "N/A" included.
    pub fn triple(&self) -> [&'static str; 3] {
        [
            label_or_na(self.play_type, PlayType::as_str),
            label_or_na(self.direction, Direction::as_str),
            label_or_na(self.action, Action::as_str),
        ]
    }

    /// Aggregation bucket, e.g. `PNR High Off`. None when no play type applies.
    pub fn bucket(&self) -> Option<String> {
        let play_type = self.play_type?;
        let mut parts = vec![play_type.as_str()];
        parts.extend(self.direction.map(Direction::as_str));
        parts.extend(self.action.map(Action::as_str));
        Some(parts.join(" "))
    }
}

// ---------------------------------------------------------------------------
// Engine output
// ---------------------------------------------------------------------------

/// One fully classified possession. Built in a single pass, never patched.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedPlay {
    pub site: Site,
    /// Raw home/away codes from the game field ("UNKNOWN" when unparseable).
    pub home: String,
    pub away: String,
    /// Full opponent name, or "UNKNOWN".
    pub opponent: String,
    pub opponent_conference: String,
    pub program_conference: String,
    pub offensive_team: String,
    pub possession_role: PossessionRole,
    /// None for result labels outside the outcome table.
    pub outcome: Option<Outcome>,
    /// None only under the strict shot-type fallback.
    pub shot_type: Option<ShotType>,
    pub shot_level: ShotLevel,
    pub primary: PlaySegment,
    pub secondary: PlaySegment,
    pub primary_player: String,
    /// "N/A" when the play string has no secondary segment.
    pub secondary_player: String,
    pub play_number: Option<u32>,
    pub date: String,
    pub season: Option<i32>,
}

impl ClassifiedPlay {
    pub fn has_secondary(&self) -> bool {
        self.secondary_player != NOT_APPLICABLE
    }

    pub fn outcome_label(&self) -> &'static str {
        label_or_na(self.outcome, Outcome::as_str)
    }

    pub fn shot_type_label(&self) -> &'static str {
        label_or_na(self.shot_type, ShotType::as_str)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
