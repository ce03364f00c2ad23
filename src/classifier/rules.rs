//! Immutable classification tables.
//!
//! Every decision the engine makes is a first-match scan over one of these
//! ordered lists, so the priority of a rule is simply its position. A
//! [`RuleSet`] bundles one consistent version of all tables; the engine never
//! reaches for a table that was not handed to it.

use crate::types::{Action, Direction, Outcome, PlayType, ShotLevel, ShotType};

// ---------------------------------------------------------------------------
// Rule shapes
// ---------------------------------------------------------------------------

/// A direction marker. `implies` provisionally sets the action as well; an
/// action rule that matches later still wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionRule {
    pub marker: &'static str,
    pub direction: Direction,
    pub implies: Option<Action>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRule {
    pub marker: &'static str,
    pub action: Action,
}

/// Router entry plus the direction/action sub-tables for one play type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayTypeRules {
    pub play_type: PlayType,
    /// Any of these markers routes a segment to this play type.
    pub markers: &'static [&'static str],
    pub directions: &'static [DirectionRule],
    pub actions: &'static [ActionRule],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotMatch {
    Any(&'static [&'static str]),
    All(&'static [&'static str]),
}

impl ShotMatch {
    pub fn matches(&self, contains: impl Fn(&str) -> bool) -> bool {
        match self {
            ShotMatch::Any(markers) => markers.iter().any(|m| contains(m)),
            ShotMatch::All(markers) => markers.iter().all(|m| contains(m)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotRule {
    pub matcher: ShotMatch,
    pub shot_type: ShotType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRule {
    pub marker: &'static str,
    pub level: ShotLevel,
}

/// What happens to a play string that no shot rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotFallback {
    /// Everything left over is "N/A". Leftovers without a foul, turnover or
    /// shot-clock token are still flagged for review.
    CatchAll,
    /// Only foul, turnover or shot-clock rows become "N/A"; the rest stay
    /// unclassified.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCodeFormat {
    /// `AWAY@HOME`
    Delimited,
    /// Legacy: 2-3 letter codes with a one-character separator, split by length.
    FixedWidth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSetVersion {
    Legacy2023,
    Current2024,
}

impl std::fmt::Display for RuleSetVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleSetVersion::Legacy2023 => write!(f, "2023"),
            RuleSetVersion::Current2024 => write!(f, "2024"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    pub version: RuleSetVersion,
    /// Result labels that are never classified.
    pub rejected_results: &'static [&'static str],
    /// Drop any row whose play string mentions an offensive rebound.
    pub reject_offensive_rebounds: bool,
    pub outcomes: &'static [(&'static str, Outcome)],
    pub shot_types: &'static [ShotRule],
    pub shot_fallback: ShotFallback,
    /// Tokens that justify a "N/A" shot type.
    pub no_shot_markers: &'static [&'static str],
    pub shot_levels: &'static [LevelRule],
    /// Router order: first play type with a matching marker wins.
    pub play_types: &'static [PlayTypeRules],
    pub game_code_format: GameCodeFormat,
}

// ---------------------------------------------------------------------------
// Table builders
// ---------------------------------------------------------------------------

const fn dir(marker: &'static str, direction: Direction) -> DirectionRule {
    DirectionRule { marker, direction, implies: None }
}

const fn drive(marker: &'static str, direction: Direction) -> DirectionRule {
    DirectionRule { marker, direction, implies: Some(Action::Drive) }
}

const fn act(marker: &'static str, action: Action) -> ActionRule {
    ActionRule { marker, action }
}

pub const OFFENSIVE_REBOUND: &str = "Offensive Rebound";

const SIDES: &[DirectionRule] = &[
    dir("Top", Direction::Top),
    dir("Right", Direction::Right),
    dir("Left", Direction::Left),
];

const ISO: PlayTypeRules = PlayTypeRules {
    play_type: PlayType::Iso,
    markers: &["ISO"],
    directions: SIDES,
    actions: &[],
};

const SPOT_UP: PlayTypeRules = PlayTypeRules {
    play_type: PlayType::SpotUp,
    markers: &["Spot-Up"],
    directions: &[
        drive("Drives Left", Direction::Left),
        drive("Drives Right", Direction::Right),
        drive("Drives Straight", Direction::Straight),
    ],
    actions: &[act("No Dribble Jumper", Action::Shot)],
};

const HAND_OFF: PlayTypeRules = PlayTypeRules {
    play_type: PlayType::HandOff,
    markers: &["Hand Off"],
    directions: SIDES,
    actions: &[
        act("Dribble", Action::Dribble),
        act("Stationary", Action::Stationary),
    ],
};

const OFF_SCREEN: PlayTypeRules = PlayTypeRules {
    play_type: PlayType::OffScreen,
    markers: &["Off Screen"],
    directions: SIDES,
    actions: &[
        act("Curl", Action::Curl),
        act("Straight", Action::Straight),
        act("Flare", Action::Flare),
    ],
};

const CUT: PlayTypeRules = PlayTypeRules {
    play_type: PlayType::Cut,
    markers: &["Cut"],
    directions: &[],
    actions: &[
        act("Basket", Action::Basket),
        act("Screen", Action::Screen),
        act("Flash", Action::Flash),
    ],
};

const POST_UP_DIRECTIONS: &[DirectionRule] = &[
    dir("Flash Middle", Direction::Middle),
    dir("Right Block", Direction::Right),
    dir("Left Block", Direction::Left),
];

const POST_UP_2023: PlayTypeRules = PlayTypeRules {
    play_type: PlayType::PostUp,
    markers: &["Post-Up"],
    directions: POST_UP_DIRECTIONS,
    actions: &[
        act("Face-up", Action::FaceUp),
        act("Dribble Move", Action::DribbleMove),
    ],
};

const POST_UP_2024: PlayTypeRules = PlayTypeRules {
    play_type: PlayType::PostUp,
    markers: &["Post-Up"],
    directions: POST_UP_DIRECTIONS,
    actions: &[
        act("Face-up", Action::FaceUp),
        act("Left Shoulder", Action::LeftShoulder),
        act("Right Shoulder", Action::RightShoulder),
        // The current store keys this move as plain "Dribble".
        act("Dribble Move", Action::Dribble),
    ],
};

const TRANSITION: PlayTypeRules = PlayTypeRules {
    play_type: PlayType::Transition,
    markers: &["Transition"],
    directions: &[],
    actions: &[
        act("Ballhandler", Action::BallHandler),
        act("Left Wing", Action::LeftWing),
        act("Right Wing", Action::RightWing),
        act("Trailer", Action::Trailer),
        act("Leak Outs", Action::LeakOuts),
        act("First Middle", Action::FirstMiddle),
    ],
};

const PNR_ROLL_MAN: PlayTypeRules = PlayTypeRules {
    play_type: PlayType::PnrRollMan,
    markers: &["P&R Roll Man"],
    directions: &[
        dir("Drives Left", Direction::Left),
        dir("Drives Right", Direction::Right),
    ],
    actions: &[
        act("Pick and Pops", Action::Pop),
        act("Rolls to Basket", Action::Roll),
        act("Slips the Pick", Action::Slips),
    ],
};

// The side-of-floor P&R tags only ever describe the ball handler, so they
// route on their own when the tagger folds them into the player token.
const PNR_BALL_HANDLER: PlayTypeRules = PlayTypeRules {
    play_type: PlayType::PnrBallHandler,
    markers: &["P&R Ball Handler", "Left P&R", "Right P&R", "High P&R"],
    directions: &[
        dir("Left P&R", Direction::Left),
        dir("Right P&R", Direction::Right),
        dir("High P&R", Direction::High),
    ],
    actions: &[
        act("Dribbles Off Pick", Action::Off),
        act("Dribble Off Pick", Action::Off),
        act("Go Away from Pick", Action::Away),
    ],
};

const MISC: PlayTypeRules = PlayTypeRules {
    play_type: PlayType::Misc,
    markers: &["No Play Type"],
    directions: &[],
    actions: &[],
};

const PLAY_TYPES_2023: &[PlayTypeRules] = &[
    ISO, SPOT_UP, HAND_OFF, OFF_SCREEN, CUT, POST_UP_2023, TRANSITION, PNR_ROLL_MAN,
    PNR_BALL_HANDLER, MISC,
];

const PLAY_TYPES_2024: &[PlayTypeRules] = &[
    ISO, SPOT_UP, HAND_OFF, OFF_SCREEN, CUT, POST_UP_2024, TRANSITION, PNR_ROLL_MAN,
    PNR_BALL_HANDLER, MISC,
];

const SHOT_TYPES: &[ShotRule] = &[
    ShotRule { matcher: ShotMatch::Any(&["No Dribble Jumper"]), shot_type: ShotType::NoDribbleJumper },
    ShotRule { matcher: ShotMatch::Any(&["Dribble Jumper"]), shot_type: ShotType::DribbleJumper },
    ShotRule { matcher: ShotMatch::Any(&["Drop Step", "To Drop Step"]), shot_type: ShotType::DropStep },
    ShotRule { matcher: ShotMatch::Any(&["Hook Shot", "To Hook"]), shot_type: ShotType::HookShot },
    ShotRule {
        matcher: ShotMatch::Any(&["To Basket", "At Basket", "Rolls to Basket", "Cut"]),
        shot_type: ShotType::ToBasket,
    },
    ShotRule {
        matcher: ShotMatch::All(&[OFFENSIVE_REBOUND, "Short", "Scoring Attempt"]),
        shot_type: ShotType::ToBasket,
    },
];

const SHOT_LEVELS: &[LevelRule] = &[
    LevelRule { marker: "Short to < 17'", level: ShotLevel::ShortMidRange },
    LevelRule { marker: "Medium/17' to <3p", level: ShotLevel::LongMidRange },
    LevelRule { marker: "Long/3pt", level: ShotLevel::ThreePoint },
];

const NO_SHOT_MARKERS: &[&str] = &["Foul", "Turnover", "Shot Clock Violation"];

const OUTCOMES_2023: &[(&str, Outcome)] = &[
    ("Foul", Outcome::Foul),
    ("Make 2 Pts", Outcome::TwoPointMake),
    ("Make 3 Pts", Outcome::ThreePointMake),
    ("Miss 2 Pts", Outcome::TwoPointMiss),
    ("Miss 3 Pts", Outcome::ThreePointMiss),
    ("Turnover", Outcome::Turnover),
    ("1 Pts", Outcome::And1),
];

const OUTCOMES_2024: &[(&str, Outcome)] = &[
    ("Foul", Outcome::Foul),
    ("Make 2 Pts", Outcome::TwoPointMake),
    ("Make 3 Pts", Outcome::ThreePointMake),
    ("Miss 2 Pts", Outcome::TwoPointMiss),
    ("Miss 3 Pts", Outcome::ThreePointMiss),
    ("Turnover", Outcome::Turnover),
    ("1 Pts", Outcome::And1),
    ("0 Pts", Outcome::And1),
];

const REJECTED_2023: &[&str] = &[
    "No Violation",
    "Free Throw",
    "Run Offense",
    "Non Shooting Foul",
    "Kicked Ball",
];

// Both spellings of the two timing violations show up across exports.
const REJECTED_2024: &[&str] = &[
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
];

// ---------------------------------------------------------------------------
// Versions
// ---------------------------------------------------------------------------

impl RuleSet {
    pub const LEGACY_2023: RuleSet = RuleSet {
        version: RuleSetVersion::Legacy2023,
        rejected_results: REJECTED_2023,
        reject_offensive_rebounds: true,
        outcomes: OUTCOMES_2023,
        shot_types: SHOT_TYPES,
        shot_fallback: ShotFallback::CatchAll,
        no_shot_markers: NO_SHOT_MARKERS,
        shot_levels: SHOT_LEVELS,
        play_types: PLAY_TYPES_2023,
        game_code_format: GameCodeFormat::FixedWidth,
    };

    pub const CURRENT_2024: RuleSet = RuleSet {
        version: RuleSetVersion::Current2024,
        rejected_results: REJECTED_2024,
        reject_offensive_rebounds: false,
        outcomes: OUTCOMES_2024,
        shot_types: SHOT_TYPES,
        shot_fallback: ShotFallback::CatchAll,
        no_shot_markers: NO_SHOT_MARKERS,
        shot_levels: SHOT_LEVELS,
        play_types: PLAY_TYPES_2024,
        game_code_format: GameCodeFormat::Delimited,
    };

    #[cfg(test)]
    pub fn rules_for(&self, play_type: PlayType) -> Option<&'static PlayTypeRules> {
        self.play_types.iter().find(|t| t.play_type == play_type)
    }

    /// Router markers the tagger may fold onto the end of the player token.
    pub fn inline_markers(&self) -> Vec<&'static str> {
        let mut markers: Vec<&'static str> = self
            .play_types
            .iter()
            .flat_map(|t| t.markers.iter().copied())
            .collect();
        markers.sort_unstable();
        markers.dedup();
        markers
    }

    /// Every `(PlayType, Direction, Action)` triple these tables can emit,
    /// "N/A" included, for seeding the play-description store.
    pub fn play_descriptions(&self) -> Vec<[&'static str; 3]> {
        const NA: &str = crate::config::NOT_APPLICABLE;
        let mut triples = vec![[NA, NA, NA]];
        for table in self.play_types {
            let mut directions: Vec<&'static str> =
                table.directions.iter().map(|r| r.direction.as_str()).collect();
            directions.push(NA);
            let mut actions: Vec<&'static str> = table
                .actions
                .iter()
                .map(|r| r.action.as_str())
                .chain(table.directions.iter().filter_map(|r| r.implies.map(Action::as_str)))
                .collect();
            actions.push(NA);

            for &direction in &directions {
                for &action in &actions {
                    triples.push([table.play_type.as_str(), direction, action]);
                }
            }
        }
        triples.sort_unstable();
        triples.dedup();
        triples
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::CURRENT_2024
    }
}
