use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::types::{ClassifiedPlay, Outcome, PlaySegment, ShotLevel};

// ---------------------------------------------------------------------------
// Keys and counters
// ---------------------------------------------------------------------------

/// Which segment of the possession the player acted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SegmentRole {
    Primary,
    Secondary,
}

/// Field order is the report sort order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatKey {
    pub team: String,
    pub bucket: String,
    pub player: String,
    pub role: SegmentRole,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShotCounts {
    pub plays: u32,
    pub two_pa: u32,
    pub two_pm: u32,
    pub three_pa: u32,
    pub three_pm: u32,
    /// Two-point attempts from levels 2 and 3.
    pub mid_pa: u32,
    pub mid_pm: u32,
    pub turnovers: u32,
    pub fouls: u32,
}

impl ShotCounts {
    pub fn record(&mut self, outcome: Option<Outcome>, level: ShotLevel) {
        self.plays += 1;
        match outcome {
            Some(Outcome::TwoPointMake) => self.two_point(true, level),
            Some(Outcome::TwoPointMiss) => self.two_point(false, level),
            Some(Outcome::ThreePointMake) => self.three_point(true),
            Some(Outcome::ThreePointMiss) => self.three_point(false),
            // The free throw is not tracked; the basket is.
            Some(Outcome::And1) if level == ShotLevel::ThreePoint => self.three_point(true),
            Some(Outcome::And1) => self.two_point(true, level),
            Some(Outcome::Turnover) => self.turnovers += 1,
            Some(Outcome::Foul) => self.fouls += 1,
            None => {}
        }
    }

    fn two_point(&mut self, made: bool, level: ShotLevel) {
        self.two_pa += 1;
        self.two_pm += u32::from(made);
        if level.is_mid_range() {
            self.mid_pa += 1;
            self.mid_pm += u32::from(made);
        }
    }

    fn three_point(&mut self, made: bool) {
        self.three_pa += 1;
        self.three_pm += u32::from(made);
    }

    pub fn fga(&self) -> u32 {
        self.two_pa + self.three_pa
    }

    pub fn fgm(&self) -> u32 {
        self.two_pm + self.three_pm
    }

    /// (FGM + 0.5 * 3PM) / FGA
    pub fn effective_fg(&self) -> f64 {
        ratio(f64::from(self.fgm()) + 0.5 * f64::from(self.three_pm), self.fga())
    }

    pub fn two_point_pct(&self) -> f64 {
        ratio(f64::from(self.two_pm), self.two_pa)
    }

    pub fn three_point_pct(&self) -> f64 {
        ratio(f64::from(self.three_pm), self.three_pa)
    }

    pub fn mid_range_pct(&self) -> f64 {
        ratio(f64::from(self.mid_pm), self.mid_pa)
    }
}

fn ratio(num: f64, den: u32) -> f64 {
    if den == 0 {
        0.0
    } else {
        num / f64::from(den)
    }
}

// ---------------------------------------------------------------------------
// Report rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub team: String,
    pub bucket: String,
    pub player: String,
    pub role: SegmentRole,
    #[serde(flatten)]
    pub counts: ShotCounts,
    pub two_point_pct: f64,
    pub three_point_pct: f64,
    pub mid_range_pct: f64,
    pub effective_fg_pct: f64,
    /// Share of the bucket's plays (same team and role) run by this player.
    pub play_share: f64,
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Concurrent per-player counters, fed by every file task.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    counts: DashMap<StatKey, ShotCounts>,
}

impl StatsAggregator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Credit the play to each classified segment's player. Segments without a
    /// play type are not counted.
    pub fn record(&self, play: &ClassifiedPlay) {
        self.record_segment(play, &play.primary, &play.primary_player, SegmentRole::Primary);
        if play.has_secondary() {
            self.record_segment(play, &play.secondary, &play.secondary_player, SegmentRole::Secondary);
        }
    }

    fn record_segment(&self, play: &ClassifiedPlay, segment: &PlaySegment, player: &str, role: SegmentRole) {
        let Some(bucket) = segment.bucket() else {
            return;
        };
        let key = StatKey {
            team: play.offensive_team.clone(),
            bucket,
            player: player.to_string(),
            role,
        };
        self.counts
            .entry(key)
            .or_default()
            .record(play.outcome, play.shot_level);
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Snapshot with derived percentages, sorted by team, bucket, player.
    pub fn summaries(&self) -> Vec<PlayerSummary> {
        let mut entries: Vec<(StatKey, ShotCounts)> = self
            .counts
            .iter()
            .map(|r| (r.key().clone(), *r.value()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut bucket_totals: HashMap<(&str, &str, SegmentRole), u32> = HashMap::new();
        for (key, counts) in &entries {
            *bucket_totals
                .entry((key.team.as_str(), key.bucket.as_str(), key.role))
                .or_default() += counts.plays;
        }

        entries
            .iter()
            .map(|(key, counts)| {
                let total = bucket_totals
                    .get(&(key.team.as_str(), key.bucket.as_str(), key.role))
                    .copied()
                    .unwrap_or(0);
                PlayerSummary {
                    team: key.team.clone(),
                    bucket: key.bucket.clone(),
                    player: key.player.clone(),
                    role: key.role,
                    counts: *counts,
                    two_point_pct: counts.two_point_pct(),
                    three_point_pct: counts.three_point_pct(),
                    mid_range_pct: counts.mid_range_pct(),
                    effective_fg_pct: counts.effective_fg(),
                    play_share: ratio(f64::from(counts.plays), total),
                }
            })
            .collect()
    }

    pub fn write_report(&self, path: &Path) -> Result<usize> {
        let summaries = self.summaries();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &summaries)?;
        info!(rows = summaries.len(), path = %path.display(), "[STATS] report written");
        Ok(summaries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, Direction, PlayType, PossessionRole, ShotType, Site};

    fn play(player: &str, outcome: Outcome, level: ShotLevel) -> ClassifiedPlay {
        ClassifiedPlay {
            site: Site::Home,
            home: "RIT".to_string(),
            away: "Bar".to_string(),
            opponent: "Bard College".to_string(),
            opponent_conference: "Liberty League".to_string(),
            program_conference: "Liberty League".to_string(),
            offensive_team: "Bard College".to_string(),
            possession_role: PossessionRole::Defense,
            outcome: Some(outcome),
            shot_type: Some(ShotType::DribbleJumper),
            shot_level: level,
            primary: PlaySegment {
                play_type: Some(PlayType::PnrBallHandler),
                direction: Some(Direction::High),
                action: Some(Action::Off),
            },
            secondary: PlaySegment::UNCLASSIFIED,
            primary_player: player.to_string(),
            secondary_player: "N/A".to_string(),
            play_number: None,
            date: "1/12/2024".to_string(),
            season: Some(2024),
        }
    }

    #[test]
    fn and_one_counts_as_made_field_goal() {
        let mut counts = ShotCounts::default();
        counts.record(Some(Outcome::And1), ShotLevel::ShortMidRange);
        counts.record(Some(Outcome::And1), ShotLevel::ThreePoint);
        assert_eq!((counts.two_pa, counts.two_pm), (1, 1));
        assert_eq!((counts.mid_pa, counts.mid_pm), (1, 1));
        assert_eq!((counts.three_pa, counts.three_pm), (1, 1));
    }

    #[test]
    fn effective_fg_weights_threes() {
        let mut counts = ShotCounts::default();
        counts.record(Some(Outcome::ThreePointMake), ShotLevel::ThreePoint);
        counts.record(Some(Outcome::TwoPointMiss), ShotLevel::Rim);
        assert!((counts.effective_fg() - 0.75).abs() < 1e-9);
        assert_eq!(ShotCounts::default().effective_fg(), 0.0);
    }

    #[test]
    fn summaries_group_by_player_and_bucket() {
        let agg = StatsAggregator::new();
        agg.record(&play("Smith", Outcome::TwoPointMake, ShotLevel::LongMidRange));
        agg.record(&play("Smith", Outcome::Turnover, ShotLevel::Rim));
        agg.record(&play("Adams", Outcome::Foul, ShotLevel::Rim));
        agg.record(&play("Smith", Outcome::TwoPointMiss, ShotLevel::Rim));

        let rows = agg.summaries();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].player, "Adams");
        assert_eq!(rows[0].bucket, "PNR High Off");
        assert_eq!(rows[0].counts.fouls, 1);
        assert!((rows[0].play_share - 0.25).abs() < 1e-9);

        let smith = &rows[1];
        assert_eq!(smith.counts.plays, 3);
        assert_eq!(smith.counts.turnovers, 1);
        assert!((smith.two_point_pct - 0.5).abs() < 1e-9);
        assert!((smith.mid_range_pct - 1.0).abs() < 1e-9);
        assert!((smith.play_share - 0.75).abs() < 1e-9);
    }

    #[test]
    fn secondary_segment_credits_second_player() {
        let agg = StatsAggregator::new();
        let mut p = play("Lee", Outcome::TwoPointMake, ShotLevel::Rim);
        p.secondary = PlaySegment {
            play_type: Some(PlayType::Cut),
            direction: None,
            action: Some(Action::Basket),
        };
        p.secondary_player = "Park".to_string();
        agg.record(&p);

        let rows = agg.summaries();
        assert_eq!(rows.len(), 2);
        let park = rows.iter().find(|r| r.player == "Park").unwrap();
        assert_eq!(park.role, SegmentRole::Secondary);
        assert_eq!(park.bucket, "Cuts Basket");
        assert_eq!(park.counts.two_pm, 1);
    }

    #[test]
    fn unclassified_segments_are_skipped() {
        let agg = StatsAggregator::new();
        let mut p = play("Smith", Outcome::TwoPointMake, ShotLevel::Rim);
        p.primary = PlaySegment::UNCLASSIFIED;
        agg.record(&p);
        assert_eq!(agg.len(), 0);
    }

    #[test]
    fn report_serializes_flat_rows() {
        let agg = StatsAggregator::new();
        agg.record(&play("Smith", Outcome::ThreePointMake, ShotLevel::ThreePoint));
        let json = serde_json::to_value(agg.summaries()).unwrap();
        assert_eq!(json[0]["player"], "Smith");
        assert_eq!(json[0]["role"], "Primary");
        assert_eq!(json[0]["three_pm"], 1);
        assert_eq!(json[0]["effective_fg_pct"], 1.5);
    }
}
