//! Player profile, leveling and achievements
//!
//! Progression is applied once per finished run: play counters, best score,
//! experience (2 per second survived) and the achievement catalog.

use serde::{Deserialize, Serialize};

use crate::consts::{EXP_PER_LEVEL, EXP_PER_SECOND};

/// Identifiers of the fixed achievement catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AchievementId {
    /// Survive 60 seconds
    #[serde(rename = "first_60")]
    FirstMinute,
    /// Play 5 games
    #[serde(rename = "series_5")]
    SeriesOfFive,
    /// Reach level 10
    #[serde(rename = "level_10")]
    LevelTen,
    /// 50 taps in a single run
    #[serde(rename = "fast_hands")]
    FastHands,
    /// Survive 3 minutes
    #[serde(rename = "survivor")]
    Survivor,
}

impl AchievementId {
    /// Catalog order
    pub const ALL: [AchievementId; 5] = [
        AchievementId::FirstMinute,
        AchievementId::SeriesOfFive,
        AchievementId::LevelTen,
        AchievementId::FastHands,
        AchievementId::Survivor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AchievementId::FirstMinute => "First Minute",
            AchievementId::SeriesOfFive => "Series of 5",
            AchievementId::LevelTen => "Top Ten",
            AchievementId::FastHands => "Fast Hands",
            AchievementId::Survivor => "Survivor",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AchievementId::FirstMinute => "Survive for 60 seconds",
            AchievementId::SeriesOfFive => "Play 5 games",
            AchievementId::LevelTen => "Reach level 10",
            AchievementId::FastHands => "Tap 50 times in one game",
            AchievementId::Survivor => "Survive for 3 minutes",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AchievementId::FirstMinute => "Clock",
            AchievementId::SeriesOfFive => "Flame",
            AchievementId::LevelTen => "Star",
            AchievementId::FastHands => "Zap",
            AchievementId::Survivor => "Trophy",
        }
    }

    /// Whether the player (already updated for this run) earned it
    pub fn is_earned(&self, player: &Player, score: u32, taps: u32) -> bool {
        match self {
            AchievementId::FirstMinute => score >= 60,
            AchievementId::Survivor => score >= 180,
            AchievementId::SeriesOfFive => player.games_played >= 5,
            AchievementId::LevelTen => player.level >= 10,
            AchievementId::FastHands => taps >= 50,
        }
    }
}

/// One catalog entry with its unlock state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub unlocked: bool,
    /// Unix ms of the unlock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<f64>,
}

impl Achievement {
    pub fn locked(id: AchievementId) -> Self {
        Self {
            id,
            name: id.name().to_string(),
            description: id.description().to_string(),
            icon: id.icon().to_string(),
            unlocked: false,
            unlocked_at: None,
        }
    }

    /// Unlock once; later calls keep the original timestamp
    pub fn unlock(&mut self, now_ms: f64) -> bool {
        if self.unlocked {
            return false;
        }
        self.unlocked = true;
        self.unlocked_at = Some(now_ms);
        true
    }
}

/// Fresh, fully locked catalog
pub fn default_achievements() -> Vec<Achievement> {
    AchievementId::ALL.iter().map(|id| Achievement::locked(*id)).collect()
}

/// A selectable character portrait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Avatar {
    pub id: u32,
    pub emoji: &'static str,
    pub name: &'static str,
}

/// Fixed avatar roster (ids are 1-based)
pub const AVATARS: [Avatar; 5] = [
    Avatar { id: 1, emoji: "👨‍💼", name: "Michael" },
    Avatar { id: 2, emoji: "👨‍💻", name: "Dwight" },
    Avatar { id: 3, emoji: "👨‍🔧", name: "Jim" },
    Avatar { id: 4, emoji: "👩‍🎨", name: "Pam" },
    Avatar { id: 5, emoji: "👨‍🏫", name: "Ryan" },
];

/// Roster entry for `id`, falling back to the first avatar
pub fn avatar(id: u32) -> &'static Avatar {
    AVATARS.iter().find(|a| a.id == id).unwrap_or(&AVATARS[0])
}

/// Persistent player profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub avatar: u32,
    pub level: u32,
    pub experience: u32,
    /// Seconds across all runs
    pub total_play_time: u64,
    pub games_played: u32,
    /// Longest survival in seconds
    pub best_score: u32,
    #[serde(default = "default_achievements")]
    pub achievements: Vec<Achievement>,
}

impl Player {
    pub fn new(id: String) -> Self {
        Self {
            id,
            name: "Player".to_string(),
            avatar: 1,
            level: 1,
            experience: 0,
            total_play_time: 0,
            games_played: 0,
            best_score: 0,
            achievements: default_achievements(),
        }
    }

    /// Experience threshold for the current level
    pub fn experience_needed(&self) -> u32 {
        self.level * EXP_PER_LEVEL
    }

    /// Fill of the experience bar, 0.0..=1.0
    pub fn experience_progress(&self) -> f32 {
        (self.experience as f32 / self.experience_needed() as f32).clamp(0.0, 1.0)
    }

    /// Add experience; crossing the threshold levels up once and carries the remainder.
    /// Returns true on level-up
    pub fn add_experience(&mut self, exp: u32) -> bool {
        self.experience += exp;
        let needed = self.experience_needed();
        if self.experience >= needed {
            self.level += 1;
            self.experience -= needed;
            true
        } else {
            false
        }
    }

    pub fn achievement(&self, id: AchievementId) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.achievement(id).is_some_and(|a| a.unlocked)
    }

    /// Unlock every newly earned achievement, returning the ids unlocked now
    pub fn check_achievements(&mut self, score: u32, taps: u32, now_ms: f64) -> Vec<AchievementId> {
        let earned: Vec<AchievementId> = AchievementId::ALL
            .iter()
            .copied()
            .filter(|id| id.is_earned(self, score, taps))
            .collect();

        let mut unlocked = Vec::new();
        for id in earned {
            if let Some(a) = self.achievements.iter_mut().find(|a| a.id == id) {
                if a.unlock(now_ms) {
                    unlocked.push(id);
                }
            }
        }
        unlocked
    }

    /// Add catalog entries missing from an older save, in catalog order
    pub fn repair_achievements(&mut self) -> bool {
        let missing: Vec<AchievementId> = AchievementId::ALL
            .iter()
            .copied()
            .filter(|id| self.achievement(*id).is_none())
            .collect();
        for id in &missing {
            self.achievements.push(Achievement::locked(*id));
        }
        !missing.is_empty()
    }

    /// Fold a finished run into the profile
    pub fn apply_run(&mut self, score: u32, taps: u32, now_ms: f64) -> RunOutcome {
        let previous_best = self.best_score;

        self.games_played += 1;
        self.total_play_time += u64::from(score);
        self.best_score = self.best_score.max(score);

        let exp_gained = score * EXP_PER_SECOND;
        let leveled_up = self.add_experience(exp_gained);
        let unlocked = self.check_achievements(score, taps, now_ms);

        RunOutcome {
            score,
            taps,
            exp_gained,
            leveled_up,
            new_best: score > previous_best,
            unlocked,
            rank: None,
        }
    }
}

/// Summary of a finished run for the game-over screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOutcome {
    pub score: u32,
    pub taps: u32,
    pub exp_gained: u32,
    pub leveled_up: bool,
    /// Beat the best score held before this run
    pub new_best: bool,
    pub unlocked: Vec<AchievementId>,
    /// Leaderboard rank, None if the run didn't make the top 10
    pub rank: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> Player {
        Player::new("p1".to_string())
    }

    #[test]
    fn test_level_up_carries_remainder() {
        let mut p = Player {
            level: 2,
            experience: 150,
            ..player()
        };
        assert!(p.add_experience(60));
        assert_eq!((p.level, p.experience), (3, 10));
    }

    #[test]
    fn test_single_level_up_per_award() {
        let mut p = player();
        assert!(p.add_experience(250));
        assert_eq!((p.level, p.experience), (2, 150));
    }

    #[test]
    fn test_apply_run_updates_counters() {
        let mut p = Player {
            best_score: 30,
            ..player()
        };
        let outcome = p.apply_run(45, 3, 1_000.0);
        assert_eq!(p.games_played, 1);
        assert_eq!(p.total_play_time, 45);
        assert_eq!(p.best_score, 45);
        assert_eq!(outcome.exp_gained, 90);
        assert!(outcome.new_best);
        assert!(!outcome.leveled_up);
        assert_eq!(p.experience, 90);
    }

    #[test]
    fn test_shorter_run_keeps_best() {
        let mut p = Player {
            best_score: 30,
            ..player()
        };
        let outcome = p.apply_run(10, 0, 0.0);
        assert_eq!(p.best_score, 30);
        assert!(!outcome.new_best);
    }

    #[test]
    fn test_achievement_thresholds() {
        let mut p = player();
        let unlocked = p.apply_run(180, 50, 5.0);
        assert_eq!(
            unlocked.unlocked,
            vec![
                AchievementId::FirstMinute,
                AchievementId::FastHands,
                AchievementId::Survivor
            ]
        );
        assert!(!p.is_unlocked(AchievementId::SeriesOfFive));
    }

    #[test]
    fn test_series_counts_games_including_current() {
        let mut p = Player {
            games_played: 4,
            ..player()
        };
        let outcome = p.apply_run(0, 0, 1.0);
        assert_eq!(outcome.unlocked, vec![AchievementId::SeriesOfFive]);
    }

    #[test]
    fn test_level_ten_uses_post_award_level() {
        let mut p = Player {
            level: 9,
            experience: 880,
            ..player()
        };
        // 880 + 20 >= 900
        let outcome = p.apply_run(10, 0, 1.0);
        assert!(outcome.leveled_up);
        assert!(outcome.unlocked.contains(&AchievementId::LevelTen));
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let mut p = player();
        p.check_achievements(60, 0, 111.0);
        let again = p.check_achievements(200, 0, 999.0);
        assert_eq!(again, vec![AchievementId::Survivor]);

        let first = p.achievement(AchievementId::FirstMinute).unwrap();
        assert!(first.unlocked);
        assert_eq!(first.unlocked_at, Some(111.0));

        // Predicates failing now never re-lock
        p.check_achievements(0, 0, 2_000.0);
        assert!(p.is_unlocked(AchievementId::FirstMinute));
        assert_eq!(
            p.achievement(AchievementId::Survivor).unwrap().unlocked_at,
            Some(999.0)
        );
    }

    #[test]
    fn test_json_field_names() {
        let mut p = player();
        p.check_achievements(60, 0, 1_700_000_000_000.0);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["totalPlayTime"], 0);
        assert_eq!(json["bestScore"], 0);
        assert_eq!(json["achievements"][0]["id"], "first_60");
        assert_eq!(json["achievements"][0]["unlockedAt"], 1_700_000_000_000.0);
        assert!(json["achievements"][1].get("unlockedAt").is_none());

        let back: Player = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_repair_adds_missing_catalog_entries() {
        let mut p = player();
        p.achievements.retain(|a| a.id == AchievementId::FastHands);
        assert!(p.repair_achievements());
        assert_eq!(p.achievements.len(), 5);
        assert!(!p.repair_achievements());
    }

    #[test]
    fn test_avatar_fallback() {
        assert_eq!(avatar(3).name, "Jim");
        assert_eq!(avatar(42).id, 1);
    }

    #[test]
    fn test_experience_progress() {
        let p = Player {
            level: 2,
            experience: 50,
            ..player()
        };
        assert_eq!(p.experience_needed(), 200);
        assert!((p.experience_progress() - 0.25).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_small_awards_keep_exp_below_threshold(
            level in 1u32..50,
            start in 0u32..100,
            award in 0u32..100,
        ) {
            // start and award are each below one level's threshold
            let mut p = Player { level, experience: start.min(level * 100 - 1), ..player() };
            p.add_experience(award);
            prop_assert!(p.experience < p.level * 100);
        }
    }
}
