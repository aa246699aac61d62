//! Save/load of player, leaderboard and settings
//!
//! Each record is a JSON document under its own key. Reads of a missing
//! record bootstrap (and persist) the default; writes always replace the
//! whole record, so callers read-modify-write.

pub mod store;

pub use store::{KeyValueStore, MemoryStore};
#[cfg(target_arch = "wasm32")]
pub use store::LocalStore;

use rand::Rng;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::highscores::{Leaderboard, ScoreRecord};
use crate::progression::Player;
use crate::settings::Settings;

pub const PLAYER_KEY: &str = "catch_interference_player";
pub const SCORES_KEY: &str = "catch_interference_scores";
pub const SETTINGS_KEY: &str = "catch_interference_settings";

/// Fresh random UUID drawn from the caller's generator
pub fn new_record_id<R: Rng>(rng: &mut R) -> String {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string()
}

/// Typed access to the three game records
#[derive(Debug, Clone, Default)]
pub struct Storage<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Parse a record; unreadable data is logged and treated as missing
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = self.store.get_item(key)?;
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Discarding unreadable {}: {}", key, e);
                None
            }
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> bool {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize {}: {}", key, e);
                return false;
            }
        };
        let ok = self.store.set_item(key, &json);
        if !ok {
            log::warn!("Failed to save {}", key);
        }
        ok
    }

    /// Load the player, creating and saving a new profile on first launch
    pub fn player<R: Rng>(&mut self, rng: &mut R) -> Player {
        if let Some(mut player) = self.read::<Player>(PLAYER_KEY) {
            if player.repair_achievements() {
                log::info!("Added missing achievements to saved player");
                self.save_player(&player);
            }
            return player;
        }

        let player = Player::new(new_record_id(rng));
        log::info!("No player found, created {}", player.id);
        self.save_player(&player);
        player
    }

    pub fn save_player(&mut self, player: &Player) {
        if self.write(PLAYER_KEY, player) {
            log::debug!("Player saved (level {})", player.level);
        }
    }

    /// Load the leaderboard, saving an empty one on first launch
    pub fn scores(&mut self) -> Leaderboard {
        if let Some(mut board) = self.read::<Leaderboard>(SCORES_KEY) {
            board.normalize();
            return board;
        }
        let board = Leaderboard::default();
        if self.write(SCORES_KEY, &board) {
            log::info!("No high scores found, saved an empty board");
        }
        board
    }

    /// Append a run to the saved leaderboard; returns its rank if it stayed
    pub fn save_score(&mut self, record: ScoreRecord) -> Option<usize> {
        let mut board = self.scores();
        let rank = board.add(record);
        if self.write(SCORES_KEY, &board) {
            log::info!("High scores saved ({} entries)", board.len());
        }
        rank
    }

    /// Load settings, creating and saving the defaults on first launch
    pub fn settings(&mut self) -> Settings {
        if let Some(settings) = self.read::<Settings>(SETTINGS_KEY) {
            return settings;
        }
        log::info!("Using default settings");
        let settings = Settings::default();
        self.save_settings(&settings);
        settings
    }

    pub fn save_settings(&mut self, settings: &Settings) {
        if self.write(SETTINGS_KEY, settings) {
            log::info!("Settings saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::AchievementId;
    use crate::settings::Theme;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashMap;

    fn storage() -> Storage<MemoryStore> {
        Storage::new(MemoryStore::new())
    }

    #[test]
    fn test_first_read_bootstraps_player() {
        let mut s = storage();
        let mut rng = Pcg32::seed_from_u64(1);
        let p = s.player(&mut rng);
        assert_eq!(p.level, 1);
        assert_eq!(p.achievements.len(), 5);
        assert!(s.store().get_item(PLAYER_KEY).is_some());

        // Second read returns the same persisted profile
        let again = s.player(&mut rng);
        assert_eq!(again, p);
    }

    #[test]
    fn test_player_round_trip_keeps_unlocks() {
        let mut s = storage();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut p = s.player(&mut rng);
        p.apply_run(75, 51, 1_234.5);
        s.save_player(&p);

        let loaded = s.player(&mut rng);
        assert_eq!(loaded, p);
        assert_eq!(
            loaded.achievement(AchievementId::FastHands).unwrap().unlocked_at,
            Some(1_234.5)
        );
    }

    #[test]
    fn test_corrupt_player_is_replaced() {
        let mut s = storage();
        s.store_mut().set_item(PLAYER_KEY, "{not json");
        let mut rng = Pcg32::seed_from_u64(3);
        let p = s.player(&mut rng);
        assert_eq!(p.games_played, 0);
        let saved = s.store().get_item(PLAYER_KEY).unwrap();
        assert!(serde_json::from_str::<Player>(&saved).is_ok());
    }

    #[test]
    fn test_settings_bootstrap_and_overwrite() {
        let mut s = storage();
        assert_eq!(s.settings(), Settings::default());
        assert!(s.store().get_item(SETTINGS_KEY).is_some());

        let custom = Settings {
            sound: false,
            vibration: false,
            theme: Theme::Light,
        };
        s.save_settings(&custom);
        assert_eq!(s.settings(), custom);
    }

    #[test]
    fn test_first_scores_read_saves_empty_board() {
        let mut s = storage();
        assert!(s.store().get_item(SCORES_KEY).is_none());
        assert!(s.scores().is_empty());
        assert_eq!(s.store().get_item(SCORES_KEY).as_deref(), Some("[]"));

        let rank = s.save_score(ScoreRecord {
            id: "a".into(),
            score: 12,
            date: 5.0,
            level: 1,
        });
        assert_eq!(rank, Some(1));
        assert_eq!(s.scores().top_score(), Some(12));
    }

    #[test]
    fn test_unserializable_record_is_not_written() {
        // JSON object keys must be strings
        let mut bad = HashMap::new();
        bad.insert((1u8, 2u8), 3u8);
        let mut s = storage();
        assert!(!s.write("bad", &bad));
        assert!(s.store().get_item("bad").is_none());
        assert!(s.write("good", &bad.len()));
    }

    /// Backend that rejects every write, like a full or blocked LocalStorage
    struct FullStore;

    impl KeyValueStore for FullStore {
        fn get_item(&self, _key: &str) -> Option<String> {
            None
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_rejected_writes_still_return_defaults() {
        let mut s = Storage::new(FullStore);
        let mut rng = Pcg32::seed_from_u64(5);
        assert_eq!(s.player(&mut rng).level, 1);
        assert!(s.scores().is_empty());
        assert_eq!(s.settings(), Settings::default());
        assert!(!s.write(SETTINGS_KEY, &Settings::default()));
    }

    #[test]
    fn test_record_ids_are_uuids() {
        let mut rng = Pcg32::seed_from_u64(4);
        let a = new_record_id(&mut rng);
        let b = new_record_id(&mut rng);
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
        assert_eq!(a.matches('-').count(), 4);
    }
}
