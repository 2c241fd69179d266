use std::collections::HashSet;

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use super::error::SaveError;
use super::SAVE_VERSION;
use crate::config::CircuitConfig;
use crate::models::{round_count, HallOfFameRecord, Player, PlayerId, Tournament};

const CHECKSUM_LEN: usize = 32;

/// Flat snapshot of a circuit between weekly ticks.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CircuitSave {
    /// Save format version
    pub version: u32,

    /// Save timestamp (unix milliseconds)
    pub timestamp: u64,

    pub year: u32,
    pub week: u32,
    pub next_player_id: PlayerId,

    #[serde(default)]
    pub config: CircuitConfig,

    pub players: Vec<Player>,
    pub tournaments: Vec<Tournament>,

    #[serde(default)]
    pub hall_of_fame: Vec<HallOfFameRecord>,
}

impl CircuitSave {
    pub fn new(year: u32, week: u32) -> Self {
        Self {
            version: SAVE_VERSION,
            timestamp: current_timestamp(),
            year,
            week,
            next_player_id: 1,
            config: CircuitConfig::default(),
            players: Vec::new(),
            tournaments: Vec::new(),
            hall_of_fame: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.version > SAVE_VERSION {
            return Err(SaveError::VersionMismatch { found: self.version, expected: SAVE_VERSION });
        }
        if self.week == 0 || self.week > self.config.weeks_per_season {
            return Err(SaveError::Corrupted(format!("week {} out of season", self.week)));
        }

        let mut player_ids = HashSet::new();
        for player in &self.players {
            if !player_ids.insert(player.id) {
                return Err(SaveError::Corrupted(format!("duplicate player id {}", player.id)));
            }
            if player.id >= self.next_player_id {
                return Err(SaveError::Corrupted(format!(
                    "player id {} not below next id {}",
                    player.id, self.next_player_id
                )));
            }
        }

        let mut tournament_ids = HashSet::new();
        for tournament in &self.tournaments {
            if !tournament_ids.insert(tournament.id) {
                return Err(SaveError::Corrupted(format!("duplicate tournament id {}", tournament.id)));
            }
            let rounds = round_count(tournament.draw_size);
            if !tournament.bracket.is_empty() && tournament.bracket.len() != rounds {
                return Err(SaveError::Corrupted(format!(
                    "tournament {} has {} rounds, expected {}",
                    tournament.id,
                    tournament.bracket.len(),
                    rounds
                )));
            }
        }
        Ok(())
    }

    pub fn summary(&self) -> String {
        format!(
            "Week {} of {} ({} players, {} tournaments, saved {})",
            self.week,
            self.year,
            self.players.len(),
            self.tournaments.len(),
            format_timestamp(self.timestamp)
        )
    }
}

/// MessagePack + LZ4 with a trailing SHA-256 of the compressed payload.
pub fn serialize_and_compress(save: &CircuitSave) -> Result<Vec<u8>, SaveError> {
    save.validate()?;

    let msgpack = to_vec_named(save)?;
    let compressed = compress_prepend_size(&msgpack);

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);
    Ok(result)
}

pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<CircuitSave, SaveError> {
    if bytes.len() < 4 + CHECKSUM_LEN {
        return Err(SaveError::Corrupted(format!("{} bytes is too short", bytes.len())));
    }

    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    let mut hasher = Sha256::new();
    hasher.update(payload);
    if hasher.finalize()[..] != *checksum_bytes {
        return Err(SaveError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| SaveError::Decompression)?;
    let save: CircuitSave = from_slice(&msgpack)?;
    save.validate()?;
    Ok(save)
}

pub fn to_json(save: &CircuitSave) -> Result<String, SaveError> {
    save.validate()?;
    Ok(serde_json::to_string_pretty(save)?)
}

pub fn from_json(text: &str) -> Result<CircuitSave, SaveError> {
    let save: CircuitSave = serde_json::from_str(text)?;
    save.validate()?;
    Ok(save)
}

pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}

pub fn format_timestamp(millis: u64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000)
        .ok()
        .and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Skills, Surface};

    fn sample() -> CircuitSave {
        let mut save = CircuitSave::new(2024, 10);
        save.players = (1..=50).map(|i| Player::new(i, format!("Player {}", i), 22, Skills::uniform(40))).collect();
        save.next_player_id = 51;
        save.tournaments.push(Tournament::new(1, "Open", Category::Atp250, Surface::Hard, 32, 10, 2024));
        save
    }

    #[test]
    fn test_binary_roundtrip() {
        let save = sample();
        let bytes = serialize_and_compress(&save).unwrap();
        let loaded = decompress_and_deserialize(&bytes).unwrap();
        assert_eq!(loaded.players.len(), 50);
        assert_eq!(loaded.week, 10);
        assert_eq!(loaded.tournaments[0].name, "Open");
    }

    #[test]
    fn test_checksum_validation() {
        let mut bytes = serialize_and_compress(&sample()).unwrap();
        if let Some(last) = bytes.last_mut() {
            *last = last.wrapping_add(1);
        }
        assert!(matches!(decompress_and_deserialize(&bytes), Err(SaveError::ChecksumMismatch)));
        assert!(matches!(decompress_and_deserialize(&[1, 2, 3]), Err(SaveError::Corrupted(_))));
    }

    #[test]
    fn test_compression_shrinks_roster() {
        let save = sample();
        let raw = to_vec_named(&save).unwrap();
        let packed = serialize_and_compress(&save).unwrap();
        assert!(packed.len() < raw.len());
    }

    #[test]
    fn test_validation_catches_duplicates_and_versions() {
        let mut save = sample();
        save.players.push(Player::new(3, "Copy", 20, Skills::uniform(10)));
        assert!(matches!(save.validate(), Err(SaveError::Corrupted(_))));

        let mut save = sample();
        save.version = SAVE_VERSION + 1;
        assert!(matches!(save.validate(), Err(SaveError::VersionMismatch { .. })));

        let mut save = sample();
        save.week = 53;
        assert!(save.validate().is_err());
    }

    #[test]
    fn test_json_document() {
        let json = to_json(&sample()).unwrap();
        assert!(json.contains("\"tournaments\""));
        let loaded = from_json(&json).unwrap();
        assert_eq!(loaded.next_player_id, 51);
        assert!(from_json("{\"version\": 1}").is_err());
    }

    #[test]
    fn test_timestamp_formatting() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00Z");
        assert!(current_timestamp() > 0);
    }
}
