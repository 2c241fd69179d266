//! Save/Load for circuit state
//!
//! Two encodings of the same [`CircuitSave`] document: pretty JSON for
//! `.json` paths, MessagePack + LZ4 + SHA-256 for everything else. Writes go
//! through a temp file and a rename.

pub mod error;
pub mod format;

pub use error::SaveError;
pub use format::{
    current_timestamp, decompress_and_deserialize, format_timestamp, from_json,
    serialize_and_compress, to_json, CircuitSave,
};

use std::fs::{rename, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::config::CircuitConfig;
use crate::scheduler::Circuit;

pub const SAVE_VERSION: u32 = 1;

/// First season of a freshly generated circuit.
pub const DEFAULT_START_YEAR: u32 = 2024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    Json,
    Binary,
}

impl SaveFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SaveFormat::Json,
            _ => SaveFormat::Binary,
        }
    }
}

impl Circuit {
    pub fn to_save(&self) -> CircuitSave {
        let mut save = CircuitSave::new(self.year, self.week);
        save.next_player_id = self.next_player_id.max(self.roster.next_free_id());
        save.config = self.config.clone();
        save.players = self.roster.as_slice().to_vec();
        save.tournaments = self.calendar.as_slice().to_vec();
        save.hall_of_fame = self.hall_of_fame.clone();
        save
    }

    /// Rebuilds a circuit from a snapshot. The random stream restarts from `seed`.
    pub fn from_save(save: CircuitSave, seed: u64) -> Result<Self, SaveError> {
        save.validate()?;
        let CircuitSave { year, week, next_player_id, config, players, tournaments, hall_of_fame, .. } =
            save;
        let mut circuit = Circuit::new(config, players, tournaments, year, seed)?;
        circuit.week = week;
        circuit.next_player_id = next_player_id.max(circuit.roster.next_free_id());
        circuit.hall_of_fame = hall_of_fame;
        Ok(circuit)
    }
}

pub fn save_to_path(path: &Path, save: &CircuitSave) -> Result<(), SaveError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let data = match SaveFormat::for_path(path) {
        SaveFormat::Json => to_json(save)?.into_bytes(),
        SaveFormat::Binary => serialize_and_compress(save)?,
    };

    let temp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&temp_path)?;
        file.write_all(&data)?;
        file.flush()?;
        file.sync_all()?;
    }
    rename(&temp_path, path)?;

    log::debug!("Saved {} bytes to {:?}", data.len(), path);
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<CircuitSave, SaveError> {
    if !path.exists() {
        return Err(SaveError::FileNotFound { path: path.display().to_string() });
    }

    let mut file = File::open(path)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;

    let save = match SaveFormat::for_path(path) {
        SaveFormat::Json => {
            let text = String::from_utf8(data)
                .map_err(|e| SaveError::Corrupted(format!("not UTF-8: {}", e)))?;
            from_json(&text)?
        }
        SaveFormat::Binary => decompress_and_deserialize(&data)?,
    };
    log::debug!("Loaded {} from {:?}", save.summary(), path);
    Ok(save)
}

/// Loads `path`, falling back to the embedded calendar with a generated
/// roster, then to an empty circuit. Never fails.
pub fn load_with_fallback(path: &Path, config: CircuitConfig, seed: u64) -> Circuit {
    match load_from_path(path).and_then(|save| Circuit::from_save(save, seed)) {
        Ok(circuit) => {
            log::info!("Loaded circuit from {:?}", path);
            return circuit;
        }
        Err(e) => log::warn!("Could not load {:?} ({}), using the default dataset", path, e),
    }

    let config = match config.validate() {
        Ok(()) => config,
        Err(e) => {
            log::warn!("Invalid configuration ({}), using defaults", e);
            CircuitConfig::default()
        }
    };
    match Circuit::with_default_dataset(config.clone(), DEFAULT_START_YEAR, seed) {
        Ok(circuit) => return circuit,
        Err(e) => log::warn!("Default dataset unavailable ({}), starting empty", e),
    }

    Circuit::assemble(config, Vec::new(), Vec::new(), DEFAULT_START_YEAR, seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn small_config() -> CircuitConfig {
        let mut cfg = CircuitConfig::without_injuries();
        cfg.target_roster_size = 64;
        cfg
    }

    #[test]
    fn test_save_load_roundtrip_binary() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("circuit.dat");

        let mut circuit = Circuit::with_default_dataset(small_config(), 2030, 1).unwrap();
        circuit.play_week().unwrap();
        circuit.advance_week();
        save_to_path(&path, &circuit.to_save()).unwrap();

        let restored = Circuit::from_save(load_from_path(&path).unwrap(), 2).unwrap();
        assert_eq!(restored.week(), 2);
        assert_eq!(restored.year(), 2030);
        assert_eq!(restored.roster().len(), circuit.roster().len());
        let before: Vec<_> = circuit.rankings(5).into_iter().map(|r| r.id).collect();
        let after: Vec<_> = restored.rankings(5).into_iter().map(|r| r.id).collect();
        assert_eq!(before, after);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_save_load_roundtrip_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("circuit.json");
        let circuit = Circuit::with_default_dataset(small_config(), 2030, 3).unwrap();
        save_to_path(&path, &circuit.to_save()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"hall_of_fame\""));
        let save = load_from_path(&path).unwrap();
        assert_eq!(save.players.len(), 64);
        assert_eq!(save.tournaments.len(), circuit.calendar().len());
    }

    #[test]
    fn test_missing_file_is_recoverable() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_from_path(&temp_dir.path().join("absent.dat")).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_fallback_to_default_dataset() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.dat");
        std::fs::write(&path, b"definitely not a save file, but long enough to checksum").unwrap();

        let circuit = load_with_fallback(&path, small_config(), 5);
        assert_eq!(circuit.year(), DEFAULT_START_YEAR);
        assert_eq!(circuit.week(), 1);
        assert_eq!(circuit.roster().active_count(), 64);
        assert!(!circuit.calendar().is_empty());
    }

    #[test]
    fn test_fallback_with_bad_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let mut cfg = small_config();
        cfg.matches.max_rally_shots = 0;
        let circuit = load_with_fallback(&temp_dir.path().join("none.json"), cfg, 6);
        assert_eq!(circuit.config().matches.max_rally_shots, 120);
        assert_eq!(circuit.roster().active_count(), CircuitConfig::default().target_roster_size);
    }
}
