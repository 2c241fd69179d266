//! Points and participation tables
//!
//! Both tables are gameplay tuning data. The defaults are embedded at compile
//! time and parsed once; callers can supply their own through
//! `from_yaml_str`.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{CircuitError, Result};
use crate::models::{Category, RoundReached};

pub const POINTS_YAML: &str = include_str!("../../data/points.yaml");
pub const PARTICIPATION_YAML: &str = include_str!("../../data/participation.yaml");

static POINTS: OnceLock<PointsTable> = OnceLock::new();
static PARTICIPATION: OnceLock<ParticipationTable> = OnceLock::new();

/// Category × round reached → championship points. Missing cells are 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsTable(HashMap<Category, HashMap<RoundReached, u32>>);

impl PointsTable {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn points(&self, category: Category, round: RoundReached) -> u32 {
        self.0.get(&category).and_then(|rounds| rounds.get(&round)).copied().unwrap_or(0)
    }

    pub fn set(&mut self, category: Category, round: RoundReached, points: u32) {
        self.0.entry(category).or_default().insert(round, points);
    }
}

/// Entry probability per (rank bucket, category).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipationTable {
    /// Inclusive upper rank bound of each bucket, ascending
    pub rank_buckets: Vec<u32>,
    /// One probability per bucket plus one for ranks past the last bound
    pub categories: HashMap<Category, Vec<f64>>,
}

impl ParticipationTable {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let table: Self = serde_yaml::from_str(text)?;
        table.validate()?;
        Ok(table)
    }

    /// Same probability for every rank and category.
    pub fn flat(probability: f64) -> Self {
        let categories = Category::ALL.iter().map(|c| (*c, vec![probability])).collect();
        Self { rank_buckets: Vec::new(), categories }
    }

    pub fn bucket(&self, rank: u32) -> usize {
        self.rank_buckets.iter().position(|bound| rank <= *bound).unwrap_or(self.rank_buckets.len())
    }

    pub fn probability(&self, rank: u32, category: Category) -> f64 {
        let bucket = self.bucket(rank);
        self.categories.get(&category).and_then(|row| row.get(bucket)).copied().unwrap_or(0.0)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rank_buckets.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CircuitError::InvalidConfig("rank_buckets must be strictly ascending".into()));
        }
        let width = self.rank_buckets.len() + 1;
        for (category, row) in &self.categories {
            if row.len() != width {
                return Err(CircuitError::InvalidConfig(format!(
                    "{} row has {} values, expected {}",
                    category.label(),
                    row.len(),
                    width
                )));
            }
            if row.iter().any(|p| !(0.0..=1.0).contains(p)) {
                return Err(CircuitError::InvalidConfig(format!(
                    "{} row has a probability outside 0..=1",
                    category.label()
                )));
            }
        }
        Ok(())
    }
}

/// Embedded points table.
///
/// # Panics
///
/// Panics if the embedded YAML fails to parse, which a normal build cannot do.
pub fn default_points_table() -> &'static PointsTable {
    POINTS.get_or_init(|| {
        PointsTable::from_yaml_str(POINTS_YAML).expect("Failed to parse data/points.yaml")
    })
}

/// Embedded participation table.
///
/// # Panics
///
/// Panics if the embedded YAML fails to parse or validate.
pub fn default_participation_table() -> &'static ParticipationTable {
    PARTICIPATION.get_or_init(|| {
        ParticipationTable::from_yaml_str(PARTICIPATION_YAML)
            .expect("Failed to parse data/participation.yaml")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_winner_scores() {
        let table = default_points_table();
        assert_eq!(table.points(Category::GrandSlam, RoundReached::Winner), 100);
        assert_eq!(table.points(Category::Masters1000, RoundReached::Winner), 50);
        assert_eq!(table.points(Category::Atp500, RoundReached::Winner), 35);
        assert_eq!(table.points(Category::Atp250, RoundReached::Winner), 25);
        assert_eq!(table.points(Category::Challenger175, RoundReached::Winner), 15);
        assert_eq!(table.points(Category::Challenger50, RoundReached::Winner), 7);
        assert_eq!(table.points(Category::Itf, RoundReached::Winner), 5);
        assert_eq!(table.points(Category::Special, RoundReached::Winner), 0);
        for round in [
            RoundReached::Final,
            RoundReached::Semi,
            RoundReached::Quarter,
            RoundReached::R16,
            RoundReached::R32,
            RoundReached::R64,
            RoundReached::R128,
        ] {
            assert_eq!(table.points(Category::GrandSlam, round), 0);
        }
    }

    #[test]
    fn test_participation_buckets() {
        let table = default_participation_table();
        assert_eq!(table.bucket(1), 0);
        assert_eq!(table.bucket(8), 0);
        assert_eq!(table.bucket(9), 1);
        assert_eq!(table.bucket(10_000), table.rank_buckets.len());
        assert!(table.probability(1, Category::GrandSlam) > 0.9);
        assert_eq!(table.probability(1, Category::Itf), 0.0);
    }

    #[test]
    fn test_masters_entry_split_at_rank_64() {
        let table = default_participation_table();
        assert_eq!(table.probability(64, Category::Masters1000), 0.90);
        assert_eq!(table.probability(65, Category::Masters1000), 0.99);
        assert_eq!(table.probability(900, Category::Masters1000), 0.99);
    }

    #[test]
    fn test_every_category_has_a_row() {
        let table = default_participation_table();
        for category in Category::ALL {
            assert!(table.categories.contains_key(&category), "missing {:?}", category);
        }
    }

    #[test]
    fn test_bad_row_width_rejected() {
        let yaml = "rank_buckets: [8, 16]\ncategories:\n  itf: [0.1, 0.2]\n";
        assert!(ParticipationTable::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_flat_table() {
        let table = ParticipationTable::flat(1.0);
        assert_eq!(table.probability(999, Category::Atp250), 1.0);
    }
}
