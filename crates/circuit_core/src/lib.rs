//! # circuit_core - Tennis Circuit Simulation Engine
//!
//! Plays out a season of professional tennis week by week: draws are filled
//! and seeded, every match is resolved point by point from player skills,
//! and the results feed an ELO rating, championship points and a weekly
//! player development model.
//!
//! ## Features
//! - Seeded `ChaCha8Rng` injected into every stochastic step
//! - Premium-draw seeding with byes for short fields
//! - Point-level rallies driven by skill, surface, form and stamina
//! - Tunable tables (points, participation) as embedded YAML
//! - JSON and compressed, checksummed binary saves

// Simulation APIs take many scalar parameters
#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod data;
pub mod development;
pub mod error;
pub mod generator;
pub mod match_sim;
pub mod models;
pub mod rating;
pub mod save;
pub mod scheduler;
pub mod state;

pub use config::{
    CircuitConfig, DevelopmentConfig, InjuryConfig, MatchConfig, RatingConfig, RetirementConfig,
};
pub use error::{CircuitError, Result};
pub use generator::{PlayerGenerator, RandomPlayerGenerator};
pub use match_sim::{simulate_match, EffectiveView, MatchResult};
pub use models::{
    Category, HallOfFameRecord, Match, MatchOutcome, Player, PlayerId, RoundReached, Skill,
    Skills, Surface, Tournament, TournamentId, TournamentState,
};
pub use rating::RankingRow;
pub use save::{load_with_fallback, CircuitSave, SaveError};
pub use scheduler::{Circuit, MatchReport, TournamentSummary};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
