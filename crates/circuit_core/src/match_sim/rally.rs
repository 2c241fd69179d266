//! Shot and catch mechanics
//!
//! All functions here are stateless; the point loop in `point.rs` threads the
//! state through them.

use rand::Rng;
use rand_distr::{Distribution, Triangular};
use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;
use crate::models::{Hand, ShotTendencies, Skill};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Cross,
    Straight,
    Dropshot,
    Volley,
}

impl Direction {
    /// Skill that sets the precision of a shot in this direction.
    pub fn precision_skill(&self) -> Skill {
        match self {
            Direction::Cross => Skill::Cross,
            Direction::Straight => Skill::Straight,
            Direction::Dropshot => Skill::Dropshot,
            Direction::Volley => Skill::Volley,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn flip(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Side of the receiver the ball lands on after a shot in `direction`.
    pub fn after(self, direction: Direction) -> Self {
        match direction {
            Direction::Cross => self.flip(),
            Direction::Straight | Direction::Dropshot | Direction::Volley => self,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stroke {
    Serve,
    Forehand,
    Backhand,
}

impl Stroke {
    pub fn skill(&self) -> Skill {
        match self {
            Stroke::Serve => Skill::Serve,
            Stroke::Forehand => Skill::Forehand,
            Stroke::Backhand => Skill::Backhand,
        }
    }

    /// Forehand when the ball arrives on the hitter's dominant side.
    pub fn for_ball(hand: Hand, side: Side) -> Self {
        let forehand_side = match hand {
            Hand::Right => Side::Right,
            Hand::Left => Side::Left,
        };
        if side == forehand_side {
            Stroke::Forehand
        } else {
            Stroke::Backhand
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatchResult {
    /// Serve faster than the receiver
    Ace,
    /// Not returned, hitter wins the point
    Missed,
    /// Returned, next shot carries the weak multiplier
    Weak,
    Clean,
}

impl CatchResult {
    pub fn is_returned(&self) -> bool {
        matches!(self, CatchResult::Weak | CatchResult::Clean)
    }
}

/// Harder incoming balls are harder to return with full power.
pub fn power_multiplier(previous_power: f64) -> f64 {
    match previous_power {
        p if p <= 10.0 => 1.3,
        p if p <= 20.0 => 1.2,
        p if p <= 30.0 => 1.1,
        p if p <= 40.0 => 1.0,
        p if p <= 50.0 => 0.95,
        p if p <= 60.0 => 0.9,
        p if p <= 80.0 => 0.8,
        p if p <= 100.0 => 0.7,
        _ => 0.6,
    }
}

/// Triangular draw on 1..=100 with the mode at the direction skill.
pub fn draw_precision<R: Rng + ?Sized>(skill: u8, rng: &mut R) -> f64 {
    let mode = (skill as f64).clamp(1.0, 100.0);
    match Triangular::new(1.0, 100.0, mode) {
        Ok(dist) => dist.sample(rng).clamp(1.0, 100.0),
        Err(_) => mode,
    }
}

/// Weighted pick over all four tendencies.
pub fn choose_direction<R: Rng + ?Sized>(tendencies: &ShotTendencies, rng: &mut R) -> Direction {
    let weights = [
        (Direction::Cross, tendencies.cross_tend as u32),
        (Direction::Straight, tendencies.straight_tend as u32),
        (Direction::Dropshot, tendencies.dropshot_tend as u32),
        (Direction::Volley, tendencies.volley_tend as u32),
    ];
    pick_weighted(&weights, rng)
}

/// Serves go cross or straight only.
pub fn choose_serve_direction<R: Rng + ?Sized>(
    tendencies: &ShotTendencies,
    rng: &mut R,
) -> Direction {
    let weights = [
        (Direction::Cross, tendencies.cross_tend as u32),
        (Direction::Straight, tendencies.straight_tend as u32),
    ];
    pick_weighted(&weights, rng)
}

fn pick_weighted<R: Rng + ?Sized>(weights: &[(Direction, u32)], rng: &mut R) -> Direction {
    let total: u32 = weights.iter().map(|(_, w)| *w).sum();
    if total == 0 {
        return Direction::Cross;
    }
    let mut roll = rng.gen_range(0..total);
    for (direction, weight) in weights {
        if roll < *weight {
            return *direction;
        }
        roll -= weight;
    }
    Direction::Cross
}

pub fn serve_power<R: Rng + ?Sized>(serve_skill: u8, cfg: &MatchConfig, rng: &mut R) -> f64 {
    serve_skill as f64 * rng.gen_range(cfg.serve_power_min..=cfg.serve_power_max)
}

/// Serve check: faster than the receiver's current speed is an ace.
pub fn can_catch_serve(power: f64, receiver_speed: f64) -> CatchResult {
    if power > receiver_speed {
        CatchResult::Ace
    } else {
        CatchResult::Clean
    }
}

/// Rally check from shot power, precision and the defender's current speed.
pub fn can_catch(power: f64, precision: f64, defender_speed: f64, cfg: &MatchConfig) -> CatchResult {
    let ratio = power.max(1.0) / defender_speed.max(1.0);
    let precision_factor = 0.5 + precision / 100.0;
    let catch_score = ratio * precision_factor;
    if catch_score > cfg.miss_threshold {
        CatchResult::Missed
    } else if catch_score > cfg.weak_threshold {
        CatchResult::Weak
    } else {
        CatchResult::Clean
    }
}

/// Stamina spent returning a shot of `power`.
pub fn stamina_cost(power: f64, cfg: &MatchConfig) -> i32 {
    (power / cfg.stamina_cost_divisor).round() as i32
}
