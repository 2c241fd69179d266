//! One point, serve to last shot

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rally::{
    can_catch, can_catch_serve, choose_direction, choose_serve_direction, draw_precision,
    power_multiplier, serve_power, stamina_cost, CatchResult, Direction, Side, Stroke,
};
use super::view::EffectiveView;
use crate::config::MatchConfig;
use crate::models::{PlayerId, Skill};

/// One shot of a point, kept only for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotEvent {
    pub set: usize,
    pub point: u32,
    pub shot: u32,
    pub hitter: PlayerId,
    pub stroke: Stroke,
    pub direction: Direction,
    pub power: f64,
    pub precision: f64,
    pub result: CatchResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointEnd {
    Ace,
    Winner,
    /// Rally cap reached
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointResult {
    pub server_won: bool,
    pub shots: u32,
    pub end: PointEnd,
}

/// Within-point runner state, rebuilt for every point.
struct Runner<'a> {
    view: &'a EffectiveView,
    stamina: i32,
    speed: f64,
    exhausted: bool,
}

impl<'a> Runner<'a> {
    fn new(view: &'a EffectiveView) -> Self {
        Self {
            view,
            stamina: view.skill(Skill::Stamina) as i32,
            speed: view.skill(Skill::Speed) as f64,
            exhausted: false,
        }
    }

    fn absorb(&mut self, power: f64, cfg: &MatchConfig) {
        self.stamina -= stamina_cost(power, cfg);
        if self.stamina <= 0 && !self.exhausted {
            self.exhausted = true;
            self.speed /= 2.0;
        }
    }
}

pub struct PointContext {
    pub set: usize,
    pub point: u32,
    /// Serving court, alternates with every point played
    pub court: Side,
}

pub fn play_point<R: Rng + ?Sized>(
    server: &EffectiveView,
    receiver: &EffectiveView,
    ctx: &PointContext,
    cfg: &MatchConfig,
    rng: &mut R,
    mut events: Option<&mut Vec<ShotEvent>>,
) -> PointResult {
    let mut players = [Runner::new(server), Runner::new(receiver)];

    let serve_dir = choose_serve_direction(&server.tendencies, rng);
    let power = serve_power(server.skill(Skill::Serve), cfg, rng);
    let precision = draw_precision(server.skill(serve_dir.precision_skill()), rng);
    let serve = can_catch_serve(power, players[1].speed);
    if let Some(log) = events.as_deref_mut() {
        log.push(ShotEvent {
            set: ctx.set,
            point: ctx.point,
            shot: 0,
            hitter: server.id,
            stroke: Stroke::Serve,
            direction: serve_dir,
            power,
            precision,
            result: serve,
        });
    }
    if serve == CatchResult::Ace {
        return PointResult { server_won: true, shots: 1, end: PointEnd::Ace };
    }
    players[1].absorb(power, cfg);

    let mut hitter = 1usize;
    let mut side = ctx.court.after(serve_dir);
    let mut previous_power = power;
    let mut carry = 1.0;
    let mut shots = 1u32;

    while shots < cfg.max_rally_shots {
        let defender = 1 - hitter;
        let view = players[hitter].view;
        let direction = choose_direction(&view.tendencies, rng);
        let stroke = Stroke::for_ball(view.hand, side);
        let power = view.skill(stroke.skill()) as f64 * power_multiplier(previous_power) * carry;
        let precision = draw_precision(view.skill(direction.precision_skill()), rng);
        let result = can_catch(power, precision, players[defender].speed, cfg);

        if let Some(log) = events.as_deref_mut() {
            log.push(ShotEvent {
                set: ctx.set,
                point: ctx.point,
                shot: shots,
                hitter: view.id,
                stroke,
                direction,
                power,
                precision,
                result,
            });
        }
        shots += 1;

        if !result.is_returned() {
            return PointResult { server_won: hitter == 0, shots, end: PointEnd::Winner };
        }
        carry = if result == CatchResult::Weak { cfg.weak_return_multiplier } else { 1.0 };
        players[defender].absorb(power, cfg);
        side = side.after(direction);
        previous_power = power;
        hitter = defender;
    }

    // the player due to hit at the cap concedes
    PointResult { server_won: hitter == 1, shots, end: PointEnd::Error }
}
