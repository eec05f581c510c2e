//! Game session and round state
//!
//! Everything a tick reads or writes lives in `GameSession`; there is no
//! ambient state anywhere else.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::TargetAi;
use super::motion::Agent;
use super::obstacles::{ObstacleField, ObstacleTemplates, PlacementParams};
use crate::tuning::Tuning;
use crate::view::{CameraFollow, Radar, SensorFrame};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Clock running, catches count
    Playing,
    /// Time ran out; waiting for an explicit restart
    GameOver,
}

/// Things the presentation layer should know about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    RoundStarted { time_limit: f32 },
    ScoreChanged { score: u32 },
    TimeLeftChanged { time_left: f32 },
    RoundEnded { final_score: u32 },
    Sensor(SensorFrame),
}

/// Score and clock for the current round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub score: u32,
    /// Seconds remaining, in [0, round_time_limit]
    pub time_left: f32,
    /// Clock reset value; shrinks with every catch
    pub round_time_limit: f32,
    pub phase: RoundPhase,
}

impl RoundState {
    pub fn new(initial_time_limit: f32) -> Self {
        Self {
            score: 0,
            time_left: initial_time_limit,
            round_time_limit: initial_time_limit,
            phase: RoundPhase::Playing,
        }
    }

    pub fn reset(&mut self, initial_time_limit: f32) {
        *self = Self::new(initial_time_limit);
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == RoundPhase::Playing
    }

    /// Run the clock down. Returns true on the tick the round ends.
    pub fn countdown(&mut self, dt: f32) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.time_left = (self.time_left - dt).max(0.0);
        if self.time_left <= 0.0 {
            self.time_left = 0.0;
            self.phase = RoundPhase::GameOver;
            return true;
        }
        false
    }

    /// Score a catch and shrink the clock, never below `minimum`
    pub fn register_catch(&mut self, reduction: f32, minimum: f32) {
        self.score += 1;
        self.round_time_limit = (self.round_time_limit - reduction).max(minimum);
        self.time_left = self.round_time_limit;
    }
}

/// The whole simulation: agents, arena, round rules and view state
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub templates: ObstacleTemplates,
    pub round: RoundState,
    pub player: Agent,
    pub target: TargetAi,
    pub obstacles: ObstacleField,
    pub camera: CameraFollow,
    pub radar: Radar,
    /// Most recent radar frame
    pub sensor: Option<SensorFrame>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

impl GameSession {
    /// Build a session and start the first round
    pub fn new(tuning: Tuning, templates: ObstacleTemplates, seed: u64) -> Self {
        let tuning = tuning.sanitized();
        let mut session = Self {
            seed,
            round: RoundState::new(tuning.initial_time_limit),
            player: Agent::new(tuning.agent_body, tuning.move_speed, tuning.turn_rate),
            target: TargetAi::new(tuning.agent_body, tuning.target_move_speed, tuning.world_bounds),
            obstacles: ObstacleField::new(),
            camera: CameraFollow::new(
                tuning.camera_offset,
                tuning.camera_look_offset,
                tuning.camera_smoothing_factor,
            ),
            radar: Radar::new(
                tuning.sensor_max_range,
                tuning.sensor_display_radius,
                tuning.sensor_dot_radius,
            ),
            sensor: None,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            templates,
            tuning,
        };

        super::tick::start_round(&mut session);
        session
    }

    pub fn phase(&self) -> RoundPhase {
        self.round.phase
    }

    pub fn placement_params(&self) -> PlacementParams {
        PlacementParams {
            count: self.tuning.obstacle_count,
            world_bounds: self.tuning.world_bounds,
            min_spacing: self.tuning.min_spacing,
            max_attempts: self.tuning.max_placement_attempts,
        }
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_state_scenario() {
        let mut round = RoundState::new(60.0);
        round.register_catch(7.0, 5.0);
        assert_eq!(round.score, 1);
        assert_eq!(round.round_time_limit, 53.0);
        assert_eq!(round.time_left, 53.0);

        for _ in 1..8 {
            round.register_catch(7.0, 5.0);
        }
        assert_eq!(round.score, 8);
        assert_eq!(round.round_time_limit, 5.0);
        assert_eq!(round.time_left, 5.0);
    }

    #[test]
    fn test_countdown_clamps_and_ends() {
        let mut round = RoundState::new(1.0);
        assert!(!round.countdown(0.4));
        assert!((round.time_left - 0.6).abs() < 1e-6);
        assert!(round.countdown(5.0));
        assert_eq!(round.time_left, 0.0);
        assert_eq!(round.phase, RoundPhase::GameOver);
        // No further transitions
        assert!(!round.countdown(1.0));
        assert_eq!(round.time_left, 0.0);
    }

    #[test]
    fn test_event_wire_shape() {
        let text = serde_json::to_string(&GameEvent::RoundEnded { final_score: 4 }).unwrap();
        assert_eq!(text, r#"{"type":"roundEnded","final_score":4}"#);
    }

    proptest! {
        #[test]
        fn prop_round_monotonic(
            initial in 5.0f32..120.0,
            reduction in 0.0f32..20.0,
            minimum in 0.5f32..5.0,
            catches in 0usize..30,
        ) {
            let mut round = RoundState::new(initial.max(minimum));
            let mut last_limit = round.round_time_limit;
            let mut last_score = round.score;
            for _ in 0..catches {
                round.register_catch(reduction, minimum);
                prop_assert!(round.round_time_limit <= last_limit);
                prop_assert!(round.round_time_limit >= minimum);
                prop_assert_eq!(round.score, last_score + 1);
                prop_assert_eq!(round.time_left, round.round_time_limit);
                last_limit = round.round_time_limit;
                last_score = round.score;
            }
        }
    }
}
