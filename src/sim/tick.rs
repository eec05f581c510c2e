//! Per-frame simulation step and round lifecycle
//!
//! One call to `tick` advances everything synchronously: player, target,
//! clock, catch check, then the camera and radar.

use super::obstacles::SafeZone;
use super::state::{GameEvent, GameSession};
use crate::remote::{Intent, IntentSlot};
use crate::sanitize_dt;

/// Reset score and clock, respawn both robots and rebuild the arena
pub fn start_round(session: &mut GameSession) {
    log::info!("Starting round (seed {})", session.seed);

    session.obstacles.clear();
    session.round.reset(session.tuning.initial_time_limit);

    session.player.place(session.tuning.player_spawn, 0.0);
    let attempts = session.tuning.max_placement_attempts;
    session
        .target
        .reset_position(&session.obstacles, &mut session.rng, attempts);

    let radius = session.tuning.safe_zone_radius;
    let safe_zones = [
        SafeZone::new(session.player.position(), radius),
        SafeZone::new(session.target.position(), radius),
    ];
    let params = session.placement_params();
    session
        .obstacles
        .generate(&params, &safe_zones, &session.templates, &mut session.rng);

    session.camera.snap_to(&session.player.transform);

    let time_limit = session.round.round_time_limit;
    session.emit(GameEvent::RoundStarted { time_limit });
    session.emit(GameEvent::ScoreChanged { score: 0 });
    session.emit(GameEvent::TimeLeftChanged {
        time_left: time_limit,
    });
}

/// Advance the game by `dt` seconds under the player's `intent`
pub fn tick(session: &mut GameSession, intent: Intent, dt: f32) {
    let Some(dt) = sanitize_dt(dt) else {
        return;
    };
    session.time_ticks += 1;

    if session.round.is_playing() {
        session
            .player
            .step(intent, &session.obstacles, None, dt);
        session
            .target
            .update(&session.obstacles, &mut session.rng, dt);

        let ended = session.round.countdown(dt);
        session.emit(GameEvent::TimeLeftChanged {
            time_left: session.round.time_left,
        });

        if ended {
            let final_score = session.round.score;
            log::info!("Round over, final score {}", final_score);
            session.emit(GameEvent::RoundEnded { final_score });
        } else {
            check_catch(session);
        }
    }

    session.camera.update(&session.player.transform, dt);
    let frame = session
        .radar
        .project(&session.player.transform, session.target.position());
    session.sensor = Some(frame);
    session.emit(GameEvent::Sensor(frame));
}

/// Tick with whatever intent is currently published in `slot`
pub fn tick_from_slot(session: &mut GameSession, slot: &IntentSlot, dt: f32) {
    let intent = slot.snapshot();
    tick(session, intent, dt);
}

/// Fire a catch if the robots are strictly closer than the catch radius
pub fn check_catch(session: &mut GameSession) -> bool {
    if !session.round.is_playing() {
        return false;
    }
    let distance = session.player.position().distance(session.target.position());
    if distance < session.tuning.catch_radius {
        on_catch(session);
        return true;
    }
    false
}

fn on_catch(session: &mut GameSession) {
    session.round.register_catch(
        session.tuning.time_reduction_per_catch,
        session.tuning.minimum_time_limit,
    );
    log::info!(
        "Caught! score {}, next limit {:.1}s",
        session.round.score,
        session.round.round_time_limit
    );

    let attempts = session.tuning.max_placement_attempts;
    session
        .target
        .reset_position(&session.obstacles, &mut session.rng, attempts);

    session.emit(GameEvent::ScoreChanged {
        score: session.round.score,
    });
    session.emit(GameEvent::TimeLeftChanged {
        time_left: session.round.time_left,
    });
}
