//! Robo Chase headless driver
//!
//! Runs one seeded round with an autopilot standing in for the gesture host.
//! Usage: `robo-chase [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::f32::consts::FRAC_PI_2;
    use std::time::{SystemTime, UNIX_EPOCH};

    use glam::Vec3;
    use robo_chase::Tuning;
    use robo_chase::consts::{MAX_SUBSTEPS, SIM_DT};
    use robo_chase::remote::{Intent, IntentSlot, LinkAction, RemoteLink};
    use robo_chase::sim::{
        self, Aabb, GameEvent, GameSession, ObstacleTemplate, ObstacleTemplates, RoundPhase,
    };
    use robo_chase::view::SensorFrame;

    /// Simulated display frame time, a little slower than the sim rate
    const FRAME_DT: f32 = 1.0 / 45.0;
    /// Give up after this much simulated time
    const MAX_RUN_SECONDS: f32 = 600.0;

    fn obstacle_templates() -> ObstacleTemplates {
        let mut templates = ObstacleTemplates::new();
        templates.insert(
            "tree".to_string(),
            ObstacleTemplate::new(Aabb::new(
                Vec3::new(-0.8, 0.0, -0.8),
                Vec3::new(0.8, 3.2, 0.8),
            )),
        );
        templates.insert(
            "rock".to_string(),
            ObstacleTemplate::new(Aabb::new(
                Vec3::new(-1.4, 0.0, -1.1),
                Vec3::new(1.4, 1.2, 1.1),
            )),
        );
        templates
    }

    /// Steer toward the radar blip
    fn autopilot(frame: &SensorFrame) -> Intent {
        let offset = frame.target - frame.player;
        if offset.length_squared() < 1e-6 {
            return Intent::STOP;
        }
        // Bearing from display-up, positive when the blip is on the left
        let bearing = (-offset.x).atan2(-offset.y);
        Intent::forward((bearing / FRAC_PI_2).clamp(-1.0, 1.0))
    }

    fn report(event: &GameEvent) {
        match event {
            GameEvent::RoundStarted { time_limit } => {
                log::info!("Round started ({:.0}s on the clock)", time_limit)
            }
            GameEvent::ScoreChanged { score } => log::info!("Score: {}", score),
            GameEvent::TimeLeftChanged { time_left } => log::trace!("Time left: {:.1}", time_left),
            GameEvent::RoundEnded { final_score } => log::info!("Game over! Final score: {}", final_score),
            GameEvent::Sensor(frame) => log::trace!("Radar: {:?}", frame.target),
        }
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Robo Chase (headless) starting...");

        let tuning = std::env::args().nth(1).map(Tuning::load).unwrap_or_default();
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        // Loopback transport: the autopilot's frames go through the same
        // decode path as the real gesture host's.
        let slot = IntentSlot::new();
        let mut link = RemoteLink::for_host("127.0.0.1", slot.clone());
        if let Some(LinkAction::Dial(url)) = link.connect() {
            log::info!("Loopback link standing in for {}", url);
            link.on_open();
        }
        log::info!("Link status: {}", link.status_text());

        let mut session = GameSession::new(tuning, obstacle_templates(), seed);
        log::info!(
            "Game initialized with seed {} ({} obstacles)",
            seed,
            session.obstacles.len()
        );

        let mut accumulator = 0.0;
        let mut elapsed = 0.0;
        while elapsed < MAX_RUN_SECONDS {
            accumulator += FRAME_DT;
            elapsed += FRAME_DT;

            if let Some(frame) = session.sensor {
                let message = serde_json::json!({ "gesture": autopilot(&frame) });
                link.on_message(&message.to_string());
            }

            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                sim::tick_from_slot(&mut session, &slot, SIM_DT);
                accumulator -= SIM_DT;
                substeps += 1;
            }

            for event in session.drain_events() {
                report(&event);
            }
            if session.phase() == RoundPhase::GameOver {
                break;
            }
        }

        link.on_close();
        log::info!(
            "Finished after {:.1}s simulated, score {}",
            elapsed,
            session.round.score
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}
