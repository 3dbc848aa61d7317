//! Tube Racer headless runner
//!
//! Drives one autopilot race on the built-in course and logs the outcome.
//! Optional first argument: path to a settings JSON file.

#[cfg(not(target_arch = "wasm32"))]
fn load_settings() -> tube_racer::Settings {
    use tube_racer::Settings;

    let Some(path) = std::env::args().nth(1) else {
        return Settings::default();
    };
    let parsed = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| Settings::from_json(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(settings) => {
            log::info!("Loaded settings from {}", path);
            settings
        }
        Err(e) => {
            log::warn!("Could not load settings from {}: {}, using defaults", path, e);
            Settings::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tube_racer::format_time;
    use tube_racer::sim::{FrameClock, RaceEvent, RacePhase, RaceState, TickInput, tick};

    env_logger::init();
    log::info!("Tube Racer (native) starting...");

    let settings = load_settings();
    let mut clock = FrameClock::new(settings.frame_dt_limit());
    let mut state = RaceState::new(settings);

    state.begin_name_entry();
    state.set_player_name("Autopilot");
    state.start_game();

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    // 60 Hz frames, hard stop well past any time limit
    let frame_ms = 1000.0 / 60.0;
    let mut now_ms = 0.0;
    for _ in 0..60 * 60 * 10 {
        let dt = clock.delta(now_ms);
        now_ms += frame_ms;
        tick(&mut state, &input, dt);

        for event in state.drain_events() {
            match event {
                RaceEvent::LapCompleted { lap, time } => {
                    println!("Lap {} in {}", lap, format_time(time));
                }
                RaceEvent::LapRejected => println!("Lap rejected"),
                RaceEvent::OpponentLap { opponent, laps } => {
                    log::debug!("{} on lap {}", state.opponents[opponent].name, laps);
                }
                _ => {}
            }
        }

        if matches!(state.phase, RacePhase::Finished | RacePhase::GameOver) {
            break;
        }
    }

    let hud = state.hud();
    match state.phase {
        RacePhase::Finished => println!(
            "Finished in {} (rank {}/{})",
            format_time(hud.elapsed),
            hud.rank,
            hud.racers
        ),
        RacePhase::GameOver => println!("Game over at {}", format_time(hud.elapsed)),
        phase => println!("Stopped in {:?} at {}", phase, format_time(hud.elapsed)),
    }

    println!("\nStandings:");
    for (place, standing) in state.standings().iter().enumerate() {
        println!("{:>2}. {:<10} {} laps", place + 1, standing.name, standing.laps);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host page drives the simulation through the library
}
