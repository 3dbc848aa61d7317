//! Race state and lifecycle
//!
//! The race context owns every mutable piece of a race. Only `tick` and the
//! lifecycle methods here write to it; collaborators read snapshots.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::{DEFAULT_COLORS, Opponent, generate_opponents};
use super::checkpoint::CheckpointTracker;
use super::entity::Player;
use super::powerup::{PowerUp, PowerUpEvent, generate_power_ups};
use super::track::Course;
use crate::highscores::Leaderboard;
use crate::settings::Settings;

/// Id reserved for the player's body
pub const PLAYER_ID: u32 = 0;

/// Display name used when none was entered
pub const DEFAULT_PLAYER_NAME: &str = "You";

/// Current phase of the race lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    /// Title screen
    Title,
    /// Waiting for the player's display name
    NameEntry,
    /// Countdown running, racers frozen on the grid
    Ready,
    /// Active racing
    Racing,
    /// Player reached the finish zone
    Finished,
    /// Race timed out
    GameOver,
}

/// Something the renderer or audio layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RaceEvent {
    RaceStarted { race: u32 },
    /// Countdown moved to this value (0 means go)
    CountdownStep { remaining: u32 },
    CheckpointPassed { index: usize },
    LapCompleted { lap: u32, time: f32 },
    LapRejected,
    OpponentLap { opponent: usize, laps: u32 },
    PowerUp(PowerUpEvent),
    /// Player finished; `rank` is the leaderboard position if it qualified
    Finished { time: f32, rank: Option<usize> },
    GameOver { time: f32 },
}

/// One-shot timer stepping the pre-race countdown
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Countdown {
    /// Time until the next step (ms)
    pub until_step: f32,
}

impl Countdown {
    /// Interval between countdown steps (ms)
    pub const STEP_MS: f32 = 1000.0;

    pub fn new() -> Self {
        Self {
            until_step: Self::STEP_MS,
        }
    }

    /// Advance by `dt` seconds. Returns how many steps fired.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.until_step -= dt * 1000.0;
        let mut fired = 0;
        while self.until_step <= 0.0 {
            self.until_step += Self::STEP_MS;
            fired += 1;
        }
        fired
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns monotonic frame timestamps into a bounded `dt`
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<f64>,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self { last: None, max_dt }
    }

    /// Seconds since the previous frame. The first frame and clocks running
    /// backwards yield 0; stalls are clamped to `max_dt`.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let Some(last) = self.last.replace(now_ms) else {
            return 0.0;
        };
        let dt = ((now_ms - last) / 1000.0) as f32;
        if dt.is_nan() || dt <= 0.0 {
            return 0.0;
        }
        if dt > self.max_dt {
            log::warn!("Frame stall of {:.3}s clamped to {:.3}s", dt, self.max_dt);
            return self.max_dt;
        }
        dt
    }
}

/// A racer's place in the standings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub name: String,
    pub laps: u32,
    pub is_player: bool,
}

/// Values the HUD draws each frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub phase: RacePhase,
    pub laps: u32,
    /// Race time so far (ms)
    pub elapsed: f32,
    pub current_lap_time: f32,
    pub best_lap_time: Option<f32>,
    /// 1-indexed position among all racers
    pub rank: usize,
    pub racers: usize,
    pub countdown: u32,
    pub next_checkpoint: usize,
    pub best_time: Option<f32>,
}

/// The authoritative race context
#[derive(Debug, Clone, Serialize)]
pub struct RaceState {
    pub phase: RacePhase,
    pub settings: Settings,
    pub course: Course,
    pub player: Player,
    /// Player's checkpoint progress
    pub checkpoints: CheckpointTracker,
    pub opponents: Vec<Opponent>,
    pub power_ups: Vec<PowerUp>,
    /// Race time so far (ms)
    pub elapsed: f32,
    /// Best finish time this session (ms), survives restarts
    pub best_time: Option<f32>,
    pub leaderboard: Leaderboard,
    /// Countdown value shown during `Ready`
    pub countdown: u32,
    /// Pending countdown step, only present during `Ready`
    pub countdown_timer: Option<Countdown>,
    /// Races started so far
    pub race_number: u32,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    #[serde(skip)]
    pub(crate) events: Vec<RaceEvent>,
    next_id: u32,
}

impl RaceState {
    /// Create a race context on the title screen using the built-in course
    pub fn new(settings: Settings) -> Self {
        Self::with_course(settings, Course::default())
    }

    pub fn with_course(settings: Settings, course: Course) -> Self {
        let settings = settings.sanitized();
        let rng = Pcg32::seed_from_u64(settings.seed);
        let player = Player::new(PLAYER_ID, DEFAULT_PLAYER_NAME, course.player_start);
        let checkpoints = CheckpointTracker::new(course.track.checkpoints.len());
        Self {
            phase: RacePhase::Title,
            settings,
            course,
            player,
            checkpoints,
            opponents: Vec::new(),
            power_ups: Vec::new(),
            elapsed: 0.0,
            best_time: None,
            leaderboard: Leaderboard::new(),
            countdown: 0,
            countdown_timer: None,
            race_number: 0,
            rng,
            events: Vec::new(),
            next_id: PLAYER_ID + 1,
        }
    }

    /// Reserve `count` consecutive entity ids, returning the first
    fn reserve_ids(&mut self, count: usize) -> u32 {
        let first = self.next_id;
        self.next_id += count as u32;
        first
    }

    pub(crate) fn push_event(&mut self, event: RaceEvent) {
        self.events.push(event);
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<RaceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Title (or a finished race) -> name entry
    pub fn begin_name_entry(&mut self) {
        match self.phase {
            RacePhase::Title | RacePhase::Finished | RacePhase::GameOver => {
                self.phase = RacePhase::NameEntry;
            }
            _ => {}
        }
    }

    /// Set the player's display name (cosmetic)
    pub fn set_player_name(&mut self, name: &str) {
        let name = name.trim();
        self.player.name = if name.is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            name.to_string()
        };
    }

    /// Reset all race state and begin the countdown.
    ///
    /// Any countdown still pending from an earlier race is discarded.
    pub fn start_game(&mut self) {
        self.race_number += 1;
        let mixed = self
            .settings
            .seed
            .wrapping_add(u64::from(self.race_number).wrapping_mul(2654435761));
        self.rng = Pcg32::seed_from_u64(mixed);
        self.next_id = PLAYER_ID + 1;
        self.events.clear();

        let name = std::mem::take(&mut self.player.name);
        self.player = Player::new(PLAYER_ID, name, self.course.player_start);
        self.checkpoints = CheckpointTracker::new(self.course.track.checkpoints.len());
        self.elapsed = 0.0;

        let first_id = self.reserve_ids(self.settings.opponent_count);
        self.opponents = generate_opponents(
            self.settings.opponent_count,
            self.course.opponent_start,
            &self.course.waypoints,
            &DEFAULT_COLORS,
            self.settings.difficulty.difficulty_range(),
            first_id,
            &mut self.rng,
        );

        let first_id = self.reserve_ids(self.course.track.checkpoints.len().saturating_sub(1));
        self.power_ups = generate_power_ups(&self.course.track.checkpoints, first_id, &mut self.rng);

        log::info!(
            "Race {} starting: {} opponents, {} power-ups, {} checkpoints",
            self.race_number,
            self.opponents.len(),
            self.power_ups.len(),
            self.course.track.checkpoints.len()
        );
        self.push_event(RaceEvent::RaceStarted {
            race: self.race_number,
        });

        self.countdown = self.settings.countdown_secs;
        if self.countdown == 0 {
            self.countdown_timer = None;
            self.phase = RacePhase::Racing;
        } else {
            self.countdown_timer = Some(Countdown::new());
            self.phase = RacePhase::Ready;
        }
    }

    /// Leave the race for the title screen, dropping any pending countdown
    pub fn abort_race(&mut self) {
        if self.phase != RacePhase::Title {
            log::info!("Race {} aborted", self.race_number);
        }
        self.countdown_timer = None;
        self.countdown = 0;
        self.phase = RacePhase::Title;
    }

    /// Run the countdown for `dt` seconds; switches to racing at zero
    pub(crate) fn advance_countdown(&mut self, dt: f32) {
        let Some(timer) = self.countdown_timer.as_mut() else {
            return;
        };
        let fired = timer.advance(dt);
        for _ in 0..fired {
            self.countdown = self.countdown.saturating_sub(1);
            log::info!("Countdown: {}", self.countdown);
            self.push_event(RaceEvent::CountdownStep {
                remaining: self.countdown,
            });
            if self.countdown == 0 {
                self.countdown_timer = None;
                self.phase = RacePhase::Racing;
                log::info!("Race {} go!", self.race_number);
                break;
            }
        }
    }

    /// Player reached the finish zone with a complete circuit
    pub(crate) fn finish_race(&mut self) {
        let time = self.elapsed;
        if self.best_time.is_none_or(|best| time < best) {
            self.best_time = Some(time);
        }
        let rank = self.leaderboard.add_time(&self.player.name, time);
        self.phase = RacePhase::Finished;
        log::info!(
            "{} finished in {} ({} laps)",
            self.player.name,
            crate::format_time(time),
            self.player.laps.laps
        );
        self.push_event(RaceEvent::Finished { time, rank });
    }

    pub(crate) fn game_over(&mut self) {
        self.phase = RacePhase::GameOver;
        log::info!("Game over after {}", crate::format_time(self.elapsed));
        self.push_event(RaceEvent::GameOver { time: self.elapsed });
    }

    /// Racers ordered by laps, most first. Ties keep opponents in grid
    /// order ahead of the player.
    pub fn standings(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .opponents
            .iter()
            .map(|o| Standing {
                name: o.name.clone(),
                laps: o.laps.laps,
                is_player: false,
            })
            .chain(std::iter::once(Standing {
                name: self.player.name.clone(),
                laps: self.player.laps.laps,
                is_player: true,
            }))
            .collect();
        standings.sort_by(|a, b| b.laps.cmp(&a.laps));
        standings
    }

    /// Player's 1-indexed place in the standings
    pub fn player_rank(&self) -> usize {
        self.standings()
            .iter()
            .position(|s| s.is_player)
            .map_or(1, |i| i + 1)
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            phase: self.phase,
            laps: self.player.laps.laps,
            elapsed: self.elapsed,
            current_lap_time: self.player.laps.current_lap_time,
            best_lap_time: self.player.laps.best_lap_time,
            rank: self.player_rank(),
            racers: self.opponents.len() + 1,
            countdown: self.countdown,
            next_checkpoint: self.checkpoints.next_index,
            best_time: self.best_time,
        }
    }

    /// Where the autopilot should head next
    pub fn player_target(&self) -> Option<Vec2> {
        if self.checkpoints.circuit_complete() {
            return Some(self.course.finish.center);
        }
        self.course
            .track
            .checkpoints
            .get(self.checkpoints.next_index)
            .copied()
    }

    /// Read-only snapshot for an external renderer
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
