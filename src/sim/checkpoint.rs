//! Checkpoint sequencing and lap validation
//!
//! A lap only counts when every checkpoint of the circuit was reached in
//! order. Arriving back at checkpoint 0 before the circuit is complete
//! throws the circuit away.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Outcome of one tracker update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointEvent {
    /// Nothing changed
    None,
    /// Checkpoint reached, circuit continues
    Passed(usize),
    /// Full circuit completed in order
    LapCompleted,
    /// Circuit voided; sequence restarts at checkpoint 0
    LapRejected,
}

/// Per-racer checkpoint state machine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckpointTracker {
    /// The one checkpoint that must be reached next
    pub next_index: usize,
    /// Checkpoints reached during the current circuit
    pub passed: Vec<bool>,
    /// Checkpoint the racer is still inside since it was last counted.
    /// It has to be left before it can count again.
    occupied: Option<usize>,
    /// Set when a circuit is committed, cleared once the next one begins
    circuit_complete: bool,
}

impl CheckpointTracker {
    pub fn new(count: usize) -> Self {
        Self {
            next_index: 0,
            passed: vec![false; count],
            occupied: None,
            circuit_complete: false,
        }
    }

    /// Whether the most recent circuit was completed and no new one started
    pub fn circuit_complete(&self) -> bool {
        self.circuit_complete
    }

    pub fn passed_count(&self) -> usize {
        self.passed.iter().filter(|&&p| p).count()
    }

    fn restart_sequence(&mut self) {
        self.next_index = 0;
        self.passed.fill(false);
    }

    /// Advance the sequence for a racer whose center is at `center`
    pub fn update(&mut self, center: Vec2, checkpoints: &[Vec2], radius: f32) -> CheckpointEvent {
        if checkpoints.is_empty() {
            return CheckpointEvent::None;
        }
        if self.passed.len() != checkpoints.len() {
            *self = Self::new(checkpoints.len());
        }
        let within = |index: usize| center.distance(checkpoints[index]) <= radius;

        if self.occupied.is_some_and(|index| !within(index)) {
            self.occupied = None;
        }

        // Back at the start before the circuit was finished
        if self.next_index != 0 && self.occupied != Some(0) && within(0) {
            log::info!(
                "Lap rejected: returned to checkpoint 0 with {}/{} passed",
                self.passed_count(),
                checkpoints.len()
            );
            self.restart_sequence();
            self.occupied = Some(0);
            return CheckpointEvent::LapRejected;
        }

        let index = self.next_index;
        if self.occupied == Some(index) || !within(index) {
            return CheckpointEvent::None;
        }

        self.passed[index] = true;
        self.occupied = Some(index);
        if index == 0 {
            self.circuit_complete = false;
        }
        self.next_index = (index + 1) % checkpoints.len();
        log::debug!("Checkpoint {} passed", index);

        if self.next_index != 0 {
            return CheckpointEvent::Passed(index);
        }

        if self.passed.iter().all(|&p| p) {
            self.passed.fill(false);
            self.circuit_complete = true;
            CheckpointEvent::LapCompleted
        } else {
            self.restart_sequence();
            CheckpointEvent::LapRejected
        }
    }
}
