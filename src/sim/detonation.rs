//! Detonation timer
//!
//! A single optional start time drives the whole explosion sequence:
//! fuse, impulse, settling, then a forced reset.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Phase of the explosion sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetonationPhase {
    /// No detonation armed; bricks held at rest
    Idle,
    /// Fuse burning; bricks still at rest
    Fuse,
    /// Bricks receive the blast impulse
    Impulse,
    /// Bricks fly and settle under gravity
    Settling,
    /// Window closed; timer must be cleared and bricks reset
    Finished,
}

impl DetonationPhase {
    /// Phase for a given elapsed time since detonation (seconds)
    pub fn from_elapsed(elapsed: f64) -> Self {
        if elapsed < FUSE_SECONDS {
            DetonationPhase::Fuse
        } else if elapsed < FUSE_SECONDS + IMPULSE_SECONDS {
            DetonationPhase::Impulse
        } else if elapsed < DETONATION_WINDOW_SECONDS {
            DetonationPhase::Settling
        } else {
            DetonationPhase::Finished
        }
    }

    /// Whether bricks are physically advanced in this phase
    pub fn is_simulating(&self) -> bool {
        matches!(self, DetonationPhase::Impulse | DetonationPhase::Settling)
    }
}

/// The one detonation timer of a scene
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Detonation {
    /// Simulation time (seconds) the detonation was armed, if any
    pub started_at: Option<f64>,
    /// Set once the blast of the current detonation has gone off
    #[serde(default)]
    pub blasted: bool,
}

impl Detonation {
    /// Arm the timer. Returns false if a detonation is already running.
    pub fn arm(&mut self, now: f64) -> bool {
        if self.started_at.is_some() {
            return false;
        }
        self.started_at = Some(now);
        self.blasted = false;
        true
    }

    pub fn clear(&mut self) {
        self.started_at = None;
        self.blasted = false;
    }

    pub fn is_armed(&self) -> bool {
        self.started_at.is_some()
    }

    /// Seconds since the timer was armed
    pub fn elapsed(&self, now: f64) -> Option<f64> {
        self.started_at.map(|start| (now - start).max(0.0))
    }

    pub fn phase(&self, now: f64) -> DetonationPhase {
        match self.elapsed(now) {
            Some(elapsed) => DetonationPhase::from_elapsed(elapsed),
            None => DetonationPhase::Idle,
        }
    }

    /// Remaining fuse time, while the fuse is burning
    pub fn fuse_remaining(&self, now: f64) -> Option<f64> {
        self.elapsed(now)
            .filter(|&elapsed| elapsed < FUSE_SECONDS)
            .map(|elapsed| FUSE_SECONDS - elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_boundaries() {
        assert_eq!(DetonationPhase::from_elapsed(0.0), DetonationPhase::Fuse);
        assert_eq!(DetonationPhase::from_elapsed(1.99), DetonationPhase::Fuse);
        assert_eq!(DetonationPhase::from_elapsed(2.0), DetonationPhase::Impulse);
        assert_eq!(DetonationPhase::from_elapsed(2.3), DetonationPhase::Settling);
        assert_eq!(DetonationPhase::from_elapsed(7.99), DetonationPhase::Settling);
        assert_eq!(DetonationPhase::from_elapsed(8.0), DetonationPhase::Finished);
    }

    #[test]
    fn test_only_blast_phases_simulate() {
        assert!(!DetonationPhase::Idle.is_simulating());
        assert!(!DetonationPhase::Fuse.is_simulating());
        assert!(DetonationPhase::Impulse.is_simulating());
        assert!(DetonationPhase::Settling.is_simulating());
        assert!(!DetonationPhase::Finished.is_simulating());
    }

    #[test]
    fn test_single_timer() {
        let mut detonation = Detonation::default();
        assert_eq!(detonation.phase(10.0), DetonationPhase::Idle);

        assert!(detonation.arm(10.0));
        assert!(!detonation.arm(11.0));
        assert_eq!(detonation.started_at, Some(10.0));

        detonation.clear();
        assert!(!detonation.is_armed());
        assert!(detonation.arm(20.0));
    }

    #[test]
    fn test_fuse_remaining() {
        let mut detonation = Detonation::default();
        assert_eq!(detonation.fuse_remaining(0.0), None);

        detonation.arm(1.0);
        assert_eq!(detonation.fuse_remaining(1.5), Some(1.5));
        assert_eq!(detonation.fuse_remaining(3.5), None);
    }

    #[test]
    fn test_clock_going_backwards_reads_as_zero() {
        let mut detonation = Detonation::default();
        detonation.arm(5.0);
        assert_eq!(detonation.elapsed(4.0), Some(0.0));
    }
}
