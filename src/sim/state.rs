//! Scene state owned by the animation loop
//!
//! Holds the built scene, the brick records driving it, the detonation
//! timer and the orbit camera.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::OrbitCamera;
use super::detonation::{Detonation, DetonationPhase};
use super::scene::{Scene, build_scene};
use super::wall::{Brick, WallLayout};

/// Notable things that happened during a tick, for audio/HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// Detonate pressed, fuse lit
    Armed,
    /// Detonate pressed while a detonation was already running
    Ignored,
    /// Fuse burnt out, bricks kicked
    Blast,
    /// Detonation window closed, wall restored
    Reset,
}

/// Complete scene state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneState {
    /// Base seed for blast jitter
    pub seed: u64,
    pub layout: WallLayout,
    pub scene: Scene,
    pub bricks: Vec<Brick>,
    pub detonation: Detonation,
    pub camera: OrbitCamera,
    /// Simulation clock (seconds)
    pub time: f64,
    /// Number of detonations so far (mixes into the blast RNG)
    pub detonations: u32,
    #[serde(skip)]
    pub events: Vec<SceneEvent>,
}

impl SceneState {
    pub fn new(layout: WallLayout, seed: u64) -> Self {
        let (scene, bricks) = build_scene(&layout);
        Self {
            seed,
            layout,
            scene,
            bricks,
            detonation: Detonation::default(),
            camera: OrbitCamera::default(),
            time: 0.0,
            detonations: 0,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> DetonationPhase {
        self.detonation.phase(self.time)
    }

    /// RNG for the current detonation's blast
    pub fn blast_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed.wrapping_add(self.detonations as u64))
    }

    /// Point the blast originates from: wall center, just behind the wall
    pub fn blast_center(&self) -> Vec3 {
        let mut center = self.layout.center();
        center.y *= 0.5;
        center.z -= self.layout.brick_size.z;
        center
    }

    /// Put every brick back to its rest pose
    pub fn reset_bricks(&mut self) {
        for brick in &mut self.bricks {
            brick.reset();
        }
    }

    /// Write brick transforms back into their mesh instances
    pub fn sync_meshes(&mut self) {
        for brick in &self.bricks {
            self.scene
                .set_transform(brick.mesh, brick.position, brick.rotation);
        }
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle_and_at_rest() {
        let state = SceneState::new(WallLayout::default(), 42);
        assert_eq!(state.phase(), DetonationPhase::Idle);
        assert!(state.bricks.iter().all(|b| b.at_rest()));
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_blast_center_behind_wall() {
        let state = SceneState::new(WallLayout::default(), 42);
        let center = state.blast_center();
        assert!(center.z < 0.0);
        assert!(center.y > 0.0 && center.y < state.layout.height());
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = SceneState::new(WallLayout::with_size(1, 1), 1);
        state.events.push(SceneEvent::Armed);
        assert_eq!(state.drain_events(), vec![SceneEvent::Armed]);
        assert!(state.drain_events().is_empty());
    }
}
