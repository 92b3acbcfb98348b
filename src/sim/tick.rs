//! Fixed timestep simulation tick
//!
//! Advances the detonation sequence and brick physics, then mirrors the
//! bricks into their mesh instances.

use super::detonation::DetonationPhase;
use super::physics::{apply_blast, step_brick};
use super::state::{SceneEvent, SceneState};
use crate::consts::*;

/// Input commands for a single tick (one-shot flags)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Detonate button pressed
    pub detonate: bool,
    /// Reset View button pressed
    pub reset_view: bool,
}

impl TickInput {
    fn clear_one_shots(&mut self) {
        self.detonate = false;
        self.reset_view = false;
    }
}

/// Advance the scene by one fixed timestep
pub fn tick(state: &mut SceneState, input: &TickInput, dt: f32) {
    state.time += dt as f64;

    if input.reset_view {
        state.camera.reset();
        log::info!("View reset");
    }

    if input.detonate {
        if state.detonation.arm(state.time) {
            state.detonations += 1;
            state.events.push(SceneEvent::Armed);
            log::info!("Detonation armed at t={:.2}s", state.time);
        } else {
            state.events.push(SceneEvent::Ignored);
            log::debug!("Detonation already in progress, ignoring");
        }
    }

    let phase = state.phase();
    if phase.is_simulating() {
        if !state.detonation.blasted {
            blast(state);
        }
        for brick in &mut state.bricks {
            step_brick(brick, dt);
        }
    } else if phase == DetonationPhase::Finished {
        state.detonation.clear();
        state.reset_bricks();
        state.events.push(SceneEvent::Reset);
        log::info!("Detonation finished, wall restored");
    } else {
        state.reset_bricks();
    }

    state.sync_meshes();
}

/// Kick every brick that is not yet flying
fn blast(state: &mut SceneState) {
    let center = state.blast_center();
    let mut rng = state.blast_rng();
    for brick in state.bricks.iter_mut().filter(|b| !b.active) {
        apply_blast(brick, center, &mut rng);
    }
    state.detonation.blasted = true;
    state.events.push(SceneEvent::Blast);
    log::info!("Blast! {} bricks in flight", state.bricks.len());
}

/// Fixed-timestep driver fed with variable frame deltas
#[derive(Debug, Clone, Default)]
pub struct Stepper {
    accumulator: f32,
}

impl Stepper {
    /// Run as many fixed ticks as `frame_dt` covers (capped at
    /// `MAX_SUBSTEPS`). One-shot inputs are consumed by the first tick.
    /// Time left over after hitting the cap is dropped, so slow frames
    /// run in slow motion instead of queueing ticks for later.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, state: &mut SceneState, input: &mut TickInput, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, input, SIM_DT);
            input.clear_one_shots();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Forget any accumulated time, e.g. after the page was hidden
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
