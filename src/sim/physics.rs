//! Brick physics
//!
//! Explicit Euler integration under gravity with per-tick drag, plus a
//! ground plane at y = 0 that bounces and rubs bricks on contact.

use glam::Vec3;
use rand::Rng;

use super::wall::Brick;
use crate::consts::*;

/// Advance one active brick by `dt` seconds
pub fn step_brick(brick: &mut Brick, dt: f32) {
    if !brick.active {
        return;
    }

    brick.velocity.y -= GRAVITY * dt;
    brick.velocity *= AIR_DRAG;
    brick.angular_velocity *= ANGULAR_DRAG;

    brick.position += brick.velocity * dt;
    brick.rotation += brick.angular_velocity * dt;

    resolve_ground_contact(brick);
}

/// Push a brick out of the ground and damp it. Returns true on contact.
pub fn resolve_ground_contact(brick: &mut Brick) -> bool {
    let floor = brick.half_size.y;
    if brick.position.y >= floor {
        return false;
    }

    brick.position.y = floor;
    brick.velocity.y *= GROUND_BOUNCE;
    brick.velocity.x *= GROUND_FRICTION;
    brick.velocity.z *= GROUND_FRICTION;
    brick.angular_velocity *= GROUND_FRICTION;
    true
}

/// Blast speed at `distance` from the blast center
#[inline]
pub fn blast_speed(distance: f32) -> f32 {
    BLAST_STRENGTH / (1.0 + distance / BLAST_FALLOFF)
}

/// Kick a brick away from `center` and mark it active
pub fn apply_blast<R: Rng>(brick: &mut Brick, center: Vec3, rng: &mut R) {
    let offset = brick.position - center;
    let direction = offset.try_normalize().unwrap_or(Vec3::Z);

    let jitter: f32 = rng.random_range(0.7..1.3);
    let speed = blast_speed(offset.length()) * jitter / brick.mass.max(0.01);
    let lift = BLAST_LIFT * rng.random_range(0.5_f32..1.5);

    brick.velocity = direction * speed + Vec3::Y * lift;
    brick.angular_velocity = Vec3::new(
        rng.random_range(-BLAST_SPIN..BLAST_SPIN),
        rng.random_range(-BLAST_SPIN..BLAST_SPIN),
        rng.random_range(-BLAST_SPIN..BLAST_SPIN),
    );
    brick.active = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn brick_at(position: Vec3) -> Brick {
        Brick::new(0, position, Vec3::new(BRICK_WIDTH, BRICK_HEIGHT, BRICK_DEPTH))
    }

    #[test]
    fn test_inactive_brick_does_not_move() {
        let mut brick = brick_at(Vec3::new(0.0, 3.0, 0.0));
        brick.velocity = Vec3::X;
        step_brick(&mut brick, SIM_DT);
        assert_eq!(brick.position, Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut brick = brick_at(Vec3::new(0.0, 3.0, 0.0));
        brick.active = true;
        step_brick(&mut brick, SIM_DT);
        assert!(brick.velocity.y < 0.0);
        assert!(brick.position.y < 3.0);
    }

    #[test]
    fn test_brick_never_sinks_below_ground() {
        let mut brick = brick_at(Vec3::new(0.0, 3.0, 0.0));
        brick.active = true;
        brick.velocity = Vec3::new(2.0, -20.0, 1.0);
        for _ in 0..600 {
            step_brick(&mut brick, SIM_DT);
            assert!(brick.position.y >= brick.half_size.y);
        }
    }

    #[test]
    fn test_no_contact_above_ground() {
        let mut brick = brick_at(Vec3::new(0.0, 1.0, 0.0));
        brick.velocity = Vec3::new(1.0, -1.0, 1.0);
        assert!(!resolve_ground_contact(&mut brick));
        assert_eq!(brick.velocity, Vec3::new(1.0, -1.0, 1.0));
    }

    #[test]
    fn test_blast_pushes_away_from_center() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut brick = brick_at(Vec3::new(3.0, 1.0, 0.0));
        apply_blast(&mut brick, Vec3::new(0.0, 1.0, 0.0), &mut rng);

        assert!(brick.active);
        assert!(brick.velocity.x > 0.0);
        assert!(brick.velocity.y > 0.0);
        assert!(brick.angular_velocity.abs().max_element() <= BLAST_SPIN);
    }

    #[test]
    fn test_blast_at_center_falls_back_to_forward() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut brick = brick_at(Vec3::new(0.0, 1.0, 0.0));
        apply_blast(&mut brick, Vec3::new(0.0, 1.0, 0.0), &mut rng);
        assert!(brick.velocity.z > 0.0);
        assert!(brick.velocity.is_finite());
    }

    #[test]
    fn test_blast_speed_falls_off() {
        assert!(blast_speed(0.0) > blast_speed(2.0));
        assert!(blast_speed(2.0) > blast_speed(10.0));
        assert!((blast_speed(BLAST_FALLOFF) - BLAST_STRENGTH / 2.0).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn ground_bounce_damps_velocity(
            depth in 0.001f32..0.2,
            vx in -20.0f32..20.0,
            vy in -20.0f32..20.0,
            vz in -20.0f32..20.0,
        ) {
            let mut brick = brick_at(Vec3::ZERO);
            brick.position.y = brick.half_size.y - depth;
            brick.velocity = Vec3::new(vx, vy, vz);

            prop_assert!(resolve_ground_contact(&mut brick));
            prop_assert_eq!(brick.velocity.y, vy * GROUND_BOUNCE);
            prop_assert_eq!(brick.velocity.x, vx * GROUND_FRICTION);
            prop_assert_eq!(brick.velocity.z, vz * GROUND_FRICTION);
            prop_assert_eq!(brick.position.y, brick.half_size.y);
        }
    }
}
