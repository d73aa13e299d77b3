// animate.rs - Per-frame particle motion
//
// Local motion is a function of absolute time and the immutable generation
// fields, so frame-rate jitter never accumulates. Ornaments are the one
// exception: they fall a fixed step per frame and recycle at the floor.

use super::{Category, Particle, Star};
use crate::rng::SceneRng;
use crate::world::SceneMetrics;

/// Local (pre-rotation) position for one frame
#[derive(Debug, Clone, Copy)]
struct Local {
    x: f32,
    y: f32,
    z: f32,
}

/// Advance every particle to time `now` (ms) under tree rotation `rotation`.
pub fn step_particles(
    particles: &mut [Particle],
    m: &SceneMetrics,
    rotation: f32,
    now: f64,
    rng: &mut SceneRng,
) {
    let (sin, cos) = rotation.sin_cos();

    for p in particles.iter_mut() {
        let local = local_motion(p, m, now, rng);

        if p.category == Category::Topper {
            // Screen-locked: the tree spins beneath the heart
            p.x = local.x;
            p.z = local.z;
        } else {
            p.x = local.x * cos - local.z * sin;
            p.z = local.z * cos + local.x * sin;
        }

        p.y_offset = local.y;
    }
}

fn local_motion(p: &mut Particle, m: &SceneMetrics, now: f64, rng: &mut SceneRng) -> Local {
    match p.category {
        Category::Ornament => {
            p.y += p.speed;
            if p.y > m.ornament_floor() {
                respawn_ornament(p, m, rng);
            }
            Local { x: p.original_x, y: p.y, z: p.original_z }
        }
        Category::Base => {
            let wave = (now * 0.001 + p.orbit_radius as f64 * 0.005).sin() as f32;
            Local { x: p.original_x, y: p.y + wave, z: p.original_z }
        }
        Category::Topper => {
            let beat = (now * 0.003).sin() as f32;
            Local {
                x: p.original_x * (1.0 + 0.03 * beat * beat),
                y: p.y,
                z: p.original_z,
            }
        }
        Category::Tree => {
            let sway = (now * 0.002 + p.initial_angle as f64).sin() as f32;
            Local {
                x: p.original_x,
                y: p.y + sway * (p.orbit_radius / 100.0),
                z: p.original_z,
            }
        }
    }
}

/// Re-enter at the top, same distance from the trunk, new bearing.
pub fn respawn_ornament(p: &mut Particle, m: &SceneMetrics, rng: &mut SceneRng) {
    let angle = rng.angle();
    p.y = m.ornament_ceiling();
    p.initial_angle = angle;
    p.original_x = angle.cos() * p.orbit_radius;
    p.original_z = angle.sin() * p.orbit_radius;
}

/// Drift stars sideways, wrapping at 1.5x the canvas width.
pub fn step_stars(stars: &mut [Star], width: f32) {
    let limit = width * 1.5;
    for s in stars.iter_mut() {
        s.x += s.speed;
        if s.x > limit {
            s.x = -limit;
        }
        if s.x < -limit {
            s.x = limit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Color;

    fn metrics() -> SceneMetrics {
        SceneMetrics::new(800.0, 600.0)
    }

    fn particle(category: Category, x: f32, y: f32, z: f32) -> Particle {
        Particle::new(category, x, y, z, 1.0, Color::WHITE).with_orbit(x.hypot(z), z.atan2(x))
    }

    #[test]
    fn topper_ignores_rotation() {
        let mut ps = vec![
            particle(Category::Topper, 10.0, -200.0, 2.0),
            particle(Category::Tree, 10.0, 0.0, 2.0),
        ];
        let mut rng = SceneRng::new(1);
        // sin(0) = 0, so the heartbeat is at rest
        step_particles(&mut ps, &metrics(), 0.01, 0.0, &mut rng);

        assert_eq!((ps[0].x, ps[0].z), (10.0, 2.0));
        assert!(ps[1].x != 10.0 && ps[1].z != 2.0);
    }

    #[test]
    fn rotation_uses_local_coordinates() {
        let mut ps = vec![particle(Category::Base, 100.0, 0.0, 0.0)];
        let mut rng = SceneRng::new(1);
        let m = metrics();
        // Stepping many times at the same rotation must not compound
        for _ in 0..50 {
            step_particles(&mut ps, &m, std::f32::consts::FRAC_PI_2, 0.0, &mut rng);
        }
        assert!(ps[0].x.abs() < 1e-3);
        assert!((ps[0].z - 100.0).abs() < 1e-3);
        assert_eq!(ps[0].original_x, 100.0);
    }

    #[test]
    fn generation_fields_are_immutable() {
        let mut ps = vec![
            particle(Category::Tree, 50.0, 10.0, -30.0),
            particle(Category::Base, 300.0, 400.0, 10.0),
            particle(Category::Topper, 5.0, -240.0, 1.0),
        ];
        let before: Vec<(f32, f32)> = ps.iter().map(|p| (p.orbit_radius, p.initial_angle)).collect();
        let mut rng = SceneRng::new(9);
        let m = metrics();
        for frame in 0..500 {
            step_particles(&mut ps, &m, frame as f32 * 0.003, 1.7e12 + frame as f64 * 16.7, &mut rng);
        }
        let after: Vec<(f32, f32)> = ps.iter().map(|p| (p.orbit_radius, p.initial_angle)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn tree_bob_scales_with_orbit() {
        let mut ps = vec![
            particle(Category::Tree, 10.0, 0.0, 0.0),
            particle(Category::Tree, 300.0, 0.0, 0.0),
        ];
        // initial_angle 0 for both; sin(now * 0.002) = 1 at now = π/0.004
        let now = std::f64::consts::PI / 0.004;
        step_particles(&mut ps, &metrics(), 0.0, now, &mut SceneRng::new(3));
        assert!((ps[0].y_offset - 0.1).abs() < 1e-3);
        assert!((ps[1].y_offset - 3.0).abs() < 1e-3);
        assert_eq!(ps[1].y, 0.0);
    }

    #[test]
    fn ornament_respawns_at_top_same_orbit() {
        let m = metrics();
        let mut p = particle(Category::Ornament, 120.0, m.ornament_floor() + 5.0, 50.0).with_speed(0.5);
        let orbit = p.orbit_radius;
        let mut rng = SceneRng::new(77);

        step_particles(std::slice::from_mut(&mut p), &m, 0.0, 0.0, &mut rng);

        assert_eq!(p.y, m.ornament_ceiling());
        assert_eq!(p.y_offset, m.ornament_ceiling());
        assert_eq!(p.orbit_radius, orbit);
        assert!((p.local_radius() - orbit).abs() < 1e-3);
    }

    #[test]
    fn ornament_falls_by_its_speed() {
        let m = metrics();
        let mut p = particle(Category::Ornament, 0.0, 0.0, 0.0).with_speed(0.4);
        let mut rng = SceneRng::new(5);
        for _ in 0..10 {
            step_particles(std::slice::from_mut(&mut p), &m, 0.0, 0.0, &mut rng);
        }
        assert!((p.y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn stars_wrap_horizontally() {
        let mut stars = vec![
            Star { x: 1199.99, y: 0.0, z: 1500.0, radius: 1.0, color: Color::WHITE, speed: 0.05, phase: 0.0 },
            Star { x: -1199.99, y: 0.0, z: 1500.0, radius: 1.0, color: Color::WHITE, speed: -0.05, phase: 0.0 },
        ];
        step_stars(&mut stars, 800.0);
        assert_eq!(stars[0].x, -1200.0);
        assert_eq!(stars[1].x, 1200.0);
    }
}
