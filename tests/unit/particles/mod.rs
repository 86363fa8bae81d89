use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn field(n: usize) -> ParticleField {
    ParticleField::new_scattered(n, Viewport::new(800, 600), &mut StdRng::seed_from_u64(1))
}

#[test]
fn buffer_is_three_floats_per_particle() {
    for n in [1usize, 7, 100, 1400] {
        let mut f = field(n);
        assert_eq!(f.buffer().len(), 3 * n);
        f.assign_burst(&mut StdRng::seed_from_u64(2));
        f.converge(CONVERGENCE_FACTOR);
        assert_eq!(f.buffer().len(), 3 * n);
        f.scatter(Viewport::new(10, 10), &mut StdRng::seed_from_u64(3));
        assert_eq!(f.buffer().len(), 3 * n);
    }
}

#[test]
fn scatter_stays_inside_viewport_and_depth() {
    let mut f = field(100);
    f.scatter(Viewport::new(800, 600), &mut StdRng::seed_from_u64(9));
    for p in f.particles() {
        assert!(p.position.x >= -400.0 && p.position.x <= 400.0);
        assert!(p.position.y >= -300.0 && p.position.y <= 300.0);
        assert!(p.position.z >= -200.0 && p.position.z <= 200.0);
        assert!(p.target.is_none());
    }
}

#[test]
fn scatter_mirrors_positions_into_buffer() {
    let f = field(5);
    for (i, p) in f.particles().iter().enumerate() {
        let b = &f.buffer().as_slice()[i * 3..i * 3 + 3];
        assert_eq!(b, &[p.position.x as f32, p.position.y as f32, p.position.z as f32]);
    }
}

#[test]
fn cyclic_assignment_wraps_by_set_size() {
    let set: Vec<Vec3> = (0..7).map(|i| Vec3::new(i as f64, 0.0, 0.0)).collect();
    let mut f = field(10);
    assert!(f.assign_cyclic(&set, Vec3::ZERO));
    assert_eq!(f.particles()[8].target, Some(set[1]));
    assert_eq!(f.particles()[6].target, Some(set[6]));
    assert_eq!(f.particles()[7].target, Some(set[0]));
}

#[test]
fn cyclic_assignment_applies_offset() {
    let set = vec![Vec3::new(1.0, 2.0, 3.0)];
    let mut f = field(2);
    f.assign_cyclic(&set, Vec3::new(120.0, -50.0, 0.0));
    assert_eq!(f.particles()[1].target, Some(Vec3::new(121.0, -48.0, 3.0)));
}

#[test]
fn empty_set_skips_assignment() {
    let mut f = field(4);
    let keep = vec![Vec3::new(5.0, 5.0, 5.0)];
    f.assign_cyclic(&keep, Vec3::ZERO);
    assert!(!f.assign_cyclic(&[], Vec3::ZERO));
    for p in f.particles() {
        assert_eq!(p.target, Some(keep[0]));
    }
}

#[test]
fn one_converge_step_moves_eight_percent() {
    let mut f = field(3);
    let target = Vec3::new(100.0, -40.0, 20.0);
    f.assign_cyclic(&[target], Vec3::ZERO);
    let before: Vec<Vec3> = f.particles().iter().map(|p| p.position).collect();
    f.converge(CONVERGENCE_FACTOR);
    for (old, p) in before.iter().zip(f.particles()) {
        let expected = *old + (target - *old) * 0.08;
        assert!(p.position.distance(expected) < 1e-9);
    }
}

#[test]
fn distance_to_target_contracts_by_092_each_step() {
    let mut f = field(1);
    let target = Vec3::new(300.0, 300.0, -100.0);
    f.assign_cyclic(&[target], Vec3::ZERO);
    let mut d = f.particles()[0].position.distance(target);
    for _ in 0..200 {
        f.converge(CONVERGENCE_FACTOR);
        let next = f.particles()[0].position.distance(target);
        assert!(next < d);
        assert!((next - d * 0.92).abs() <= 1e-9 * d.max(1.0));
        d = next;
    }
    assert!(d < 1e-3);
}

#[test]
fn converge_skips_untargeted_particles() {
    let mut f = field(2);
    let before = f.particles()[0].position;
    f.converge(CONVERGENCE_FACTOR);
    assert_eq!(f.particles()[0].position, before);
}

#[test]
fn burst_targets_are_200_to_600_units_away_in_plane() {
    let mut f = field(50);
    f.assign_burst(&mut StdRng::seed_from_u64(4));
    for p in f.particles() {
        let t = p.target.unwrap();
        let dx = t.x - p.position.x;
        let dy = t.y - p.position.y;
        let planar = (dx * dx + dy * dy).sqrt();
        assert!((200.0 - 1e-9..600.0 + 1e-9).contains(&planar));
        assert!(t.z >= -300.0 && t.z <= 300.0);
    }
}

#[test]
fn dirty_flag_is_consumed_once() {
    let mut f = field(3);
    assert!(f.buffer_mut().take_dirty());
    assert!(!f.buffer().is_dirty());
    f.converge(CONVERGENCE_FACTOR);
    assert!(f.buffer_mut().take_dirty());
}
