use super::*;

const ALL: [Ease; 5] = [
    Ease::Linear,
    Ease::OutQuad,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::InOutSine,
];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert!(ease.apply(0.0).abs() < 1e-12, "{ease:?}");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-12, "{ease:?}");
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

#[test]
fn in_out_sine_is_symmetric_about_midpoint() {
    let e = Ease::InOutSine;
    assert!((e.apply(0.5) - 0.5).abs() < 1e-12);
    assert!((e.apply(0.2) + e.apply(0.8) - 1.0).abs() < 1e-12);
}

#[test]
fn out_of_range_progress_is_clamped() {
    assert_eq!(Ease::OutQuad.apply(-1.0), 0.0);
    assert_eq!(Ease::OutQuad.apply(2.0), 1.0);
}

#[test]
fn power_eases_match_their_closed_forms() {
    assert!((Ease::OutQuad.apply(0.5) - 0.75).abs() < 1e-12);
    assert!((Ease::OutCubic.apply(0.5) - 0.875).abs() < 1e-12);
    assert!((Ease::InOutCubic.apply(0.25) - 0.0625).abs() < 1e-12);
    assert!((Ease::InOutCubic.apply(0.75) - 0.9375).abs() < 1e-12);
}
