use std::f64::consts::{FRAC_PI_2, PI};

use super::*;

const EPS: f64 = 1e-12;

fn event(magnitude: f64, angle: f64) -> GestureEvent {
    GestureEvent { magnitude, angle }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn full_deflection_forward_at_reference_limit() {
    let cmd = on_move(event(1.0, 0.0), 5.0);
    assert_close(cmd.linear.x, 0.1);
    assert_eq!(cmd.linear.y, 0.0);
    assert_eq!(cmd.angular.z, 0.0);
}

#[test]
fn half_deflection_sideways_at_half_limit() {
    let cmd = on_move(event(0.5, FRAC_PI_2), 2.5);
    assert_close(cmd.linear.x, 0.0);
    assert_close(cmd.linear.y, 0.025);
}

#[test]
fn matches_formula_over_operator_range() {
    let limits = [1.0, 1.55, 2.0, 2.75, 3.0];
    let magnitudes = [0.0, 0.1, 0.33, 0.8, 1.0];
    let angles = [0.0, 0.7, FRAC_PI_2, PI, 4.0, 2.0 * PI - 0.01];

    for limit in limits {
        for magnitude in magnitudes {
            for angle in angles {
                let cmd = on_move(event(magnitude, angle), limit);
                let scaled = 0.1 * (limit / 5.0) * magnitude;
                assert_close(cmd.linear.x, scaled * angle.cos());
                assert_close(cmd.linear.y, scaled * angle.sin());
                assert_eq!(cmd.linear.z, 0.0);
                assert_eq!(cmd.angular.x, 0.0);
                assert_eq!(cmd.angular.y, 0.0);
                assert_eq!(cmd.angular.z, 0.0);
            }
        }
    }
}

#[test]
fn command_scales_with_limit_ratio() {
    let slow = on_move(event(0.7, 0.9), 2.0);
    let fast = on_move(event(0.7, 0.9), 3.0);
    assert_close(fast.linear.x / slow.linear.x, 1.5);
    assert_close(fast.linear.y / slow.linear.y, 1.5);
}

#[test]
fn out_of_range_input_is_not_clamped() {
    let cmd = on_move(event(2.0, 0.0), 10.0);
    assert_close(cmd.linear.x, 0.4);
}

#[test]
fn end_is_always_the_zero_command() {
    let first = on_end();
    let second = on_end();
    assert_eq!(first, second);
    assert!(first.is_stop());
    assert_eq!(first, VelocityCommand::default());
}
