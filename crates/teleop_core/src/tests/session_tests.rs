use std::f64::consts::FRAC_PI_2;

use shared::domain::{GestureMove, VelocityCommand};

use super::*;
use crate::{gesture::GestureHub, publisher::RecordingPublisher, speed::SpeedBounds};

fn session_with_limit(initial: f64) -> (ControlSession<GestureHub>, RecordingPublisher) {
    let recorder = RecordingPublisher::new();
    let speed = SpeedControl::new(SpeedBounds::default(), initial).expect("speed control");
    let session = ControlSession::new(GestureHub::new(), speed, Arc::new(recorder.clone()));
    (session, recorder)
}

#[test]
fn starts_idle_and_attached() {
    let (session, recorder) = session_with_limit(5.0);
    assert_eq!(session.state(), TrackingState::Idle);
    assert!(session.is_attached());
    assert!(recorder.commands().is_empty());
}

#[test]
fn move_then_release_publishes_one_command_then_one_stop() {
    let (mut session, recorder) = session_with_limit(5.0);

    session.source_mut().emit_move(GestureMove::new(1.0, 0.0));
    assert_eq!(session.state(), TrackingState::Active);
    session.source_mut().emit_end();
    assert_eq!(session.state(), TrackingState::Idle);

    let commands = recorder.take();
    assert_eq!(commands.len(), 2);
    assert!((commands[0].linear.x - 0.1).abs() < 1e-12);
    assert!(!commands[0].is_stop());
    assert_eq!(commands[1], VelocityCommand::STOP);
}

#[test]
fn every_move_is_published_in_order() {
    let (mut session, recorder) = session_with_limit(5.0);
    for magnitude in [0.2, 0.4, 0.6] {
        session
            .source_mut()
            .emit_move(GestureMove::new(magnitude, 0.0));
    }

    let xs: Vec<f64> = recorder.take().iter().map(|c| c.linear.x).collect();
    assert_eq!(xs.len(), 3);
    assert!(xs[0] < xs[1] && xs[1] < xs[2]);
}

#[test]
fn ticks_without_distance_publish_nothing() {
    let (mut session, recorder) = session_with_limit(5.0);
    session.source_mut().emit_move(GestureMove::without_distance(1.0));
    session.source_mut().emit_move(GestureMove::new(0.0, 1.0));

    assert!(recorder.commands().is_empty());
    assert_eq!(session.state(), TrackingState::Idle);
}

#[test]
fn release_while_idle_still_publishes_exactly_one_stop() {
    let (mut session, recorder) = session_with_limit(5.0);
    session.source_mut().emit_end();
    session.source_mut().emit_end();

    assert_eq!(
        recorder.take(),
        vec![VelocityCommand::STOP, VelocityCommand::STOP]
    );
}

#[test]
fn limit_change_mid_gesture_applies_to_next_move() {
    let (mut session, recorder) = session_with_limit(2.0);

    session
        .source_mut()
        .emit_move(GestureMove::new(0.5, FRAC_PI_2));
    assert_eq!(session.set_speed_limit(3.0), Ok(3.0));
    session
        .source_mut()
        .emit_move(GestureMove::new(0.5, FRAC_PI_2));

    let commands = recorder.take();
    assert_eq!(commands.len(), 2);
    assert!((commands[0].linear.y - 0.1 * (2.0 / 5.0) * 0.5).abs() < 1e-12);
    assert!((commands[1].linear.y - 0.1 * (3.0 / 5.0) * 0.5).abs() < 1e-12);
    assert_eq!(session.state(), TrackingState::Active);
}

#[test]
fn rebinding_replaces_handlers_instead_of_stacking_them() {
    let (mut session, recorder) = session_with_limit(2.0);
    session.set_speed_limit(2.5).expect("set");
    session.set_speed_limit(1.5).expect("set");
    assert_eq!(session.source_mut().handler_count(), 2);

    session.source_mut().emit_move(GestureMove::new(1.0, 0.0));
    assert_eq!(recorder.take().len(), 1);
}

#[test]
fn move_handler_reads_limit_without_rebinding() {
    let (mut session, recorder) = session_with_limit(2.0);
    session.source_mut().emit_move(GestureMove::new(1.0, 0.0));

    let handlers = session.source_mut().handler_count();
    session.speed_control().set(3.0).expect("set");
    assert_eq!(session.source_mut().handler_count(), handlers);

    session.source_mut().emit_move(GestureMove::new(1.0, 0.0));
    let commands = recorder.take();
    assert_eq!(commands.len(), 2);
    assert!((commands[0].linear.x - 0.04).abs() < 1e-12);
    assert!((commands[1].linear.x - 0.06).abs() < 1e-12);
}

#[test]
fn limit_change_does_not_republish() {
    let (mut session, recorder) = session_with_limit(2.0);
    session.source_mut().emit_move(GestureMove::new(1.0, 0.0));
    session.set_speed_limit(3.0).expect("set");
    assert_eq!(recorder.take().len(), 1);
    assert_eq!(session.speed_limit(), 3.0);
}

#[test]
fn shutdown_detaches_all_handlers() {
    let (mut session, recorder) = session_with_limit(5.0);
    session.shutdown();
    assert!(!session.is_attached());
    assert_eq!(session.source_mut().handler_count(), 0);

    session.source_mut().emit_move(GestureMove::new(1.0, 0.0));
    session.source_mut().emit_end();
    assert!(recorder.commands().is_empty());

    session.set_speed_limit(2.0).expect("set");
    assert_eq!(session.source_mut().handler_count(), 0);
}
