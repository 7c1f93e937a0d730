use std::sync::{Arc, Mutex};

use super::*;

#[test]
fn dispatches_in_emission_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut hub = GestureHub::new();

    let moves = Arc::clone(&seen);
    hub.on_move(Box::new(move |sample| {
        moves.lock().expect("lock").push(format!("move {:?}", sample.distance));
    }));
    let ends = Arc::clone(&seen);
    hub.on_end(Box::new(move || ends.lock().expect("lock").push("end".into())));

    hub.emit_move(GestureMove::new(0.1, 0.0));
    hub.emit_move(GestureMove::without_distance(0.0));
    hub.emit_end();

    assert_eq!(
        *seen.lock().expect("lock"),
        vec!["move Some(0.1)", "move None", "end"]
    );
}

#[test]
fn detach_drops_every_handler() {
    let calls = Arc::new(Mutex::new(0));
    let mut hub = GestureHub::new();
    let counter = Arc::clone(&calls);
    hub.on_end(Box::new(move || *counter.lock().expect("lock") += 1));
    assert_eq!(hub.handler_count(), 1);

    hub.detach();
    hub.emit_end();

    assert_eq!(hub.handler_count(), 0);
    assert_eq!(*calls.lock().expect("lock"), 0);
}
