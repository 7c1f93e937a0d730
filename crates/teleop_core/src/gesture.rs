//! Gesture source capability and an in-process implementation.

use shared::domain::GestureMove;

pub type MoveHandler = Box<dyn FnMut(GestureMove) + Send>;
pub type EndHandler = Box<dyn FnMut() + Send>;

/// Subscribe/unsubscribe surface of a pointer gesture recognizer.
pub trait GestureSource {
    fn on_move(&mut self, handler: MoveHandler);
    fn on_end(&mut self, handler: EndHandler);
    /// Drops every registered handler. Nothing registered before the call
    /// is invoked afterwards.
    fn detach(&mut self);
}

/// Dispatches gesture notifications synchronously, in emission order, to the
/// registered handlers.
#[derive(Default)]
pub struct GestureHub {
    move_handlers: Vec<MoveHandler>,
    end_handlers: Vec<EndHandler>,
}

impl GestureHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit_move(&mut self, sample: GestureMove) {
        for handler in &mut self.move_handlers {
            handler(sample);
        }
    }

    pub fn emit_end(&mut self) {
        for handler in &mut self.end_handlers {
            handler();
        }
    }

    pub fn handler_count(&self) -> usize {
        self.move_handlers.len() + self.end_handlers.len()
    }
}

impl GestureSource for GestureHub {
    fn on_move(&mut self, handler: MoveHandler) {
        self.move_handlers.push(handler);
    }

    fn on_end(&mut self, handler: EndHandler) {
        self.end_handlers.push(handler);
    }

    fn detach(&mut self) {
        self.move_handlers.clear();
        self.end_handlers.clear();
    }
}

#[cfg(test)]
#[path = "tests/gesture_tests.rs"]
mod tests;
