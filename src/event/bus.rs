use std::cell::RefCell;
use crate::event::{EditorEvent, EventHandler};

/// A simple event bus for broadcasting editor events to registered handlers.
///
/// Handlers subscribe once per session and read whatever state they need
/// when an event arrives; nothing is re-registered when state changes.
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    /// Drop every handler; used on session teardown
    pub fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }

    /// Emit an event to all registered handlers
    pub fn emit(&self, event: &EditorEvent) {
        for handler in &mut *self.handlers.borrow_mut() {
            handler.handle_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    struct Counter(Rc<RefCell<usize>>);

    impl EventHandler for Counter {
        fn handle_event(&mut self, _event: &EditorEvent) {
            *self.0.borrow_mut() += 1;
        }
    }

    #[test]
    fn test_each_handler_sees_each_event_once() {
        let bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));
        bus.subscribe(Box::new(Counter(count.clone())));
        bus.subscribe(Box::new(Counter(count.clone())));

        bus.emit(&EditorEvent::SceneCleared);
        assert_eq!(*count.borrow(), 2);

        bus.clear();
        bus.emit(&EditorEvent::SceneCleared);
        assert_eq!(*count.borrow(), 2);
    }
}
