use std::sync::Arc;

use parking_lot::Mutex;

use crate::event::ControllerEvent;

pub trait ControllerListener: Send + Sync {
    fn on_event(&self, event: &ControllerEvent);
}

impl<F> ControllerListener for F
where
    F: Fn(&ControllerEvent) + Send + Sync,
{
    fn on_event(&self, event: &ControllerEvent) {
        self(event)
    }
}

/// Listeners registered on a controller.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Mutex<Vec<Arc<dyn ControllerListener>>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: Arc<dyn ControllerListener>) {
        self.listeners.lock().push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Emits an event. All registered listeners are called in registration order.
    pub fn emit(&self, event: &ControllerEvent) {
        // Snapshot so a listener can register another one without deadlocking.
        let listeners = self.listeners.lock().clone();
        for listener in listeners {
            listener.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_emit_reaches_every_listener() {
        let set = ListenerSet::new();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let hits = hits.clone();
            set.add(Arc::new(move |_: &ControllerEvent| {
                hits.fetch_add(1, Ordering::SeqCst);
            }));
        }

        set.emit(&ControllerEvent::InclusionStarted);
        assert_eq!(set.len(), 3);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_emit_without_listeners() {
        let set = ListenerSet::new();
        assert!(set.is_empty());
        set.emit(&ControllerEvent::ExclusionStopped);
    }
}
