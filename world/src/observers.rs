//! Change notification for drivers that render or record the world.

use std::fmt;

use crate::World;

/// Receives a read-only snapshot after every externally visible change.
///
/// Observers cannot mutate the world from inside the callback; they get a
/// shared borrow only.
pub trait WorldObserver {
    /// Called synchronously, in registration order, after a change.
    fn on_world_changed(&mut self, world: &World);
}

impl<F> WorldObserver for F
where
    F: FnMut(&World),
{
    fn on_world_changed(&mut self, world: &World) {
        self(world);
    }
}

/// Handle returned on registration, used to unregister later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: u64,
    entries: Vec<(ObserverId, Box<dyn WorldObserver>)>,
}

impl ObserverRegistry {
    pub(crate) fn register(&mut self, observer: Box<dyn WorldObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn notify_all(&mut self, world: &World) {
        for (_, observer) in &mut self.entries {
            observer.on_world_changed(world);
        }
    }

    pub(crate) fn notify_one(&mut self, id: ObserverId, world: &World) {
        if let Some((_, observer)) = self.entries.iter_mut().find(|(entry_id, _)| *entry_id == id) {
            observer.on_world_changed(world);
        }
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("next_id", &self.next_id)
            .field("observers", &self.entries.len())
            .finish()
    }
}
