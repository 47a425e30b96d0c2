use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`DirtyChannel::subscribe`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn()>;

/// Per-task dirty notification channel.
///
/// Each render task owns one. The viewport subscribes when the task is
/// registered and unsubscribes when it is removed; the task (or an animation
/// mutating it) calls [`emit`](Self::emit) after changing anything that affects
/// its drawing.
///
/// All methods take `&self` so a task can notify from behind a shared borrow.
#[derive(Default)]
pub struct DirtyChannel {
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
    next_id: Cell<u64>,
}

impl DirtyChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn() + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Notifies every listener, synchronously, in subscription order.
    ///
    /// Listeners may subscribe or unsubscribe while being notified; changes take
    /// effect from the next `emit`.
    pub fn emit(&self) {
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();

        for listener in snapshot {
            listener();
        }
    }

    #[inline]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl fmt::Debug for DirtyChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirtyChannel")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Shared "needs redraw" flag.
///
/// Clones share the same flag. Setting it is idempotent; the frame loop
/// consumes it with [`take`](Self::take).
#[derive(Debug, Clone, Default)]
pub struct RedrawFlag(Rc<Cell<bool>>);

impl RedrawFlag {
    pub fn new(initial: bool) -> Self {
        Self(Rc::new(Cell::new(initial)))
    }

    #[inline]
    pub fn mark(&self) {
        self.0.set(true);
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    /// Returns the current value and clears it.
    #[inline]
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }
}
