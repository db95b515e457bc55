//! Latest-value store shared between a listener and the renderer.
//!
//! The store is owned by the view and lives on its thread. Every change is a
//! full replacement followed by a notification of all subscribers.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Subscriber<T> = Box<dyn FnMut(Option<&T>, bool)>;

pub struct Store<T> {
    value: Option<T>,
    connected: bool,
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
    next_id: usize,
    torn_down: bool,
}

impl<T> Store<T> {
    pub fn new() -> Self {
        Self {
            value: None,
            connected: false,
            subscribers: vec![],
            next_id: 0,
            torn_down: false,
        }
    }

    pub fn current(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn replace(&mut self, value: T) {
        if self.torn_down {
            return;
        }
        self.value = Some(value);
        self.notify();
    }

    pub fn set_connected(&mut self, connected: bool) {
        if self.torn_down || self.connected == connected {
            return;
        }
        self.connected = connected;
        self.notify();
    }

    /// Registers `callback` and calls it once with the current contents.
    pub fn subscribe(
        &mut self,
        mut callback: impl FnMut(Option<&T>, bool) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        if self.torn_down {
            return id;
        }
        callback(self.value.as_ref(), self.connected);
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Resets the value to absent and drops all subscribers. Later mutations
    /// are ignored.
    pub fn teardown(&mut self) {
        self.value = None;
        self.connected = false;
        self.subscribers.clear();
        self.torn_down = true;
    }

    fn notify(&mut self) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(self.value.as_ref(), self.connected);
        }
    }
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}
