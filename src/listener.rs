use crate::store::Store;
use crate::transport::{Event, EventSource};
use serde::de::DeserializeOwned;
use stream_cancel::Trigger;

/// Applies transport events to the store it owns. The listener is the only
/// writer; closing it tears the connection and the store down together.
pub struct Listener<T, S> {
    source: S,
    trigger: Option<Trigger>,
    store: Store<T>,
}

impl<T, S> Listener<T, S> {
    pub fn new(source: S, trigger: Trigger) -> Self {
        Self {
            source,
            trigger: Some(trigger),
            store: Store::new(),
        }
    }

    pub fn store(&self) -> &Store<T> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store<T> {
        &mut self.store
    }

    pub fn is_closed(&self) -> bool {
        self.trigger.is_none()
    }

    /// Closes the connection. Only the first call has an effect.
    pub fn close(&mut self) {
        if let Some(trigger) = self.trigger.take() {
            log::debug!("closing listener");
            trigger.cancel();
            self.store.teardown();
        }
    }
}

impl<T: DeserializeOwned, S: EventSource> Listener<T, S> {
    /// Applies every pending event and returns how many were seen.
    pub fn poll(&mut self) -> usize {
        let mut count = 0;
        while !self.is_closed() {
            let Some(event) = self.source.try_next() else {
                break;
            };
            self.handle(event);
            count += 1;
        }
        count
    }

    pub fn handle(&mut self, event: Event) {
        if self.is_closed() {
            return;
        }

        match event {
            Event::Open => self.store.set_connected(true),
            Event::Close => self.store.set_connected(false),
            Event::Error(e) => log::error!("connection error: {e}"),
            Event::Message(payload) => match payload.decode::<T>() {
                Ok(value) => self.store.replace(value),
                Err(e) => log::warn!("dropping message: {e}"),
            },
        }
    }
}

impl<T, S> Drop for Listener<T, S> {
    fn drop(&mut self) {
        self.close();
    }
}
