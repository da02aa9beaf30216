//! Callback tables and the [`LoopWindow`] trait.
//!
//! A callback returns `true` when it served the event, which stops the event from
//! reaching later dispatch stages.

use std::{
    cell::{OnceCell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};

use sdl2::event::Event;

use crate::{
    event::{EventKind, WindowEventKind, WindowId},
    main_loop::LoopHandle,
};

/// Signature shared by every event callback.
pub type EventCallback = dyn FnMut(&Event, &LoopHandle) -> bool;

type Slot = Rc<RefCell<Box<EventCallback>>>;

/// An ordered map from an event key to its callback.
///
/// The table can be modified while one of its callbacks runs; a callback that
/// replaces or clears itself finishes its current call first.
pub struct CallbackTable<K> {
    slots: RefCell<BTreeMap<K, Slot>>,
}

impl<K: Ord + Copy> CallbackTable<K> {
    pub fn new() -> Self {
        Self {
            slots: RefCell::new(BTreeMap::new()),
        }
    }

    /// Sets the callback for `key`, replacing any previous one.
    pub fn set<F>(&self, key: K, callback: F)
    where
        F: FnMut(&Event, &LoopHandle) -> bool + 'static,
    {
        self.slots
            .borrow_mut()
            .insert(key, Rc::new(RefCell::new(Box::new(callback))));
    }

    /// Removes the callback for `key`. Returns whether one was set.
    pub fn clear(&self, key: K) -> bool {
        self.slots.borrow_mut().remove(&key).is_some()
    }

    pub fn contains(&self, key: K) -> bool {
        self.slots.borrow().contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    /// Calls the callback for `key`. Returns `false` if there is none.
    pub fn call(&self, key: K, event: &Event, handle: &LoopHandle) -> bool {
        let slot = self.slots.borrow().get(&key).cloned();
        match slot {
            Some(slot) => {
                let mut callback = slot.borrow_mut();
                (&mut **callback)(event, handle)
            }
            None => false,
        }
    }
}

impl<K: Ord + Copy> Default for CallbackTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// The callback tables of one window, plus its link to the owning main loop.
pub struct WindowCallbacks {
    events: CallbackTable<EventKind>,
    window_events: CallbackTable<WindowEventKind>,
    main_loop: OnceCell<LoopHandle>,
}

impl WindowCallbacks {
    /// Creates the tables for window `id`, with the default close callback
    /// installed: closing the window removes it from its main loop.
    pub fn new(id: WindowId) -> Self {
        let callbacks = Self {
            events: CallbackTable::new(),
            window_events: CallbackTable::new(),
            main_loop: OnceCell::new(),
        };
        callbacks
            .window_events
            .set(WindowEventKind::Close, move |_, main_loop| {
                main_loop.request_removal(id);
                true
            });
        callbacks
    }

    /// Links these callbacks to a main loop. A window can only ever belong to one loop.
    pub(crate) fn attach(&self, handle: &LoopHandle) {
        if let Err(handle) = self.main_loop.set(handle.clone()) {
            let current = self.main_loop.get();
            assert!(
                current.is_some_and(|current| current.same_loop(&handle)),
                "window is already registered with another main loop"
            );
        }
    }

    pub fn main_loop(&self) -> Option<&LoopHandle> {
        self.main_loop.get()
    }

    pub fn events(&self) -> &CallbackTable<EventKind> {
        &self.events
    }

    pub fn window_events(&self) -> &CallbackTable<WindowEventKind> {
        &self.window_events
    }

    fn handle(&self) -> &LoopHandle {
        self.main_loop
            .get()
            .expect("window callback fired before the window was added to a main loop")
    }

    pub(crate) fn dispatch_event(&self, kind: EventKind, event: &Event) -> bool {
        if !self.events.contains(kind) {
            return false;
        }
        self.events.call(kind, event, self.handle())
    }

    pub(crate) fn dispatch_window_event(&self, kind: WindowEventKind, event: &Event) -> bool {
        if !self.window_events.contains(kind) {
            return false;
        }
        self.window_events.call(kind, event, self.handle())
    }
}

/// A window that can be registered with a [`MainLoop`](crate::MainLoop).
pub trait LoopWindow {
    /// The id SDL assigned to this window.
    fn id(&self) -> WindowId;

    fn callbacks(&self) -> &WindowCallbacks;

    /// Sets the callback for events of `kind` addressed to this window.
    fn set_event_callback<F>(&self, kind: EventKind, callback: F)
    where
        F: FnMut(&Event, &LoopHandle) -> bool + 'static,
        Self: Sized,
    {
        self.callbacks().events.set(kind, callback);
    }

    fn clear_event_callback(&self, kind: EventKind) -> bool {
        self.callbacks().events.clear(kind)
    }

    fn has_event_callback(&self, kind: EventKind) -> bool {
        self.callbacks().events.contains(kind)
    }

    /// Sets the callback for window events of `kind`, e.g. close or resize.
    fn set_window_event_callback<F>(&self, kind: WindowEventKind, callback: F)
    where
        F: FnMut(&Event, &LoopHandle) -> bool + 'static,
        Self: Sized,
    {
        self.callbacks().window_events.set(kind, callback);
    }

    fn clear_window_event_callback(&self, kind: WindowEventKind) -> bool {
        self.callbacks().window_events.clear(kind)
    }

    fn has_window_event_callback(&self, kind: WindowEventKind) -> bool {
        self.callbacks().window_events.contains(kind)
    }

    /// The main loop this window is registered with, once it has been added to one.
    fn main_loop(&self) -> Option<&LoopHandle> {
        self.callbacks().main_loop()
    }
}
