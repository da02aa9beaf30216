//! The main loop.
//!
//! [`MainLoop`] owns a set of named windows and dispatches every event it receives
//! through, in order: the global event handler, the loop's own per-type callbacks,
//! the destination window's per-type callbacks and, for window events, the
//! destination window's window-event callbacks. The first callback that returns
//! `true` ends dispatch for that event; events nobody serves are dropped.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::{Rc, Weak},
};

use log::{debug, error, info, trace, warn};
use sdl2::{EventPump, event::Event};
use serde::{Deserialize, Serialize};

use crate::{
    Platform, Window,
    callbacks::{CallbackTable, EventCallback, LoopWindow},
    error::Result,
    event::{EventKind, EventSource, WindowEventKind, WindowId, window_id},
};

/// How the loop waits for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollMode {
    /// Drain every pending event each iteration, then run the idle callback
    /// without waiting.
    #[default]
    Poll,
    /// Block until an event arrives, then drain what is pending. The idle
    /// callback only runs after new events.
    Wait,
}

enum Removal {
    Id(WindowId),
    Name(String),
}

/// State shared between a loop and its handles.
pub(crate) struct LoopState {
    running: Cell<bool>,
    removals: RefCell<Vec<Removal>>,
}

impl LoopState {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            running: Cell::new(false),
            removals: RefCell::new(Vec::new()),
        })
    }
}

/// A non-owning reference to a [`MainLoop`], handed to every callback.
///
/// Removal requests are applied by the loop once the current event has been
/// dispatched. Requests made after the loop is gone are ignored.
#[derive(Clone)]
pub struct LoopHandle {
    state: Weak<LoopState>,
}

impl LoopHandle {
    pub(crate) fn new(state: &Rc<LoopState>) -> Self {
        Self {
            state: Rc::downgrade(state),
        }
    }

    /// Stops the loop at the end of the current iteration.
    pub fn stop(&self) {
        if let Some(state) = self.state.upgrade() {
            state.running.set(false);
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.upgrade().is_some_and(|state| state.running.get())
    }

    /// Asks the loop to remove the window with this id.
    pub fn request_removal(&self, id: WindowId) {
        self.push(Removal::Id(id));
    }

    /// Asks the loop to remove the window registered under `name`.
    pub fn request_removal_by_name(&self, name: impl Into<String>) {
        self.push(Removal::Name(name.into()));
    }

    /// Whether both handles refer to the same loop.
    pub fn same_loop(&self, other: &LoopHandle) -> bool {
        Weak::ptr_eq(&self.state, &other.state)
    }

    fn push(&self, removal: Removal) {
        match self.state.upgrade() {
            Some(state) => state.removals.borrow_mut().push(removal),
            None => warn!("window removal requested after its main loop was dropped"),
        }
    }
}

impl std::fmt::Debug for LoopHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopHandle")
            .field("running", &self.is_running())
            .finish()
    }
}

/// Owns windows and runs the event loop.
pub struct MainLoop<S: EventSource = EventPump, W: LoopWindow = Window> {
    events: S,
    mode: PollMode,
    state: Rc<LoopState>,
    handle: LoopHandle,
    windows: BTreeMap<String, Rc<W>>,
    ids: BTreeMap<WindowId, String>,
    idle: Option<Box<dyn FnMut(&LoopHandle)>>,
    event_handler: Option<Box<EventCallback>>,
    event_callbacks: CallbackTable<EventKind>,
}

impl MainLoop {
    /// Creates a main loop reading from the SDL event pump.
    pub fn new(platform: &Platform, mode: PollMode) -> Result<Self> {
        Ok(Self::with_source(platform.event_pump()?, mode))
    }
}

impl<S: EventSource, W: LoopWindow> MainLoop<S, W> {
    /// Creates a main loop reading from any event source.
    pub fn with_source(events: S, mode: PollMode) -> Self {
        let state = LoopState::new();
        let handle = LoopHandle::new(&state);
        Self {
            events,
            mode,
            state,
            handle,
            windows: BTreeMap::new(),
            ids: BTreeMap::new(),
            idle: None,
            event_handler: None,
            event_callbacks: CallbackTable::new(),
        }
    }

    pub fn mode(&self) -> PollMode {
        self.mode
    }

    /// A handle to this loop, as passed to callbacks.
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn events(&self) -> &S {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut S {
        &mut self.events
    }

    /// Registers `window` under `name` and links it to this loop.
    ///
    /// A window already registered under `name` is replaced.
    pub fn add_window(&mut self, name: impl Into<String>, window: Rc<W>) {
        let name = name.into();
        let id = window.id();
        if let Some(existing) = self.ids.get(&id) {
            assert!(
                *existing == name,
                "window {id} is already registered as \"{existing}\""
            );
        }
        window.callbacks().attach(&self.handle);
        if let Some(old) = self.windows.insert(name.clone(), window) {
            if old.id() != id {
                self.ids.remove(&old.id());
            }
        }
        debug!("added window \"{name}\" (id {id})");
        self.ids.insert(id, name);
    }

    /// Unregisters the window named `name` and returns it.
    pub fn remove_window(&mut self, name: &str) -> Rc<W> {
        let window = self
            .windows
            .remove(name)
            .unwrap_or_else(|| panic!("no window named \"{name}\""));
        self.ids.remove(&window.id());
        debug!("removed window \"{name}\" (id {})", window.id());
        window
    }

    /// Unregisters the window with this id and returns it.
    pub fn remove_window_by_id(&mut self, id: WindowId) -> Rc<W> {
        let name = self
            .ids
            .remove(&id)
            .unwrap_or_else(|| panic!("no window with id {id}"));
        let window = self
            .windows
            .remove(&name)
            .unwrap_or_else(|| panic!("window index is missing \"{name}\""));
        debug!("removed window \"{name}\" (id {id})");
        window
    }

    pub fn has_window(&self, name: &str) -> bool {
        self.windows.contains_key(name)
    }

    /// Returns the window named `name`.
    pub fn window(&self, name: &str) -> &Rc<W> {
        self.windows
            .get(name)
            .unwrap_or_else(|| panic!("no window named \"{name}\""))
    }

    /// The name of the window with this id, if it is registered.
    pub fn window_name(&self, id: WindowId) -> Option<&str> {
        self.ids.get(&id).map(String::as_str)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Names of the registered windows, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.windows.keys().map(String::as_str)
    }

    /// Ids of the registered windows, in order.
    pub fn ids(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.ids.keys().copied()
    }

    /// Sets the callback run once per iteration after pending events are handled.
    pub fn set_idle_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&LoopHandle) + 'static,
    {
        self.idle = Some(Box::new(callback));
    }

    pub fn clear_idle_callback(&mut self) {
        self.idle = None;
    }

    pub fn has_idle_callback(&self) -> bool {
        self.idle.is_some()
    }

    /// Sets the handler that sees every event before any other callback.
    ///
    /// Useful for UI layers such as imgui that consume input first. The handler
    /// returns `true` if it served the event.
    pub fn set_event_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&Event, &LoopHandle) -> bool + 'static,
    {
        self.event_handler = Some(Box::new(handler));
    }

    pub fn clear_event_handler(&mut self) {
        self.event_handler = None;
    }

    pub fn has_event_handler(&self) -> bool {
        self.event_handler.is_some()
    }

    /// Sets the loop-level callback for events of `kind`.
    pub fn set_event_callback<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut(&Event, &LoopHandle) -> bool + 'static,
    {
        self.event_callbacks.set(kind, callback);
    }

    pub fn clear_event_callback(&mut self, kind: EventKind) -> bool {
        self.event_callbacks.clear(kind)
    }

    pub fn has_event_callback(&self, kind: EventKind) -> bool {
        self.event_callbacks.contains(kind)
    }

    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    /// Stops the loop at the end of the current iteration.
    pub fn stop(&self) {
        self.handle.stop();
    }

    /// Runs the loop until it is stopped or no windows are left.
    pub fn run(&mut self) -> Result<()> {
        self.state.running.set(true);
        info!(
            "main loop started ({:?}, {} windows)",
            self.mode,
            self.windows.len()
        );
        while self.state.running.get() {
            if self.windows.is_empty() {
                self.state.running.set(false);
                break;
            }

            let mut next = None;
            if self.mode == PollMode::Wait {
                match self.events.wait_event() {
                    Ok(event) => next = Some(event),
                    Err(err) => {
                        error!("waiting for events failed: {err}");
                        self.state.running.set(false);
                        return Err(err);
                    }
                }
            }

            loop {
                if self.mode == PollMode::Poll {
                    match self.events.poll_event() {
                        Some(event) => next = Some(event),
                        None => break,
                    }
                }

                if let Some(event) = next.take() {
                    self.dispatch(&event);
                }

                if self.mode == PollMode::Wait {
                    match self.events.poll_event() {
                        Some(event) => next = Some(event),
                        None => break,
                    }
                }
            }

            if let Some(idle) = self.idle.as_mut() {
                idle(&self.handle);
                self.apply_removals();
            }
        }
        info!("main loop stopped");
        Ok(())
    }

    /// Dispatches one event. Returns whether any callback served it.
    ///
    /// Window removals requested by the callbacks are applied before returning.
    pub fn dispatch(&mut self, event: &Event) -> bool {
        let handled = self.dispatch_callbacks(event);
        self.apply_removals();
        handled
    }

    fn dispatch_callbacks(&mut self, event: &Event) -> bool {
        if let Some(handler) = self.event_handler.as_mut() {
            if handler(event, &self.handle) {
                return true;
            }
        }

        let kind = EventKind::of(event);
        if self.event_callbacks.call(kind, event, &self.handle) {
            return true;
        }

        let window = window_id(event)
            .and_then(|id| self.ids.get(&id))
            .and_then(|name| self.windows.get(name))
            .cloned();
        if let Some(window) = window {
            let callbacks = window.callbacks();
            if callbacks.dispatch_event(kind, event) {
                return true;
            }
            if let Some(win_kind) = WindowEventKind::of_event(event) {
                if callbacks.dispatch_window_event(win_kind, event) {
                    return true;
                }
            }
        }

        trace!("dropped unhandled {kind:?} event");
        false
    }

    fn apply_removals(&mut self) {
        let removals = std::mem::take(&mut *self.state.removals.borrow_mut());
        for removal in removals {
            match removal {
                Removal::Id(id) => {
                    self.remove_window_by_id(id);
                }
                Removal::Name(name) => {
                    self.remove_window(&name);
                }
            }
        }
    }
}
