//! Event classification and event sources.
//!
//! Callbacks are keyed by [`EventKind`] and [`WindowEventKind`], small ordered
//! keys derived from [`sdl2::event::Event`] and [`sdl2::event::WindowEvent`].

use sdl2::event::{Event, WindowEvent};

use crate::error::{Error, Result};

/// Numeric window id as assigned by SDL.
pub type WindowId = u32;

/// The type of an SDL event, used as the key of event callback tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    Quit,
    AppTerminating,
    AppLowMemory,
    AppWillEnterBackground,
    AppDidEnterBackground,
    AppWillEnterForeground,
    AppDidEnterForeground,
    Display,
    Window,
    KeyDown,
    KeyUp,
    TextEditing,
    TextInput,
    MouseMotion,
    MouseButtonDown,
    MouseButtonUp,
    MouseWheel,
    JoyAxisMotion,
    JoyBallMotion,
    JoyHatMotion,
    JoyButtonDown,
    JoyButtonUp,
    JoyDeviceAdded,
    JoyDeviceRemoved,
    ControllerAxisMotion,
    ControllerButtonDown,
    ControllerButtonUp,
    ControllerDeviceAdded,
    ControllerDeviceRemoved,
    ControllerDeviceRemapped,
    ControllerTouchpadDown,
    ControllerTouchpadMotion,
    ControllerTouchpadUp,
    ControllerSensorUpdated,
    FingerDown,
    FingerUp,
    FingerMotion,
    DollarGesture,
    DollarRecord,
    MultiGesture,
    ClipboardUpdate,
    DropFile,
    DropText,
    DropBegin,
    DropComplete,
    AudioDeviceAdded,
    AudioDeviceRemoved,
    RenderTargetsReset,
    RenderDeviceReset,
    LocaleChanged,
    /// A user event, keyed by the type id it was registered with.
    User(u32),
    /// An event SDL reported with a raw type this crate does not name.
    Unknown(u32),
}

impl EventKind {
    /// Classifies an SDL event.
    pub fn of(event: &Event) -> Self {
        match event {
            Event::Quit { .. } => EventKind::Quit,
            Event::AppTerminating { .. } => EventKind::AppTerminating,
            Event::AppLowMemory { .. } => EventKind::AppLowMemory,
            Event::AppWillEnterBackground { .. } => EventKind::AppWillEnterBackground,
            Event::AppDidEnterBackground { .. } => EventKind::AppDidEnterBackground,
            Event::AppWillEnterForeground { .. } => EventKind::AppWillEnterForeground,
            Event::AppDidEnterForeground { .. } => EventKind::AppDidEnterForeground,
            Event::Display { .. } => EventKind::Display,
            Event::Window { .. } => EventKind::Window,
            Event::KeyDown { .. } => EventKind::KeyDown,
            Event::KeyUp { .. } => EventKind::KeyUp,
            Event::TextEditing { .. } => EventKind::TextEditing,
            Event::TextInput { .. } => EventKind::TextInput,
            Event::MouseMotion { .. } => EventKind::MouseMotion,
            Event::MouseButtonDown { .. } => EventKind::MouseButtonDown,
            Event::MouseButtonUp { .. } => EventKind::MouseButtonUp,
            Event::MouseWheel { .. } => EventKind::MouseWheel,
            Event::JoyAxisMotion { .. } => EventKind::JoyAxisMotion,
            Event::JoyBallMotion { .. } => EventKind::JoyBallMotion,
            Event::JoyHatMotion { .. } => EventKind::JoyHatMotion,
            Event::JoyButtonDown { .. } => EventKind::JoyButtonDown,
            Event::JoyButtonUp { .. } => EventKind::JoyButtonUp,
            Event::JoyDeviceAdded { .. } => EventKind::JoyDeviceAdded,
            Event::JoyDeviceRemoved { .. } => EventKind::JoyDeviceRemoved,
            Event::ControllerAxisMotion { .. } => EventKind::ControllerAxisMotion,
            Event::ControllerButtonDown { .. } => EventKind::ControllerButtonDown,
            Event::ControllerButtonUp { .. } => EventKind::ControllerButtonUp,
            Event::ControllerDeviceAdded { .. } => EventKind::ControllerDeviceAdded,
            Event::ControllerDeviceRemoved { .. } => EventKind::ControllerDeviceRemoved,
            Event::ControllerDeviceRemapped { .. } => EventKind::ControllerDeviceRemapped,
            Event::ControllerTouchpadDown { .. } => EventKind::ControllerTouchpadDown,
            Event::ControllerTouchpadMotion { .. } => EventKind::ControllerTouchpadMotion,
            Event::ControllerTouchpadUp { .. } => EventKind::ControllerTouchpadUp,
            Event::ControllerSensorUpdated { .. } => EventKind::ControllerSensorUpdated,
            Event::FingerDown { .. } => EventKind::FingerDown,
            Event::FingerUp { .. } => EventKind::FingerUp,
            Event::FingerMotion { .. } => EventKind::FingerMotion,
            Event::DollarGesture { .. } => EventKind::DollarGesture,
            Event::DollarRecord { .. } => EventKind::DollarRecord,
            Event::MultiGesture { .. } => EventKind::MultiGesture,
            Event::ClipboardUpdate { .. } => EventKind::ClipboardUpdate,
            Event::DropFile { .. } => EventKind::DropFile,
            Event::DropText { .. } => EventKind::DropText,
            Event::DropBegin { .. } => EventKind::DropBegin,
            Event::DropComplete { .. } => EventKind::DropComplete,
            Event::AudioDeviceAdded { .. } => EventKind::AudioDeviceAdded,
            Event::AudioDeviceRemoved { .. } => EventKind::AudioDeviceRemoved,
            Event::RenderTargetsReset { .. } => EventKind::RenderTargetsReset,
            Event::RenderDeviceReset { .. } => EventKind::RenderDeviceReset,
            Event::LocaleChanged { .. } => EventKind::LocaleChanged,
            Event::User { type_, .. } => EventKind::User(*type_),
            Event::Unknown { type_, .. } => EventKind::Unknown(*type_),
        }
    }
}

/// The subtype of an [`Event::Window`] event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WindowEventKind {
    Shown,
    Hidden,
    Exposed,
    Moved,
    Resized,
    SizeChanged,
    Minimized,
    Maximized,
    Restored,
    Enter,
    Leave,
    FocusGained,
    FocusLost,
    Close,
    TakeFocus,
    HitTest,
    IccProfChanged,
    DisplayChanged,
    /// `SDL_WINDOWEVENT_NONE`.
    Other,
}

impl WindowEventKind {
    pub fn of(win_event: &WindowEvent) -> Self {
        match win_event {
            WindowEvent::Shown => WindowEventKind::Shown,
            WindowEvent::Hidden => WindowEventKind::Hidden,
            WindowEvent::Exposed => WindowEventKind::Exposed,
            WindowEvent::Moved(..) => WindowEventKind::Moved,
            WindowEvent::Resized(..) => WindowEventKind::Resized,
            WindowEvent::SizeChanged(..) => WindowEventKind::SizeChanged,
            WindowEvent::Minimized => WindowEventKind::Minimized,
            WindowEvent::Maximized => WindowEventKind::Maximized,
            WindowEvent::Restored => WindowEventKind::Restored,
            WindowEvent::Enter => WindowEventKind::Enter,
            WindowEvent::Leave => WindowEventKind::Leave,
            WindowEvent::FocusGained => WindowEventKind::FocusGained,
            WindowEvent::FocusLost => WindowEventKind::FocusLost,
            WindowEvent::Close => WindowEventKind::Close,
            WindowEvent::TakeFocus => WindowEventKind::TakeFocus,
            WindowEvent::HitTest => WindowEventKind::HitTest,
            WindowEvent::ICCProfChanged => WindowEventKind::IccProfChanged,
            WindowEvent::DisplayChanged(..) => WindowEventKind::DisplayChanged,
            WindowEvent::None => WindowEventKind::Other,
        }
    }

    /// Returns the window-event subtype if `event` is a window event.
    pub fn of_event(event: &Event) -> Option<Self> {
        match event {
            Event::Window { win_event, .. } => Some(Self::of(win_event)),
            _ => None,
        }
    }
}

/// Returns the id of the window an event is addressed to, if it carries one.
pub fn window_id(event: &Event) -> Option<WindowId> {
    match event {
        Event::Window { window_id, .. }
        | Event::KeyDown { window_id, .. }
        | Event::KeyUp { window_id, .. }
        | Event::TextEditing { window_id, .. }
        | Event::TextInput { window_id, .. }
        | Event::MouseMotion { window_id, .. }
        | Event::MouseButtonDown { window_id, .. }
        | Event::MouseButtonUp { window_id, .. }
        | Event::MouseWheel { window_id, .. }
        | Event::DropFile { window_id, .. }
        | Event::DropText { window_id, .. }
        | Event::DropBegin { window_id, .. }
        | Event::DropComplete { window_id, .. }
        | Event::User { window_id, .. } => Some(*window_id),
        _ => None,
    }
}

/// A source of OS events for the main loop.
pub trait EventSource {
    /// Returns the next pending event without blocking.
    fn poll_event(&mut self) -> Option<Event>;

    /// Blocks until an event arrives.
    fn wait_event(&mut self) -> Result<Event>;
}

impl EventSource for sdl2::EventPump {
    fn poll_event(&mut self) -> Option<Event> {
        sdl2::EventPump::poll_event(self)
    }

    // SDL aborts the process itself if SDL_WaitEvent fails.
    fn wait_event(&mut self) -> Result<Event> {
        Ok(sdl2::EventPump::wait_event(self))
    }
}

/// An event source fed from a prepared script.
///
/// Use it with [`MainLoop::with_source`](crate::MainLoop::with_source) to drive a
/// loop without a video driver, e.g. for replaying recorded input or in tests.
///
/// `None` entries end one drain of the queue: [`poll_event`](EventSource::poll_event)
/// returns `None` for them once. [`wait_event`](EventSource::wait_event) skips them
/// and fails once the script is exhausted.
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    script: std::collections::VecDeque<Option<Event>>,
}

impl ScriptedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an event.
    pub fn push(&mut self, event: Event) -> &mut Self {
        self.script.push_back(Some(event));
        self
    }

    /// Queues the end of a batch.
    pub fn pause(&mut self) -> &mut Self {
        self.script.push_back(None);
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.iter().filter(|e| e.is_some()).count()
    }
}

impl EventSource for ScriptedEvents {
    fn poll_event(&mut self) -> Option<Event> {
        self.script.pop_front().flatten()
    }

    fn wait_event(&mut self) -> Result<Event> {
        while let Some(next) = self.script.pop_front() {
            if let Some(event) = next {
                return Ok(event);
            }
        }
        Err(Error::MainLoop("event script exhausted".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(window_id: u32) -> Event {
        Event::Window {
            timestamp: 0,
            window_id,
            win_event: WindowEvent::Close,
        }
    }

    #[test]
    fn test_event_kinds() {
        assert_eq!(EventKind::of(&Event::Quit { timestamp: 0 }), EventKind::Quit);
        assert_eq!(EventKind::of(&close(1)), EventKind::Window);
        let text = Event::TextInput {
            timestamp: 0,
            window_id: 3,
            text: "a".to_string(),
        };
        assert_eq!(EventKind::of(&text), EventKind::TextInput);
        assert!(EventKind::Quit < EventKind::Window);
    }

    #[test]
    fn test_window_event_kinds() {
        assert_eq!(WindowEventKind::of_event(&close(1)), Some(WindowEventKind::Close));
        assert_eq!(
            WindowEventKind::of(&WindowEvent::Resized(640, 480)),
            WindowEventKind::Resized
        );
        assert_eq!(WindowEventKind::of_event(&Event::Quit { timestamp: 0 }), None);
        assert_eq!(WindowEventKind::of(&WindowEvent::HitTest), WindowEventKind::HitTest);
        assert_eq!(
            WindowEventKind::of(&WindowEvent::ICCProfChanged),
            WindowEventKind::IccProfChanged
        );
        assert_eq!(
            WindowEventKind::of(&WindowEvent::DisplayChanged(1)),
            WindowEventKind::DisplayChanged
        );
        assert_eq!(WindowEventKind::of(&WindowEvent::None), WindowEventKind::Other);
    }

    #[test]
    fn test_raw_event_types_are_kept_apart() {
        let unknown = |type_| Event::Unknown { timestamp: 0, type_ };
        assert_eq!(EventKind::of(&unknown(0x304)), EventKind::Unknown(0x304));
        assert_ne!(EventKind::of(&unknown(0x304)), EventKind::of(&unknown(0x107)));
        assert_eq!(
            EventKind::of(&Event::LocaleChanged { timestamp: 0 }),
            EventKind::LocaleChanged
        );
        assert_ne!(EventKind::LocaleChanged, EventKind::Unknown(0x107));
    }

    #[test]
    fn test_window_id() {
        assert_eq!(window_id(&close(7)), Some(7));
        assert_eq!(window_id(&Event::Quit { timestamp: 0 }), None);
    }

    #[test]
    fn test_scripted_events() {
        let mut events = ScriptedEvents::new();
        events.push(close(1)).pause().push(close(2));
        assert_eq!(events.remaining(), 2);
        assert!(events.poll_event().is_some());
        assert!(events.poll_event().is_none());
        assert!(events.wait_event().is_ok());
        assert!(events.wait_event().is_err());
    }
}
