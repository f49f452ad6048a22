//! Application shell
//!
//! [`Shell`] is the facade applications build against: it owns the input
//! tracker and the layered renderer, consumes the external driver's
//! event stream, and sequences the once-per-frame advance/render pair.
//! The OS event loop itself stays outside; the driver forwards events in
//! and blits the composited frame back out.

use kurbo::{Point, Size};
use tiny_skia::Pixmap;

use crate::input::{Button, InputTracker, Key, ScrollAxis};
use crate::render::{RenderError, Renderer};

/// Shell construction and event-handling errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Modifier flags carried on every key event by the window driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub system: bool,
}

/// Discrete events delivered by the external window/event-loop driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    /// The user asked to close the window.
    CloseRequested,
    /// The window was resized to new pixel dimensions.
    Resized(Size),
    KeyDown { key: Key, modifiers: Modifiers },
    KeyUp { key: Key, modifiers: Modifiers },
    ButtonDown(Button),
    ButtonUp(Button),
    Scroll { axis: ScrollAxis, delta: i32 },
    CursorMoved(Point),
}

/// Application shell owning the tracker and the renderer.
#[derive(Debug)]
pub struct Shell {
    name: String,
    input: InputTracker,
    graphics: Renderer,
    exit_requested: bool,
}

impl Shell {
    /// Builds a shell for a window of the given pixel dimensions. The
    /// renderer comes up with a window-sized, targeted default layer.
    pub fn new(name: impl Into<String>, window_size: Size) -> Result<Self, ShellError> {
        Ok(Self {
            name: name.into(),
            input: InputTracker::new(),
            graphics: Renderer::new(window_size)?,
            exit_requested: false,
        })
    }

    /// Routes one driver event into the tracker or the renderer.
    ///
    /// Key events fan their modifier flags out to the dedicated modifier
    /// channels, so `Alt`/`Ctrl`/`Shift`/`System` stay current without
    /// the driver reporting them as standalone keys.
    pub fn handle_event(&mut self, event: WindowEvent) -> Result<(), ShellError> {
        match event {
            WindowEvent::CloseRequested => self.exit_requested = true,
            WindowEvent::Resized(new_size) => self.graphics.resize_window(new_size)?,
            WindowEvent::KeyDown { key, modifiers } => {
                self.input.set_key(key, true);
                self.apply_modifiers(modifiers);
            }
            WindowEvent::KeyUp { key, modifiers } => {
                self.input.set_key(key, false);
                self.apply_modifiers(modifiers);
            }
            WindowEvent::ButtonDown(button) => self.input.set_button(button, true),
            WindowEvent::ButtonUp(button) => self.input.set_button(button, false),
            WindowEvent::Scroll { axis, delta } => self.input.set_scroll(axis, delta),
            WindowEvent::CursorMoved(position) => self.input.set_cursor(position),
        }
        Ok(())
    }

    /// Advances the input tracker by one frame. Call exactly once per
    /// logical frame, after the driver has delivered its events.
    pub fn advance(&mut self) {
        self.input.advance();
    }

    /// Composites all enabled layers and returns the frame for the
    /// driver to blit.
    pub fn render(&mut self) -> &Pixmap {
        self.graphics.render()
    }

    /// Input query interface for the current frame.
    pub fn input(&self) -> &InputTracker {
        &self.input
    }

    /// Renderer query interface.
    pub fn graphics(&self) -> &Renderer {
        &self.graphics
    }

    /// Renderer drawing and layer-management interface.
    pub fn graphics_mut(&mut self) -> &mut Renderer {
        &mut self.graphics
    }

    /// Window title as known to the shell.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the shell; the driver picks this up for the window title.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Current window pixel dimensions.
    pub fn window_size(&self) -> Size {
        self.graphics.window_size()
    }

    /// Whether a close was requested by the user or the application.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Asks the driver to tear the window down after this frame.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn apply_modifiers(&mut self, modifiers: Modifiers) {
        self.input.set_key(Key::Alt, modifiers.alt);
        self.input.set_key(Key::Ctrl, modifiers.ctrl);
        self.input.set_key(Key::Shift, modifiers.shift);
        self.input.set_key(Key::System, modifiers.system);
    }
}
