//! Per-frame input edge-state tracking
//!
//! Raw device events arrive at arbitrary points during a frame; queries
//! need stable press/release/hold answers for the whole frame. The
//! tracker double-buffers the raw boolean per channel and derives the
//! edge classification exactly once per frame in [`InputTracker::advance`],
//! so event-delivery jitter never produces duplicate or missed edges.

use kurbo::Point;

use crate::input::channel::{Button, Key, ScrollAxis};

/// Derived per-frame classification of one channel.
///
/// `pressed` and `released` are true for exactly one frame after the
/// corresponding transition; `held` persists until the opposite
/// transition. `pressed` and `released` are never both true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct EdgeState {
    held: bool,
    pressed: bool,
    released: bool,
}

impl EdgeState {
    /// Advances this channel by one frame given the latest raw value and
    /// the raw value observed at the previous advance.
    ///
    /// The transient facets are dropped first and only recomputed when
    /// the raw value actually changed. On a press, `pressed` is set only
    /// if the channel was not already held, so a stale raw repeat cannot
    /// double-fire.
    fn step(&mut self, raw: bool, previous: bool) {
        self.pressed = false;
        self.released = false;

        if raw != previous {
            if raw {
                if !self.held {
                    self.pressed = true;
                }
                self.held = true;
            } else {
                *self = EdgeState {
                    released: true,
                    ..EdgeState::default()
                };
            }
        }
    }
}

/// Tracks keyboard, mouse button, scroll, and cursor state frame by frame.
///
/// Mutation calls (`set_key`, `set_button`, `set_scroll`, `set_cursor`)
/// may happen any number of times between frames; last write wins.
/// [`InputTracker::advance`] must run exactly once per logical frame
/// before queries are trusted for that frame.
#[derive(Debug)]
pub struct InputTracker {
    raw_keys: [bool; Key::COUNT],
    previous_keys: [bool; Key::COUNT],
    key_edges: [EdgeState; Key::COUNT],

    raw_buttons: [bool; Button::COUNT],
    previous_buttons: [bool; Button::COUNT],
    button_edges: [EdgeState; Button::COUNT],

    vertical_scroll: i32,
    horizontal_scroll: i32,
    scroll_touched: bool,

    cursor: Point,
}

impl InputTracker {
    /// Creates a tracker with every channel released and scroll at rest.
    pub fn new() -> Self {
        Self {
            raw_keys: [false; Key::COUNT],
            previous_keys: [false; Key::COUNT],
            key_edges: [EdgeState::default(); Key::COUNT],
            raw_buttons: [false; Button::COUNT],
            previous_buttons: [false; Button::COUNT],
            button_edges: [EdgeState::default(); Button::COUNT],
            vertical_scroll: 0,
            horizontal_scroll: 0,
            scroll_touched: false,
            cursor: Point::ORIGIN,
        }
    }

    /// Records the physical state of a keyboard channel.
    pub fn set_key(&mut self, key: Key, is_down: bool) {
        self.raw_keys[key.index()] = is_down;
    }

    /// Records the physical state of a mouse button channel.
    pub fn set_button(&mut self, button: Button, is_down: bool) {
        self.raw_buttons[button.index()] = is_down;
    }

    /// Overwrites the scroll accumulator for one axis and marks the
    /// frame as touched.
    pub fn set_scroll(&mut self, axis: ScrollAxis, delta: i32) {
        match axis {
            ScrollAxis::Vertical => self.vertical_scroll = delta,
            ScrollAxis::Horizontal => self.horizontal_scroll = delta,
        }
        self.scroll_touched = true;
    }

    /// Caches the latest reported cursor position.
    pub fn set_cursor(&mut self, position: Point) {
        self.cursor = position;
    }

    /// Derives the edge-state of every channel for the coming frame.
    ///
    /// Call exactly once per logical frame: calling it zero times leaves
    /// states stale, calling it twice collapses a real transition into a
    /// spurious extra one.
    pub fn advance(&mut self) {
        for index in 0..Key::COUNT {
            self.key_edges[index].step(self.raw_keys[index], self.previous_keys[index]);
            self.previous_keys[index] = self.raw_keys[index];
        }

        for index in 0..Button::COUNT {
            self.button_edges[index].step(self.raw_buttons[index], self.previous_buttons[index]);
            self.previous_buttons[index] = self.raw_buttons[index];
        }

        if !self.scroll_touched {
            self.vertical_scroll = 0;
            self.horizontal_scroll = 0;
        }
        self.scroll_touched = false;
    }

    /// True while the key stays down.
    pub fn is_key_held(&self, key: Key) -> bool {
        self.key_edges[key.index()].held
    }

    /// True only on the frame the key went down.
    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.key_edges[key.index()].pressed
    }

    /// True only on the frame the key went up.
    pub fn is_key_released(&self, key: Key) -> bool {
        self.key_edges[key.index()].released
    }

    /// True while the button stays down.
    pub fn is_button_held(&self, button: Button) -> bool {
        self.button_edges[button.index()].held
    }

    /// True only on the frame the button went down.
    pub fn is_button_pressed(&self, button: Button) -> bool {
        self.button_edges[button.index()].pressed
    }

    /// True only on the frame the button went up.
    pub fn is_button_released(&self, button: Button) -> bool {
        self.button_edges[button.index()].released
    }

    /// Latest scroll deltas as `(vertical, horizontal)`.
    pub fn scroll(&self) -> (i32, i32) {
        (self.vertical_scroll, self.horizontal_scroll)
    }

    /// Latest vertical scroll delta.
    pub fn vertical_scroll(&self) -> i32 {
        self.vertical_scroll
    }

    /// Latest horizontal scroll delta.
    pub fn horizontal_scroll(&self) -> i32 {
        self.horizontal_scroll
    }

    /// Last reported cursor position.
    pub fn cursor_position(&self) -> Point {
        self.cursor
    }
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new()
    }
}
