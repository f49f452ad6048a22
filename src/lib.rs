//! layerdeck — an application shell for 2D interactive programs
//!
//! The shell owns a window frame, tracks input, and renders into a stack
//! of independently transformable off-screen surfaces ("layers"). Two
//! components do the real work:
//!
//! - [`input::InputTracker`] converts raw device booleans into stable
//!   per-frame press/release/hold semantics.
//! - [`render::Renderer`] manages the layer stack, keeps screen-space,
//!   layer-space, and view-space coordinate mappings consistent, and
//!   composites enabled layers each frame with cursor-anchored zoom and
//!   visibility culling.
//!
//! [`app::Shell`] ties both together behind the event stream of an
//! external window driver. The driver forwards [`app::WindowEvent`]
//! values in, calls [`app::Shell::advance`] once per frame, and blits
//! the [`tiny_skia::Pixmap`] returned by [`app::Shell::render`].

pub mod app;
pub mod geometry;
pub mod input;
pub mod random;
pub mod render;

pub use app::{Modifiers, Shell, ShellError, WindowEvent};
pub use geometry::{Point, Size, Vec2};
pub use input::{Button, InputTracker, Key, ScrollAxis};
pub use random::RandomSource;
pub use render::{LayerId, RenderError, Renderer};
pub use tiny_skia::Color;
