//! Input channel identifiers
//!
//! A channel is a single digital input source: one key or one mouse
//! button. Channels are dense enums so the tracker can keep its state in
//! plain fixed-size arrays indexed by `channel as usize`.

/// Keyboard channels tracked by the shell.
///
/// `Alt`/`Ctrl`/`Shift`/`System` are modifier channels fed from the
/// modifier flags carried on every key event, so they stay current even
/// when the driver reports them only as side data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    Escape,
    Space,
    Enter,
    Backspace,
    Tab,
    Delete,
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Alt,
    Ctrl,
    Shift,
    System,
}

impl Key {
    /// Number of keyboard channels, used to size the tracker's arrays.
    pub const COUNT: usize = Key::System as usize + 1;

    /// Array index for this channel.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Mouse button channels tracked by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Button {
    Left,
    Right,
    Middle,
    Extra1,
    Extra2,
}

impl Button {
    /// Number of button channels, used to size the tracker's arrays.
    pub const COUNT: usize = Button::Extra2 as usize + 1;

    /// Array index for this channel.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Scroll wheel axis for scroll events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAxis {
    Vertical,
    Horizontal,
}
