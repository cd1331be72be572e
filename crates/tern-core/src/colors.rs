//! ANSI palette for dumps and resolution traces.
//!
//! - Heading: table and section titles
//! - Name: symbol and class names
//! - Literal: strings and resolved values
//! - Dim: indices, offsets, argument specs
//! - Reset: back to the terminal default

/// Palette handed to every renderer. Disabled palettes are all empty strings,
/// so renderers never branch on color state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Colors {
    pub heading: &'static str,
    pub name: &'static str,
    pub literal: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        heading: "\x1b[1;35m",
        name: "\x1b[34m",
        literal: "\x1b[32m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        heading: "",
        name: "",
        literal: "",
        dim: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.reset.is_empty()
    }
}
