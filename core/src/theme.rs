// SPDX-License-Identifier: MIT OR Apache-2.0

//! Theme registry: named visual presets shared between both peers.
//!
//! The core only knows theme identities and palette names; how they are
//! rendered is entirely up to the presentation layer. A theme sync from
//! the host is adopted only when the id is recognized here.

/// A visual theme preset. Only the id travels on the wire; the palette
/// stays a local lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Stable identifier used on the wire
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Player 1 accent color name
    pub p1_color: &'static str,
    /// Player 2 accent color name
    pub p2_color: &'static str,
}

/// All known themes. The first entry is the default.
pub const THEMES: &[Theme] = &[
    Theme {
        id: "cyber",
        name: "Cyber City",
        p1_color: "pink",
        p2_color: "cyan",
    },
    Theme {
        id: "mall",
        name: "Midnight Mall",
        p1_color: "pink",
        p2_color: "violet",
    },
    Theme {
        id: "jungle",
        name: "Dark Jungle",
        p1_color: "orange",
        p2_color: "lime",
    },
];

/// Look a theme up by id; unknown ids yield `None` and the caller keeps
/// its current theme.
pub fn find(id: &str) -> Option<Theme> {
    THEMES.iter().copied().find(|theme| theme.id == id)
}

/// The default theme
pub fn default_theme() -> Theme {
    THEMES[0]
}
