//! Trigram symbols used by permutation puzzles.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Glyph {
    Heaven,
    Lake,
    Fire,
    Thunder,
    Wind,
    Water,
    Mountain,
    Earth,
}

impl Glyph {
    pub const ALPHABET: [Glyph; 8] = [
        Glyph::Heaven,
        Glyph::Lake,
        Glyph::Fire,
        Glyph::Thunder,
        Glyph::Wind,
        Glyph::Water,
        Glyph::Mountain,
        Glyph::Earth,
    ];

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Glyph::Heaven => "☰",
            Glyph::Lake => "☱",
            Glyph::Fire => "☲",
            Glyph::Thunder => "☳",
            Glyph::Wind => "☴",
            Glyph::Water => "☵",
            Glyph::Mountain => "☶",
            Glyph::Earth => "☷",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Glyph::Heaven => "Heaven",
            Glyph::Lake => "Lake",
            Glyph::Fire => "Fire",
            Glyph::Thunder => "Thunder",
            Glyph::Wind => "Wind",
            Glyph::Water => "Water",
            Glyph::Mountain => "Mountain",
            Glyph::Earth => "Earth",
        }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
