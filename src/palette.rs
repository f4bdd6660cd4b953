use serde::Deserialize;

/// Binary display mode supplied by the theme toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::Light
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Speckle color of the noise overlay for one theme mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Speckle {
    pub value: u8,
    pub alpha: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shades {
    pub background: Rgb,
    pub foreground: Rgb,
    pub speckle: Speckle,
}

/// Read-only color table shared by every simulator.
#[derive(Debug)]
pub struct Palette {
    pub bodies: [Rgb; 10],
    pub light: Shades,
    pub dark: Shades,
}

impl Palette {
    pub fn shades(&self, mode: ThemeMode) -> &Shades {
        match mode {
            ThemeMode::Light => &self.light,
            ThemeMode::Dark => &self.dark,
        }
    }
}

pub static PALETTE: Palette = Palette {
    bodies: [
        Rgb(0, 100, 244),
        Rgb(167, 201, 87),
        Rgb(239, 83, 72),
        Rgb(244, 162, 97),
        Rgb(42, 157, 143),
        Rgb(231, 111, 81),
        Rgb(255, 202, 58),
        Rgb(138, 201, 38),
        Rgb(106, 76, 147),
        Rgb(25, 130, 196),
    ],
    light: Shades {
        background: Rgb(245, 245, 240),
        foreground: Rgb(17, 17, 17),
        speckle: Speckle { value: 0, alpha: 23 },
    },
    dark: Shades {
        background: Rgb(17, 17, 17),
        foreground: Rgb(245, 245, 240),
        speckle: Speckle {
            value: 255,
            alpha: 10,
        },
    },
};
