use crate::image_loader;
use crate::palette::ThemeMode;
use crate::parameters::ImageParameters;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screenshot {
    pub name: &'static str,
    pub light: &'static str,
    pub dark: &'static str,
    pub width: u32,
    pub height: u32,
}

impl Screenshot {
    pub fn source(&self, mode: ThemeMode) -> &'static str {
        match mode {
            ThemeMode::Light => self.light,
            ThemeMode::Dark => self.dark,
        }
    }

    pub fn url(&self, mode: ThemeMode, images: &ImageParameters) -> String {
        image_loader::load(self.source(mode), images.width, images.quality)
    }
}

pub const SCREENSHOTS: [Screenshot; 3] = [
    Screenshot {
        name: "Agrosphere",
        light: "/images/mobiledev/mainScreens/agrosphere/agrosphere-dash-light.png",
        dark: "/images/mobiledev/mainScreens/agrosphere/agrosphere-dash-dark.png",
        width: 360,
        height: 600,
    },
    Screenshot {
        name: "Fundi",
        light: "/images/mobiledev/mainScreens/fundi/fundi-dash-light.png",
        dark: "/images/mobiledev/mainScreens/fundi/fundi-dash-dark.png",
        width: 360,
        height: 600,
    },
    Screenshot {
        name: "JuanFile",
        light: "/images/mobiledev/mainScreens/juanfile/jf-dash-light.png",
        dark: "/images/mobiledev/mainScreens/juanfile/jf-dash-dark.png",
        width: 360,
        height: 600,
    },
];
