use iced::{button, container, Background, Color};

use crate::palette::{Rgb, ThemeMode, PALETTE};

pub fn color(rgb: Rgb, alpha: f32) -> Color {
    Color::from_rgba8(rgb.0, rgb.1, rgb.2, alpha.max(0.0).min(1.0))
}

pub fn background(mode: ThemeMode) -> Color {
    color(PALETTE.shades(mode).background, 1.0)
}

pub fn foreground(mode: ThemeMode) -> Color {
    color(PALETTE.shades(mode).foreground, 1.0)
}

pub struct Container(pub ThemeMode);

impl container::StyleSheet for Container {
    fn style(&self) -> container::Style {
        container::Style {
            text_color: Some(foreground(self.0)),
            background: Some(Background::Color(background(self.0))),
            ..container::Style::default()
        }
    }
}

pub struct Button(pub ThemeMode);

impl button::StyleSheet for Button {
    fn active(&self) -> button::Style {
        let mut tint = foreground(self.0);
        tint.a = 0.1;
        button::Style {
            background: Some(Background::Color(tint)),
            border_radius: 16.0,
            text_color: foreground(self.0),
            ..button::Style::default()
        }
    }

    fn hovered(&self) -> button::Style {
        let mut tint = foreground(self.0);
        tint.a = 0.2;
        button::Style {
            background: Some(Background::Color(tint)),
            ..self.active()
        }
    }
}
