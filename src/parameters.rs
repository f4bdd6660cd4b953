use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::palette::ThemeMode;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldParameters {
    pub area_per_body: f32,
    pub max_bodies: usize,
    pub min_radius_ratio: f32,
    pub max_radius_ratio: f32,
    pub repel_distance: f32,
    pub pointer_strength: f32,
    pub peer_strength: f32,
    pub wander_gain: f32,
    pub wander_decay: f32,
    pub damping: f32,
    pub restitution: f32,
    pub boundary_scale: f32,
}

impl Default for FieldParameters {
    fn default() -> Self {
        FieldParameters {
            area_per_body: 50_000.0,
            max_bodies: 2,
            min_radius_ratio: 0.22,
            max_radius_ratio: 0.25,
            repel_distance: 250.0,
            pointer_strength: 0.1,
            peer_strength: 0.05,
            wander_gain: 0.02,
            wander_decay: 0.98,
            damping: 0.995,
            restitution: 0.8,
            boundary_scale: 1.5,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseParameters {
    pub tile_size: u32,
    pub density: f32,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        NoiseParameters {
            tile_size: 512,
            density: 0.15,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FollowerParameters {
    pub base_size: f32,
    pub pressed_size: f32,
    pub position_easing: f32,
    pub size_easing: f32,
    pub epsilon: f32,
    pub squash_divisor: f32,
    pub max_squash: f32,
}

impl Default for FollowerParameters {
    fn default() -> Self {
        FollowerParameters {
            base_size: 24.0,
            pressed_size: 32.0,
            position_easing: 0.15,
            size_easing: 0.2,
            epsilon: 0.1,
            squash_divisor: 200.0,
            max_squash: 0.08,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CarouselParameters {
    pub advance_interval_ms: u64,
    pub resume_delay_ms: u64,
    pub drag_threshold: f32,
}

impl CarouselParameters {
    pub fn advance_interval(&self) -> Duration {
        Duration::from_millis(self.advance_interval_ms)
    }

    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_delay_ms)
    }
}

impl Default for CarouselParameters {
    fn default() -> Self {
        CarouselParameters {
            advance_interval_ms: 5000,
            resume_delay_ms: 7000,
            drag_threshold: 50.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageParameters {
    pub width: u32,
    pub quality: u32,
}

impl Default for ImageParameters {
    fn default() -> Self {
        ImageParameters {
            width: 360,
            quality: crate::image_loader::DEFAULT_QUALITY,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Parameters {
    pub theme: ThemeMode,
    pub seed: Option<u64>,
    pub frame_interval_ms: u64,
    pub scale_factor: f32,
    pub field: FieldParameters,
    pub noise: NoiseParameters,
    pub follower: FollowerParameters,
    pub carousel: CarouselParameters,
    pub images: ImageParameters,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            theme: ThemeMode::default(),
            seed: None,
            frame_interval_ms: 16,
            scale_factor: 1.0,
            field: FieldParameters::default(),
            noise: NoiseParameters::default(),
            follower: FollowerParameters::default(),
            carousel: CarouselParameters::default(),
            images: ImageParameters::default(),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn unit_factor(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} is outside (0, 1]", value)))
    }
}

impl Parameters {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let parameters: Parameters = serde_json::from_str(text)?;
        parameters.validate()?;
        Ok(parameters)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_json(&text)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let field = &self.field;
        if field.min_radius_ratio <= 0.0 || field.min_radius_ratio > field.max_radius_ratio {
            return Err(invalid(
                "field.min_radius_ratio",
                format!(
                    "{} must be positive and not above max_radius_ratio {}",
                    field.min_radius_ratio, field.max_radius_ratio
                ),
            ));
        }
        if field.area_per_body <= 0.0 {
            return Err(invalid("field.area_per_body", "must be positive"));
        }
        if field.boundary_scale < 1.0 {
            return Err(invalid("field.boundary_scale", "must be at least 1"));
        }
        unit_factor("field.damping", field.damping)?;
        unit_factor("field.wander_decay", field.wander_decay)?;
        unit_factor("field.restitution", field.restitution)?;

        if self.noise.tile_size == 0 {
            return Err(invalid("noise.tile_size", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.noise.density) {
            return Err(invalid(
                "noise.density",
                format!("{} is outside [0, 1]", self.noise.density),
            ));
        }

        unit_factor("follower.position_easing", self.follower.position_easing)?;
        unit_factor("follower.size_easing", self.follower.size_easing)?;
        if self.follower.epsilon <= 0.0 {
            return Err(invalid("follower.epsilon", "must be positive"));
        }
        if self.follower.squash_divisor <= 0.0 {
            return Err(invalid("follower.squash_divisor", "must be positive"));
        }

        if self.carousel.advance_interval_ms == 0 {
            return Err(invalid("carousel.advance_interval_ms", "must be positive"));
        }
        if self.carousel.resume_delay_ms == 0 {
            return Err(invalid("carousel.resume_delay_ms", "must be positive"));
        }
        if self.frame_interval_ms == 0 {
            return Err(invalid("frame_interval_ms", "must be positive"));
        }
        Ok(())
    }
}
