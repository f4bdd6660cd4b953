/// Window geometry in logical units plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale_factor: f32,
}

/// Axis-aligned box the bodies bounce against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, scale_factor: f32) -> Self {
        Viewport {
            width: width.max(0.0),
            height: height.max(0.0),
            scale_factor: if scale_factor > 0.0 { scale_factor } else { 1.0 },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn diagonal(&self) -> f32 {
        (self.width * self.width + self.height * self.height).sqrt()
    }

    /// Backing surface size in physical pixels.
    pub fn surface_size(&self) -> (u32, u32) {
        (
            (self.width * self.scale_factor).round() as u32,
            (self.height * self.scale_factor).round() as u32,
        )
    }

    /// The viewport grown by `scale` around its own center.
    pub fn expanded(&self, scale: f32) -> Bounds {
        let off_x = (self.width * scale - self.width) / 2.0;
        let off_y = (self.height * scale - self.height) / 2.0;
        Bounds {
            left: -off_x,
            right: self.width + off_x,
            top: -off_y,
            bottom: self.height + off_y,
        }
    }

    /// Whether a circle overlaps the visible area.
    pub fn overlaps_circle(&self, x: f32, y: f32, radius: f32) -> bool {
        x + radius > 0.0 && x - radius < self.width && y + radius > 0.0 && y - radius < self.height
    }
}
