use std::time::Duration;

use crate::driver::{Simulation, Tick};
use crate::parameters::FollowerParameters;

/// Marker that eases toward the pointer and grows while pressed.
#[derive(Debug)]
pub struct PointerFollower {
    parameters: FollowerParameters,
    pointer: (f32, f32),
    position: (f32, f32),
    previous: (f32, f32),
    size: f32,
    pressed: bool,
    scale: f32,
    animating: bool,
}

impl PointerFollower {
    pub fn new(parameters: FollowerParameters) -> Self {
        let size = parameters.base_size;
        PointerFollower {
            parameters,
            pointer: (0.0, 0.0),
            position: (0.0, 0.0),
            previous: (0.0, 0.0),
            size,
            pressed: false,
            scale: 1.0,
            animating: false,
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer = (x, y);
        self.animating = true;
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        if self.pressed != pressed {
            self.pressed = pressed;
            self.animating = true;
        }
    }

    pub fn stop(&mut self) {
        self.animating = false;
    }

    pub fn target_size(&self) -> f32 {
        if self.pressed {
            self.parameters.pressed_size
        } else {
            self.parameters.base_size
        }
    }

    pub fn position(&self) -> (f32, f32) {
        self.position
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[cfg(test)]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// One easing step. Returns `false` once converged.
    pub fn step(&mut self) -> bool {
        if !self.animating {
            return false;
        }

        let p = &self.parameters;
        let target = self.target_size();
        let dx = self.pointer.0 - self.position.0;
        let dy = self.pointer.1 - self.position.1;
        let ds = target - self.size;

        let position_settled = dx.abs() < p.epsilon && dy.abs() < p.epsilon;
        let size_settled = ds.abs() < p.epsilon;

        self.previous = self.position;

        if position_settled && size_settled {
            self.position = self.pointer;
            self.size = target;
            self.update_scale();
            self.animating = false;
            return false;
        }

        if position_settled {
            self.position = self.pointer;
        } else {
            self.position.0 += dx * p.position_easing;
            self.position.1 += dy * p.position_easing;
        }

        if size_settled {
            self.size = target;
        } else {
            self.size += ds * p.size_easing;
        }

        self.update_scale();
        true
    }

    fn update_scale(&mut self) {
        let dx = self.position.0 - self.previous.0;
        let dy = self.position.1 - self.previous.1;
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        let speed = (dx * dx + dy * dy).sqrt();
        self.scale = 1.0 - (speed / self.parameters.squash_divisor).min(self.parameters.max_squash);
    }
}

impl Simulation for PointerFollower {
    fn tick(&mut self, _dt: Duration) -> Tick {
        if self.step() {
            Tick::Continue
        } else {
            Tick::Idle
        }
    }
}
