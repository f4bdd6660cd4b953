use rand::prelude::*;
use rand::rngs::StdRng;
use std::f32::consts::PI;
use std::time::Duration;

use crate::driver::{Simulation, Tick};
use crate::palette::{Palette, Rgb};
use crate::parameters::FieldParameters;
use crate::viewport::Viewport;

#[derive(Clone, Debug)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub opacity: f32,
    pub wander_timer: u32,
    pub fx: f32,
    pub fy: f32,
    pub color: Rgb,
}

pub type Bodies = Vec<Body>;

/// Repelling spheres drifting behind the page.
pub struct ParticleField {
    parameters: FieldParameters,
    palette: &'static Palette,
    rng: StdRng,
    viewport: Viewport,
    bodies: Bodies,
    pointer: Option<(f32, f32)>,
    running: bool,
}

impl ParticleField {
    pub fn new(parameters: FieldParameters, palette: &'static Palette, rng: StdRng) -> Self {
        ParticleField {
            parameters,
            palette,
            rng,
            viewport: Viewport::new(0.0, 0.0, 1.0),
            bodies: Vec::new(),
            pointer: None,
            running: false,
        }
    }

    /// (Re)creates the body set for `viewport`.
    pub fn start(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.bodies.clear();

        let count = self.body_count();
        let (min_radius, max_radius) = self.radius_bounds();

        for i in 0..count {
            let radius = if max_radius > min_radius {
                self.rng.gen_range(min_radius..max_radius)
            } else {
                min_radius
            };
            // alternate top-right and bottom-left
            let (x, y) = if i % 2 == 0 {
                (viewport.width, 0.0)
            } else {
                (0.0, viewport.height)
            };
            let color = *self
                .palette
                .bodies
                .choose(&mut self.rng)
                .unwrap_or(&self.palette.bodies[0]);

            self.bodies.push(Body {
                x,
                y,
                vx: (self.rng.gen::<f32>() - 0.5) * 0.5,
                vy: (self.rng.gen::<f32>() - 0.5) * 0.5,
                radius,
                opacity: self.rng.gen::<f32>() * 0.95 + 0.9,
                wander_timer: self.rng.gen_range(120..420),
                fx: 0.0,
                fy: 0.0,
                color,
            });
        }

        self.running = true;
        log::info!(
            "particle field started with {} bodies on {}x{}",
            self.bodies.len(),
            viewport.width,
            viewport.height
        );
    }

    pub fn stop(&mut self) {
        if self.running {
            log::info!("particle field stopped");
        }
        self.running = false;
        self.bodies.clear();
        self.pointer = None;
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Keeps positions, only re-clamps radii to the new diagonal.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let (min_radius, max_radius) = self.radius_bounds();
        for body in self.bodies.iter_mut() {
            body.radius = body.radius.max(min_radius).min(max_radius);
        }
        let (width, height) = viewport.surface_size();
        log::debug!(
            "particle field resized to {}x{} ({}x{} px)",
            viewport.width,
            viewport.height,
            width,
            height
        );
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = Some((x, y));
    }

    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn radius_bounds(&self) -> (f32, f32) {
        let diagonal = self.viewport.diagonal();
        (
            diagonal * self.parameters.min_radius_ratio,
            diagonal * self.parameters.max_radius_ratio,
        )
    }

    fn body_count(&self) -> usize {
        let fitting = (self.viewport.area() / self.parameters.area_per_body).floor() as usize;
        fitting.min(self.parameters.max_bodies)
    }

    /// Advances every body by one frame.
    pub fn step(&mut self) {
        if !self.running {
            return;
        }

        let p = &self.parameters;
        let bounds = self.viewport.expanded(p.boundary_scale);

        for i in 0..self.bodies.len() {
            // wander
            let body = &mut self.bodies[i];
            body.wander_timer = body.wander_timer.saturating_sub(1);
            if body.wander_timer == 0 {
                let angle = self.rng.gen::<f32>() * PI * 2.0;
                let strength = self.rng.gen_range(0.1..0.4);
                body.fx = angle.cos() * strength;
                body.fy = angle.sin() * strength;
                body.wander_timer = self.rng.gen_range(200..600);
            }
            body.vx += body.fx * p.wander_gain;
            body.vy += body.fy * p.wander_gain;
            body.fx *= p.wander_decay;
            body.fy *= p.wander_decay;

            if let Some((px, py)) = self.pointer {
                let (ix, iy) = repulsion(
                    body.x - px,
                    body.y - py,
                    p.repel_distance + body.radius,
                    p.pointer_strength,
                );
                body.vx += ix;
                body.vy += iy;
            }

            let (x, y, radius) = (body.x, body.y, body.radius);
            let mut push = (0.0, 0.0);
            for (j, other) in self.bodies.iter().enumerate() {
                if i == j {
                    continue;
                }
                let (ix, iy) = repulsion(
                    x - other.x,
                    y - other.y,
                    radius + other.radius + p.repel_distance,
                    p.peer_strength,
                );
                push.0 += ix;
                push.1 += iy;
            }

            let body = &mut self.bodies[i];
            body.vx += push.0;
            body.vy += push.1;

            body.vx *= p.damping;
            body.vy *= p.damping;
            body.x += body.vx;
            body.y += body.vy;

            let (lo, hi) = span(bounds.left, bounds.right, body.radius);
            if body.x <= lo || body.x >= hi {
                body.vx *= -p.restitution;
                body.x = body.x.max(lo).min(hi);
            }
            let (lo, hi) = span(bounds.top, bounds.bottom, body.radius);
            if body.y <= lo || body.y >= hi {
                body.vy *= -p.restitution;
                body.y = body.y.max(lo).min(hi);
            }
        }
    }

    /// Bodies that overlap the visible area.
    pub fn visible(&self) -> impl Iterator<Item = &Body> {
        let viewport = self.viewport;
        self.bodies
            .iter()
            .filter(move |body| viewport.overlaps_circle(body.x, body.y, body.radius))
    }
}

impl Simulation for ParticleField {
    fn tick(&mut self, _dt: Duration) -> Tick {
        if !self.running {
            return Tick::Idle;
        }
        self.step();
        Tick::Continue
    }
}

/// Impulse pushing away along `(dx, dy)` with linear falloff to `reach`.
/// Coincident centers produce no impulse.
fn repulsion(dx: f32, dy: f32, reach: f32, strength: f32) -> (f32, f32) {
    let distance = (dx * dx + dy * dy).sqrt();
    if distance <= 0.0 || distance >= reach {
        return (0.0, 0.0);
    }
    let force = (reach - distance) / reach * strength;
    (dx / distance * force, dy / distance * force)
}

/// Allowed center range inside `[low, high]` for a body of `radius`.
/// Collapses to the midpoint when the body is wider than the span.
fn span(low: f32, high: f32, radius: f32) -> (f32, f32) {
    let (lo, hi) = (low + radius, high - radius);
    if lo <= hi {
        (lo, hi)
    } else {
        let mid = (low + high) / 2.0;
        (mid, mid)
    }
}
