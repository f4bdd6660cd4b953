use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

use iced::canvas::{self, Cache, Cursor, Frame, Geometry, Path, Stroke};
use iced::{Color, HorizontalAlignment, Point, Rectangle, Size, Vector, VerticalAlignment};

use crate::carousel::{Carousel, Slot};
use crate::driver::Simulation;
use crate::field::ParticleField;
use crate::follower::PointerFollower;
use crate::image_loader;
use crate::noise::NoiseTexture;
use crate::palette::{ThemeMode, PALETTE};
use crate::parameters::Parameters;
use crate::showcase::SCREENSHOTS;
use crate::style;
use crate::viewport::Viewport;

const CARD_WIDTH: f32 = 192.0;
const CARD_HEIGHT: f32 = 320.0;

/// Every layer of the page, drawn onto one canvas.
pub struct Scene {
    parameters: Parameters,
    mode: ThemeMode,
    viewport: Viewport,
    field: ParticleField,
    noise: NoiseTexture,
    follower: PointerFollower,
    carousel: Option<Carousel>,
    pointer: Option<Point>,
    grain: Option<Path>,
    grain_builds: u64,
    grain_layers: BTreeMap<(u32, u32), Cache>,
}

fn rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
        None => StdRng::from_entropy(),
    }
}

/// Region that accepts carousel drags.
pub fn carousel_area(viewport: Viewport) -> Rectangle {
    let width = (CARD_WIDTH * 2.5).min(viewport.width);
    let height = CARD_HEIGHT * 1.25;
    Rectangle {
        x: (viewport.width - width) / 2.0,
        y: (viewport.height - height) / 2.0,
        width,
        height,
    }
}

impl Scene {
    pub fn new(parameters: Parameters, viewport: Viewport) -> Self {
        let carousel = match Carousel::new(SCREENSHOTS.len(), parameters.carousel.clone()) {
            Ok(carousel) => Some(carousel),
            Err(err) => {
                log::warn!("showcase disabled: {}", err);
                None
            }
        };
        Scene {
            mode: parameters.theme,
            viewport,
            field: ParticleField::new(parameters.field.clone(), &PALETTE, rng(parameters.seed, 0)),
            noise: NoiseTexture::new(parameters.noise.clone(), &PALETTE, rng(parameters.seed, 1)),
            follower: PointerFollower::new(parameters.follower.clone()),
            carousel,
            pointer: None,
            grain: None,
            grain_builds: 0,
            grain_layers: BTreeMap::new(),
            parameters,
        }
    }

    pub fn start(&mut self) {
        for screenshot in SCREENSHOTS.iter() {
            let source = screenshot.source(self.mode);
            log::debug!(
                "{} ({}): {}",
                screenshot.name,
                image_loader::image_format(source),
                image_loader::src_set(
                    source,
                    &image_loader::DEFAULT_WIDTHS,
                    self.parameters.images.quality
                )
            );
        }
        self.field.start(self.viewport);
        self.noise.resize(self.viewport);

        let tile = self.noise.tile(self.mode);
        let runs = tile.runs();
        self.grain = Some(Path::new(|builder| {
            for run in runs.iter() {
                builder.rectangle(
                    Point::new(run.x as f32, run.y as f32),
                    Size::new(run.len as f32, 1.0),
                );
            }
        }));
        self.grain_builds += 1;
        self.grain_layers.clear();
        self.retile();
    }

    /// Keeps one cached layer per covered grid cell. Cells that survive a
    /// resize keep their tessellated geometry. Returns how many are new.
    fn retile(&mut self) -> usize {
        let cells = self.noise.cells();
        self.grain_layers.retain(|cell, _| cells.contains(cell));
        let mut added = 0;
        for cell in cells {
            self.grain_layers.entry(cell).or_insert_with(|| {
                added += 1;
                Cache::default()
            });
        }
        added
    }

    pub fn stop(&mut self) {
        self.field.stop();
        self.follower.stop();
        if let Some(carousel) = self.carousel.as_mut() {
            carousel.stop();
        }
        self.noise.release();
        self.grain = None;
        self.grain_layers.clear();
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_theme(&mut self, mode: ThemeMode) {
        if self.mode == mode {
            return;
        }
        log::info!("theme changed to {:?}", mode);
        self.mode = mode;
        self.start();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height, self.viewport.scale_factor);
        self.field.resize(self.viewport);
        self.noise.resize(self.viewport);
        let added = self.retile();
        log::debug!("noise layer retiled, {} new cells", added);
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn pointer_moved(&mut self, position: Point) {
        self.pointer = Some(position);
        self.field.set_pointer(position.x, position.y);
        self.follower.pointer_moved(position.x, position.y);
        if let Some(carousel) = self.carousel.as_mut() {
            carousel.drag_to(position.x);
        }
    }

    pub fn pointer_left(&mut self) {
        self.pointer = None;
        self.field.clear_pointer();
    }

    /// Left button down. The drag only starts when the press position is
    /// known and inside the showcase.
    pub fn pressed(&mut self, position: Option<Point>) {
        self.follower.set_pressed(true);
        let position = match position {
            Some(position) if carousel_area(self.viewport).contains(position) => position,
            _ => return,
        };
        if let Some(carousel) = self.carousel.as_mut() {
            carousel.begin_drag(position.x);
        }
    }

    pub fn released(&mut self) {
        self.follower.set_pressed(false);
        if let Some(carousel) = self.carousel.as_mut() {
            carousel.end_drag();
        }
    }

    pub fn navigate(&mut self, forward: bool) {
        if let Some(carousel) = self.carousel.as_mut() {
            carousel.navigate(forward);
        }
    }

    pub fn simulations(&mut self) -> Vec<&mut dyn Simulation> {
        let mut simulations: Vec<&mut dyn Simulation> = Vec::with_capacity(3);
        simulations.push(&mut self.field);
        simulations.push(&mut self.follower);
        if let Some(carousel) = self.carousel.as_mut() {
            simulations.push(carousel);
        }
        simulations
    }

    fn draw_field(&self, frame: &mut Frame) {
        let backdrop = Path::rectangle(Point::ORIGIN, frame.size());
        frame.fill(&backdrop, style::background(self.mode));

        for body in self.field.visible() {
            let circle = Path::circle(Point::new(body.x, body.y), body.radius);
            frame.fill(&circle, style::color(body.color, body.opacity));
        }
    }

    fn grain_color(&self) -> Option<Color> {
        self.noise.cached().map(|tile| {
            let speckle = tile.speckle;
            Color::from_rgba8(
                speckle.value,
                speckle.value,
                speckle.value,
                speckle.alpha as f32 / 255.0,
            )
        })
    }

    fn draw_carousel(&self, frame: &mut Frame) {
        let carousel = match &self.carousel {
            Some(carousel) => carousel,
            None => return,
        };
        let area = carousel_area(self.viewport);
        let center = Point::new(area.x + area.width / 2.0, area.y + area.height / 2.0);
        let ink = style::foreground(self.mode);

        // side cards first so the center one lands on top
        let mut order: Vec<(usize, Slot)> = (0..carousel.len())
            .map(|item| (item, carousel.slot(item)))
            .filter(|(_, slot)| !matches!(slot, Slot::Hidden(_)))
            .collect();
        order.sort_by_key(|(_, slot)| *slot == Slot::Center);

        for (item, slot) in order {
            let screenshot = &SCREENSHOTS[item];
            let (card_width, card_height) = image_loader::fit_dimensions(
                screenshot.width,
                screenshot.height,
                CARD_WIDTH as u32,
                None,
            );
            let width = card_width as f32 * slot.scale();
            let height = card_height as f32 * slot.scale();
            let x = center.x + slot.shift() * CARD_WIDTH - width / 2.0;
            let y = center.y - height / 2.0;
            let opacity = slot.opacity();

            let card = Path::rectangle(Point::new(x, y), Size::new(width, height));
            frame.fill(&card, Color { a: 0.9 * opacity, ..style::background(self.mode) });
            frame.stroke(
                &card,
                Stroke {
                    color: Color { a: opacity, ..ink },
                    width: 2.0,
                    ..Stroke::default()
                },
            );

            frame.fill_text(canvas::Text {
                content: screenshot.name.to_string(),
                position: Point::new(x + width / 2.0, y + height / 2.0),
                color: Color { a: opacity, ..ink },
                size: 20.0 * slot.scale(),
                horizontal_alignment: HorizontalAlignment::Center,
                vertical_alignment: VerticalAlignment::Center,
                ..canvas::Text::default()
            });

            if slot == Slot::Center {
                frame.fill_text(canvas::Text {
                    content: screenshot.url(self.mode, &self.parameters.images),
                    position: Point::new(center.x, y + height + 12.0),
                    color: Color { a: 0.6, ..ink },
                    size: 12.0,
                    horizontal_alignment: HorizontalAlignment::Center,
                    vertical_alignment: VerticalAlignment::Top,
                    ..canvas::Text::default()
                });
            }
        }
    }

    fn draw_follower(&self, frame: &mut Frame) {
        let (x, y) = self.follower.position();
        let radius = self.follower.size() / 2.0 * self.follower.scale();
        let marker = Path::circle(Point::new(x, y), radius);
        frame.fill(&marker, style::foreground(self.mode));
        frame.stroke(
            &marker,
            Stroke {
                color: style::background(self.mode),
                width: 2.0,
                ..Stroke::default()
            },
        );
    }
}

impl canvas::Program<crate::Message> for Scene {
    fn draw(&self, bounds: Rectangle, _cursor: Cursor) -> Vec<Geometry> {
        if self.viewport.is_empty() {
            return Vec::new();
        }

        let mut field = Frame::new(bounds.size());
        self.draw_field(&mut field);

        let mut layers = vec![field.into_geometry()];

        if let (Some(grain), Some(color)) = (self.grain.as_ref(), self.grain_color()) {
            let size = self.noise.tile_size() as f32;
            for (&(column, row), cache) in self.grain_layers.iter() {
                layers.push(cache.draw(Size::new(size, size), |frame| {
                    frame.translate(Vector::new(column as f32 * size, row as f32 * size));
                    frame.fill(grain, color);
                }));
            }
        }

        let mut overlay = Frame::new(bounds.size());
        self.draw_carousel(&mut overlay);
        self.draw_follower(&mut overlay);
        layers.push(overlay.into_geometry());

        layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::Phase;

    fn scene() -> Scene {
        let parameters = Parameters {
            seed: Some(3),
            ..Parameters::default()
        };
        let mut scene = Scene::new(parameters, Viewport::new(1280.0, 800.0, 1.0));
        scene.start();
        scene
    }

    #[test]
    fn drag_only_starts_inside_the_showcase() {
        let mut scene = scene();
        scene.pressed(Some(Point::new(5.0, 5.0)));
        assert!(!scene.carousel.as_ref().unwrap().is_dragging());
        scene.released();

        scene.pressed(Some(Point::new(640.0, 400.0)));
        assert!(scene.carousel.as_ref().unwrap().is_dragging());
        scene.pointer_moved(Point::new(500.0, 400.0));
        scene.released();
        let carousel = scene.carousel.as_ref().unwrap();
        assert_eq!(carousel.index(), 2);
        assert_eq!(carousel.phase(), Phase::PendingResume(carousel_parameters().resume_delay()));
    }

    fn carousel_parameters() -> crate::parameters::CarouselParameters {
        Parameters::default().carousel
    }

    #[test]
    fn theme_change_regenerates_noise_and_respawns_bodies() {
        let mut scene = scene();
        assert_eq!(scene.noise.generations(), 1);
        scene.resize(1024.0, 768.0);
        assert_eq!(scene.noise.generations(), 1);

        scene.set_theme(ThemeMode::Dark);
        assert_eq!(scene.noise.generations(), 2);
        assert_eq!(scene.noise.cached().unwrap().mode, ThemeMode::Dark);
        let bodies = scene.field.bodies();
        assert_eq!((bodies[0].x, bodies[0].y), (1024.0, 0.0));
    }

    #[test]
    fn press_without_pointer_still_grows_the_marker() {
        let mut scene = scene();
        scene.pointer_moved(Point::new(640.0, 400.0));
        scene.pointer_left();
        scene.pressed(scene.pointer());
        assert_eq!(scene.follower.target_size(), 32.0);
        assert!(!scene.carousel.as_ref().unwrap().is_dragging());
        scene.released();
        assert_eq!(scene.follower.target_size(), 24.0);
    }

    #[test]
    fn resize_reuses_grain_geometry() {
        let mut scene = scene();
        // 1280x800 over 512px tiles
        assert_eq!(scene.grain_layers.len(), 6);
        assert_eq!(scene.grain_builds, 1);

        for step in 0..50 {
            scene.resize(1280.0 - step as f32, 800.0 - step as f32);
        }
        assert_eq!(scene.grain_builds, 1);
        assert_eq!(scene.noise.generations(), 1);
        assert_eq!(scene.grain_layers.len(), 6);

        // growing only adds the newly exposed cells
        assert_eq!(scene.retile(), 0);
        scene.resize(1600.0, 800.0);
        assert_eq!(scene.grain_layers.len(), 8);
        scene.resize(3840.0, 2160.0);
        assert_eq!(scene.grain_layers.len(), 40);
        assert_eq!(scene.grain_builds, 1);

        scene.resize(600.0, 400.0);
        assert_eq!(scene.grain_layers.len(), 2);
        assert!(scene.grain_layers.contains_key(&(1, 0)));
    }

    #[test]
    fn grain_path_is_rebuilt_per_theme_only() {
        let mut scene = scene();
        scene.set_theme(ThemeMode::Dark);
        scene.resize(900.0, 700.0);
        assert_eq!(scene.grain_builds, 2);
        assert_eq!(scene.grain_layers.len(), 4);
    }

    #[test]
    fn stop_releases_everything() {
        let mut scene = scene();
        scene.stop();
        assert!(!scene.field.is_running());
        assert!(scene.noise.cached().is_none());
        assert!(scene.grain.is_none() && scene.grain_layers.is_empty());
        assert_eq!(scene.carousel.as_ref().unwrap().phase(), Phase::Stopped);
        for simulation in scene.simulations() {
            assert_eq!(
                simulation.tick(std::time::Duration::from_millis(16)),
                crate::driver::Tick::Idle
            );
        }
    }
}
