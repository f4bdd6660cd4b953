use rand::prelude::*;
use rand::rngs::StdRng;

use crate::palette::{Palette, Speckle, ThemeMode};
use crate::parameters::NoiseParameters;
use crate::viewport::Viewport;

/// Square RGBA bitmap of sparse speckles, repeated over the viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseTile {
    pub mode: ThemeMode,
    pub size: u32,
    pub speckle: Speckle,
    pub pixels: Vec<u8>,
}

impl NoiseTile {
    fn generate(
        mode: ThemeMode,
        speckle: Speckle,
        size: u32,
        density: f32,
        rng: &mut StdRng,
    ) -> Self {
        let len = (size as usize) * (size as usize);
        let mut pixels = vec![0u8; len * 4];
        for pixel in pixels.chunks_exact_mut(4) {
            if rng.gen::<f32>() < density {
                pixel[0] = speckle.value;
                pixel[1] = speckle.value;
                pixel[2] = speckle.value;
                pixel[3] = speckle.alpha;
            }
        }
        NoiseTile {
            mode,
            size,
            speckle,
            pixels,
        }
    }

    #[cfg(test)]
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        let offset = ((y * self.size + x) * 4) as usize;
        self.pixels[offset + 3]
    }

    /// Coordinates of every non-transparent pixel.
    pub fn speckles(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let size = self.size;
        self.pixels
            .chunks_exact(4)
            .enumerate()
            .filter(|(_, pixel)| pixel[3] != 0)
            .map(move |(i, _)| (i as u32 % size, i as u32 / size))
    }

    /// Horizontal runs of adjacent speckles, row by row.
    pub fn runs(&self) -> Vec<Run> {
        let mut runs: Vec<Run> = Vec::new();
        for (x, y) in self.speckles() {
            match runs.last_mut() {
                Some(run) if run.y == y && run.x + run.len == x => run.len += 1,
                _ => runs.push(Run { x, y, len: 1 }),
            }
        }
        runs
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    pub x: u32,
    pub y: u32,
    pub len: u32,
}

/// Caches one tile per theme mode; resizing only changes the fill area.
pub struct NoiseTexture {
    parameters: NoiseParameters,
    palette: &'static Palette,
    rng: StdRng,
    tile: Option<NoiseTile>,
    fill: (f32, f32),
    generations: u64,
}

impl NoiseTexture {
    pub fn new(parameters: NoiseParameters, palette: &'static Palette, rng: StdRng) -> Self {
        NoiseTexture {
            parameters,
            palette,
            rng,
            tile: None,
            fill: (0.0, 0.0),
            generations: 0,
        }
    }

    /// Returns the tile for `mode`, regenerating it only on a mode change.
    pub fn tile(&mut self, mode: ThemeMode) -> &NoiseTile {
        let tile = match self.tile.take() {
            Some(tile) if tile.mode == mode => tile,
            _ => {
                let speckle = self.palette.shades(mode).speckle;
                let tile = NoiseTile::generate(
                    mode,
                    speckle,
                    self.parameters.tile_size,
                    self.parameters.density,
                    &mut self.rng,
                );
                self.generations += 1;
                log::debug!(
                    "generated {:?} noise tile {}x{} ({} speckles)",
                    mode,
                    tile.size,
                    tile.size,
                    tile.speckles().count()
                );
                tile
            }
        };
        self.tile.insert(tile)
    }

    pub fn cached(&self) -> Option<&NoiseTile> {
        self.tile.as_ref()
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.fill = (viewport.width, viewport.height);
    }

    #[cfg(test)]
    pub fn fill(&self) -> (f32, f32) {
        self.fill
    }

    pub fn tile_size(&self) -> u32 {
        self.parameters.tile_size
    }

    /// Grid cells `(column, row)` whose tiles cover the fill area.
    pub fn cells(&self) -> Vec<(u32, u32)> {
        let size = self.parameters.tile_size as f32;
        let (width, height) = self.fill;
        let columns = (width / size).ceil().max(0.0) as u32;
        let rows = (height / size).ceil().max(0.0) as u32;
        (0..rows)
            .flat_map(|row| (0..columns).map(move |column| (column, row)))
            .collect()
    }

    #[cfg(test)]
    pub fn generations(&self) -> u64 {
        self.generations
    }

    pub fn release(&mut self) {
        self.tile = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PALETTE;

    fn texture() -> NoiseTexture {
        NoiseTexture::new(
            NoiseParameters {
                tile_size: 64,
                density: 0.15,
            },
            &PALETTE,
            StdRng::seed_from_u64(11),
        )
    }

    #[test]
    fn same_mode_is_a_cache_hit() {
        let mut noise = texture();
        let first = noise.tile(ThemeMode::Dark).clone();
        let second = noise.tile(ThemeMode::Dark).clone();
        assert_eq!(first, second);
        assert_eq!(noise.generations(), 1);
    }

    #[test]
    fn mode_change_regenerates_with_new_constants() {
        let mut noise = texture();
        let dark = noise.tile(ThemeMode::Dark).clone();
        let light = noise.tile(ThemeMode::Light).clone();
        assert_eq!(noise.generations(), 2);
        assert_eq!(dark.speckle, Speckle { value: 255, alpha: 10 });
        assert_eq!(light.speckle, Speckle { value: 0, alpha: 23 });

        for (x, y) in light.speckles() {
            assert_eq!(light.alpha_at(x, y), 23);
        }
        let (x, y) = dark.speckles().next().unwrap();
        let offset = ((y * dark.size + x) * 4) as usize;
        assert_eq!(&dark.pixels[offset..offset + 4], &[255, 255, 255, 10]);
    }

    #[test]
    fn resize_reuses_the_tile() {
        let mut noise = texture();
        let before = noise.tile(ThemeMode::Light).clone();
        noise.resize(Viewport::new(200.0, 100.0, 2.0));
        noise.resize(Viewport::new(130.0, 64.0, 1.0));
        assert_eq!(noise.cached(), Some(&before));
        assert_eq!(noise.generations(), 1);
        assert_eq!(noise.fill(), (130.0, 64.0));
        assert_eq!(noise.cells(), vec![(0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn runs_cover_every_speckle_once() {
        let mut noise = texture();
        let tile = noise.tile(ThemeMode::Light).clone();
        let runs = tile.runs();
        let covered: u32 = runs.iter().map(|run| run.len).sum();
        assert_eq!(covered as usize, tile.speckles().count());
        for run in runs.iter() {
            assert!(run.x + run.len <= tile.size);
            for x in run.x..run.x + run.len {
                assert_eq!(tile.alpha_at(x, run.y), 23);
            }
        }
        for pair in runs.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(a.y != b.y || a.x + a.len < b.x);
        }
    }

    #[test]
    fn empty_fill_has_no_cells() {
        let noise = texture();
        assert!(noise.cells().is_empty());
    }

    #[test]
    fn speckle_density_is_roughly_fifteen_percent() {
        let mut noise = texture();
        let tile = noise.tile(ThemeMode::Dark);
        let ratio = tile.speckles().count() as f32 / (64.0 * 64.0);
        assert!(ratio > 0.10 && ratio < 0.20, "ratio {}", ratio);
    }

    #[test]
    fn release_drops_the_cache() {
        let mut noise = texture();
        noise.tile(ThemeMode::Dark);
        noise.release();
        assert!(noise.cached().is_none());
        noise.tile(ThemeMode::Dark);
        assert_eq!(noise.generations(), 2);
    }
}
