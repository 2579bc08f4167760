//! Destructible terrain heightfield
//!
//! A fixed-size grid of small cell codes:
//! - `1`: solid ground
//! - `0`: open air below the skyline
//! - `-1..=-8`: sky gradient bands (air for collision, a rendering hint only)
//!
//! The only mutation after generation is crater carving, which turns cells
//! into open air and never back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub const SOLID: i8 = 1;
pub const AIR: i8 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terrain {
    width: usize,
    height: usize,
    cells: Vec<i8>,
}

impl Terrain {
    /// All-air terrain
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "terrain must have at least one cell");
        Self {
            width,
            height,
            cells: vec![AIR; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major cell codes, for rendering
    pub fn cells(&self) -> &[i8] {
        &self.cells
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "terrain access ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Cell code at (x, y). Panics when out of bounds.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> i8 {
        self.cells[self.index(x, y)]
    }

    /// Overwrite a cell. Panics when out of bounds.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, code: i8) {
        let idx = self.index(x, y);
        self.cells[idx] = code;
    }

    #[inline]
    pub fn is_solid(&self, x: usize, y: usize) -> bool {
        self.cell(x, y) > AIR
    }

    /// Clamp a world position into the grid's extent
    pub fn clamp_position(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            pos.x.clamp(0.0, (self.width - 1) as f32),
            pos.y.clamp(0.0, (self.height - 1) as f32),
        )
    }

    /// Clamp a world position onto the grid, returning cell coordinates
    pub fn clamp_to_grid(&self, pos: Vec2) -> (usize, usize) {
        let pos = self.clamp_position(pos);
        (pos.x as usize, pos.y as usize)
    }

    /// Solid test at a world position, clamped to the grid
    pub fn is_solid_at(&self, pos: Vec2) -> bool {
        let (x, y) = self.clamp_to_grid(pos);
        self.is_solid(x, y)
    }

    /// Carve a disc of open air centred on `center`.
    ///
    /// Every cell whose coordinates lie within `radius` of the (fractional)
    /// center becomes [`AIR`]; cells outside the grid are skipped.
    pub fn carve_crater(&mut self, center: Vec2, radius: f32) {
        if radius <= 0.0 || !center.is_finite() || !radius.is_finite() {
            return;
        }

        let r2 = radius * radius;
        let y0 = ((center.y - radius).floor() as i64).max(0);
        let y1 = ((center.y + radius).ceil() as i64).min(self.height as i64 - 1);
        let x0 = ((center.x - radius).floor() as i64).max(0);
        let x1 = ((center.x + radius).ceil() as i64).min(self.width as i64 - 1);

        for y in y0..=y1 {
            let dy = y as f32 - center.y;
            let row = y as usize * self.width;
            for x in x0..=x1 {
                let dx = x as f32 - center.x;
                if dx * dx + dy * dy <= r2 {
                    self.cells[row + x as usize] = AIR;
                }
            }
        }
    }
}
