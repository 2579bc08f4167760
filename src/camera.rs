//! Camera follow and edge scrolling
//!
//! Lives outside `sim`: nothing here feeds back into the simulation.

use glam::Vec2;

/// Easing rate toward the tracked body (per second)
pub const FOLLOW_RATE: f32 = 5.0;
/// Edge-scroll speed (map units per second)
pub const SCROLL_SPEED: f32 = 400.0;
/// Pointer distance from a viewport edge that triggers scrolling
pub const SCROLL_MARGIN: f32 = 20.0;

/// Top-left corner of the visible window onto the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pos: Vec2,
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            viewport,
        }
    }

    /// Advance one frame: scroll when the pointer hugs an edge, ease toward
    /// the tracked position, then keep the view on the map.
    pub fn update(&mut self, tracked: Option<Vec2>, pointer: Option<Vec2>, map_size: Vec2, dt: f32) {
        if let Some(pointer) = pointer {
            let step = SCROLL_SPEED * dt;
            if pointer.x < SCROLL_MARGIN {
                self.pos.x -= step;
            }
            if pointer.x > self.viewport.x - SCROLL_MARGIN {
                self.pos.x += step;
            }
            if pointer.y < SCROLL_MARGIN {
                self.pos.y -= step;
            }
            if pointer.y > self.viewport.y - SCROLL_MARGIN {
                self.pos.y += step;
            }
        }

        if let Some(tracked) = tracked {
            let target = tracked - self.viewport / 2.0;
            self.pos += (target - self.pos) * FOLLOW_RATE * dt;
        }

        self.clamp(map_size);
    }

    /// Keep the view inside the map. A map narrower than the viewport pins
    /// the view to its far edge.
    pub fn clamp(&mut self, map_size: Vec2) {
        let limit = map_size - self.viewport;
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
        }
        if self.pos.x >= limit.x {
            self.pos.x = limit.x;
        }
        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
        }
        if self.pos.y >= limit.y {
            self.pos.y = limit.y;
        }
    }
}
