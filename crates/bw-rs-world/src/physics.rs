//! Shared AABB physics: gravity integration and tile-grid collision.
//!
//! One implementation serves every entity. Collision is revert-on-overlap
//! per axis: tile size vastly exceeds per-frame velocity, so a full revert
//! cannot tunnel and needs no sub-tile sliding.

use crate::grid::TileGrid;

/// Side length of one tile in world units (pixels).
pub const TILE_SIZE: f32 = 40.0;

/// Downward acceleration applied per frame.
pub const GRAVITY: f32 = 0.55;

/// Maximum distance (tiles, centre to centre) for mining and placement.
pub const REACH: f32 = 6.0;

/// Right/bottom edges are pulled in by this margin so a box flush against
/// a tile boundary does not register in the next cell.
const EDGE_MARGIN: f32 = 1.0;

/// Axis-aligned body state shared by the player and mobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Top-left corner.
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub vx: f32,
    pub vy: f32,
    pub grounded: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            vx: 0.0,
            vy: 0.0,
            grounded: false,
        }
    }

    /// Centre of the bounding box.
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Accelerate downward, clamped to a terminal fall speed.
    pub fn apply_gravity(&mut self, terminal: f32) {
        self.vy = (self.vy + GRAVITY).min(terminal);
    }

    /// Inclusive tile range `(x0, x1, y0, y1)` the box currently spans.
    pub fn tile_span(&self) -> (i32, i32, i32, i32) {
        let x0 = (self.x / TILE_SIZE).floor() as i32;
        let x1 = ((self.x + self.w - EDGE_MARGIN) / TILE_SIZE).floor() as i32;
        let y0 = (self.y / TILE_SIZE).floor() as i32;
        let y1 = ((self.y + self.h - EDGE_MARGIN) / TILE_SIZE).floor() as i32;
        (x0, x1, y0, y1)
    }

    /// Whether the box overlaps any solid cell.
    pub fn overlaps_solid(&self, grid: &TileGrid) -> bool {
        let (x0, x1, y0, y1) = self.tile_span();
        for y in y0..=y1 {
            for x in x0..=x1 {
                if grid.is_solid(x, y) {
                    return true;
                }
            }
        }
        false
    }

    /// Advance one frame: horizontal move with world-bound clamp and
    /// revert-on-overlap, then vertical move. `grounded` is re-derived
    /// every call and set only by a downward collision (a landing, not a
    /// head bump); the bottom world edge counts as a landing.
    pub fn step(&mut self, grid: &TileGrid) {
        let max_x = (grid.width() as f32 * TILE_SIZE - self.w).max(0.0);
        self.x += self.vx;
        self.x = self.x.clamp(0.0, max_x);
        if self.overlaps_solid(grid) {
            self.x -= self.vx;
            self.vx = 0.0;
        }

        self.grounded = false;
        self.y += self.vy;
        if self.overlaps_solid(grid) {
            if self.vy > 0.0 {
                self.grounded = true;
            }
            self.y -= self.vy;
            self.vy = 0.0;
        } else {
            let max_y = (grid.height() as f32 * TILE_SIZE - self.h).max(0.0);
            if self.y > max_y {
                self.y = max_y;
                self.vy = 0.0;
                self.grounded = true;
            } else if self.y < 0.0 {
                self.y = 0.0;
                self.vy = self.vy.max(0.0);
            }
        }
    }
}

/// Whether a tile cell is within interaction reach of a world-space point
/// (both measured in tiles, centre to centre).
pub fn within_reach(center_x: f32, center_y: f32, tile_x: i32, tile_y: i32) -> bool {
    let dx = (tile_x as f32 + 0.5) - center_x / TILE_SIZE;
    let dy = (tile_y as f32 + 0.5) - center_y / TILE_SIZE;
    (dx * dx + dy * dy).sqrt() <= REACH
}
