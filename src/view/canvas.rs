//! Character canvas the view draws frames onto.
//!
//! A static background (streets and cameras) is painted once from the
//! configuration and restored at the start of every frame; voyager
//! markers and the status line are drawn on top.

use crate::config::{CameraConfig, GridPoint, MapConfig};

/// Marker drawn for a voyager still on its route.
pub const VOYAGER_CHAR: char = 'o';
/// Marker drawn for a voyager that finished its route.
pub const FINISHED_CHAR: char = '*';
/// Marker drawn for a dispatcher camera.
pub const CAMERA_CHAR: char = 'C';
/// Marker drawn along a street.
pub const STREET_CHAR: char = '.';
/// Marker drawn at street endpoints.
pub const JUNCTION_CHAR: char = '+';

/// Fixed-size grid of characters with a frozen background layer.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<char>,
    background: Vec<char>,
}

impl Canvas {
    /// Create a blank canvas.
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![' '; size],
            background: vec![' '; size],
        }
    }

    /// Build the scene for a map: row 0 is the status line, the map
    /// occupies the rows below it.
    pub fn scene(map: &MapConfig, cameras: &[CameraConfig]) -> Self {
        let mut canvas = Self::new(map.width, map.height + 1);
        for street in &map.streets {
            canvas.draw_segment(street.from, street.to);
        }
        for camera in cameras {
            canvas.set(camera.position.x, camera.position.y + 1, CAMERA_CHAR);
        }
        canvas.freeze_background();
        canvas
    }

    /// Canvas width in columns.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Canvas height in rows.
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Write one cell; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u16, y: u16, ch: char) {
        if x < self.width && y < self.height {
            self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)] = ch;
        }
    }

    /// Read one cell; out-of-bounds reads return a space.
    pub fn get(&self, x: u16, y: u16) -> char {
        if x < self.width && y < self.height {
            self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)]
        } else {
            ' '
        }
    }

    /// Draw text starting at (x, y), clipped at the right edge.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            let Ok(offset) = u16::try_from(i) else { break };
            let Some(col) = x.checked_add(offset) else { break };
            if col >= self.width {
                break;
            }
            self.set(col, y, ch);
        }
    }

    /// Capture the current cells as the background layer.
    pub fn freeze_background(&mut self) {
        self.background.copy_from_slice(&self.cells);
    }

    /// Restore the background layer, discarding dynamic content.
    pub fn reset(&mut self) {
        self.cells.copy_from_slice(&self.background);
    }

    /// Iterate rows as strings, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(usize::from(self.width).max(1))
            .map(|row| row.iter().collect())
    }

    /// Draw a street segment in map coordinates (the canvas offsets it
    /// below the status row).
    fn draw_segment(&mut self, from: GridPoint, to: GridPoint) {
        let (x0, y0) = (f32::from(from.x), f32::from(from.y));
        let (x1, y1) = (f32::from(to.x), f32::from(to.y));
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil() as u32;
        for i in 0..=steps {
            let t = if steps == 0 {
                0.0
            } else {
                i as f32 / steps as f32
            };
            let x = (x0 + (x1 - x0) * t).round() as u16;
            let y = (y0 + (y1 - y0) * t).round() as u16;
            self.set(x, y + 1, STREET_CHAR);
        }
        self.set(from.x, from.y + 1, JUNCTION_CHAR);
        self.set(to.x, to.y + 1, JUNCTION_CHAR);
    }
}
