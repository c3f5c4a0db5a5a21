//! The drawable target: an RGBA8 pixel buffer with the primitive fills the
//! rasterizer needs. The host uploads `bytes()` to whatever presents it.

use glam::Vec2;

use crate::color::Rgb;

/// Offscreen RGBA8 frame. Pixels are packed R in the low byte, row-major,
/// row 0 at the top.
#[derive(Debug)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

#[inline]
fn pack(c: Rgb) -> u32 {
    0xFF00_0000 | ((c.b as u32) << 16) | ((c.g as u32) << 8) | c.r as u32
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate if the target size changed.
    pub fn resize(&mut self, width: usize, height: usize) {
        let (width, height) = (width.max(1), height.max(1));
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height];
        }
    }

    pub fn clear(&mut self, c: Rgb) {
        self.pixels.fill(pack(c));
    }

    /// Raw pixel bytes (RGBA8, tightly packed) for texture upload.
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = pack(c);
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x < self.width && y < self.height {
            let p = self.pixels[y * self.width + x];
            Some([(p & 0xFF) as u8, ((p >> 8) & 0xFF) as u8, ((p >> 16) & 0xFF) as u8])
        } else {
            None
        }
    }

    /// Scanline fill of a convex or concave simple polygon (even-odd rule).
    /// Sub-pixel or out-of-bounds polygons simply draw nothing.
    pub fn fill_polygon(&mut self, pts: &[Vec2], c: Rgb) {
        if pts.len() < 3 {
            return;
        }
        let color = pack(c);

        let min_y = pts.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = pts.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        let y0 = (min_y.floor().max(0.0)) as i32;
        let y1 = (max_y.ceil().min(self.height as f32)) as i32;

        let mut xs: Vec<f32> = Vec::with_capacity(8);
        for y in y0..y1 {
            let scan = y as f32 + 0.5;
            xs.clear();

            let mut prev = pts[pts.len() - 1];
            for &cur in pts {
                // Half-open edge rule avoids double-counting shared vertices.
                if (prev.y <= scan && cur.y > scan) || (cur.y <= scan && prev.y > scan) {
                    let t = (scan - prev.y) / (cur.y - prev.y);
                    xs.push(prev.x + (cur.x - prev.x) * t);
                }
                prev = cur;
            }
            xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            for pair in xs.chunks_exact(2) {
                let x0 = (pair[0].round().max(0.0)) as usize;
                let x1 = (pair[1].round().min(self.width as f32)) as usize;
                if x0 < x1 {
                    let row = y as usize * self.width;
                    self.pixels[row + x0..row + x1].fill(color);
                }
            }
        }
    }

    /// Bresenham line, clipped per pixel.
    pub fn draw_line(&mut self, a: Vec2, b: Vec2, c: Rgb) {
        let (mut x0, mut y0) = (a.x.round() as i32, a.y.round() as i32);
        let (x1, y1) = (b.x.round() as i32, b.y.round() as i32);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_pixel(x0, y0, c);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Filled disc; radius 0 degenerates to a single pixel.
    pub fn fill_circle(&mut self, center: Vec2, radius: i32, c: Rgb) {
        let cx = center.x.round() as i32;
        let cy = center.y.round() as i32;
        if radius <= 0 {
            self.set_pixel(cx, cy, c);
            return;
        }
        for dy in -radius..=radius {
            let half = ((radius * radius - dy * dy) as f32).sqrt() as i32;
            for dx in -half..=half {
                self.set_pixel(cx + dx, cy + dy, c);
            }
        }
    }

    /// Small open-circle crosshair at the frame center.
    pub fn draw_crosshair(&mut self, c: Rgb) {
        let cx = (self.width / 2) as i32;
        let cy = (self.height / 2) as i32;
        for (dx, dy) in [
            (3, 0),
            (-3, 0),
            (0, 3),
            (0, -3),
            (2, 2),
            (2, -2),
            (-2, 2),
            (-2, -2),
        ] {
            self.set_pixel(cx + dx, cy + dy, c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_fills_every_pixel() {
        let mut f = Frame::new(4, 4);
        f.clear(Rgb::new(1, 2, 3));
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(f.pixel(x, y), Some([1, 2, 3]));
            }
        }
    }

    #[test]
    fn fill_polygon_covers_interior_only() {
        let mut f = Frame::new(16, 16);
        f.clear(Rgb::new(0, 0, 0));
        let quad = [
            Vec2::new(4.0, 4.0),
            Vec2::new(12.0, 4.0),
            Vec2::new(12.0, 12.0),
            Vec2::new(4.0, 12.0),
        ];
        f.fill_polygon(&quad, Rgb::new(255, 0, 0));
        assert_eq!(f.pixel(8, 8), Some([255, 0, 0]));
        assert_eq!(f.pixel(1, 1), Some([0, 0, 0]));
        assert_eq!(f.pixel(14, 8), Some([0, 0, 0]));
    }

    /// Polygons hanging off the frame edge must not panic and still fill
    /// their on-screen part.
    #[test]
    fn fill_polygon_clips_to_bounds() {
        let mut f = Frame::new(8, 8);
        f.clear(Rgb::new(0, 0, 0));
        let quad = [
            Vec2::new(-10.0, -10.0),
            Vec2::new(20.0, -10.0),
            Vec2::new(20.0, 20.0),
            Vec2::new(-10.0, 20.0),
        ];
        f.fill_polygon(&quad, Rgb::new(0, 255, 0));
        assert_eq!(f.pixel(0, 0), Some([0, 255, 0]));
        assert_eq!(f.pixel(7, 7), Some([0, 255, 0]));
    }

    #[test]
    fn degenerate_polygon_draws_nothing() {
        let mut f = Frame::new(8, 8);
        f.clear(Rgb::new(0, 0, 0));
        f.fill_polygon(&[Vec2::ZERO, Vec2::new(5.0, 5.0)], Rgb::new(255, 255, 255));
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(f.pixel(x, y), Some([0, 0, 0]));
            }
        }
    }

    #[test]
    fn bytes_are_rgba_little_endian() {
        let mut f = Frame::new(1, 1);
        f.clear(Rgb::new(10, 20, 30));
        assert_eq!(&f.bytes()[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn resize_reallocates_only_on_change() {
        let mut f = Frame::new(4, 4);
        f.resize(4, 4);
        assert_eq!((f.width(), f.height()), (4, 4));
        f.resize(2, 8);
        assert_eq!((f.width(), f.height()), (2, 8));
        assert_eq!(f.bytes().len(), 2 * 8 * 4);
    }
}
