// ============================================================================
// canvas.rs — Demo Showcase
// CPU drawing surface: a fixed-size RGBA pixel buffer with the handful of
// raster primitives the demos need (fade, rects, circles, lines, polygons).
// ============================================================================

/// Straight (non-premultiplied) 8-bit color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// Linear blend towards `other` by `t` in [0, 1].
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    fn pack(self) -> u32 {
        // Little-endian RGBA8 so the buffer can be uploaded / saved as-is.
        self.r as u32 | (self.g as u32) << 8 | (self.b as u32) << 16 | 0xff00_0000
    }

    fn unpack(px: u32) -> Rgb {
        Rgb::new(px as u8, (px >> 8) as u8, (px >> 16) as u8)
    }
}

// ======================== Canvas ========================

pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK.pack(); (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel bytes in RGBA8 order.
    pub fn as_rgba_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Rgb::unpack(self.pixels[(y * self.width + x) as usize]))
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color.pack());
    }

    /// Blend the whole surface towards `color`; leaves motion trails behind
    /// moving shapes when called once per frame with a small alpha.
    pub fn fade(&mut self, color: Rgb, alpha: f32) {
        for px in &mut self.pixels {
            *px = Rgb::unpack(*px).lerp(color, alpha).pack();
        }
    }

    fn blend(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        self.pixels[idx] = if alpha >= 1.0 {
            color.pack()
        } else {
            Rgb::unpack(self.pixels[idx]).lerp(color, alpha).pack()
        };
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32) {
        let x0 = x.floor().max(0.0) as i32;
        let y0 = y.floor().max(0.0) as i32;
        let x1 = (x + w).ceil().min(self.width as f32) as i32;
        let y1 = (y + h).ceil().min(self.height as f32) as i32;
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color, alpha);
            }
        }
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, width: f32, color: Rgb) {
        self.line(x, y, x + w, y, width, color, 1.0);
        self.line(x + w, y, x + w, y + h, width, color, 1.0);
        self.line(x + w, y + h, x, y + h, width, color, 1.0);
        self.line(x, y + h, x, y, width, color, 1.0);
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32) {
        if radius <= 0.0 {
            return;
        }
        let r2 = radius * radius;
        let x0 = (cx - radius).floor() as i32;
        let x1 = (cx + radius).ceil() as i32;
        let y0 = (cy - radius).floor() as i32;
        let y1 = (cy + radius).ceil() as i32;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend(px, py, color, alpha);
                }
            }
        }
    }

    /// Soft halo: concentric discs with alpha falling off towards `radius`.
    pub fn glow(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32) {
        let rings = 4;
        for i in (1..=rings).rev() {
            let t = i as f32 / rings as f32;
            self.fill_circle(cx, cy, radius * t, color, alpha * (1.0 - t) * 0.5 + 0.05);
        }
    }

    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Rgb, alpha: f32) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i32;
        let half = (width * 0.5).max(0.5);
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = x0 + dx * t;
            let y = y0 + dy * t;
            if half <= 0.75 {
                self.blend(x.floor() as i32, y.floor() as i32, color, alpha);
            } else {
                self.fill_circle(x, y, half, color, alpha);
            }
        }
    }

    pub fn polyline(&mut self, points: &[(f32, f32)], width: f32, color: Rgb, alpha: f32) {
        for pair in points.windows(2) {
            self.line(pair[0].0, pair[0].1, pair[1].0, pair[1].1, width, color, alpha);
        }
    }

    /// Scanline fill of a simple polygon (even-odd rule).
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Rgb, alpha: f32) {
        if points.len() < 3 {
            return;
        }
        let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        let y0 = min_y.floor().max(0.0) as i32;
        let y1 = max_y.ceil().min(self.height as f32) as i32;

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for py in y0..y1 {
            let sy = py as f32 + 0.5;
            crossings.clear();
            for i in 0..points.len() {
                let (ax, ay) = points[i];
                let (bx, by) = points[(i + 1) % points.len()];
                if (ay <= sy && by > sy) || (by <= sy && ay > sy) {
                    crossings.push(ax + (sy - ay) / (by - ay) * (bx - ax));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for span in crossings.chunks_exact(2) {
                let xa = span[0].round() as i32;
                let xb = span[1].round() as i32;
                for px in xa..xb {
                    self.blend(px, py, color, alpha);
                }
            }
        }
    }

    /// Draw a blocky 5×7 glyph whose shape is derived from `code`.
    /// Good enough for a rain of pseudo-katakana.
    pub fn glyph(&mut self, x: f32, y: f32, cell: f32, code: u32, color: Rgb) {
        let mut bits = code.wrapping_mul(0x9e37_79b9) ^ (code << 13);
        for row in 0..7 {
            for col in 0..5 {
                if bits & 1 == 1 {
                    self.fill_rect(
                        x + col as f32 * cell,
                        y + row as f32 * cell,
                        cell,
                        cell,
                        color,
                        1.0,
                    );
                }
                bits = bits.rotate_right(1) ^ (row as u32 * 0x45d9_f3b);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_decode_channels() {
        let c = Rgb::hex(0x3b82f6);
        assert_eq!((c.r, c.g, c.b), (0x3b, 0x82, 0xf6));
    }

    #[test]
    fn pixels_round_trip_through_rgba_bytes() {
        let mut canvas = Canvas::new(4, 2);
        canvas.fill_rect(0.0, 0.0, 1.0, 1.0, Rgb::new(10, 20, 30), 1.0);
        assert_eq!(&canvas.as_rgba_bytes()[..4], &[10, 20, 30, 255]);
        assert_eq!(canvas.as_rgba_bytes().len(), 4 * 2 * 4);
    }

    #[test]
    fn drawing_outside_the_surface_is_clipped() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_circle(-50.0, -50.0, 5.0, Rgb::WHITE, 1.0);
        canvas.line(-20.0, 5.0, 30.0, 5.0, 1.0, Rgb::WHITE, 1.0);
        assert_eq!(canvas.pixel(0, 5), Some(Rgb::WHITE));
        assert_eq!(canvas.pixel(0, 0), Some(Rgb::BLACK));
        assert_eq!(canvas.pixel(10, 0), None);
    }

    #[test]
    fn fade_moves_towards_target() {
        let mut canvas = Canvas::new(1, 1);
        canvas.clear(Rgb::WHITE);
        canvas.fade(Rgb::BLACK, 0.5);
        let px = canvas.pixel(0, 0).unwrap();
        assert!(px.r > 120 && px.r < 135);
    }

    #[test]
    fn polygon_fill_covers_interior_only() {
        let mut canvas = Canvas::new(20, 20);
        let square = [(5.0, 5.0), (15.0, 5.0), (15.0, 15.0), (5.0, 15.0)];
        canvas.fill_polygon(&square, Rgb::WHITE, 1.0);
        assert_eq!(canvas.pixel(10, 10), Some(Rgb::WHITE));
        assert_eq!(canvas.pixel(2, 2), Some(Rgb::BLACK));
        assert_eq!(canvas.pixel(17, 10), Some(Rgb::BLACK));
    }
}
