// ============================================================================
// viewport.rs — Demo Showcase
// Where the canvas sits in the window: responsive display rect, pointer
// rescaling into canvas space, and the GPU uniform for the blit pass.
// ============================================================================

use crate::config::responsive_canvas_size;

/// GPU-side placement of the canvas quad in normalized device coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewportUniforms {
    pub offset: [f32; 2],
    pub scale: [f32; 2],
    pub canvas_size: [u32; 2],
    pub _pad: [u32; 2],
}

impl Default for ViewportUniforms {
    fn default() -> Self {
        Self {
            offset: [0.0, 0.0],
            scale: [1.0, 1.0],
            canvas_size: [1, 1],
            _pad: [0, 0],
        }
    }
}

/// On-screen rectangle of the canvas, in physical window pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    window_width: f32,
    window_height: f32,
}

impl Viewport {
    /// Lay out a canvas inside the window area right of `reserved_left`
    /// pixels (the side panel). `scale_factor` converts logical breakpoints
    /// to physical pixels.
    pub fn layout(
        window_width: u32,
        window_height: u32,
        reserved_left: f32,
        scale_factor: f32,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Self {
        let ww = window_width.max(1) as f32;
        let wh = window_height.max(1) as f32;
        let area = [reserved_left, 0.0, ww, wh];
        Self::layout_in(window_width, window_height, area, scale_factor, canvas_width, canvas_height)
    }

    /// Lay out a canvas centered in `area` (`[left, top, right, bottom]`,
    /// physical pixels), the space left over by the UI panels.
    pub fn layout_in(
        window_width: u32,
        window_height: u32,
        area: [f32; 4],
        scale_factor: f32,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Self {
        let ww = window_width.max(1) as f32;
        let wh = window_height.max(1) as f32;
        let [left, top, right, bottom] = area;
        let avail_w = (right.min(ww) - left).max(1.0);
        let avail_h = (bottom.min(wh) - top).max(1.0);
        let logical_avail = avail_w / scale_factor.max(0.1);

        let (display_w, _) = responsive_canvas_size(logical_avail);
        let aspect = canvas_height as f32 / canvas_width.max(1) as f32;
        let mut width = display_w * scale_factor;
        let mut height = width * aspect;

        // Never overflow the area; shrink uniformly.
        let fit = (avail_w / width).min(avail_h / height).min(1.0);
        width *= fit;
        height *= fit;

        Self {
            left: left + (avail_w - width) * 0.5,
            top: top + (avail_h - height) * 0.5,
            width,
            height,
            canvas_width,
            canvas_height,
            window_width: ww,
            window_height: wh,
        }
    }

    /// Rescale a window-space pointer position into canvas space using the
    /// canvas/display ratios. `None` when the pointer is outside the canvas.
    pub fn to_canvas(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        let lx = x - self.left;
        let ly = y - self.top;
        if lx < 0.0 || ly < 0.0 || lx > self.width || ly > self.height {
            return None;
        }
        let scale_x = self.canvas_width as f32 / self.width;
        let scale_y = self.canvas_height as f32 / self.height;
        Some((lx * scale_x, ly * scale_y))
    }

    /// Build the blit uniform for the current rect.
    pub fn uniforms(&self) -> ViewportUniforms {
        let sx = self.width / self.window_width;
        let sy = self.height / self.window_height;
        let cx = (self.left + self.width * 0.5) / self.window_width * 2.0 - 1.0;
        let cy = 1.0 - (self.top + self.height * 0.5) / self.window_height * 2.0;
        ViewportUniforms {
            offset: [cx, cy],
            scale: [sx, sy],
            canvas_size: [self.canvas_width, self.canvas_height],
            _pad: [0, 0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_layout_is_native_size_and_centered() {
        let vp = Viewport::layout(1600, 1000, 300.0, 1.0, 600, 400);
        assert_eq!((vp.width, vp.height), (600.0, 400.0));
        assert_eq!(vp.left, 300.0 + (1300.0 - 600.0) / 2.0);
        assert_eq!(vp.top, 300.0);
    }

    #[test]
    fn pointer_is_rescaled_by_display_ratio() {
        // 900 px available → tablet breakpoint → 500 px wide display.
        let vp = Viewport::layout(900, 800, 0.0, 1.0, 600, 400);
        assert_eq!(vp.width, 500.0);
        let (x, y) = vp.to_canvas(vp.left + 250.0, vp.top + vp.height * 0.5).unwrap();
        assert!((x - 300.0).abs() < 1e-3);
        assert!((y - 200.0).abs() < 1e-3);
    }

    #[test]
    fn pointer_outside_canvas_is_ignored() {
        let vp = Viewport::layout(1600, 1000, 300.0, 1.0, 600, 400);
        assert_eq!(vp.to_canvas(10.0, 10.0), None);
    }

    #[test]
    fn panels_on_both_sides_shrink_the_area() {
        let vp = Viewport::layout_in(1600, 1000, [300.0, 0.0, 1400.0, 900.0], 1.0, 600, 400);
        assert_eq!((vp.width, vp.height), (600.0, 400.0));
        assert_eq!(vp.left, 550.0);
        assert_eq!(vp.top, 250.0);
        let narrow = Viewport::layout_in(1600, 1000, [300.0, 0.0, 800.0, 1000.0], 1.0, 600, 400);
        assert!(narrow.width <= 500.0);
    }

    #[test]
    fn square_canvas_keeps_aspect() {
        let vp = Viewport::layout(1600, 1000, 0.0, 1.0, 400, 400);
        assert_eq!(vp.width, vp.height);
    }

    #[test]
    fn full_window_canvas_maps_to_unit_ndc() {
        let vp = Viewport {
            left: 0.0,
            top: 0.0,
            width: 600.0,
            height: 400.0,
            canvas_width: 600,
            canvas_height: 400,
            window_width: 600.0,
            window_height: 400.0,
        };
        let u = vp.uniforms();
        assert_eq!(u.offset, [0.0, 0.0]);
        assert_eq!(u.scale, [1.0, 1.0]);
    }
}
