// ============================================================================
// demos/cube.rs — Demo Showcase
// A rotating cube: Y then X rotation, simple perspective, faces painted back
// to front. Auto-rotates while running; dragging spins it by hand.
// ============================================================================

use super::{Demo, DemoKind, FrameContext};
use crate::canvas::{Canvas, Rgb};
use crate::config::DemoParams;
use crate::input::Action;
use crate::stats::DemoStats;

pub const SIZE: f32 = 80.0;
pub const AUTO_SPIN: (f32, f32) = (0.01, 0.015);
/// Radians of rotation per dragged pixel.
pub const DRAG_SPIN: f32 = 0.01;

const CENTER: (f32, f32) = (300.0, 200.0);

const VERTICES: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

const FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [0, 3, 7, 4],
    [1, 2, 6, 5],
];

const FACE_COLORS: [(Rgb, Rgb); 6] = [
    (Rgb::hex(0x3b82f6), Rgb::hex(0x1d4ed8)),
    (Rgb::hex(0x8b5cf6), Rgb::hex(0x6d28d9)),
    (Rgb::hex(0xec4899), Rgb::hex(0xbe185d)),
    (Rgb::hex(0xf59e0b), Rgb::hex(0xd97706)),
    (Rgb::hex(0x10b981), Rgb::hex(0x059669)),
    (Rgb::hex(0x06b6d4), Rgb::hex(0x0891b2)),
];

/// Screen position plus depth of a projected vertex.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

pub fn project(vertex: [f32; 3], rot_x: f32, rot_y: f32, center: (f32, f32)) -> Projected {
    let [x, y, z] = vertex;
    let (sy, cy) = rot_y.sin_cos();
    let (sx, cx) = rot_x.sin_cos();

    let nx = x * cy - z * sy;
    let nz = x * sy + z * cy;
    let ny = y * cx - nz * sx;
    let nz = y * sx + nz * cx;

    let scale = 200.0 / (200.0 + nz * 50.0);
    Projected {
        x: center.0 + nx * SIZE * scale,
        y: center.1 + ny * SIZE * scale,
        z: nz,
    }
}

/// Face indices ordered far to near. Larger z projects smaller, so the
/// deepest face (largest mean z) is painted first.
pub fn paint_order(projected: &[Projected; 8]) -> Vec<usize> {
    let depth = |face: &[usize; 4]| face.iter().map(|&i| projected[i].z).sum::<f32>() / 4.0;
    let mut order: Vec<usize> = (0..FACES.len()).collect();
    order.sort_by(|&a, &b| depth(&FACES[b]).total_cmp(&depth(&FACES[a])));
    order
}

pub struct CubeDemo {
    rot_x: f32,
    rot_y: f32,
    drag_from: Option<(f32, f32)>,
    frame: u64,
}

impl CubeDemo {
    pub fn new() -> Self {
        Self {
            rot_x: 0.0,
            rot_y: 0.0,
            drag_from: None,
            frame: 0,
        }
    }

    #[cfg(test)]
    pub fn rotation(&self) -> (f32, f32) {
        (self.rot_x, self.rot_y)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    fn projected(&self) -> [Projected; 8] {
        VERTICES.map(|v| project(v, self.rot_x, self.rot_y, CENTER))
    }
}

impl Demo for CubeDemo {
    fn kind(&self) -> DemoKind {
        DemoKind::Cube
    }

    fn activate(&mut self, _now_ms: f64) {}

    fn handle_action(&mut self, action: Action, _now_ms: f64) {
        match action {
            Action::PointerDown { x, y } => self.drag_from = Some((x, y)),
            Action::PointerMove { x, y } => {
                if let Some((lx, ly)) = self.drag_from {
                    self.rot_x += (y - ly) * DRAG_SPIN;
                    self.rot_y += (x - lx) * DRAG_SPIN;
                    self.drag_from = Some((x, y));
                }
            }
            Action::PointerUp => self.drag_from = None,
            _ => {}
        }
    }

    fn update(&mut self, ctx: &FrameContext) {
        self.frame += 1;
        if ctx.running && !self.is_dragging() {
            self.rot_x += AUTO_SPIN.0;
            self.rot_y += AUTO_SPIN.1;
        }
    }

    fn draw(&self, canvas: &mut Canvas, _params: &DemoParams) {
        canvas.clear(Rgb::BLACK);
        let projected = self.projected();

        for face_idx in paint_order(&projected) {
            let face = FACES[face_idx];
            let (light, dark) = FACE_COLORS[face_idx];
            let points: Vec<(f32, f32)> = face.iter().map(|&i| (projected[i].x, projected[i].y)).collect();
            // Shade by mean depth: nearer faces use the lighter stop.
            let depth = face.iter().map(|&i| projected[i].z).sum::<f32>() / 4.0;
            let color = dark.lerp(light, 0.5 - depth * 0.5);
            canvas.fill_polygon(&points, color, 1.0);

            let mut outline = points.clone();
            outline.push(points[0]);
            canvas.polyline(&outline, 2.0, Rgb::WHITE, 0.3);
        }

        for p in &projected {
            canvas.fill_circle(p.x, p.y, 5.0, Rgb::BLACK, 1.0);
            canvas.fill_circle(p.x, p.y, 4.0, Rgb::WHITE, 1.0);
        }
    }

    fn stats(&self) -> DemoStats {
        let mut stats = DemoStats::new("faces", FACES.len());
        stats.frame = self.frame;
        stats
    }
}
