// ============================================================================
// renderer.rs — Demo Showcase
// Overlay text rendering via glyphon: demo labels and scores mapped from
// canvas space onto the displayed canvas, plus a compact status line.
// ============================================================================

use glyphon::{
    Attrs, Buffer as TextBuffer, Cache as GlyphCache, Color as GlyphColor, Family, FontSystem,
    Metrics, Resolution, Shaping, SwashCache, TextArea, TextAtlas, TextBounds, TextRenderer,
    Viewport as GlyphViewport,
};

use crate::demos::{DemoKind, OverlayText};
use crate::game::GamePhase;
use crate::viewport::Viewport;

/// All glyphon resources needed for overlay text.
pub struct HudRenderer {
    pub font_system: FontSystem,
    pub swash_cache: SwashCache,
    pub glyph_viewport: GlyphViewport,
    pub text_atlas: TextAtlas,
    pub text_renderer: TextRenderer,
}

/// A shaped buffer and where its top-left lands in window pixels.
struct PlacedText {
    buffer: TextBuffer,
    left: f32,
    top: f32,
    color: GlyphColor,
}

impl HudRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let mut font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let glyph_cache = GlyphCache::new(device);
        let glyph_viewport = GlyphViewport::new(device, &glyph_cache);
        let mut text_atlas = TextAtlas::new(device, queue, &glyph_cache, surface_format);
        let text_renderer =
            TextRenderer::new(&mut text_atlas, device, wgpu::MultisampleState::default(), None);

        // Prime font system so first frame renders correctly
        let mut primer = TextBuffer::new(&mut font_system, Metrics::new(16.0, 20.0));
        primer.set_text(
            &mut font_system,
            "Demo Showcase",
            Attrs::new().family(Family::SansSerif),
            Shaping::Basic,
        );

        Self {
            font_system,
            swash_cache,
            glyph_viewport,
            text_atlas,
            text_renderer,
        }
    }

    /// Shape this frame's overlay texts and the optional status line.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        overlay: &[OverlayText],
        status: Option<&str>,
        viewport: &Viewport,
        win_w: u32,
        win_h: u32,
    ) {
        self.glyph_viewport.update(
            queue,
            Resolution {
                width: win_w,
                height: win_h,
            },
        );

        let scale = viewport.width / viewport.canvas_width.max(1) as f32;
        let mut placed = Vec::with_capacity(overlay.len() + 1);

        for text in overlay {
            let size = (text.size * scale).max(1.0);
            let buffer = self.shape(&text.text, size, Family::SansSerif, win_w, win_h);
            let width = if text.centered { line_width(&buffer) } else { 0.0 };
            placed.push(PlacedText {
                buffer,
                left: viewport.left + text.x * scale - width / 2.0,
                top: viewport.top + text.y * scale,
                color: GlyphColor::rgb(text.color.r, text.color.g, text.color.b),
            });
        }

        if let Some(status) = status {
            let buffer = self.shape(status, 14.0, Family::Monospace, win_w, win_h);
            placed.push(PlacedText {
                buffer,
                left: viewport.left,
                top: viewport.top + viewport.height + 8.0,
                color: GlyphColor::rgb(200, 200, 210),
            });
        }

        let areas = placed.iter().map(|p| TextArea {
            buffer: &p.buffer,
            left: p.left,
            top: p.top,
            scale: 1.0,
            bounds: TextBounds {
                left: 0,
                top: 0,
                right: win_w as i32,
                bottom: win_h as i32,
            },
            default_color: p.color,
            custom_glyphs: &[],
        });

        if let Err(e) = self.text_renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.text_atlas,
            &self.glyph_viewport,
            areas,
            &mut self.swash_cache,
        ) {
            log::warn!("Overlay text prepare failed: {:?}", e);
        }
    }

    /// Render overlay text into an active render pass.
    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if let Err(e) = self
            .text_renderer
            .render(&self.text_atlas, &self.glyph_viewport, pass)
        {
            log::warn!("Overlay text render failed: {:?}", e);
        }
    }

    /// Trim the glyph atlas after presenting.
    pub fn trim(&mut self) {
        self.text_atlas.trim();
    }

    fn shape(&mut self, text: &str, size: f32, family: Family, win_w: u32, win_h: u32) -> TextBuffer {
        let mut buffer = TextBuffer::new(&mut self.font_system, Metrics::new(size, size * 1.25));
        buffer.set_size(&mut self.font_system, Some(win_w as f32), Some(win_h as f32));
        buffer.set_text(&mut self.font_system, text, Attrs::new().family(family), Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }
}

fn line_width(buffer: &TextBuffer) -> f32 {
    buffer.layout_runs().map(|run| run.line_w).fold(0.0, f32::max)
}

// ======================== Status Line ========================

/// One-line summary shown under the canvas when the side panel is hidden.
pub fn build_status_text(
    demo: DemoKind,
    running: bool,
    phase: Option<GamePhase>,
    frame: u64,
    fps: f32,
) -> String {
    let state = match (running, phase) {
        (false, _) => "idle — press Run (F5)".to_string(),
        (true, Some(p)) => p.name().to_string(),
        (true, None) => "running".to_string(),
    };
    format!(
        "{}  |  {}  |  frame {}  |  {:.0} fps  |  F1: panel",
        demo.title(),
        state,
        frame,
        fps,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reflects_run_state() {
        let idle = build_status_text(DemoKind::Snake, false, Some(GamePhase::Idle), 0, 0.0);
        assert!(idle.contains("idle"));
        let over = build_status_text(DemoKind::Snake, true, Some(GamePhase::GameOver), 120, 60.0);
        assert!(over.contains("Game Over") && over.contains("frame 120"));
        let wave = build_status_text(DemoKind::Wave, true, None, 5, 59.6);
        assert!(wave.contains("running") && wave.contains("60 fps"));
    }
}
