// ============================================================================
// config.rs — Demo Showcase
// Runtime demo parameters, responsive canvas sizing, and seed handling.
// ============================================================================

use serde::{Deserialize, Serialize};

/// Runtime parameters adjustable from the showcase panel.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoParams {
    // Wave
    pub wave_amplitude: f32,
    pub wave_frequency: f32,

    // Matrix rain
    pub matrix_speed: u32,

    // DNA helix
    pub helix_speed: f32,
    pub helix_pairs: u32,

    // Gravity
    pub show_trails: bool,

    // Reproducibility
    pub use_fixed_seed: bool,
    pub fixed_seed_value: u64,
}

impl Default for DemoParams {
    fn default() -> Self {
        Self {
            wave_amplitude: 50.0,
            wave_frequency: 2.0,
            matrix_speed: 50,
            helix_speed: 1.0,
            helix_pairs: 20,
            show_trails: true,
            use_fixed_seed: false,
            fixed_seed_value: 42,
        }
    }
}

impl DemoParams {
    /// Seed for the next demo mount, if runs should be reproducible.
    pub fn effective_seed(&self) -> Option<u64> {
        self.use_fixed_seed.then_some(self.fixed_seed_value)
    }

    /// Clamp every tunable into its slider range.
    pub fn sanitize(&mut self) {
        self.wave_amplitude = self.wave_amplitude.clamp(10.0, 100.0);
        self.wave_frequency = ((self.wave_frequency * 2.0).round() / 2.0).clamp(1.0, 5.0);
        self.matrix_speed = self.matrix_speed.clamp(10, 100);
        self.helix_speed = self.helix_speed.clamp(0.1, 3.0);
        self.helix_pairs = self.helix_pairs.clamp(10, 30);
    }
}

// ======================== Responsive Canvas ========================

/// Display size of the drawing surface for a given viewport width.
/// The canvas keeps its internal resolution; only the on-screen rect scales.
pub fn responsive_canvas_size(viewport_width: f32) -> (f32, f32) {
    if viewport_width < 640.0 {
        ((viewport_width - 64.0).clamp(1.0, 400.0), 300.0)
    } else if viewport_width < 1024.0 {
        (500.0, 350.0)
    } else {
        (600.0, 400.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responsive_breakpoints() {
        assert_eq!(responsive_canvas_size(375.0), (311.0, 300.0));
        assert_eq!(responsive_canvas_size(639.0), (400.0, 300.0));
        assert_eq!(responsive_canvas_size(640.0), (500.0, 350.0));
        assert_eq!(responsive_canvas_size(1023.0), (500.0, 350.0));
        assert_eq!(responsive_canvas_size(1920.0), (600.0, 400.0));
    }

    #[test]
    fn seed_only_when_fixed() {
        let mut params = DemoParams::default();
        assert_eq!(params.effective_seed(), None);
        params.use_fixed_seed = true;
        params.fixed_seed_value = 7;
        assert_eq!(params.effective_seed(), Some(7));
    }

    #[test]
    fn sanitize_snaps_frequency_to_half_steps() {
        let mut params = DemoParams {
            wave_frequency: 2.3,
            helix_pairs: 99,
            ..DemoParams::default()
        };
        params.sanitize();
        assert_eq!(params.wave_frequency, 2.5);
        assert_eq!(params.helix_pairs, 30);
    }

    #[test]
    fn partial_preset_json_fills_defaults() {
        let params: DemoParams = serde_json::from_str(r#"{"matrix_speed": 80}"#).unwrap();
        assert_eq!(params.matrix_speed, 80);
        assert_eq!(params.helix_pairs, 20);
    }
}
