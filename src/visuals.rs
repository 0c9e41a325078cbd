//! Theme-aware colors and compositing for trail rendering.
//!
//! The theme is a two-valued signal owned by the host page; the renderer
//! reads it once per pass to pick a color ramp and a blend mode, and never
//! mutates it. Dark themes composite additively so overlapping blobs glow;
//! light themes use plain alpha blending.

/// Host color scheme, read once per render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Dark background: bright particles, additive compositing.
    #[default]
    Dark,
    /// Light background: tinted particles, alpha compositing.
    Light,
}

/// Blend mode for particle rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard alpha blending.
    #[default]
    Alpha,

    /// Additive blending; overlapping particles brighten each other.
    Additive,
}

impl BlendMode {
    /// Blend mode used for a given theme.
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => BlendMode::Additive,
            Theme::Light => BlendMode::Alpha,
        }
    }

    /// Convert to a wgpu blend state.
    pub fn to_wgpu(self) -> wgpu::BlendState {
        match self {
            BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
            BlendMode::Additive => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            },
        }
    }
}

/// Four radial gradient stops: rgb plus an alpha factor each.
///
/// Stops sit at fixed offsets 0.0 / 0.3 / 0.6 / 1.0 from blob center to
/// edge; the outermost stop should be fully transparent so blobs feather
/// into the background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStops(pub [[f32; 4]; 4]);

/// Color ramps for both themes, plus the connective-line color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPalette {
    dark: GradientStops,
    light: GradientStops,
    line_dark: [f32; 4],
    line_light: [f32; 4],
}

impl TrailPalette {
    /// Fluid ramp: white glow in the dark, a blue wash in the light.
    pub fn fluid() -> Self {
        Self {
            dark: GradientStops([
                [1.0, 1.0, 1.0, 1.0],
                [1.0, 1.0, 1.0, 0.6],
                [1.0, 1.0, 1.0, 0.2],
                [1.0, 1.0, 1.0, 0.0],
            ]),
            light: GradientStops([
                [0.231, 0.510, 0.965, 1.0], // rgb(59, 130, 246)
                [0.376, 0.647, 0.980, 0.6], // rgb(96, 165, 250)
                [0.576, 0.773, 0.992, 0.3], // rgb(147, 197, 253)
                [0.749, 0.859, 0.996, 0.0], // rgb(191, 219, 254)
            ]),
            line_dark: [1.0, 1.0, 1.0, 1.0],
            line_light: [0.231, 0.510, 0.965, 1.0],
        }
    }

    /// Smoke ramp: pale grays in the dark, charcoal in the light.
    pub fn smoke() -> Self {
        Self {
            dark: GradientStops([
                [1.0, 1.0, 1.0, 0.6],
                [0.941, 0.941, 0.941, 0.4],
                [0.863, 0.863, 0.863, 0.2],
                [0.784, 0.784, 0.784, 0.0],
            ]),
            light: GradientStops([
                [0.235, 0.235, 0.235, 0.5],
                [0.314, 0.314, 0.314, 0.3],
                [0.392, 0.392, 0.392, 0.15],
                [0.471, 0.471, 0.471, 0.0],
            ]),
            line_dark: [1.0, 1.0, 1.0, 1.0],
            line_light: [0.235, 0.235, 0.235, 1.0],
        }
    }

    /// Gradient stops for a theme.
    pub fn stops(&self, theme: Theme) -> &GradientStops {
        match theme {
            Theme::Dark => &self.dark,
            Theme::Light => &self.light,
        }
    }

    /// Connective-line color for a theme.
    pub fn line_color(&self, theme: Theme) -> [f32; 4] {
        match theme {
            Theme::Dark => self.line_dark,
            Theme::Light => self.line_light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_mode_per_theme() {
        assert_eq!(BlendMode::for_theme(Theme::Dark), BlendMode::Additive);
        assert_eq!(BlendMode::for_theme(Theme::Light), BlendMode::Alpha);
    }

    #[test]
    fn test_ramps_end_transparent() {
        for palette in [TrailPalette::fluid(), TrailPalette::smoke()] {
            for theme in [Theme::Dark, Theme::Light] {
                let stops = palette.stops(theme).0;
                assert_eq!(stops[3][3], 0.0, "edge stop must be transparent");
                assert!(stops[0][3] > 0.0, "core stop must be visible");
            }
        }
    }

    #[test]
    fn test_theme_selects_distinct_ramps() {
        let palette = TrailPalette::fluid();
        assert_ne!(palette.stops(Theme::Dark), palette.stops(Theme::Light));
    }
}
