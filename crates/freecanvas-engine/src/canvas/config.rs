use crate::error::CanvasError;

/// Navigation policy of a [`Viewport`](super::Viewport).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportConfig {
    /// Smallest allowed uniform scale (screen pixels per model unit).
    pub min_zoom: f64,
    /// Largest allowed uniform scale.
    pub max_zoom: f64,
    /// Scale applied per wheel notch away from the user.
    pub zoom_in_factor: f64,
    /// Scale applied per wheel notch toward the user.
    pub zoom_out_factor: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.01,
            max_zoom: 100.0,
            zoom_in_factor: 1.25,
            zoom_out_factor: 0.8,
        }
    }
}

impl ViewportConfig {
    pub fn with_zoom_limits(mut self, min: f64, max: f64) -> Self {
        self.min_zoom = min;
        self.max_zoom = max;
        self
    }

    pub fn with_zoom_factors(mut self, zoom_in: f64, zoom_out: f64) -> Self {
        self.zoom_in_factor = zoom_in;
        self.zoom_out_factor = zoom_out;
        self
    }

    pub fn validate(&self) -> Result<(), CanvasError> {
        let (min, max) = (self.min_zoom, self.max_zoom);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(CanvasError::InvalidZoomLimits { min, max });
        }

        for factor in [self.zoom_in_factor, self.zoom_out_factor] {
            if !(factor.is_finite() && factor > 0.0) {
                return Err(CanvasError::InvalidZoomFactor(factor));
            }
        }
        Ok(())
    }

    /// Clamps a uniform scale into `[min_zoom, max_zoom]`.
    #[inline]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}
