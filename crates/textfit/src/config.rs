use std::time::Duration;

/// Tuning knobs for a [`crate::Fitter`] instance.
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Hard floor for the fitting loop, in px. Shrinking stops here;
    /// reaching the floor without fit is reported, not an error. A starting
    /// size already below the floor is kept (the original-size bound wins).
    /// Guarantees termination for arbitrarily long text.
    pub min_font_px: f32,
    /// Debounce window used when `resize` is called without a delay.
    pub debounce: Duration,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            min_font_px: 1.0,
            debounce: Duration::from_millis(200),
        }
    }
}
