//! Configuration types for blank-page removal.
//!
//! Every heuristic constant of the classifier lives in [`DeblankConfig`],
//! built via its [`DeblankConfigBuilder`]. The defaults were tuned on office
//! scanners at 300 DPI; noisier scans usually need a higher
//! `max_dark_ratio`, clean digital exports can live with a lower one.

use crate::error::DeblankError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Default render scale (2.0 = 144 DPI for a 72 DPI page space).
pub const DEFAULT_SCALE: f32 = 2.0;
/// Default intensity below which a pixel counts as "dark".
pub const DEFAULT_DARK_THRESHOLD: u8 = 252;
/// Default maximum fraction of dark pixels on a blank page.
pub const DEFAULT_MAX_DARK_RATIO: f64 = 0.0008;
/// Default border cropped from every edge before counting.
pub const DEFAULT_MARGIN_PX: u32 = 6;
/// Default channel value at or above which a drawing colour is "white".
pub const DEFAULT_NEAR_WHITE: f32 = 0.995;

/// Configuration for a blank-page removal run.
///
/// Built via [`DeblankConfig::builder()`] or using
/// [`DeblankConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_deblank::DeblankConfig;
///
/// let config = DeblankConfig::builder()
///     .max_dark_ratio(0.002)
///     .margin_px(12)
///     .build()
///     .unwrap();
/// assert_eq!(config.margin_px, 12);
/// ```
#[derive(Clone)]
pub struct DeblankConfig {
    /// Render scale applied to the page before counting pixels. Range: 0.1–8.0. Default: 2.0.
    ///
    /// Higher scales resolve thin strokes (a lone page number, a signature
    /// line) that would otherwise blur into light gray and stay above
    /// `dark_threshold`. Rasterisation cost grows with the square of the scale.
    pub scale: f32,

    /// Pixels with intensity strictly below this value are "dark". Default: 252.
    pub dark_threshold: u8,

    /// A page is blank when `dark / total <= max_dark_ratio`. Range: 0.0–1.0. Default: 0.0008.
    ///
    /// Scanned paper is never perfectly white: dust, compression artefacts and
    /// sensor noise leave a few hundred dark pixels on an empty sheet.
    pub max_dark_ratio: f64,

    /// Pixels cropped from every edge before counting. Default: 6.
    ///
    /// Removes scanner-bed shadows and feed-roller marks. Ignored for pages
    /// rendered smaller than `2 * margin_px` in either dimension.
    pub margin_px: u32,

    /// A drawing colour counts as content when any channel is below this. Range: (0.0, 1.0]. Default: 0.995.
    pub near_white: f32,

    /// Skip rasterisation: pages without structural content are blank. Default: false.
    ///
    /// Much faster, but a scanned page whose only content is a full-page
    /// image is still kept (images are structural), while a page drawn purely
    /// with white-on-white vectors is dropped.
    pub skip_raster: bool,

    /// Per-page progress events. Default: None.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for DeblankConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            dark_threshold: DEFAULT_DARK_THRESHOLD,
            max_dark_ratio: DEFAULT_MAX_DARK_RATIO,
            margin_px: DEFAULT_MARGIN_PX,
            near_white: DEFAULT_NEAR_WHITE,
            skip_raster: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for DeblankConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeblankConfig")
            .field("scale", &self.scale)
            .field("dark_threshold", &self.dark_threshold)
            .field("max_dark_ratio", &self.max_dark_ratio)
            .field("margin_px", &self.margin_px)
            .field("near_white", &self.near_white)
            .field("skip_raster", &self.skip_raster)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn DeblankProgressCallback>"),
            )
            .finish()
    }
}

impl DeblankConfig {
    /// Create a new builder for `DeblankConfig`.
    pub fn builder() -> DeblankConfigBuilder {
        DeblankConfigBuilder {
            config: Self::default(),
        }
    }

    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), DeblankError> {
        if !self.scale.is_finite() || !(0.1..=8.0).contains(&self.scale) {
            return Err(DeblankError::InvalidConfig(format!(
                "scale must be 0.1–8.0, got {}",
                self.scale
            )));
        }
        if !self.max_dark_ratio.is_finite() || !(0.0..=1.0).contains(&self.max_dark_ratio) {
            return Err(DeblankError::InvalidConfig(format!(
                "max_dark_ratio must be 0.0–1.0, got {}",
                self.max_dark_ratio
            )));
        }
        if !self.near_white.is_finite() || self.near_white <= 0.0 || self.near_white > 1.0 {
            return Err(DeblankError::InvalidConfig(format!(
                "near_white must be in (0.0, 1.0], got {}",
                self.near_white
            )));
        }
        Ok(())
    }
}

/// Builder for [`DeblankConfig`].
#[derive(Debug)]
pub struct DeblankConfigBuilder {
    config: DeblankConfig,
}

impl DeblankConfigBuilder {
    pub fn scale(mut self, scale: f32) -> Self {
        self.config.scale = scale;
        self
    }

    pub fn dark_threshold(mut self, threshold: u8) -> Self {
        self.config.dark_threshold = threshold;
        self
    }

    pub fn max_dark_ratio(mut self, ratio: f64) -> Self {
        self.config.max_dark_ratio = ratio;
        self
    }

    pub fn margin_px(mut self, px: u32) -> Self {
        self.config.margin_px = px;
        self
    }

    pub fn near_white(mut self, level: f32) -> Self {
        self.config.near_white = level;
        self
    }

    pub fn skip_raster(mut self, v: bool) -> Self {
        self.config.skip_raster = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<DeblankConfig, DeblankError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
