use crate::foundation::core::Rgba8;
use crate::foundation::error::{LoaderError, LoaderResult};
use serde::{Deserialize, Serialize};

/// Shape, timing and paint parameters of the loading indicator.
///
/// All times are milliseconds, all widths are pixels unless noted otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LoaderOptions {
    /// Blend between the baseline floor and full intensity, `0..=1`.
    pub gauss_weight: f64,
    /// Stripe spread as a fraction of the surface width.
    pub gauss_width: f64,
    /// Fraction of the surface width the peak approaches while active.
    pub gauss_stop: f64,
    /// Time constant of the peak's exponential approach.
    pub gauss_time_move: f64,
    /// Duration of the collapse after `stop`.
    pub gauss_time_vanish: f64,
    /// Randomize the rectangle phase on every start.
    pub rect_random: bool,
    /// Nominal, undistorted rectangle width.
    pub rect_width: f64,
    /// Period between rectangle spawns.
    pub rect_interval: f64,
    /// Nominal time for a rectangle to cross the transformed width.
    pub rect_time_move: f64,
    /// How strongly stripe intensity warps rectangle spacing and width.
    pub rect_slowdown: f64,
    /// Draw rectangles at all.
    pub rect_enable: bool,
    /// Stripe paint color.
    pub background_color: Rgba8,
    /// Rectangle paint color.
    pub rect_color: Rgba8,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            gauss_weight: 0.6,
            gauss_width: 0.05,
            gauss_stop: 2.0 / 3.0,
            gauss_time_move: 500.0,
            gauss_time_vanish: 200.0,
            rect_random: true,
            rect_width: 15.0,
            rect_interval: 800.0,
            rect_time_move: 700.0,
            rect_slowdown: 5.0,
            rect_enable: true,
            background_color: Rgba8::rgb(18, 61, 132),
            rect_color: Rgba8::WHITE,
        }
    }
}

/// A sparse set of option overrides, merged field by field onto [`LoaderOptions`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PartialOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauss_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauss_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauss_stop: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauss_time_move: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauss_time_vanish: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect_random: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect_interval: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect_time_move: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect_slowdown: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect_enable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Rgba8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect_color: Option<Rgba8>,
}

impl PartialOptions {
    /// Decode overrides from a JSON object with camelCase keys.
    pub fn from_json_str(s: &str) -> LoaderResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Return `true` when no field is overridden.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl LoaderOptions {
    /// Decode a full option set; missing keys keep their defaults.
    pub fn from_json_str(s: &str) -> LoaderResult<Self> {
        let opts: Self = serde_json::from_str(s)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Overlay every `Some` field of `partial` onto `self`.
    pub fn apply(&mut self, partial: &PartialOptions) {
        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(v) = partial.$field {
                        self.$field = v;
                    }
                )*
            };
        }

        overlay!(
            gauss_weight,
            gauss_width,
            gauss_stop,
            gauss_time_move,
            gauss_time_vanish,
            rect_random,
            rect_width,
            rect_interval,
            rect_time_move,
            rect_slowdown,
            rect_enable,
            background_color,
            rect_color,
        );
    }

    /// Copy of `self` with `partial` applied.
    pub fn merged(mut self, partial: &PartialOptions) -> Self {
        self.apply(partial);
        self
    }

    /// Check every value against its documented domain.
    ///
    /// The renderer tolerates any numbers (degenerate timing draws nothing); validation exists for
    /// hosts that load options from user input and want to reject nonsense early.
    pub fn validate(&self) -> LoaderResult<()> {
        fn finite(name: &str, v: f64) -> LoaderResult<()> {
            if !v.is_finite() {
                return Err(LoaderError::validation(format!("{name} must be finite")));
            }
            Ok(())
        }

        fn positive(name: &str, v: f64) -> LoaderResult<()> {
            finite(name, v)?;
            if v <= 0.0 {
                return Err(LoaderError::validation(format!("{name} must be > 0")));
            }
            Ok(())
        }

        finite("gaussWeight", self.gauss_weight)?;
        if !(0.0..=1.0).contains(&self.gauss_weight) {
            return Err(LoaderError::validation("gaussWeight must be within [0, 1]"));
        }
        positive("gaussWidth", self.gauss_width)?;
        finite("gaussStop", self.gauss_stop)?;
        if self.gauss_stop < 0.0 {
            return Err(LoaderError::validation("gaussStop must be >= 0"));
        }
        positive("gaussTimeMove", self.gauss_time_move)?;
        positive("gaussTimeVanish", self.gauss_time_vanish)?;
        finite("rectWidth", self.rect_width)?;
        if self.rect_width < 0.0 {
            return Err(LoaderError::validation("rectWidth must be >= 0"));
        }
        positive("rectInterval", self.rect_interval)?;
        positive("rectTimeMove", self.rect_time_move)?;
        finite("rectSlowdown", self.rect_slowdown)?;
        if self.rect_slowdown < 0.0 {
            return Err(LoaderError::validation("rectSlowdown must be >= 0"));
        }
        Ok(())
    }
}
