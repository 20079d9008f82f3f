//! One step of a scale and the quantities derived from its color.

use rgb::RGB;
use serde::Serialize;
use crate::{color::{hex_to_rgb, lab_to_lch, relative_luminance, rgb_to_lab,
                    to_lightness_eal, Lab, Lch},
            contrast::{apca_contrast, wcag_contrast},
            error::Result};

/// Colorimetric description of one step of a scale.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorShade {
    pub hex: String,
    /// Linear RGB.
    pub rgb: RGB<f64>,
    pub lab: Lab,
    pub lch: Lch,
    /// Equivalent Achromatic Lightness (not L*).
    pub lightness: f64,
    pub chroma: f64,
    /// Hue in degrees.  Scale analysis replaces it by the unwrapped
    /// hue for inner steps, so it may leave \[0, 360).
    pub hue: f64,
    /// Relative luminance in \[0, 1\].
    pub luminance: f64,
    /// WCAG contrast against white.
    pub wcag: f64,
    /// APCA contrast of this color as text on white.
    pub apca: f64,
    /// Sum of the ΔE00 between consecutive steps from the first one.
    pub cum_delta_e00: f64,
    /// As `cum_delta_e00` under protanopia.  Only filled when
    /// requested by [`AnalysisOptions`](crate::AnalysisOptions),
    /// 0 otherwise.
    pub cum_prot_delta_e00: f64,
    /// As `cum_delta_e00` under deuteranopia.  See `cum_prot_delta_e00`.
    pub cum_deut_delta_e00: f64,
}

impl ColorShade {
    /// Describe the color `hex` (`#rrggbb`).  Cumulative distances
    /// start at 0.
    ///
    /// # Example
    ///
    /// ```
    /// use chromametry::ColorShade;
    /// let white = ColorShade::new("#ffffff").unwrap();
    /// assert_eq!(white.wcag, 1.);
    /// ```
    pub fn new(hex: &str) -> Result<Self> {
        let rgb = hex_to_rgb(hex)?;
        let lab = rgb_to_lab(rgb);
        let lch = lab_to_lch(lab);
        let luminance = relative_luminance(rgb);
        Ok(ColorShade {
            hex: hex.to_string(),
            rgb,
            lab,
            lch,
            lightness: to_lightness_eal(lab),
            chroma: lch.c,
            hue: lch.h,
            luminance,
            wcag: wcag_contrast(luminance, 1.),
            apca: apca_contrast(luminance, 1.),
            cum_delta_e00: 0.,
            cum_prot_delta_e00: 0.,
            cum_deut_delta_e00: 0.,
        })
    }
}
