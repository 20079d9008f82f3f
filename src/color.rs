//! Conversions between hex strings, linear RGB, sRGB, CIELAB (D65)
//! and its polar form L*C*h, plus the perceptual quantities derived
//! from them.
//!
//! Linear RGB colors are [`RGB<f64>`] with channels in \[0, 1\].

use std::f64::consts::PI;
use lazy_static::lazy_static;
use regex::Regex;
use rgb::{RGB, RGB8};
use serde::Serialize;
use crate::error::{Error, Result};

/// A color in the CIE L*a*b* color space with a D65 reference white.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Lab {
    /// The lightness in the range 0. to 100.
    pub l: f64,
    /// Green–red axis.
    pub a: f64,
    /// Blue–yellow axis.
    pub b: f64,
}

impl Lab {
    pub const fn new(l: f64, a: f64, b: f64) -> Self { Lab { l, a, b } }

    /// Chroma, i.e. the distance to the achromatic axis.
    #[inline]
    pub fn chroma(&self) -> f64 { (self.a * self.a + self.b * self.b).sqrt() }

    #[inline]
    pub fn to_lch(self) -> Lch { lab_to_lch(self) }
}

/// The CIE L*C*h*_ab color space: [`Lab`] with polar coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Lch {
    /// The lightness in the range 0. to 100.
    pub l: f64,
    /// The chroma, in the range 0. to 181.02, but less in practice.
    pub c: f64,
    /// The hue in degrees in the range \[0, 360).
    pub h: f64,
}

impl Lch {
    pub const fn new(l: f64, c: f64, h: f64) -> Self { Lch { l, c, h } }

    #[inline]
    pub fn to_lab(self) -> Lab { lch_to_lab(self) }
}

// D65 reference white.
const XN: f64 = 0.95047;
const YN: f64 = 1.00000;
const ZN: f64 = 1.08883;
const EPS: f64 = 0.008856;
const KAPPA: f64 = 7.787;
const F0: f64 = 16. / 116.;

/// Relative luminance of a linear RGB color.
#[inline]
pub fn relative_luminance(rgb: RGB<f64>) -> f64 {
    0.2126 * rgb.r + 0.7152 * rgb.g + 0.0722 * rgb.b
}

/// Round half toward +∞ (`floor(x + 0.5)`).
#[inline]
pub(crate) fn round_half_up(x: f64) -> f64 { (x + 0.5).floor() }

/// Gamma encode a linear RGB color to 8-bit sRGB.  Channels are
/// clamped to \[0, 1\] first.
pub fn lrgb_to_srgb(rgb: RGB<f64>) -> RGB8 {
    fn encode(c: f64) -> u8 {
        let c = c.clamp(0., 1.);
        let s = if c <= 0.0031308 { 12.92 * c }
                else { 1.055 * c.powf(1. / 2.4) - 0.055 };
        round_half_up(s * 255.).clamp(0., 255.) as u8
    }
    RGB8 { r: encode(rgb.r), g: encode(rgb.g), b: encode(rgb.b) }
}

/// Gamma decode sRGB channels in \[0, 1\] to linear RGB.
pub fn srgb_to_lrgb(rgb: RGB<f64>) -> RGB<f64> {
    #[inline]
    fn decode(c: f64) -> f64 {
        if c > 0.04045 { ((c + 0.055) / 1.055).powf(2.4) } else { c / 12.92 }
    }
    RGB { r: decode(rgb.r), g: decode(rgb.g), b: decode(rgb.b) }
}

/// Convert a linear RGB color to a lowercase `#rrggbb` string.
pub fn rgb_to_hex(rgb: RGB<f64>) -> String {
    let RGB8 { r, g, b } = lrgb_to_srgb(rgb);
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Convert a `#rrggbb` string (the `#` may be omitted) to linear RGB.
///
/// # Example
///
/// ```
/// use chromametry::color::{hex_to_rgb, rgb_to_hex};
/// let rgb = hex_to_rgb("#ff5733").unwrap();
/// assert_eq!(rgb_to_hex(rgb), "#ff5733");
/// ```
pub fn hex_to_rgb(hex: &str) -> Result<RGB<f64>> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidHex(hex.to_string()))
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i .. i + 2], 16)
            .map(|c| c as f64 / 255.)
            .map_err(|_| Error::InvalidHex(hex.to_string()))
    };
    Ok(srgb_to_lrgb(RGB { r: channel(0)?, g: channel(2)?, b: channel(4)? }))
}

/// Convert a CSS `rgb()` string such as `"rgb(67, 147, 195)"` to
/// linear RGB.  Only the first three numeric components are used.
pub fn css_rgb_to_rgb(css: &str) -> Result<RGB<f64>> {
    let tokens = numeric_tokens(css);
    if tokens.len() < 3 {
        return Err(Error::InvalidCssRgb(css.to_string()))
    }
    Ok(srgb_to_lrgb(RGB { r: tokens[0] / 255.,
                          g: tokens[1] / 255.,
                          b: tokens[2] / 255. }))
}

lazy_static! {
    static ref NUMBER: Regex =
        Regex::new(r"\d+(\.\d+)?").expect("valid number pattern");
}

/// Unsigned decimal numbers (`123` or `12.5`) appearing in `s`.
fn numeric_tokens(s: &str) -> Vec<f64> {
    NUMBER.find_iter(s).filter_map(|m| m.as_str().parse().ok()).collect()
}

/// Convert linear sRGB to CIELAB (D65).
pub fn rgb_to_lab(rgb: RGB<f64>) -> Lab {
    let RGB { r, g, b } = rgb;
    let x = 0.4124564 * r + 0.3575761 * g + 0.1804375 * b;
    let y = 0.2126729 * r + 0.7151522 * g + 0.0721750 * b;
    let z = 0.0193339 * r + 0.1191920 * g + 0.9503041 * b;
    let f = |t: f64| if t > EPS { t.cbrt() } else { KAPPA * t + F0 };
    let fx = f(x / XN);
    let fy = f(y / YN);
    let fz = f(z / ZN);
    Lab { l: 116. * fy - 16., a: 500. * (fx - fy), b: 200. * (fy - fz) }
}

/// Convert CIELAB (D65) to linear sRGB.  The result is not clamped
/// and may fall outside of the sRGB gamut.
pub fn lab_to_rgb(lab: Lab) -> RGB<f64> {
    let fy = (lab.l + 16.) / 116.;
    let fx = lab.a / 500. + fy;
    let fz = fy - lab.b / 200.;
    let f_inv = |t: f64| {
        let t3 = t * t * t;
        if t3 > EPS { t3 } else { (t - F0) / KAPPA }
    };
    let x = f_inv(fx) * XN;
    let y = f_inv(fy) * YN;
    let z = f_inv(fz) * ZN;
    RGB { r: 3.2404542 * x - 1.5371385 * y - 0.4985314 * z,
          g: -0.9692660 * x + 1.8760108 * y + 0.0415560 * z,
          b: 0.0556434 * x - 0.2040259 * y + 1.0572252 * z }
}

/// Hue angle of (a, b) in degrees, in \[0, 360).
#[inline]
fn hue_degrees(a: f64, b: f64) -> f64 {
    (b.atan2(a) * 180. / PI + 360.) % 360.
}

/// Convert CIELAB to L*C*h.  Colors with a chroma below 0.0001 are
/// achromatic: their chroma and hue are set to 0.
pub fn lab_to_lch(lab: Lab) -> Lch {
    let c = lab.chroma();
    if c < 0.0001 { return Lch { l: lab.l, c: 0., h: 0. } }
    let mut h = hue_degrees(lab.a, lab.b);
    if h >= 359.9999 { h = 0. }
    Lch { l: lab.l, c, h }
}

pub fn lch_to_lab(lch: Lch) -> Lab {
    let h = lch.h * PI / 180.;
    Lab { l: lch.l, a: lch.c * h.cos(), b: lch.c * h.sin() }
}

/// Lightness added by the chroma of `lab` according to the
/// Equivalent Achromatic Lightness model of High et al. (2023).
fn eal_offset(lab: Lab) -> f64 {
    const K1: f64 = 0.1644;
    const K2: f64 = 0.0603;
    const K3: f64 = 0.1307;
    const K4: f64 = 0.0060;
    let c = lab.chroma();
    let h = hue_degrees(lab.a, lab.b);
    let f_by = K1 * (((h - 90.) / 2.) * (PI / 180.)).sin().abs() + K2;
    let f_r = if h <= 90. || h >= 270. {
        K3 * (h * (PI / 180.)).cos().abs() + K4
    } else { 0. };
    (f_by + f_r) * c
}

/// Equivalent Achromatic Lightness of `lab`.
pub fn to_lightness_eal(lab: Lab) -> f64 { lab.l + eal_offset(lab) }

/// Inverse of [`to_lightness_eal`]: recover L* from the EAL
/// `brightness` and the chromatic coordinates of `lab`.  The result
/// is never negative.
pub fn from_lightness_eal(brightness: f64, lab: Lab) -> f64 {
    (brightness - eal_offset(lab)).max(0.)
}

/// CIEDE2000 color difference.
pub fn delta_e2000(lab1: &Lab, lab2: &Lab) -> f64 {
    const POW25_7: f64 = 6103515625.; // 25⁷
    let rad = PI / 180.;
    let Lab { l: l1, a: a1, b: b1 } = *lab1;
    let Lab { l: l2, a: a2, b: b2 } = *lab2;
    let avg_l = (l1 + l2) / 2.;
    let c1 = lab1.chroma();
    let c2 = lab2.chroma();
    let avg_c = (c1 + c2) / 2.;
    let g = 0.5 * (1. - (avg_c.powi(7) / (avg_c.powi(7) + POW25_7)).sqrt());
    let a1p = a1 * (1. + g);
    let a2p = a2 * (1. + g);
    let c1p = (a1p * a1p + b1 * b1).sqrt();
    let c2p = (a2p * a2p + b2 * b2).sqrt();
    let avg_cp = (c1p + c2p) / 2.;
    let hp = |b: f64, ap: f64| {
        let h = b.atan2(ap);
        h * 180. / PI + if h < 0. { 360. } else { 0. }
    };
    let h1p = hp(b1, a1p);
    let h2p = hp(b2, a2p);
    let mut dhp = h2p - h1p;
    if dhp.abs() > 180. { dhp += if h2p <= h1p { 360. } else { -360. } }
    let avg_hp = if (h1p - h2p).abs() > 180. { (h1p + h2p + 360.) / 2. }
                 else { (h1p + h2p) / 2. };
    let t = 1. - 0.17 * ((avg_hp - 30.) * rad).cos()
        + 0.24 * (2. * avg_hp * rad).cos()
        + 0.32 * ((3. * avg_hp + 6.) * rad).cos()
        - 0.2 * ((4. * avg_hp - 63.) * rad).cos();
    let dlp = l2 - l1;
    let dcp = c2p - c1p;
    let dhp_big = 2. * (c1p * c2p).sqrt() * (dhp / 2. * rad).sin();
    let dl50 = (avg_l - 50.).powi(2);
    let sl = 1. + (0.015 * dl50) / (20. + dl50).sqrt();
    let sc = 1. + 0.045 * avg_cp;
    let sh = 1. + 0.015 * avg_cp * t;
    let dtheta = 30. * (-((avg_hp - 275.) / 25.).powi(2)).exp();
    let rc = 2. * (avg_cp.powi(7) / (avg_cp.powi(7) + POW25_7)).sqrt();
    let rt = -rc * (2. * dtheta * rad).sin();
    ((dlp / sl).powi(2) + (dcp / sc).powi(2) + (dhp_big / sh).powi(2)
     + rt * (dcp / sc) * (dhp_big / sh)).sqrt()
}

/// Return the color of `scale` with the highest chroma, or `None` if
/// `scale` is empty.  Ties keep the first color.
pub fn find_max_chroma_hex<S: AsRef<str>>(scale: &[S]) -> Result<Option<&str>> {
    let mut best = None;
    let mut best_c = f64::NEG_INFINITY;
    for hex in scale {
        let hex = hex.as_ref();
        let c = lab_to_lch(rgb_to_lab(hex_to_rgb(hex)?)).c;
        if c > best_c {
            best_c = c;
            best = Some(hex);
        }
    }
    Ok(best)
}

/// Unwrap a sequence of hues (in degrees) so that successive values
/// never differ by more than 180°.
///
/// ```
/// use chromametry::color::unwrap_hue;
/// assert_eq!(unwrap_hue(&[350., 10.]), vec![350., 370.]);
/// ```
pub fn unwrap_hue(hues: &[f64]) -> Vec<f64> {
    let mut result: Vec<f64> = Vec::with_capacity(hues.len());
    for (i, &h) in hues.iter().enumerate() {
        if i == 0 { result.push(h); continue }
        let mut diff = h - hues[i - 1];
        if diff > 180. { diff -= 360. }
        else if diff < -180. { diff += 360. }
        result.push(result[i - 1] + diff);
    }
    result
}

// Color blindness simulation on linear RGB.
// https://www.inf.ufrgs.br/~oliveira/pubs_files/CVD_Simulation/CVD_Simulation.html

/// Simulate protanopia (red blindness).
pub fn simulate_protanopia(rgb: RGB<f64>) -> RGB<f64> {
    let RGB { r, g, b } = rgb;
    RGB { r: 0.152286 * r + 1.052583 * g - 0.204868 * b,
          g: 0.114503 * r + 0.786281 * g + 0.099216 * b,
          b: -0.003882 * r - 0.048116 * g + 1.051998 * b }
}

/// Simulate deuteranopia (green blindness).
pub fn simulate_deuteranopia(rgb: RGB<f64>) -> RGB<f64> {
    let RGB { r, g, b } = rgb;
    RGB { r: 0.367322 * r + 0.860646 * g - 0.227968 * b,
          g: 0.280085 * r + 0.672501 * g + 0.047413 * b,
          b: -0.011820 * r + 0.042940 * g + 0.968881 * b }
}
