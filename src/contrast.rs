//! WCAG 2.x and APCA contrast, and the contrast spans of a scale.

use std::{collections::BTreeMap, fmt, str::FromStr};
use log::trace;
use serde::Serialize;
use crate::{color::round_half_up,
            error::{Error, Result},
            shade::ColorShade};

/// Contrast algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContrastSystem {
    Wcag,
    Apca,
}

impl ContrastSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            ContrastSystem::Wcag => "wcag",
            ContrastSystem::Apca => "apca",
        }
    }
}

impl fmt::Display for ContrastSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contrast requirement: an algorithm and a minimum value.
/// `Wcag45` means a WCAG ratio of 4.5:1, `Apca60` an APCA Lc of 60.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContrastName {
    Wcag20,
    Wcag30,
    Wcag45,
    Wcag70,
    Apca45,
    Apca60,
    Apca75,
    Apca90,
}

/// Contrasts whose spans are computed for every scale.
pub const CONTRAST_LIST: [ContrastName; 6] = [
    ContrastName::Wcag30, ContrastName::Wcag45, ContrastName::Wcag70,
    ContrastName::Apca45, ContrastName::Apca60, ContrastName::Apca75,
];

const ALL_CONTRASTS: [ContrastName; 8] = [
    ContrastName::Wcag20, ContrastName::Wcag30, ContrastName::Wcag45,
    ContrastName::Wcag70, ContrastName::Apca45, ContrastName::Apca60,
    ContrastName::Apca75, ContrastName::Apca90,
];

impl ContrastName {
    pub fn as_str(self) -> &'static str {
        use ContrastName::*;
        match self {
            Wcag20 => "wcag20", Wcag30 => "wcag30",
            Wcag45 => "wcag45", Wcag70 => "wcag70",
            Apca45 => "apca45", Apca60 => "apca60",
            Apca75 => "apca75", Apca90 => "apca90",
        }
    }

    pub fn system(self) -> ContrastSystem {
        use ContrastName::*;
        match self {
            Wcag20 | Wcag30 | Wcag45 | Wcag70 => ContrastSystem::Wcag,
            Apca45 | Apca60 | Apca75 | Apca90 => ContrastSystem::Apca,
        }
    }

    /// The minimum contrast value required.
    pub fn target(self) -> f64 {
        use ContrastName::*;
        match self {
            Wcag20 => 2.0, Wcag30 => 3.0, Wcag45 => 4.5, Wcag70 => 7.0,
            Apca45 => 45., Apca60 => 60., Apca75 => 75., Apca90 => 90.,
        }
    }
}

impl fmt::Display for ContrastName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContrastName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_contrast(s)?;
        ALL_CONTRASTS.iter().copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidContrast(s.to_string()))
    }
}

/// Parse a contrast tag such as `"wcag45"` or `"apca60"` into its
/// system and target.  WCAG digits are tenths of a ratio.
pub fn parse_contrast(input: &str) -> Result<(ContrastSystem, f64)> {
    let invalid = || Error::InvalidContrast(input.to_string());
    let (system, digits) =
        if let Some(d) = input.strip_prefix("wcag") { (ContrastSystem::Wcag, d) }
        else if let Some(d) = input.strip_prefix("apca") { (ContrastSystem::Apca, d) }
        else { return Err(invalid()) };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid())
    }
    let n: f64 = digits.parse().map_err(|_| invalid())?;
    let target = match system {
        ContrastSystem::Wcag => n / 10.,
        ContrastSystem::Apca => n,
    };
    Ok((system, target))
}

/// The smallest step distance of a scale achieving a contrast target.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Contrast {
    pub system: ContrastSystem,
    pub target: f64,
    /// Minimum index distance for which every pair of steps that far
    /// apart meets `target`.  Equal to the largest possible distance
    /// if no distance does.
    pub span: usize,
    /// Worst contrast among the pairs at distance `span`.
    pub value: f64,
    /// `span` relative to the largest possible distance.
    pub efficiency: f64,
    pub name: ContrastName,
}

/// WCAG 2.x contrast ratio of two relative luminances, in \[1, 21\].
#[inline]
pub fn wcag_contrast(l1: f64, l2: f64) -> f64 {
    (l1.max(l2) + 0.05) / (l1.min(l2) + 0.05)
}

/// APCA lightness contrast (Lc) of text with luminance `y_text` on a
/// background with luminance `y_bg`, rounded to an integer.  Dark
/// text on a light background is negative.
pub fn apca_contrast(y_text: f64, y_bg: f64) -> f64 {
    let clamp = |y: f64| if y > 0.0005 { y } else { y + (0.0005 - y).powf(0.8) };
    let txt = clamp(y_text);
    let bg = clamp(y_bg);
    let lc = (txt.powf(0.56) - bg.powf(0.56)) * 100.;
    if lc.abs() < 0.1 { return 0. }
    let lc = if lc > 0. { if lc < 1. { 0. } else { lc - 0.25 } }
             else if lc > -1. { 0. } else { lc + 0.25 };
    round_half_up(lc)
}

/// Worst contrast among the pairs of `luminance` exactly `k` apart.
fn worst_contrast(system: ContrastSystem, luminance: &[f64], k: usize) -> f64 {
    let mut min = f64::INFINITY;
    for i in 0 .. luminance.len() - k {
        let (y0, y1) = (luminance[i], luminance[i + k]);
        let c = match system {
            ContrastSystem::Wcag => wcag_contrast(y0, y1),
            ContrastSystem::Apca => apca_contrast(y1, y0).abs()
                .max(apca_contrast(y0, y1).abs()),
        };
        if c < min { min = c }
    }
    min
}

/// Contrast spans of a scale given the relative luminance of its steps.
pub fn luminance_contrasts(luminance: &[f64]) -> BTreeMap<ContrastName, Contrast> {
    let total = luminance.len();
    let max_gap = total.saturating_sub(1);
    CONTRAST_LIST.iter().map(|&name| {
        let system = name.system();
        let target = name.target();
        let mut span = max_gap;
        let mut value = 0.;
        for k in 1 .. total {
            let min = worst_contrast(system, luminance, k);
            if min >= target {
                span = k;
                value = min;
                break;
            }
            if k == max_gap { value = min }
        }
        trace!("{name}: span {span}, value {value}");
        let efficiency = span as f64 / max_gap.max(1) as f64;
        (name, Contrast { system, target, span, value, efficiency, name })
    }).collect()
}

/// Contrast spans of the steps of a monochromatic scale.
#[inline]
pub fn monochromatic_contrasts(shades: &[ColorShade]) -> BTreeMap<ContrastName, Contrast> {
    let luminance: Vec<f64> = shades.iter().map(|s| s.luminance).collect();
    luminance_contrasts(&luminance)
}

/// Aggregate the contrasts of several scales: the span is the worst
/// (largest) one, the value the mean.  The efficiency is relative to
/// `steps`, the length of the first scale.
pub fn palette_contrasts(scales: &[&BTreeMap<ContrastName, Contrast>],
                         steps: usize) -> BTreeMap<ContrastName, Contrast> {
    CONTRAST_LIST.iter().map(|&name| {
        let per_scale = scales.iter().filter_map(|c| c.get(&name));
        let span = per_scale.clone().map(|c| c.span).max().unwrap_or(0);
        let sum: f64 = per_scale.map(|c| c.value).sum();
        let contrast = Contrast {
            system: name.system(),
            target: name.target(),
            span,
            value: sum / scales.len().max(1) as f64,
            efficiency: span as f64 / steps.saturating_sub(1).max(1) as f64,
            name,
        };
        (name, contrast)
    }).collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wcag() {
        let c = wcag_contrast(1., 0.);
        assert!((c - 21.).abs() <= 1e-12, "{} ≉ 21", c);
        assert_eq!(wcag_contrast(0., 1.), c);
        assert_eq!(wcag_contrast(0.3, 0.3), 1.);
    }

    #[test]
    fn apca() {
        assert_eq!(apca_contrast(0., 1.), -96.);
        assert_eq!(apca_contrast(1., 0.), 96.);
        assert_eq!(apca_contrast(0.5, 0.5), 0.);
        // Both luminances below 0.0005 go through the soft clamp:
        // unclamped, black text would come out darker than the background.
        assert_eq!(apca_contrast(0., 0.0004), 1.);
        assert_eq!(apca_contrast(0.0004, 0.), -1.);
        // |Lc| below 1 is clipped to 0.
        assert_eq!(apca_contrast(0.5, 0.49), 0.);
    }

    #[test]
    fn parse() {
        assert_eq!(parse_contrast("wcag45").unwrap(), (ContrastSystem::Wcag, 4.5));
        assert_eq!(parse_contrast("apca60").unwrap(), (ContrastSystem::Apca, 60.));
        for bad in ["wcag", "apca4x", "cie45", "WCAG45", ""] {
            assert_eq!(parse_contrast(bad),
                       Err(Error::InvalidContrast(bad.to_string())));
        }
        assert!("wcag55".parse::<ContrastName>().is_err());
        for name in ALL_CONTRASTS {
            let parsed: ContrastName = name.as_str().parse().unwrap();
            assert_eq!(parsed, name);
            assert_eq!(parse_contrast(name.as_str()).unwrap(),
                       (name.system(), name.target()));
        }
    }

    #[test]
    fn two_steps() {
        let contrasts = luminance_contrasts(&[1.0, 0.1]);
        assert_eq!(contrasts.len(), CONTRAST_LIST.len());
        assert_eq!(contrasts[&ContrastName::Wcag45].target, 4.5);
        assert_eq!(contrasts[&ContrastName::Apca60].target, 60.);
        let w = &contrasts[&ContrastName::Wcag45];
        assert_eq!(w.span, 1);
        assert!((w.value - 7.).abs() <= 1e-12, "{} ≉ 7", w.value);
        assert_eq!(w.efficiency, 1.);
        let a = &contrasts[&ContrastName::Apca75];
        assert_eq!(a.span, 1);
        assert_eq!(a.value, apca_contrast(1.0, 0.1).abs()
                   .max(apca_contrast(0.1, 1.0).abs()));
    }

    #[test]
    fn span_search() {
        // Luminances of a gray ramp: neighbours are close, the ends far.
        let lum = [1.0, 0.6, 0.35, 0.2, 0.1, 0.05, 0.0];
        let c = luminance_contrasts(&lum);
        let w30 = &c[&ContrastName::Wcag30];
        let w45 = &c[&ContrastName::Wcag45];
        assert!(w30.span <= w45.span);
        assert!(w45.value >= 4.5);
        for k in 1 .. w45.span {
            assert!(worst_contrast(ContrastSystem::Wcag, &lum, k) < 4.5);
        }
        assert_eq!(w45.efficiency, w45.span as f64 / 6.);
    }

    #[test]
    fn unreachable_target() {
        let lum = [0.5, 0.45, 0.4];
        let c = &luminance_contrasts(&lum)[&ContrastName::Wcag45];
        assert_eq!(c.span, 2);
        assert_eq!(c.value, wcag_contrast(0.5, 0.4));
        assert_eq!(c.efficiency, 1.);
    }

    #[test]
    fn palette_aggregation() {
        let a = luminance_contrasts(&[1.0, 0.6, 0.35, 0.2, 0.1, 0.05, 0.0]);
        let b = luminance_contrasts(&[1.0, 0.1, 0.0]);
        let c = palette_contrasts(&[&a, &b], 7);
        assert_eq!(c.len(), CONTRAST_LIST.len());
        for (name, p) in &c {
            assert_eq!(p.span, a[name].span.max(b[name].span));
            assert!((p.value - (a[name].value + b[name].value) / 2.).abs()
                    <= 1e-12);
            assert_eq!(p.efficiency, p.span as f64 / 6.);
        }
        let empty = palette_contrasts(&[], 0);
        assert_eq!(empty[&ContrastName::Wcag45].span, 0);
        assert_eq!(empty[&ContrastName::Wcag45].value, 0.);
    }

    #[test]
    fn single_step() {
        let c = &luminance_contrasts(&[0.5])[&ContrastName::Apca45];
        assert_eq!((c.span, c.value, c.efficiency), (0, 0., 0.));
    }
}
