//! Quality metrics of a single monochromatic scale.

use std::{collections::BTreeMap, fmt};
use log::debug;
use serde::{Deserialize, Serialize};
use crate::{color::{delta_e2000, find_max_chroma_hex, hex_to_rgb, rgb_to_lab,
                    simulate_deuteranopia, simulate_protanopia, unwrap_hue},
            contrast::{monochromatic_contrasts, Contrast, ContrastName},
            error::{Error, Result},
            math::{self, Monotone},
            shade::ColorShade};

/// Largest chroma of a color in the sRGB gamut (CIELAB, D65).
const C_REF: f64 = 133.8;

/// Name of a step of a scale, e.g. `500`, `0.5` or `"accent"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepName {
    Number(f64),
    Label(String),
}

impl From<u32> for StepName {
    fn from(n: u32) -> Self { StepName::Number(n.into()) }
}

impl From<f64> for StepName {
    fn from(x: f64) -> Self { StepName::Number(x) }
}

impl From<&str> for StepName {
    fn from(s: &str) -> Self { StepName::Label(s.to_string()) }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepName::Number(n) => write!(f, "{n}"),
            StepName::Label(s) => f.write_str(s),
        }
    }
}

/// Quality metrics of a scale, each in \[0, 1\] (1 is best).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonochromaticMetrics {
    pub lightness_linearity: f64,
    pub chroma_smoothness: f64,
    pub spacing_uniformity: f64,
    pub hue_stability: f64,
    pub contrast_efficiency: f64,
}

impl MonochromaticMetrics {
    /// The metrics in the order used to compute scores.
    pub fn values(&self) -> [f64; 5] {
        [self.lightness_linearity, self.chroma_smoothness,
         self.spacing_uniformity, self.contrast_efficiency,
         self.hue_stability]
    }
}

/// Analysis of one monochromatic scale.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonochromaticAnalysis {
    pub name: String,
    /// The colors of the scale, reversed if needed so that the first
    /// color's L* is at most the last's.
    pub colors: Vec<String>,
    /// Position of `base_color` in `colors`.
    pub base_index: usize,
    pub base_color: String,
    pub shades: Vec<ColorShade>,
    pub metrics: MonochromaticMetrics,
    pub contrasts: BTreeMap<ContrastName, Contrast>,
    /// Geometric mean of the metrics, 0–100.
    pub score: f64,
}

/// Options of the analyses.
///
/// By default the color-blind distances of the shades are left at 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    simulate_color_blindness: bool,
}

impl AnalysisOptions {
    pub fn new() -> Self { Self::default() }

    /// Also accumulate ΔE00 under protanopia and deuteranopia in
    /// [`ColorShade::cum_prot_delta_e00`] and
    /// [`ColorShade::cum_deut_delta_e00`].  Scores are not affected.
    pub fn simulate_color_blindness(mut self, yes: bool) -> Self {
        self.simulate_color_blindness = yes;
        self
    }

    pub fn simulates_color_blindness(&self) -> bool {
        self.simulate_color_blindness
    }
}

/// Analyze the monochromatic scale `colors` (`#rrggbb` strings).
///
/// `name` defaults to `"brand"` and `step_names` to the positions of
/// the colors.  Only the number of step names matters.  If the first
/// color is lighter than the last, the scale is reversed (the input
/// is left untouched).
///
/// # Example
///
/// ```
/// use chromametry::analyze_monochromatic;
/// let a = analyze_monochromatic(&["#ffffff", "#808080", "#000000"],
///                               None, None).unwrap();
/// assert_eq!(a.shades.len(), 3);
/// assert_eq!(a.colors[0], "#000000");
/// assert!(a.score > 0.);
/// ```
pub fn analyze_monochromatic<S: AsRef<str>>(
    colors: &[S], name: Option<&str>, step_names: Option<&[StepName]>,
) -> Result<MonochromaticAnalysis> {
    analyze_monochromatic_with(colors, name, step_names,
                               &AnalysisOptions::default())
}

/// Same as [`analyze_monochromatic`] with explicit options.
pub fn analyze_monochromatic_with<S: AsRef<str>>(
    colors: &[S], name: Option<&str>, step_names: Option<&[StepName]>,
    options: &AnalysisOptions,
) -> Result<MonochromaticAnalysis> {
    let name = name.filter(|n| !n.is_empty()).unwrap_or("brand");
    let steps = step_names.map_or(colors.len(), |s| s.len());
    let mut colors: Vec<String> =
        colors.iter().map(|c| c.as_ref().to_string()).collect();
    let n = colors.len();
    if n == 0 { return Err(Error::EmptyScale) }

    if lightness(&colors[0])? > lightness(&colors[n - 1])? {
        debug!("{name}: reversing scale");
        colors.reverse();
    }

    let mut shades = colors.iter().map(|hex| ColorShade::new(hex))
        .collect::<Result<Vec<_>>>()?;
    for i in 1 .. n {
        let de = delta_e2000(&shades[i - 1].lab, &shades[i].lab);
        shades[i].cum_delta_e00 = shades[i - 1].cum_delta_e00 + de;
    }
    if options.simulate_color_blindness {
        accumulate_color_blind_distances(&mut shades);
    }

    // The two steps at each end are close to white and black.
    let inner: &[String] = if n > 4 { &colors[2 .. n - 2] } else { &[] };
    let base_color = match find_max_chroma_hex(inner)? {
        Some(hex) => hex.to_string(),
        None => colors[n / 2].clone(),
    };
    let base_index = colors.iter()
        .position(|h| h.eq_ignore_ascii_case(&base_color))
        .unwrap_or(n / 2);
    debug!("{name}: base color {base_color} at {base_index}");

    // End points are excluded from hue analysis.
    let mut inner_hues = Vec::new();
    if n > 2 {
        let hues: Vec<f64> = shades[1 .. n - 1].iter().map(|s| s.hue).collect();
        inner_hues = unwrap_hue(&hues);
        for (s, &h) in shades[1 .. n - 1].iter_mut().zip(&inner_hues) {
            s.hue = h;
        }
    }

    let contrasts = monochromatic_contrasts(&shades);
    let wcag45_span = contrasts.get(&ContrastName::Wcag45)
        .map_or(n - 1, |c| c.span);
    let eal: Vec<f64> = shades.iter().map(|s| s.lightness).collect();
    let chroma: Vec<f64> = shades.iter().map(|s| s.chroma).collect();
    let cum_de: Vec<f64> = shades.iter().map(|s| s.cum_delta_e00).collect();
    let metrics = MonochromaticMetrics {
        lightness_linearity: lightness_linearity(&eal),
        chroma_smoothness: chroma_smoothness(&chroma),
        spacing_uniformity: spacing_uniformity(&cum_de),
        hue_stability: hue_stability(&inner_hues, shades[base_index].hue),
        contrast_efficiency: contrast_efficiency(wcag45_span, steps),
    };
    let score = math::score(&metrics.values());
    debug!("{name}: score {score}");

    Ok(MonochromaticAnalysis {
        name: name.to_string(),
        colors,
        base_index,
        base_color,
        shades,
        metrics,
        contrasts,
        score,
    })
}

/// CIELAB L* of a hex color.
pub(crate) fn lightness(hex: &str) -> Result<f64> {
    Ok(rgb_to_lab(hex_to_rgb(hex)?).l)
}

fn accumulate_color_blind_distances(shades: &mut [ColorShade]) {
    let prot: Vec<_> = shades.iter()
        .map(|s| rgb_to_lab(simulate_protanopia(s.rgb))).collect();
    let deut: Vec<_> = shades.iter()
        .map(|s| rgb_to_lab(simulate_deuteranopia(s.rgb))).collect();
    for i in 1 .. shades.len() {
        shades[i].cum_prot_delta_e00 = shades[i - 1].cum_prot_delta_e00
            + delta_e2000(&prot[i - 1], &prot[i]);
        shades[i].cum_deut_delta_e00 = shades[i - 1].cum_deut_delta_e00
            + delta_e2000(&deut[i - 1], &deut[i]);
    }
}

/// How close `values` (lightness per step) are to their least-squares
/// line.  1 for fewer than 2 values or a (nearly) flat fit.
pub fn lightness_linearity(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 { return 1. }
    let nf = n as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0., 0., 0., 0.);
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }
    let denominator = nf * sum_xx - sum_x * sum_x;
    if denominator.abs() < 1e-10 { return 1. }
    let slope = (nf * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / nf;
    let last = slope * (nf - 1.);
    if last.abs() < 1e-3 { return 1. }

    let lo = intercept.min(last + intercept);
    let hi = intercept.max(last + intercept);
    let (mut sum_sq_err, mut sum_sq_max) = (0., 0.);
    for (i, &y) in values.iter().enumerate() {
        let target = slope * i as f64 + intercept;
        let err = y - target;
        sum_sq_err += err * err;
        let max_diff = (target - lo).max(hi - target);
        sum_sq_max += max_diff * max_diff;
    }
    (1. - (sum_sq_err / nf).sqrt() / (sum_sq_max / nf).sqrt()).clamp(0., 1.)
}

/// How close the hues are to `reference`, compared to hues drifting
/// linearly up to the opposite hue.  1 for fewer than 2 values.
pub fn hue_stability(values: &[f64], reference: f64) -> f64 {
    let n = values.len();
    if n < 2 { return 1. }
    let (mut sum_sq_err, mut sum_sq_max) = (0., 0.);
    for (i, &h) in values.iter().enumerate() {
        let mut d = (h - reference).abs() % 360.;
        if d > 180. { d = 360. - d }
        sum_sq_err += d * d;
        let max_d = (i as f64 / (n - 1) as f64) * 180.;
        sum_sq_max += max_d * max_d;
    }
    let nf = n as f64;
    let rms_max = (sum_sq_max / nf).sqrt();
    let rms_max = if rms_max == 0. { 1. } else { rms_max };
    (1. - (sum_sq_err / nf).sqrt() / rms_max).clamp(0., 1.)
}

/// How close the chroma curve is to a smooth rise to its peak and
/// fall from it.  1 for fewer than 3 values or achromatic scales.
pub fn chroma_smoothness(chroma: &[f64]) -> f64 {
    let n = chroma.len();
    if n < 3 { return 1. }
    let c_max = chroma.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if c_max <= 1e-2 { return 1. }
    let norm: Vec<f64> = chroma.iter().map(|c| c / c_max * C_REF).collect();
    let lo = norm.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = norm.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let peak = norm.iter().position(|&c| c == hi).unwrap_or(0);
    let spline = Monotone::new(&[(0., norm[0]),
                                 (peak as f64, hi),
                                 ((n - 1) as f64, norm[n - 1])]);
    let (mut sum_sq_err, mut sum_sq_max) = (0., 0.);
    for (i, &c) in norm.iter().enumerate() {
        let target = spline.eval(i as f64);
        let err = c - target;
        sum_sq_err += err * err;
        sum_sq_max += (target - lo).max(hi - target).powi(2);
    }
    // Constant chroma: nothing to deviate from.
    if sum_sq_max == 0. { return 1. }
    let nf = n as f64;
    (1. - (sum_sq_err / nf).sqrt() / (sum_sq_max / nf).sqrt()).clamp(0., 1.)
}

/// Uniformity of the perceptual steps given the cumulative ΔE00 of a
/// scale: `1 / (1 + cv)` where `cv` is the coefficient of variation of
/// the steps.  0 if the steps are not increasing or vanish.
pub fn spacing_uniformity(cumulative_delta_e00: &[f64]) -> f64 {
    let n = cumulative_delta_e00.len();
    if n < 2 { return 1. }
    let mut deltas = Vec::with_capacity(n - 1);
    for w in cumulative_delta_e00.windows(2) {
        let d = w[1] - w[0];
        if d < 0. { return 0. }
        deltas.push(d);
    }
    let len = deltas.len() as f64;
    let mean = deltas.iter().sum::<f64>() / len;
    if mean <= 1e-6 { return 0. }
    let var = deltas.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / len;
    let cv = var.sqrt() / mean;
    (1. / (1. + cv)).clamp(0., 1.)
}

/// Score the WCAG 4.5:1 `span` of a scale of `steps` steps.  Spans of
/// at most half of the scale score 1, a span covering the whole scale
/// scores 0, with a linear penalty in between.
pub fn contrast_efficiency(span: usize, steps: usize) -> f64 {
    const LAMBDA: f64 = 0.5;
    if steps <= 1 { return 1. }
    let steps = steps as f64;
    let density = span as f64 / steps;
    let target_density = LAMBDA * ((steps - 1.) / steps);
    if density <= target_density { return 1. }
    if density >= 1. { return 0. }
    (1. - density) / (1. - target_density)
}


#[cfg(test)]
mod tests {
    use super::*;

    const GRAY: [&str; 3] = ["#ffffff", "#808080", "#000000"];
    const BLUE: [&str; 11] = [
        "#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6",
        "#2563eb", "#1d4ed8", "#1e40af", "#1e3a8a", "#172554"];

    fn close(x: f64, y: f64, eps: f64) {
        assert!((x - y).abs() <= eps, "{} ≉ {}", x, y);
    }

    #[test]
    fn gray_scale() {
        let a = analyze_monochromatic(&GRAY, None, None).unwrap();
        assert_eq!(a.name, "brand");
        assert_eq!(a.shades.len(), 3);
        assert_eq!(a.colors, vec!["#000000", "#808080", "#ffffff"]);
        assert_eq!((a.base_index, a.base_color.as_str()), (1, "#808080"));
        assert!(a.score > 0.);
        assert_eq!(a.metrics.chroma_smoothness, 1.);
        assert_eq!(a.metrics.hue_stability, 1.);
        assert_eq!(a.shades[0].cum_delta_e00, 0.);
        assert!(a.shades[1].cum_delta_e00 > 0.);
        assert!(a.shades[2].cum_delta_e00 > a.shades[1].cum_delta_e00);
        assert_eq!(a.shades[2].cum_prot_delta_e00, 0.);
    }

    #[test]
    fn dark_to_light_is_kept() {
        let a = analyze_monochromatic(&["#000000", "#ffffff"], Some("x"), None)
            .unwrap();
        assert_eq!(a.colors, vec!["#000000", "#ffffff"]);
        assert_eq!(a.name, "x");
    }

    #[test]
    fn single_step() {
        let a = analyze_monochromatic(&["#3b82f6"], None, None).unwrap();
        assert_eq!(a.shades.len(), 1);
        assert_eq!(a.base_index, 0);
        assert_eq!(a.metrics.values(), [1.; 5]);
        assert_eq!(a.score, 100.);
        assert_eq!(a.contrasts[&ContrastName::Wcag45].span, 0);
    }

    #[test]
    fn two_steps() {
        let a = analyze_monochromatic(&["#ffffff", "#000000"], None, None)
            .unwrap();
        assert_eq!(a.colors, vec!["#000000", "#ffffff"]);
        assert_eq!((a.base_index, a.base_color.as_str()), (1, "#ffffff"));
        let m = a.metrics;
        assert_eq!(m.hue_stability, 1.);
        assert_eq!(m.chroma_smoothness, 1.);
        close(m.lightness_linearity, 1., 1e-9);
        close(m.spacing_uniformity, 1., 1e-12);
        close(m.contrast_efficiency, 2. / 3., 1e-12);
        assert!(a.score > 90. && a.score < 95., "{}", a.score);
    }

    #[test]
    fn blue_scale() {
        let a = analyze_monochromatic(&BLUE, Some("blue"), None).unwrap();
        assert_eq!(a.colors, BLUE.iter().rev().map(|c| c.to_string())
                   .collect::<Vec<_>>());
        assert!((2 .. 9).contains(&a.base_index), "{}", a.base_index);
        assert_eq!(a.colors[a.base_index], a.base_color);
        let base_c = a.shades[a.base_index].chroma;
        for s in &a.shades[2 .. 9] { assert!(s.chroma <= base_c) }
        for w in a.shades[1 .. 10].windows(2) {
            assert!((w[1].hue - w[0].hue).abs() <= 180.);
        }
        for w in a.shades.windows(2) {
            assert!(w[1].cum_delta_e00 > w[0].cum_delta_e00);
        }
        for m in a.metrics.values() { assert!((0. ..= 1.).contains(&m)) }
        assert!(a.score > 0. && a.score <= 100.);
        assert_eq!(a.score, math::score(&a.metrics.values()));
    }

    #[test]
    fn inner_hues_unwrapped_across_zero() {
        use crate::color::{lab_to_rgb, lch_to_lab, rgb_to_hex, Lch};
        // Gray ends, inner hues alternating on both sides of 0°.
        let lch = [(10., 0., 0.), (30., 25., 350.), (45., 25., 10.),
                   (60., 25., 352.), (75., 25., 12.), (95., 0., 0.)];
        let colors: Vec<String> = lch.iter()
            .map(|&(l, c, h)| rgb_to_hex(lab_to_rgb(lch_to_lab(Lch::new(l, c, h)))))
            .collect();
        let raw: Vec<f64> = colors.iter()
            .map(|c| ColorShade::new(c).unwrap().hue).collect();
        assert!(raw[1] > 340. && raw[2] < 20., "{:?}", raw);

        let a = analyze_monochromatic(&colors, None, None).unwrap();
        assert_eq!(a.colors, colors);
        let inner: Vec<f64> = a.shades[1 .. 5].iter().map(|s| s.hue).collect();
        assert_eq!(inner, unwrap_hue(&raw[1 .. 5]));
        for w in inner.windows(2) {
            assert!((w[1] - w[0]).abs() < 30., "{:?}", inner);
        }
        assert!(inner[1] > 360. && inner[3] > 360., "{:?}", inner);
        assert_eq!(a.shades[0].hue, raw[0]);
        assert_eq!(a.shades[5].hue, raw[5]);
        assert_eq!(a.metrics.hue_stability,
                   hue_stability(&inner, a.shades[a.base_index].hue));
        assert!(a.metrics.hue_stability > 0.8, "{}", a.metrics.hue_stability);
    }

    #[test]
    fn step_name_display() {
        assert_eq!(StepName::from(500_u32).to_string(), "500");
        assert_eq!(StepName::from(0.5).to_string(), "0.5");
        assert_eq!(StepName::from(-1.).to_string(), "-1");
        assert_eq!(StepName::from("accent").to_string(), "accent");
    }

    #[test]
    fn input_is_not_mutated() {
        let input: Vec<String> = GRAY.iter().map(|c| c.to_string()).collect();
        let a = analyze_monochromatic(&input, None, None).unwrap();
        assert_eq!(input[0], "#ffffff");
        assert_eq!(a.colors[0], "#000000");
    }

    #[test]
    fn step_names_count() {
        let names: Vec<StepName> = (1 ..= 20_u32).map(StepName::from).collect();
        let a = analyze_monochromatic(&GRAY, None, Some(names.as_slice()))
            .unwrap();
        let span = a.contrasts[&ContrastName::Wcag45].span;
        assert_eq!(a.metrics.contrast_efficiency, contrast_efficiency(span, 20));
    }

    #[test]
    fn color_blind_distances() {
        let opts = AnalysisOptions::new().simulate_color_blindness(true);
        assert!(opts.simulates_color_blindness());
        let a = analyze_monochromatic_with(&BLUE, None, None, &opts).unwrap();
        let b = analyze_monochromatic(&BLUE, None, None).unwrap();
        let last = a.shades.len() - 1;
        assert!(a.shades[last].cum_prot_delta_e00 > 0.);
        assert!(a.shades[last].cum_deut_delta_e00 > 0.);
        assert_eq!(b.shades[last].cum_prot_delta_e00, 0.);
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn errors() {
        let empty: [&str; 0] = [];
        assert_eq!(analyze_monochromatic(&empty, None, None),
                   Err(Error::EmptyScale));
        assert_eq!(analyze_monochromatic(&["#ffffff", "blue"], None, None),
                   Err(Error::InvalidHex("blue".into())));
    }

    #[test]
    fn json_shape() {
        let a = analyze_monochromatic(&GRAY, None, None).unwrap();
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["baseIndex"], 1);
        assert_eq!(v["shades"][0]["cumDeltaE00"], 0.);
        assert_eq!(v["shades"][0]["rgb"]["r"], 0.);
        assert_eq!(v["contrasts"]["wcag45"]["system"], "wcag");
        assert_eq!(v["contrasts"]["wcag45"]["name"], "wcag45");
        assert!(v["metrics"]["lightnessLinearity"].is_number());
    }

    #[test]
    fn linearity() {
        close(lightness_linearity(&[100., 50., 0.]), 1., 1e-9);
        close(lightness_linearity(&[0., 10., 20., 30., 40.]), 1., 1e-9);
        assert_eq!(lightness_linearity(&[42.]), 1.);
        assert_eq!(lightness_linearity(&[50., 50., 50.]), 1.);
        let l = lightness_linearity(&[0., 5., 10., 90., 100.]);
        assert!(l > 0. && l < 1., "{}", l);
    }

    #[test]
    fn hue() {
        assert_eq!(hue_stability(&[250., 250., 250.], 250.), 1.);
        assert_eq!(hue_stability(&[10.], 200.), 1.);
        // 355° and 5° are 10° apart.
        let wrapped = hue_stability(&[355., 5.], 0.);
        let straight = hue_stability(&[5., 5.], 0.);
        close(wrapped, straight, 1e-12);
        assert!(hue_stability(&[0., 90., 180.], 0.) < 0.5);
    }

    #[test]
    fn chroma() {
        assert_eq!(chroma_smoothness(&[10., 20.]), 1.);
        assert_eq!(chroma_smoothness(&[0., 0.005, 0.]), 1.);
        assert_eq!(chroma_smoothness(&[30., 30., 30.]), 1.);
        let f = Monotone::new(&[(0., 5.), (3., 60.), (6., 10.)]);
        let smooth: Vec<f64> = (0 .. 7).map(|i| f.eval(i as f64)).collect();
        close(chroma_smoothness(&smooth), 1., 1e-9);
        let jagged = [5., 50., 10., 60., 15., 40., 10.];
        assert!(chroma_smoothness(&jagged) < 0.9);
    }

    #[test]
    fn spacing() {
        close(spacing_uniformity(&[0., 10., 20., 30.]), 1., 1e-12);
        assert_eq!(spacing_uniformity(&[0., 10., 5.]), 0.);
        assert_eq!(spacing_uniformity(&[0., 0., 0.]), 0.);
        assert_eq!(spacing_uniformity(&[0.]), 1.);
        let s = spacing_uniformity(&[0., 1., 11., 12.]);
        assert!(s > 0. && s < 1.);
    }

    #[test]
    fn efficiency() {
        assert_eq!(contrast_efficiency(3, 1), 1.);
        assert_eq!(contrast_efficiency(0, 0), 1.);
        // Target density 0.45 for 10 steps.
        assert_eq!(contrast_efficiency(4, 10), 1.);
        assert_eq!(contrast_efficiency(10, 10), 0.);
        close(contrast_efficiency(5, 10), 0.5 / 0.55, 1e-12);
        for steps in 2 .. 15 {
            let mut prev = 1.;
            for span in 0 ..= steps {
                let e = contrast_efficiency(span, steps);
                assert!(e <= prev, "span {span}, steps {steps}");
                prev = e;
            }
        }
    }
}
