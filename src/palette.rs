//! Quality metrics of a palette made of several monochromatic scales.

use std::collections::BTreeMap;
use log::debug;
use serde::{Deserialize, Serialize};
use crate::{contrast::{palette_contrasts, Contrast, ContrastName},
            error::{Error, Result},
            math::{self, root_mean_square},
            monochromatic::{analyze_monochromatic_with, lightness,
                            AnalysisOptions, MonochromaticAnalysis,
                            MonochromaticMetrics, StepName}};

/// A palette: named scales sharing the same step names.
///
/// Serialized as `{ name, stepNames, colors: { scale: [hex, …], … } }`.
/// The order of the scales is preserved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteData {
    pub name: String,
    pub step_names: Vec<StepName>,
    #[serde(with = "ordered_map")]
    pub colors: Vec<(String, Vec<String>)>,
}

impl PaletteData {
    /// A palette whose steps are named `0, 1, …` after the length of
    /// the first scale.
    pub fn new(name: impl Into<String>, colors: Vec<(String, Vec<String>)>) -> Self {
        let steps = colors.first().map_or(0, |(_, c)| c.len());
        let step_names = (0 .. steps).map(|i| StepName::Number(i as f64))
            .collect();
        PaletteData { name: name.into(), step_names, colors }
    }
}

/// Whether the scales of a palette go from light to dark or the reverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The first step is the darkest.
    Lighten,
    /// The first step is the lightest.
    Darken,
}

/// Analysis of a palette.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteAnalysis {
    pub name: String,
    /// Base color of each scale.
    #[serde(with = "ordered_map")]
    pub base_colors: Vec<(String, String)>,
    pub step_names: Vec<StepName>,
    /// Direction of the first scale.
    pub direction: Direction,
    pub steps: usize,
    /// The scales as given.
    #[serde(with = "ordered_map")]
    pub colors: Vec<(String, Vec<String>)>,
    pub contrasts: BTreeMap<ContrastName, Contrast>,
    pub scales: Vec<MonochromaticAnalysis>,
    /// Root mean square of the metrics of the scales.
    pub metrics: MonochromaticMetrics,
    pub score: f64,
}

/// Analyze every scale of a palette and aggregate the results.
///
/// # Example
///
/// ```
/// use chromametry::{analyze_monochromatic_palette, PaletteData, StepName};
/// let palette = PaletteData {
///     name: "test".into(),
///     step_names: vec![StepName::Number(100.), StepName::Number(500.),
///                      StepName::Number(900.)],
///     colors: vec![
///         ("gray".into(), vec!["#ffffff".into(), "#808080".into(),
///                              "#000000".into()]),
///         ("blue".into(), vec!["#dbeafe".into(), "#3b82f6".into(),
///                              "#1e3a8a".into()]),
///     ],
/// };
/// let a = analyze_monochromatic_palette(&palette).unwrap();
/// assert_eq!(a.scales.len(), 2);
/// ```
pub fn analyze_monochromatic_palette(data: &PaletteData) -> Result<PaletteAnalysis> {
    analyze_monochromatic_palette_with(data, &AnalysisOptions::default())
}

/// Same as [`analyze_monochromatic_palette`] with explicit options.
pub fn analyze_monochromatic_palette_with(
    data: &PaletteData, options: &AnalysisOptions,
) -> Result<PaletteAnalysis> {
    let (_, first) = data.colors.first().ok_or(Error::EmptyPalette)?;
    let (Some(start), Some(end)) = (first.first(), first.last())
    else { return Err(Error::EmptyScale) };
    let direction = if lightness(start)? > lightness(end)? { Direction::Darken }
                    else { Direction::Lighten };

    let mut scales = Vec::with_capacity(data.colors.len());
    let mut base_colors = Vec::with_capacity(data.colors.len());
    for (name, colors) in &data.colors {
        let analysis = analyze_monochromatic_with(
            colors, Some(name.as_str()), Some(data.step_names.as_slice()),
            options)?;
        base_colors.push((name.clone(), analysis.base_color.clone()));
        scales.push(analysis);
    }

    let rms = |f: fn(&MonochromaticMetrics) -> f64| {
        let v: Vec<f64> = scales.iter().map(|s| f(&s.metrics)).collect();
        root_mean_square(&v)
    };
    let metrics = MonochromaticMetrics {
        lightness_linearity: rms(|m| m.lightness_linearity),
        chroma_smoothness: rms(|m| m.chroma_smoothness),
        spacing_uniformity: rms(|m| m.spacing_uniformity),
        hue_stability: rms(|m| m.hue_stability),
        contrast_efficiency: rms(|m| m.contrast_efficiency),
    };
    let score = math::score(&metrics.values());
    let per_scale: Vec<_> = scales.iter().map(|s| &s.contrasts).collect();
    let contrasts = palette_contrasts(&per_scale, first.len());
    debug!("palette {}: {} scales, score {score}", data.name, scales.len());

    Ok(PaletteAnalysis {
        name: data.name.clone(),
        base_colors,
        step_names: data.step_names.clone(),
        direction,
        steps: data.step_names.len(),
        colors: data.colors.clone(),
        contrasts,
        scales,
        metrics,
        score,
    })
}

/// (De)serialize a list of pairs as a map, keeping the order.
mod ordered_map {
    use std::{fmt, marker::PhantomData};
    use serde::{de::{MapAccess, Visitor}, Deserialize, Deserializer,
                Serialize, Serializer};

    pub fn serialize<K, V, S>(pairs: &[(K, V)], serializer: S)
                              -> Result<S::Ok, S::Error>
    where K: Serialize, V: Serialize, S: Serializer {
        serializer.collect_map(pairs.iter().map(|(k, v)| (k, v)))
    }

    struct PairsVisitor<K, V>(PhantomData<(K, V)>);

    impl<'de, K, V> Visitor<'de> for PairsVisitor<K, V>
    where K: Deserialize<'de>, V: Deserialize<'de> {
        type Value = Vec<(K, V)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A)
                                        -> Result<Self::Value, A::Error> {
            let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(pair) = map.next_entry()? {
                pairs.push(pair);
            }
            Ok(pairs)
        }
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D)
                                     -> Result<Vec<(K, V)>, D::Error>
    where K: Deserialize<'de>, V: Deserialize<'de>, D: Deserializer<'de> {
        deserializer.deserialize_map(PairsVisitor(PhantomData))
    }
}
