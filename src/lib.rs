//! Perceptual quality of monochromatic color scales.
//!
//! A monochromatic scale is an ordered list of tints and shades of one
//! hue, as found in design systems (`blue-50` … `blue-950`).  Each
//! scale is scored on five metrics in \[0, 1\]:
//!
//! - lightness linearity ([`lightness_linearity`]),
//! - chroma smoothness ([`chroma_smoothness`]),
//! - spacing uniformity in ΔE00 ([`spacing_uniformity`]),
//! - hue stability ([`hue_stability`]),
//! - WCAG contrast efficiency ([`contrast_efficiency`]),
//!
//! combined by a geometric mean into a score in \[0, 100\].  See
//! [`analyze_monochromatic`] for a single scale and
//! [`analyze_monochromatic_palette`] for a [`PaletteData`] made of
//! several scales.
//!
//! The conversions ([`color`]), contrast functions ([`contrast`]) and
//! numeric kernels ([`math`]) are usable on their own.

pub mod color;
pub mod contrast;
pub mod math;
mod error;
mod monochromatic;
mod palette;
mod shade;

pub use error::{Error, Result};
pub use shade::ColorShade;
pub use contrast::{Contrast, ContrastName, ContrastSystem};
pub use monochromatic::{analyze_monochromatic, analyze_monochromatic_with,
                        chroma_smoothness, contrast_efficiency, hue_stability,
                        lightness_linearity, spacing_uniformity,
                        AnalysisOptions, MonochromaticAnalysis,
                        MonochromaticMetrics, StepName};
pub use palette::{analyze_monochromatic_palette,
                  analyze_monochromatic_palette_with, Direction,
                  PaletteAnalysis, PaletteData};
