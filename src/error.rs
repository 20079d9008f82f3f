use thiserror::Error;

/// Errors raised when the input breaks the caller contract.
///
/// Numeric degenerate cases (flat ramps, single steps, zero chroma)
/// are not errors; they evaluate to neutral scores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The string is not a `#rrggbb` color.
    #[error("invalid hex color “{0}”, expected #rrggbb")]
    InvalidHex(String),

    /// A CSS `rgb()` string with fewer than three numeric components.
    #[error("invalid CSS rgb() color “{0}”")]
    InvalidCssRgb(String),

    /// A contrast tag outside of `wcagNN` / `apcaNN`.
    #[error("invalid contrast “{0}”")]
    InvalidContrast(String),

    /// A scale must contain at least one color.
    #[error("cannot analyze an empty color scale")]
    EmptyScale,

    /// A palette must contain at least one scale.
    #[error("cannot analyze a palette without color scales")]
    EmptyPalette,
}

pub type Result<T> = std::result::Result<T, Error>;
