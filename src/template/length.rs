//! Lengths and the row-height / column-width specifiers built from them.

use std::fmt;

use logos::Logos;

use super::build::TemplateError;

/// Units a template length may be expressed in.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    #[token("px")]
    Px,
    #[token("em")]
    Em,
    #[token("ex")]
    Ex,
    #[token("in")]
    In,
    #[token("cm")]
    Cm,
    #[token("mm")]
    Mm,
    #[token("pt")]
    Pt,
    #[token("pc")]
    Pc,
    #[token("vw")]
    Vw,
    #[token("vh")]
    Vh,
    #[token("%")]
    Percent,
}

impl LengthUnit {
    /// Parse a unit spelling, case-insensitively. The whole string must be
    /// one unit.
    pub fn parse(unit: &str) -> Option<Self> {
        let lower = unit.to_ascii_lowercase();
        let mut lexer = LengthUnit::lexer(&lower);
        match (lexer.next(), lexer.next()) {
            (Some(Ok(unit)), None) => Some(unit),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LengthUnit::Px => "px",
            LengthUnit::Em => "em",
            LengthUnit::Ex => "ex",
            LengthUnit::In => "in",
            LengthUnit::Cm => "cm",
            LengthUnit::Mm => "mm",
            LengthUnit::Pt => "pt",
            LengthUnit::Pc => "pc",
            LengthUnit::Vw => "vw",
            LengthUnit::Vh => "vh",
            LengthUnit::Percent => "%",
        }
    }
}

/// A non-negative length: a value and its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub const ZERO: Length = Length {
        value: 0.0,
        unit: LengthUnit::Px,
    };

    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub fn px(value: f64) -> Self {
        Self::new(value, LengthUnit::Px)
    }

    /// Build a length from a scanned value and unit spelling.
    pub fn parse(value: f64, unit: &str) -> Result<Self, TemplateError> {
        if value < 0.0 {
            return Err(TemplateError::NegativeLength { value });
        }
        let parsed = LengthUnit::parse(unit).ok_or_else(|| TemplateError::UnknownUnit {
            unit: unit.to_owned(),
        })?;
        Ok(Self::new(value, parsed))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.as_str())
    }
}

/// Row height specifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Height {
    Length(Length),
    /// As tall as the tallest single-row slot in the row.
    Auto,
    /// `*`: as tall as the tallest `*` row of the template.
    Equal,
}

impl Height {
    /// Rows without an explicit `/ <height>` are `auto`.
    pub const DEFAULT: Height = Height::Auto;

    /// Whether the height pass may grow this row to fit multi-row slots.
    pub fn is_expandable(&self) -> bool {
        !matches!(self, Height::Length(_))
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Height::Length(length) => length.fmt(f),
            Height::Auto => f.write_str("auto"),
            Height::Equal => f.write_str("*"),
        }
    }
}

/// Column width specifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Width {
    Length(Length),
    /// `*`: takes an equal share of the remaining width.
    Equal,
    MinContent,
    MaxContent,
    FitContent,
    MinMax(Length, Length),
}

impl Width {
    /// Columns without a declared width are `*`.
    pub const DEFAULT: Width = Width::Equal;
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Width::Length(length) => length.fmt(f),
            Width::Equal => f.write_str("*"),
            Width::MinContent => f.write_str("min-content"),
            Width::MaxContent => f.write_str("max-content"),
            Width::FitContent => f.write_str("fit-content"),
            Width::MinMax(low, high) => write!(f, "minmax({low}, {high})"),
        }
    }
}
