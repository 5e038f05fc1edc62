//! The glass catalog: thicknesses and finishes a shop can cut.
//!
//! Values serialize to the same strings the order form submits (`"1/4"`,
//! `"low_iron"`), so stored rows and request bodies share one vocabulary.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::status::ParseStatusError;

/// Sheet thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "glassspire.glass_thickness"))]
pub enum GlassThickness {
    #[serde(rename = "1/8")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "1/8"))]
    Eighth,
    #[serde(rename = "1/4")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "1/4"))]
    Quarter,
    #[serde(rename = "3/8")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "3/8"))]
    ThreeEighths,
    #[serde(rename = "1/2")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "1/2"))]
    Half,
    #[serde(rename = "3/4")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "3/4"))]
    ThreeQuarters,
    #[serde(rename = "9/16 Laminated")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "9/16 Laminated"))]
    NineSixteenthsLaminated,
}

impl GlassThickness {
    /// Catalog order.
    pub const ALL: [Self; 6] = [
        Self::Eighth,
        Self::Quarter,
        Self::ThreeEighths,
        Self::Half,
        Self::ThreeQuarters,
        Self::NineSixteenthsLaminated,
    ];

    /// Form value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eighth => "1/8",
            Self::Quarter => "1/4",
            Self::ThreeEighths => "3/8",
            Self::Half => "1/2",
            Self::ThreeQuarters => "3/4",
            Self::NineSixteenthsLaminated => "9/16 Laminated",
        }
    }

    /// Label for order summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Eighth => "⅛ inch",
            Self::Quarter => "¼ inch",
            Self::ThreeEighths => "⅜ inch",
            Self::Half => "½ inch",
            Self::ThreeQuarters => "¾ inch",
            Self::NineSixteenthsLaminated => "9/16 Laminated",
        }
    }
}

impl fmt::Display for GlassThickness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GlassThickness {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseStatusError {
                kind: "glass thickness",
                value: s.to_owned(),
            })
    }
}

/// Surface finish or tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "glassspire.glass_finish", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum GlassFinish {
    Clear,
    AcidEdge,
    Grey,
    Bronze,
    Mirror,
    LowIron,
    WhitePainted,
    RainGlass,
    AcidEdgeLowIron,
}

impl GlassFinish {
    /// Catalog order.
    pub const ALL: [Self; 9] = [
        Self::Clear,
        Self::AcidEdge,
        Self::Grey,
        Self::Bronze,
        Self::Mirror,
        Self::LowIron,
        Self::WhitePainted,
        Self::RainGlass,
        Self::AcidEdgeLowIron,
    ];

    /// Form value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::AcidEdge => "acid_edge",
            Self::Grey => "grey",
            Self::Bronze => "bronze",
            Self::Mirror => "mirror",
            Self::LowIron => "low_iron",
            Self::WhitePainted => "white_painted",
            Self::RainGlass => "rain_glass",
            Self::AcidEdgeLowIron => "acid_edge_low_iron",
        }
    }

    /// Label for order summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::AcidEdge => "Acid Edge",
            Self::Grey => "Grey",
            Self::Bronze => "Bronze",
            Self::Mirror => "Mirror",
            Self::LowIron => "Low Iron",
            Self::WhitePainted => "White Painted Glass",
            Self::RainGlass => "Rain Glass",
            Self::AcidEdgeLowIron => "Acid Edge Low Iron",
        }
    }
}

impl fmt::Display for GlassFinish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GlassFinish {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ParseStatusError {
                kind: "glass finish",
                value: s.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thickness_serde_matches_form_values() {
        for thickness in GlassThickness::ALL {
            let json = serde_json::to_string(&thickness).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", thickness.as_str()));
            assert_eq!(thickness.as_str().parse::<GlassThickness>(), Ok(thickness));
        }
    }

    #[test]
    fn test_finish_serde_matches_form_values() {
        for finish in GlassFinish::ALL {
            let json = serde_json::to_string(&finish).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", finish.as_str()));
            assert_eq!(finish.as_str().parse::<GlassFinish>(), Ok(finish));
        }
    }

    #[test]
    fn test_unknown_catalog_values_are_rejected() {
        assert!("5/8".parse::<GlassThickness>().is_err());
        assert!("frosted".parse::<GlassFinish>().is_err());
        assert!("Clear".parse::<GlassFinish>().is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(GlassThickness::Quarter.label(), "¼ inch");
        assert_eq!(GlassFinish::WhitePainted.label(), "White Painted Glass");
    }
}
