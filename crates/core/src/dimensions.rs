//! Converts what the customer typed into canonical inches.
//!
//! The resolver never fails. Input that cannot be read as a number in
//! [`MeasurementUnit::Inches`] mode becomes `NaN`, and the order validator
//! rejects it along with zero and negative sizes.

use serde::{Deserialize, Serialize};

use crate::form;

/// How the customer entered the sheet size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementUnit {
    #[default]
    Inches,
    /// Separate feet and inches fields for each side.
    FeetAndInches,
}

/// Raw size fields from the order form. Numbers are read as their text.
///
/// Only `width`/`height` are read in inches mode; only the four split fields
/// are read in feet-and-inches mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionInput {
    #[serde(deserialize_with = "form::text")]
    pub width: String,
    #[serde(deserialize_with = "form::text")]
    pub height: String,
    #[serde(deserialize_with = "form::text")]
    pub width_feet: String,
    #[serde(deserialize_with = "form::text")]
    pub width_inches: String,
    #[serde(deserialize_with = "form::text")]
    pub height_feet: String,
    #[serde(deserialize_with = "form::text")]
    pub height_inches: String,
}

/// Width and height in inches. Not yet validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

const INCHES_PER_FOOT: f64 = 12.0;

/// Resolve the form fields to canonical inches.
#[must_use]
pub fn resolve(unit: MeasurementUnit, input: &DimensionInput) -> Dimensions {
    match unit {
        MeasurementUnit::Inches => Dimensions {
            width: parse_or_nan(&input.width),
            height: parse_or_nan(&input.height),
        },
        MeasurementUnit::FeetAndInches => Dimensions {
            width: feet_and_inches(&input.width_feet, &input.width_inches),
            height: feet_and_inches(&input.height_feet, &input.height_inches),
        },
    }
}

fn feet_and_inches(feet: &str, inches: &str) -> f64 {
    parse_or_zero(feet).mul_add(INCHES_PER_FOOT, parse_or_zero(inches))
}

fn parse_or_nan(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(f64::NAN)
}

// A blank or garbled sub-field counts as nothing entered
fn parse_or_zero(raw: &str) -> f64 {
    let value = parse_or_nan(raw);
    if value.is_nan() { 0.0 } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inches(width: &str, height: &str) -> DimensionInput {
        DimensionInput {
            width: width.to_owned(),
            height: height.to_owned(),
            ..DimensionInput::default()
        }
    }

    fn split(wf: &str, wi: &str, hf: &str, hi: &str) -> DimensionInput {
        DimensionInput {
            width_feet: wf.to_owned(),
            width_inches: wi.to_owned(),
            height_feet: hf.to_owned(),
            height_inches: hi.to_owned(),
            ..DimensionInput::default()
        }
    }

    #[test]
    fn test_inches_mode_passes_values_through() {
        for (w, h) in [(1.0, 1.0), (24.5, 36.25), (0.125, 120.0), (96.0, 48.0)] {
            let dims = resolve(
                MeasurementUnit::Inches,
                &inches(&w.to_string(), &h.to_string()),
            );
            assert_eq!(dims, Dimensions::new(w, h));
        }
    }

    #[test]
    fn test_inches_mode_trims_whitespace() {
        let dims = resolve(MeasurementUnit::Inches, &inches(" 12 ", "8\n"));
        assert_eq!(dims, Dimensions::new(12.0, 8.0));
    }

    #[test]
    fn test_inches_mode_unparsable_becomes_nan() {
        let dims = resolve(MeasurementUnit::Inches, &inches("wide", ""));
        assert!(dims.width.is_nan());
        assert!(dims.height.is_nan());

        // Trailing units are not stripped.
        let dims = resolve(MeasurementUnit::Inches, &inches("12in", "3.5\""));
        assert!(dims.width.is_nan());
        assert!(dims.height.is_nan());
    }

    #[test]
    fn test_inches_mode_ignores_split_fields() {
        let mut input = inches("10", "20");
        input.width_feet = "3".to_owned();
        let dims = resolve(MeasurementUnit::Inches, &input);
        assert_eq!(dims, Dimensions::new(10.0, 20.0));
    }

    #[test]
    fn test_feet_and_inches_combines_fields() {
        for (wf, wi, hf, hi) in [(0.0, 0.0, 0.0, 0.0), (1.0, 6.0, 2.0, 0.5), (8.0, 11.0, 4.0, 3.0)] {
            let dims = resolve(
                MeasurementUnit::FeetAndInches,
                &split(
                    &wf.to_string(),
                    &wi.to_string(),
                    &hf.to_string(),
                    &hi.to_string(),
                ),
            );
            assert_eq!(dims, Dimensions::new(wf * 12.0 + wi, hf * 12.0 + hi));
        }
    }

    #[test]
    fn test_feet_and_inches_missing_fields_count_as_zero() {
        let dims = resolve(MeasurementUnit::FeetAndInches, &split("2", "", "3", "6"));
        assert_eq!(dims, Dimensions::new(24.0, 42.0));

        let dims = resolve(MeasurementUnit::FeetAndInches, &split("", "9", "abc", ""));
        assert_eq!(dims, Dimensions::new(9.0, 0.0));
    }

    #[test]
    fn test_unit_deserializes_snake_case() {
        let unit: MeasurementUnit =
            serde_json::from_str("\"feet_and_inches\"").unwrap_or_default();
        assert_eq!(unit, MeasurementUnit::FeetAndInches);
    }
}
