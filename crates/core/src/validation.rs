//! Checks a submitted glass order before anything is stored.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. width is a finite number above zero
//! 2. height is a finite number above zero
//! 3. a thickness was chosen
//! 4. a finish was chosen
//! 5. the thickness is one the shop cuts
//! 6. the finish is one the shop stocks
//!
//! Quantity and the option toggles are coerced rather than checked.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dimensions::{self, DimensionInput, Dimensions, MeasurementUnit};
use crate::form;
use crate::types::{GlassFinish, GlassThickness};

/// Why an order was not accepted.
///
/// These are returned to the customer, never treated as faults.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderRejection {
    #[error("Please enter a valid width")]
    InvalidWidth,
    #[error("Please enter a valid height")]
    InvalidHeight,
    #[error("Please select a glass thickness")]
    MissingThickness,
    #[error("Please select a glass finish")]
    MissingFinish,
    #[error("{0} is not a glass thickness we cut")]
    UnsupportedThickness(String),
    #[error("{0} is not a glass finish we stock")]
    UnsupportedFinish(String),
}

impl OrderRejection {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidWidth => "invalid_width",
            Self::InvalidHeight => "invalid_height",
            Self::MissingThickness => "missing_thickness",
            Self::MissingFinish => "missing_finish",
            Self::UnsupportedThickness(_) => "unsupported_thickness",
            Self::UnsupportedFinish(_) => "unsupported_finish",
        }
    }

    /// The form field the message belongs next to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidWidth => "width",
            Self::InvalidHeight => "height",
            Self::MissingThickness | Self::UnsupportedThickness(_) => "glass_thickness",
            Self::MissingFinish | Self::UnsupportedFinish(_) => "glass_finish",
        }
    }
}

/// Everything on the order form except the size fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDraft {
    pub glass_thickness: String,
    pub glass_finish: String,
    #[serde(deserialize_with = "form::flag")]
    pub tempering: bool,
    #[serde(deserialize_with = "form::flag")]
    pub dfi_coating: bool,
    /// Number or numeric string; anything else means one sheet.
    pub quantity: Option<Value>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
}

/// A full order submission: size fields plus the rest of the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderRequest {
    pub unit: MeasurementUnit,
    #[serde(flatten)]
    pub dimensions: DimensionInput,
    #[serde(flatten)]
    pub draft: OrderDraft,
}

impl OrderRequest {
    /// Resolve the size fields and validate the result.
    ///
    /// # Errors
    ///
    /// Returns the first [`OrderRejection`] that applies.
    pub fn validate(&self) -> Result<OrderSpec, OrderRejection> {
        let resolved = dimensions::resolve(self.unit, &self.dimensions);
        validate(&self.draft, resolved)
    }
}

/// An order that passed validation, ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSpec {
    pub glass_thickness: GlassThickness,
    pub glass_finish: GlassFinish,
    pub tempering: bool,
    pub dfi_coating: bool,
    pub width: f64,
    pub height: f64,
    pub quantity: i32,
    pub notes: Option<String>,
    pub image_url: Option<String>,
}

/// Validate a draft against its resolved size.
///
/// # Errors
///
/// Returns the first [`OrderRejection`] that applies, in the order listed in
/// the module docs.
pub fn validate(draft: &OrderDraft, size: Dimensions) -> Result<OrderSpec, OrderRejection> {
    if !is_positive(size.width) {
        return Err(OrderRejection::InvalidWidth);
    }
    if !is_positive(size.height) {
        return Err(OrderRejection::InvalidHeight);
    }

    let thickness = draft.glass_thickness.trim();
    if thickness.is_empty() {
        return Err(OrderRejection::MissingThickness);
    }
    let finish = draft.glass_finish.trim();
    if finish.is_empty() {
        return Err(OrderRejection::MissingFinish);
    }

    let glass_thickness = thickness
        .parse::<GlassThickness>()
        .map_err(|_| OrderRejection::UnsupportedThickness(thickness.to_owned()))?;
    let glass_finish = finish
        .parse::<GlassFinish>()
        .map_err(|_| OrderRejection::UnsupportedFinish(finish.to_owned()))?;

    Ok(OrderSpec {
        glass_thickness,
        glass_finish,
        tempering: draft.tempering,
        dfi_coating: draft.dfi_coating,
        width: size.width,
        height: size.height,
        quantity: coerce_quantity(draft.quantity.as_ref()),
        notes: non_blank(draft.notes.as_deref()),
        image_url: non_blank(draft.image_url.as_deref()),
    })
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Sheets requested; defaults to one.
fn coerce_quantity(raw: Option<&Value>) -> i32 {
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed
        .filter(|&n| n >= 1)
        .and_then(|n| i32::try_from(n).ok())
        .unwrap_or(1)
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
