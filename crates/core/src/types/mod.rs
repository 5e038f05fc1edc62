//! Core types for GlassSpire.
//!
//! Type-safe wrappers and enums shared by every crate in the workspace.

pub mod email;
pub mod glass;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use glass::{GlassFinish, GlassThickness};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use status::*;
