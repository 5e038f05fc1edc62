//! GlassSpire Core - Domain types and order rules.
//!
//! This crate holds everything the GlassSpire server and CLI agree on:
//! - the records stored for users, orders, messages and subscriptions
//! - the rules for accepting, advancing and displaying glass orders
//! - account, messaging and subscription checks
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no clock. Callers pass the acting user and the current
//! time explicitly. Enabling the `postgres` feature derives the `sqlx`
//! encodings for the stored types.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, emails, prices, glass options and statuses
//! - [`models`] - Stored records
//! - [`dimensions`] - Size entry to canonical inches
//! - [`validation`] - Order form checks
//! - [`lifecycle`] - Order status transitions
//! - [`aggregate`] - Orders joined with their details
//! - [`account`], [`access`], [`messaging`], [`payment`], [`subscription`]

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod account;
pub mod aggregate;
pub mod dimensions;
mod form;
pub mod lifecycle;
pub mod messaging;
pub mod models;
pub mod payment;
pub mod subscription;
pub mod types;
pub mod validation;

pub use types::*;
