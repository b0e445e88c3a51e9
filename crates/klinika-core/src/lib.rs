//! # klinika-core: Pure Domain Logic
//!
//! This crate is the heart of the clinic backend. It contains domain
//! types and validation as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Frontend (typed forms, via ts-rs)            │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │ HTTP JSON-RPC
//! ┌──────────────────────────────▼──────────────────────────────┐
//! │                 apps/server (axum handlers)                 │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │
//! ┌──────────────────────────────▼──────────────────────────────┐
//! │             ★ klinika-core (THIS CRATE) ★                   │
//! │                                                             │
//! │   types      money       inputs       validation            │
//! │   Patient    Money       CreateSale   rules                 │
//! │   Sale       (cents)     CreateBill   checks                │
//! │                                                             │
//! │   NO I/O - NO DATABASE - NO NETWORK - PURE FUNCTIONS        │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │
//! ┌──────────────────────────────▼──────────────────────────────┐
//! │              klinika-db (SQLite repositories)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: deterministic, no side effects
//! 2. **No I/O**: database, network, and file access are forbidden here
//! 3. **Integer money**: all monetary values are cents (i64), never floats
//! 4. **Explicit errors**: typed error enums, never strings or panics

pub mod error;
pub mod inputs;
pub mod money;
pub mod types;
pub mod validation;

pub use error::{ValidationError, ValidationResult};
pub use inputs::*;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of lines on a single sale, bill, or prescription.
/// Keeps a single request bounded; real clinic transactions are far
/// smaller.
pub const MAX_LINE_ITEMS: usize = 100;

/// Maximum quantity on a single line.
/// Guards against a typo like 1000 instead of 10 on a form.
pub const MAX_ITEM_QUANTITY: i64 = 999;
