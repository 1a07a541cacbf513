//! Plate logic module
//!
//! Pure reconciliation and aggregation over saved plate entries and the
//! per-date catalog.

pub mod aggregate;
pub mod reconcile;

pub use aggregate::{aggregate, PlateTotals};
pub use reconcile::{reconcile, PlateEntry};
