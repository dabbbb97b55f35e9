//! Core arithmetic for the `rata` calendar workspace.
//!
//! This crate holds the numeric machinery that the calendar and time-scale
//! conversions in `rata-time` are built from: floor-convention division in
//! several widths, fast residues modulo 7, and a normalized reciprocal
//! division (Granlund-Möller) usable on targets without a wide hardware
//! divider. Everything is a pure value-in / value-out function; there is no
//! global state, no allocation, and no platform dependency beyond fixed-width
//! integers.
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`math`] | Floor division, mod-7 reductions, Granlund-Möller steps |
//! | [`constants`] | Calendar cycle lengths shared across the workspace |
//! | [`errors`] | [`CalError`] and the [`CalResult`] alias |

pub mod constants;
pub mod errors;
pub mod math;

pub use errors::{CalError, CalResult};
