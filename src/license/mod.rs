//! License identity resolution.
//!
//! - [`version`] — decides whether the aggregated dependency family is in its
//!   granular (per-component) licensing regime.
//! - [`known`] — canonical names for well-known license URLs.
//! - [`overrides`] — curated substitutes for dependencies whose descriptors
//!   declare no license.

pub mod known;
pub mod overrides;
pub mod version;
