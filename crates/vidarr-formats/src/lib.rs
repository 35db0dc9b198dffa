// SPDX-License-Identifier: GPL-3.0-or-later

//! Custom format matching and ranking.
//!
//! The engine is pure and synchronous: catalogs and profiles are read-only
//! snapshots per call, evaluation allocates only local state, and nothing
//! blocks, so whole release batches can be evaluated concurrently without
//! locking.

pub mod calculation;
pub mod catalog;
pub mod comparer;
pub mod format;
pub mod profile;
pub mod tag;

pub use calculation::{match_format_tags, matching_formats};
pub use catalog::{
    attach_format_to_profiles, detach_format_from_profiles, CatalogError, FormatCatalog,
};
pub use comparer::compare_formats;
pub use format::{evaluate, CustomFormat, FormatEvaluation, TagGroupMatches};
pub use profile::{FormatProfile, ProfileFormatItem};
pub use tag::{FormatDefinitionError, FormatTag, TagModifiers, TagType, TagValue};
