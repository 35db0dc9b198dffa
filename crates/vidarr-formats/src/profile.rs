// SPDX-License-Identifier: GPL-3.0-or-later

//! Profile-scoped format ranking.
//!
//! A profile carries an ordered list of `(format, allowed)` items. List index
//! is rank: index 0 is least preferred, the last index most preferred, which
//! mirrors the drag-reorder UI. Disallowed items keep their slot but never
//! contribute to comparisons.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use vidarr_domain::{CustomFormatId, ProfileId, Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFormatItem {
    pub format_id: CustomFormatId,
    pub allowed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatProfile {
    pub id: ProfileId,
    pub name: String,
    pub format_items: Vec<ProfileFormatItem>,
}

impl FormatProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProfileId::new(),
            name: name.into(),
            format_items: Vec::new(),
        }
    }

    /// Rank of an allowed format: its list index. `None` when the format is
    /// disallowed or not present in this profile at all.
    pub fn rank_of(&self, format_id: CustomFormatId) -> Option<usize> {
        self.format_items
            .iter()
            .position(|item| item.format_id == format_id)
            .filter(|&index| self.format_items[index].allowed)
    }

    /// Whether the profile knows this format at all, allowed or not.
    pub fn contains(&self, format_id: CustomFormatId) -> bool {
        self.format_items
            .iter()
            .any(|item| item.format_id == format_id)
    }

    /// Check the covering invariant: the items list mentions every known
    /// format exactly once, with no stragglers from deleted formats.
    pub fn validate_covers(
        &self,
        known_formats: &[CustomFormatId],
    ) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let known: HashSet<CustomFormatId> = known_formats.iter().copied().collect();
        let mut seen: HashSet<CustomFormatId> = HashSet::new();

        for item in &self.format_items {
            if !seen.insert(item.format_id) {
                errors.push(ValidationError {
                    field: "format_items",
                    message: format!("format {} appears more than once", item.format_id),
                });
            }
            if !known.contains(&item.format_id) {
                errors.push(ValidationError {
                    field: "format_items",
                    message: format!("format {} does not exist in the catalog", item.format_id),
                });
            }
        }
        for format_id in known_formats {
            if !seen.contains(format_id) {
                errors.push(ValidationError {
                    field: "format_items",
                    message: format!("format {} is missing from the profile", format_id),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Validate for FormatProfile {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(ValidationError {
                field: "name",
                message: "name cannot be empty".into(),
            });
        }
        let mut seen: HashSet<CustomFormatId> = HashSet::new();
        for item in &self.format_items {
            if !seen.insert(item.format_id) {
                errors.push(ValidationError {
                    field: "format_items",
                    message: format!("format {} appears more than once", item.format_id),
                });
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
