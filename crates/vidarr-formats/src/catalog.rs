// SPDX-License-Identifier: GPL-3.0-or-later

//! The custom format catalog: the installation-wide set of definitions.
//!
//! All definition-time validation happens here, at the create/update
//! boundary, so evaluation-time code can assume every tag it sees is
//! well-formed. The catalog is an in-memory snapshot; callers snapshot it
//! once per scan or search cycle and share it freely across threads.

use thiserror::Error;
use tracing::{info, warn};
use vidarr_domain::{CustomFormatId, Validate, ValidationError};

use crate::format::CustomFormat;
use crate::profile::{FormatProfile, ProfileFormatItem};
use crate::tag::FormatDefinitionError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Definition(#[from] FormatDefinitionError),
    #[error("custom format is invalid: {}", format_messages(.0))]
    Invalid(Vec<ValidationError>),
    #[error("a custom format named '{0}' already exists")]
    DuplicateName(String),
    #[error("custom format '{first}' has the same tag set as '{second}'")]
    DuplicateTagSet { first: String, second: String },
    #[error("no custom format with id {0}")]
    UnknownFormat(CustomFormatId),
}

fn format_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|error| format!("{}: {}", error.field, error.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Default)]
pub struct FormatCatalog {
    formats: Vec<CustomFormat>,
}

impl FormatCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[CustomFormat] {
        &self.formats
    }

    pub fn get(&self, id: CustomFormatId) -> Option<&CustomFormat> {
        self.formats.iter().find(|format| format.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&CustomFormat> {
        self.formats
            .iter()
            .find(|format| format.name.eq_ignore_ascii_case(name))
    }

    pub fn ids(&self) -> Vec<CustomFormatId> {
        self.formats.iter().map(|format| format.id).collect()
    }

    /// Owned snapshot for a batch evaluation cycle.
    pub fn snapshot(&self) -> Vec<CustomFormat> {
        self.formats.clone()
    }

    pub fn insert(&mut self, format: CustomFormat) -> Result<CustomFormatId, CatalogError> {
        self.check_definition(&format, None)?;
        let id = format.id;
        info!(target: "formats", name = %format.name, %id, "custom format added");
        self.formats.push(format);
        Ok(id)
    }

    pub fn update(&mut self, format: CustomFormat) -> Result<(), CatalogError> {
        let index = self
            .formats
            .iter()
            .position(|existing| existing.id == format.id)
            .ok_or(CatalogError::UnknownFormat(format.id))?;
        self.check_definition(&format, Some(format.id))?;
        info!(target: "formats", name = %format.name, id = %format.id, "custom format updated");
        self.formats[index] = format;
        Ok(())
    }

    pub fn delete(&mut self, id: CustomFormatId) -> Result<CustomFormat, CatalogError> {
        let index = self
            .formats
            .iter()
            .position(|format| format.id == id)
            .ok_or(CatalogError::UnknownFormat(id))?;
        let removed = self.formats.remove(index);
        info!(target: "formats", name = %removed.name, %id, "custom format deleted");
        Ok(removed)
    }

    fn check_definition(
        &self,
        format: &CustomFormat,
        skip_id: Option<CustomFormatId>,
    ) -> Result<(), CatalogError> {
        format.validate().map_err(CatalogError::Invalid)?;

        let others = self
            .formats
            .iter()
            .filter(|existing| Some(existing.id) != skip_id);
        for existing in others {
            if existing.name.eq_ignore_ascii_case(&format.name) {
                return Err(CatalogError::DuplicateName(existing.name.clone()));
            }
            if existing.tag_set_key() == format.tag_set_key() {
                return Err(CatalogError::DuplicateTagSet {
                    first: format.name.clone(),
                    second: existing.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Add a freshly inserted format to every profile, least preferred and not
/// allowed, keeping each profile's items covering the catalog exactly once.
pub fn attach_format_to_profiles(format_id: CustomFormatId, profiles: &mut [FormatProfile]) {
    for profile in profiles.iter_mut() {
        if profile.contains(format_id) {
            warn!(
                target: "formats",
                profile = %profile.name,
                %format_id,
                "profile already references format; skipping attach"
            );
            continue;
        }
        profile.format_items.insert(
            0,
            ProfileFormatItem {
                format_id,
                allowed: false,
            },
        );
    }
}

/// Strip a deleted format out of every profile's items list.
pub fn detach_format_from_profiles(format_id: CustomFormatId, profiles: &mut [FormatProfile]) {
    for profile in profiles.iter_mut() {
        profile
            .format_items
            .retain(|item| item.format_id != format_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with(names_and_tags: &[(&str, &[&str])]) -> FormatCatalog {
        let mut catalog = FormatCatalog::new();
        for (name, tags) in names_and_tags {
            let format = CustomFormat::parse(*name, tags).unwrap();
            catalog.insert(format).unwrap();
        }
        catalog
    }

    #[test]
    fn insert_and_lookup() {
        let catalog = catalog_with(&[("HD", &["R_1080"]), ("4K", &["R_2160"])]);
        assert_eq!(catalog.all().len(), 2);
        assert!(catalog.find_by_name("hd").is_some());
        let id = catalog.find_by_name("4K").unwrap().id;
        assert_eq!(catalog.get(id).unwrap().name, "4K");
    }

    #[test]
    fn rejects_duplicate_names_case_insensitively() {
        let mut catalog = catalog_with(&[("HD", &["R_1080"])]);
        let duplicate = CustomFormat::parse("hd", &["R_720"]).unwrap();
        assert!(matches!(
            catalog.insert(duplicate),
            Err(CatalogError::DuplicateName(_))
        ));
    }

    #[test]
    fn rejects_duplicate_tag_sets() {
        let mut catalog = catalog_with(&[("HD", &["R_1080", "S_BLURAY"])]);
        let duplicate = CustomFormat::parse("Other", &["s_bluray", "R_1080"]).unwrap();
        assert!(matches!(
            catalog.insert(duplicate),
            Err(CatalogError::DuplicateTagSet { .. })
        ));
    }

    #[test]
    fn rejects_empty_tag_list_at_insert() {
        let mut catalog = FormatCatalog::new();
        let empty = CustomFormat::new("Empty", vec![]);
        assert!(matches!(catalog.insert(empty), Err(CatalogError::Invalid(_))));
    }

    #[test]
    fn update_replaces_definition_and_keeps_validation() {
        let mut catalog = catalog_with(&[("HD", &["R_1080"]), ("4K", &["R_2160"])]);
        let id = catalog.find_by_name("HD").unwrap().id;

        let mut updated = CustomFormat::parse("HD Bluray", &["R_1080", "S_BLURAY"]).unwrap();
        updated.id = id;
        catalog.update(updated).unwrap();
        assert_eq!(catalog.get(id).unwrap().name, "HD Bluray");

        // Colliding with the other format's name still fails.
        let mut collides = CustomFormat::parse("4k", &["R_720"]).unwrap();
        collides.id = id;
        assert!(matches!(
            catalog.update(collides),
            Err(CatalogError::DuplicateName(_))
        ));
    }

    #[test]
    fn delete_unknown_id_fails() {
        let mut catalog = FormatCatalog::new();
        assert!(matches!(
            catalog.delete(CustomFormatId::new()),
            Err(CatalogError::UnknownFormat(_))
        ));
    }

    #[test]
    fn attach_prepends_least_preferred_disallowed_item() {
        let catalog = catalog_with(&[("HD", &["R_1080"])]);
        let existing = catalog.find_by_name("HD").unwrap().id;

        let mut profile = FormatProfile::new("default");
        profile.format_items = vec![ProfileFormatItem {
            format_id: existing,
            allowed: true,
        }];
        let mut profiles = vec![profile];

        let new_id = CustomFormatId::new();
        attach_format_to_profiles(new_id, &mut profiles);

        assert_eq!(profiles[0].format_items[0].format_id, new_id);
        assert!(!profiles[0].format_items[0].allowed);
        // The pre-existing item keeps its higher rank.
        assert_eq!(profiles[0].rank_of(existing), Some(1));

        let mut ids = catalog.ids();
        ids.push(new_id);
        assert!(profiles[0].validate_covers(&ids).is_ok());
    }

    #[test]
    fn detach_restores_covering_invariant_after_delete() {
        let mut catalog = catalog_with(&[("HD", &["R_1080"]), ("4K", &["R_2160"])]);
        let doomed = catalog.find_by_name("4K").unwrap().id;
        let kept = catalog.find_by_name("HD").unwrap().id;

        let mut profile = FormatProfile::new("default");
        profile.format_items = vec![
            ProfileFormatItem { format_id: doomed, allowed: true },
            ProfileFormatItem { format_id: kept, allowed: true },
        ];
        let mut profiles = vec![profile];

        catalog.delete(doomed).unwrap();
        detach_format_from_profiles(doomed, &mut profiles);

        assert!(profiles[0].validate_covers(&catalog.ids()).is_ok());
        assert_eq!(profiles[0].rank_of(kept), Some(0));
    }
}
