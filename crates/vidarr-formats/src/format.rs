// SPDX-License-Identifier: GPL-3.0-or-later

//! Custom formats: named, ordered tag lists and their evaluation.
//!
//! A format matches a release when all of its absolutely-required tags match
//! and at least one tag overall matches. Tag order carries no semantics;
//! uniqueness of the tag set as a whole is enforced by the catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vidarr_domain::{CustomFormatId, ParsedReleaseInfo, Validate, ValidationError};

use crate::tag::{FormatDefinitionError, FormatTag, TagType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFormat {
    pub id: CustomFormatId,
    pub name: String,
    pub tags: Vec<FormatTag>,
}

impl CustomFormat {
    pub fn new(name: impl Into<String>, tags: Vec<FormatTag>) -> Self {
        Self {
            id: CustomFormatId::new(),
            name: name.into(),
            tags,
        }
    }

    /// Build a format by parsing raw tag tokens, the shape definitions take
    /// in configuration and at the API boundary.
    pub fn parse(
        name: impl Into<String>,
        raw_tags: &[impl AsRef<str>],
    ) -> Result<Self, FormatDefinitionError> {
        let tags = raw_tags
            .iter()
            .map(|raw| FormatTag::parse(raw.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(name, tags))
    }

    /// Normalized view of the tag set, used to detect formats that duplicate
    /// another format's conditions under a different name.
    pub fn tag_set_key(&self) -> Vec<String> {
        let mut key: Vec<String> = self
            .tags
            .iter()
            .map(|tag| tag.raw().to_lowercase())
            .collect();
        key.sort();
        key.dedup();
        key
    }
}

impl Validate for CustomFormat {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(ValidationError {
                field: "name",
                message: "name cannot be empty".into(),
            });
        }
        if self.tags.is_empty() {
            errors.push(ValidationError {
                field: "tags",
                message: "a custom format requires at least one tag".into(),
            });
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Per-tag results for one [`TagType`] group, kept for diagnostics: the
/// format-test surface shows users which of their tags hit and which did not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagGroupMatches {
    pub tag_type: TagType,
    /// Raw tag token to whether it matched.
    pub matches: BTreeMap<String, bool>,
}

impl TagGroupMatches {
    pub fn did_match(&self) -> bool {
        self.matches.values().all(|matched| *matched)
    }
}

/// Outcome of evaluating one format against one release snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatEvaluation {
    pub format_id: CustomFormatId,
    pub format_name: String,
    pub did_match: bool,
    pub groups: Vec<TagGroupMatches>,
}

/// Evaluate every tag of `format` against `info`. Never fails: absent or
/// unparsed metadata fields simply leave tags unmatched.
///
/// The format matches when all required tags match and at least one tag
/// overall matches. Optional tags never veto a match on their own; they only
/// fail the format when nothing at all matched.
pub fn evaluate(format: &CustomFormat, info: &ParsedReleaseInfo) -> FormatEvaluation {
    let results: Vec<(&FormatTag, bool)> = format
        .tags
        .iter()
        .map(|tag| (tag, tag.matches(info)))
        .collect();

    let required_satisfied = results
        .iter()
        .filter(|(tag, _)| tag.is_required())
        .all(|(_, matched)| *matched);
    let any_matched = results.iter().any(|(_, matched)| *matched);

    let mut groups: Vec<TagGroupMatches> = Vec::new();
    for (tag, matched) in &results {
        match groups
            .iter_mut()
            .find(|group| group.tag_type == tag.tag_type())
        {
            Some(group) => {
                group.matches.insert(tag.raw().to_string(), *matched);
            }
            None => groups.push(TagGroupMatches {
                tag_type: tag.tag_type(),
                matches: BTreeMap::from([(tag.raw().to_string(), *matched)]),
            }),
        }
    }

    FormatEvaluation {
        format_id: format.id,
        format_name: format.name.clone(),
        did_match: required_satisfied && any_matched,
        groups,
    }
}
