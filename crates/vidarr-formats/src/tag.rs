// SPDX-License-Identifier: GPL-3.0-or-later

//! The format tag grammar and per-tag matcher.
//!
//! A tag is one atomic condition inside a custom format, written as a short
//! string token: `R_1080` (resolution), `S_BLURAY` (source), `E_RX_\bimax\b`
//! (edition regex), `C_RQ_Surround` (required custom text), `G_10<>20` (size
//! range in gigabytes), `L_French` (language). Tokens are parsed once when a
//! format is defined; a malformed token is a [`FormatDefinitionError`] at that
//! boundary, never an evaluation-time failure.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use vidarr_domain::{Language, ParsedReleaseInfo, Resolution, Source};

const BYTES_PER_GIGABYTE: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Error)]
pub enum FormatDefinitionError {
    #[error("Format Tag '{0}' is in an invalid format!")]
    UnrecognizedTag(String),
    #[error("Format Tag '{raw}' has an unknown {kind} value '{value}'")]
    UnknownValue {
        raw: String,
        kind: &'static str,
        value: String,
    },
    #[error("Format Tag '{raw}' has an invalid pattern: {source}")]
    InvalidPattern {
        raw: String,
        #[source]
        source: Box<regex::Error>,
    },
    #[error("Format Tag '{raw}' has an invalid size range")]
    InvalidSizeRange { raw: String },
}

/// Which release property a tag inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    Resolution,
    Source,
    Edition,
    Custom,
    Size,
    Language,
}

impl std::fmt::Display for TagType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagType::Resolution => write!(f, "resolution"),
            TagType::Source => write!(f, "source"),
            TagType::Edition => write!(f, "edition"),
            TagType::Custom => write!(f, "custom"),
            TagType::Size => write!(f, "size"),
            TagType::Language => write!(f, "language"),
        }
    }
}

/// Modifier letters parsed out of the token prefix, kept as explicit flags.
///
/// `RX` makes the value a regex pattern, `N` inverts the match, and `RQ`
/// marks the tag as absolutely required: the owning format cannot match
/// unless this tag does, independent of its other tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagModifiers {
    pub regex: bool,
    pub negate: bool,
    pub required: bool,
}

/// The typed value a tag compares against.
#[derive(Debug, Clone)]
pub enum TagValue {
    Resolution(Resolution),
    Source(Source),
    Language(Language),
    /// Lowercased literal for case-insensitive substring matching.
    Literal(String),
    /// Pattern compiled case-insensitively once at definition time.
    Pattern(Regex),
    /// Inclusive byte range.
    SizeRange { min_bytes: u64, max_bytes: u64 },
}

impl PartialEq for TagValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TagValue::Resolution(a), TagValue::Resolution(b)) => a == b,
            (TagValue::Source(a), TagValue::Source(b)) => a == b,
            (TagValue::Language(a), TagValue::Language(b)) => a == b,
            (TagValue::Literal(a), TagValue::Literal(b)) => a == b,
            (TagValue::Pattern(a), TagValue::Pattern(b)) => a.as_str() == b.as_str(),
            (
                TagValue::SizeRange {
                    min_bytes: a_min,
                    max_bytes: a_max,
                },
                TagValue::SizeRange {
                    min_bytes: b_min,
                    max_bytes: b_max,
                },
            ) => a_min == b_min && a_max == b_max,
            _ => false,
        }
    }
}

impl Eq for TagValue {}

/// One parsed, immutable format tag. Constructed via [`FormatTag::parse`];
/// the raw token always re-parses to an equal tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTag {
    raw: String,
    tag_type: TagType,
    modifiers: TagModifiers,
    value: TagValue,
}

lazy_static! {
    static ref TAG_REGEX: Regex = Regex::new(
        r"(?i)^(?P<type>R|S|E|L|C|G)(_((?P<m_rx>RX)|(?P<m_rq>RQ)|(?P<m_n>N)){0,3})?_(?P<value>.*)$"
    )
    .expect("valid tag grammar regex");
    static ref SIZE_RANGE_REGEX: Regex =
        Regex::new(r"^(?P<min>\d+(\.\d+)?)\s*<>\s*(?P<max>\d+(\.\d+)?)$")
            .expect("valid size range regex");
}

impl FormatTag {
    /// Parse a raw token into a typed tag. Pure and deterministic; fails only
    /// on grammar violations (unknown prefix, unknown enum name, bad pattern,
    /// malformed size range). A doubled underscore after the prefix is
    /// accepted as a single separator: `R__1080` parses like `R_1080`.
    pub fn parse(raw: &str) -> Result<Self, FormatDefinitionError> {
        let captures = TAG_REGEX
            .captures(raw)
            .ok_or_else(|| FormatDefinitionError::UnrecognizedTag(raw.to_string()))?;

        let modifiers = TagModifiers {
            regex: captures.name("m_rx").is_some(),
            required: captures.name("m_rq").is_some(),
            negate: captures.name("m_n").is_some(),
        };

        let type_letter = captures["type"].to_lowercase();
        let value_raw = &captures["value"];
        let value = value_raw.to_lowercase();

        let (tag_type, tag_value) = match type_letter.as_str() {
            "r" => (
                TagType::Resolution,
                TagValue::Resolution(Resolution::from_tag_value(&value).ok_or_else(|| {
                    FormatDefinitionError::UnknownValue {
                        raw: raw.to_string(),
                        kind: "resolution",
                        value: value.clone(),
                    }
                })?),
            ),
            "s" => (
                TagType::Source,
                TagValue::Source(Source::from_tag_value(&value).ok_or_else(|| {
                    FormatDefinitionError::UnknownValue {
                        raw: raw.to_string(),
                        kind: "source",
                        value: value.clone(),
                    }
                })?),
            ),
            "l" => (
                TagType::Language,
                TagValue::Language(Language::from_tag_value(&value).ok_or_else(|| {
                    FormatDefinitionError::UnknownValue {
                        raw: raw.to_string(),
                        kind: "language",
                        value: value.clone(),
                    }
                })?),
            ),
            "e" => (
                TagType::Edition,
                Self::parse_text_value(raw, value_raw, modifiers)?,
            ),
            "c" => (
                TagType::Custom,
                Self::parse_text_value(raw, value_raw, modifiers)?,
            ),
            "g" => (TagType::Size, Self::parse_size_value(raw, &value)?),
            _ => return Err(FormatDefinitionError::UnrecognizedTag(raw.to_string())),
        };

        Ok(Self {
            raw: raw.to_string(),
            tag_type,
            modifiers,
            value: tag_value,
        })
    }

    fn parse_text_value(
        raw: &str,
        value_raw: &str,
        modifiers: TagModifiers,
    ) -> Result<TagValue, FormatDefinitionError> {
        if modifiers.regex {
            // The pattern keeps its original casing; case-insensitivity comes
            // from the builder flag, not from rewriting escape classes.
            let pattern = RegexBuilder::new(value_raw)
                .case_insensitive(true)
                .build()
                .map_err(|source| FormatDefinitionError::InvalidPattern {
                    raw: raw.to_string(),
                    source: Box::new(source),
                })?;
            Ok(TagValue::Pattern(pattern))
        } else {
            Ok(TagValue::Literal(value_raw.to_lowercase()))
        }
    }

    fn parse_size_value(raw: &str, value: &str) -> Result<TagValue, FormatDefinitionError> {
        let captures = SIZE_RANGE_REGEX
            .captures(value)
            .ok_or_else(|| FormatDefinitionError::InvalidSizeRange {
                raw: raw.to_string(),
            })?;

        let min: f64 = captures["min"]
            .parse()
            .map_err(|_| FormatDefinitionError::InvalidSizeRange {
                raw: raw.to_string(),
            })?;
        let max: f64 = captures["max"]
            .parse()
            .map_err(|_| FormatDefinitionError::InvalidSizeRange {
                raw: raw.to_string(),
            })?;

        if min > max {
            return Err(FormatDefinitionError::InvalidSizeRange {
                raw: raw.to_string(),
            });
        }

        Ok(TagValue::SizeRange {
            min_bytes: (min * BYTES_PER_GIGABYTE).round() as u64,
            max_bytes: (max * BYTES_PER_GIGABYTE).round() as u64,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn tag_type(&self) -> TagType {
        self.tag_type
    }

    pub fn modifiers(&self) -> TagModifiers {
        self.modifiers
    }

    pub fn value(&self) -> &TagValue {
        &self.value
    }

    pub fn is_required(&self) -> bool {
        self.modifiers.required
    }

    /// Evaluate this tag against a release snapshot. Absent metadata fields
    /// make the underlying condition false; the `N` modifier then inverts
    /// the final result.
    pub fn matches(&self, info: &ParsedReleaseInfo) -> bool {
        let matched = self.matches_without_modifiers(info);
        if self.modifiers.negate {
            !matched
        } else {
            matched
        }
    }

    fn matches_without_modifiers(&self, info: &ParsedReleaseInfo) -> bool {
        match (&self.tag_type, &self.value) {
            (TagType::Resolution, TagValue::Resolution(resolution)) => {
                info.quality.resolution == *resolution
            }
            (TagType::Source, TagValue::Source(source)) => info.quality.source == *source,
            (TagType::Language, TagValue::Language(language)) => {
                info.languages.contains(language)
            }
            (TagType::Edition, value) => match info.edition.as_deref() {
                Some(edition) if !edition.trim().is_empty() => Self::matches_text(value, edition),
                _ => false,
            },
            (TagType::Custom, value) => {
                Self::matches_text(value, &info.simple_release_title)
                    || info
                        .filename
                        .as_deref()
                        .is_some_and(|filename| Self::matches_text(value, filename))
            }
            (
                TagType::Size,
                TagValue::SizeRange {
                    min_bytes,
                    max_bytes,
                },
            ) => info.size_bytes > 0 && (*min_bytes..=*max_bytes).contains(&info.size_bytes),
            // Unreachable for tags built by `parse`; value and type always agree.
            _ => false,
        }
    }

    fn matches_text(value: &TagValue, text: &str) -> bool {
        match value {
            TagValue::Pattern(pattern) => pattern.is_match(text),
            TagValue::Literal(literal) => {
                text.to_lowercase().contains(&literal.replace(' ', ""))
            }
            _ => false,
        }
    }
}

// Tags persist as their raw token; compiled state is rebuilt on load.
impl Serialize for FormatTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for FormatTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        FormatTag::parse(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidarr_domain::QualityModel;

    fn release(resolution: Resolution, source: Source) -> ParsedReleaseInfo {
        ParsedReleaseInfo {
            quality: QualityModel::new(resolution, source),
            ..ParsedReleaseInfo::new("Movie.Title.2020.1080p.BluRay.x264-GROUP")
        }
    }

    #[test]
    fn parses_resolution_tag() {
        let tag = FormatTag::parse("R_1080").unwrap();
        assert_eq!(tag.tag_type(), TagType::Resolution);
        assert_eq!(tag.value(), &TagValue::Resolution(Resolution::R1080p));
        assert_eq!(tag.modifiers(), TagModifiers::default());
    }

    #[test]
    fn parses_source_tag_case_insensitively() {
        let tag = FormatTag::parse("s_BLURAY").unwrap();
        assert_eq!(tag.tag_type(), TagType::Source);
        assert_eq!(tag.value(), &TagValue::Source(Source::Bluray));
    }

    #[test]
    fn double_underscore_is_tolerated() {
        let strict = FormatTag::parse("R_1080").unwrap();
        let lenient = FormatTag::parse("R__1080").unwrap();
        assert_eq!(strict.tag_type(), lenient.tag_type());
        assert_eq!(strict.value(), lenient.value());
        assert_eq!(strict.modifiers(), lenient.modifiers());
    }

    #[test]
    fn parses_modifier_letters_in_any_order() {
        let tag = FormatTag::parse("E_RXN_pattern").unwrap();
        assert!(tag.modifiers().regex);
        assert!(tag.modifiers().negate);
        assert!(!tag.modifiers().required);

        let reversed = FormatTag::parse("E_NRX_pattern").unwrap();
        assert_eq!(tag.modifiers(), reversed.modifiers());
    }

    #[test]
    fn parses_required_custom_tag() {
        let tag = FormatTag::parse("C_RQ_Surround").unwrap();
        assert_eq!(tag.tag_type(), TagType::Custom);
        assert!(tag.is_required());
        assert_eq!(tag.value(), &TagValue::Literal("surround".to_string()));
    }

    #[test]
    fn parse_is_deterministic_and_idempotent() {
        for raw in ["R_1080", "S_webdl", "E_RX_\\bimax\\b", "C_RQN_hdr", "G_10<>20", "L_French"] {
            let first = FormatTag::parse(raw).unwrap();
            let second = FormatTag::parse(first.raw()).unwrap();
            assert_eq!(first, second, "re-parsing {} diverged", raw);
        }
    }

    #[test]
    fn size_tag_parses_gigabyte_bounds() {
        let tag = FormatTag::parse("G_10<>20").unwrap();
        assert_eq!(
            tag.value(),
            &TagValue::SizeRange {
                min_bytes: 10_737_418_240,
                max_bytes: 21_474_836_480,
            }
        );
    }

    #[test]
    fn size_tag_rounds_fractional_gigabytes() {
        let tag = FormatTag::parse("G_15.55<>20").unwrap();
        assert_eq!(
            tag.value(),
            &TagValue::SizeRange {
                min_bytes: 16_696_685_363,
                max_bytes: 21_474_836_480,
            }
        );
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(matches!(
            FormatTag::parse("X_1080"),
            Err(FormatDefinitionError::UnrecognizedTag(_))
        ));
        assert!(matches!(
            FormatTag::parse("R1080"),
            Err(FormatDefinitionError::UnrecognizedTag(_))
        ));
        assert!(matches!(
            FormatTag::parse(""),
            Err(FormatDefinitionError::UnrecognizedTag(_))
        ));
    }

    #[test]
    fn rejects_unknown_enum_names() {
        assert!(matches!(
            FormatTag::parse("R_1081"),
            Err(FormatDefinitionError::UnknownValue { kind: "resolution", .. })
        ));
        assert!(matches!(
            FormatTag::parse("S_betamax"),
            Err(FormatDefinitionError::UnknownValue { kind: "source", .. })
        ));
        assert!(matches!(
            FormatTag::parse("L_klingon"),
            Err(FormatDefinitionError::UnknownValue { kind: "language", .. })
        ));
    }

    #[test]
    fn rejects_bad_patterns_and_size_ranges() {
        assert!(matches!(
            FormatTag::parse("C_RX_[unclosed"),
            Err(FormatDefinitionError::InvalidPattern { .. })
        ));
        assert!(matches!(
            FormatTag::parse("G_10"),
            Err(FormatDefinitionError::InvalidSizeRange { .. })
        ));
        assert!(matches!(
            FormatTag::parse("G_20<>10"),
            Err(FormatDefinitionError::InvalidSizeRange { .. })
        ));
    }

    #[test]
    fn resolution_tag_matches_by_equality() {
        let tag = FormatTag::parse("R_1080").unwrap();
        assert!(tag.matches(&release(Resolution::R1080p, Source::Bluray)));
        assert!(!tag.matches(&release(Resolution::R720p, Source::Bluray)));
        assert!(!tag.matches(&release(Resolution::Unknown, Source::Bluray)));
    }

    #[test]
    fn negated_resolution_tag_inverts() {
        let tag = FormatTag::parse("R_N_1080").unwrap();
        assert!(!tag.matches(&release(Resolution::R1080p, Source::Bluray)));
        assert!(tag.matches(&release(Resolution::R720p, Source::Bluray)));
    }

    #[test]
    fn custom_literal_matches_simple_title() {
        let tag = FormatTag::parse("C_x264").unwrap();
        let mut info = release(Resolution::R1080p, Source::Bluray);
        info.simple_release_title = "movie title 2020 1080p bluray x264-group".to_string();
        assert!(tag.matches(&info));

        info.simple_release_title = "movie title 2020 1080p bluray x265-group".to_string();
        assert!(!tag.matches(&info));
    }

    #[test]
    fn custom_literal_spaces_are_stripped_for_matching() {
        let tag = FormatTag::parse("C_x 264").unwrap();
        let mut info = release(Resolution::R1080p, Source::Bluray);
        info.simple_release_title = "movie 1080p x264-group".to_string();
        assert!(tag.matches(&info));
    }

    #[test]
    fn custom_tag_falls_back_to_filename() {
        let tag = FormatTag::parse("C_proper").unwrap();
        let mut info = release(Resolution::R1080p, Source::Bluray);
        info.simple_release_title = "movie title 2020".to_string();
        info.filename = Some("Movie.Title.2020.PROPER.mkv".to_string());
        assert!(tag.matches(&info));
    }

    #[test]
    fn edition_regex_tag_matches_case_insensitively() {
        let tag = FormatTag::parse("E_RX_\\bimax\\b").unwrap();
        let mut info = release(Resolution::R1080p, Source::Bluray);
        info.edition = Some("IMAX".to_string());
        assert!(tag.matches(&info));

        info.edition = Some("imaxish".to_string());
        assert!(!tag.matches(&info));
    }

    #[test]
    fn empty_edition_never_matches_positive_tag() {
        let tag = FormatTag::parse("E_extended").unwrap();
        let mut info = release(Resolution::R1080p, Source::Bluray);
        info.edition = None;
        assert!(!tag.matches(&info));
        info.edition = Some(String::new());
        assert!(!tag.matches(&info));

        // ...but a negated edition tag does, since the condition is absent.
        let negated = FormatTag::parse("E_N_extended").unwrap();
        info.edition = None;
        assert!(negated.matches(&info));
    }

    #[test]
    fn size_tag_is_inclusive_and_ignores_zero_size() {
        let tag = FormatTag::parse("G_10<>20").unwrap();
        let mut info = release(Resolution::R1080p, Source::Bluray);

        info.size_bytes = 10_737_418_240;
        assert!(tag.matches(&info));
        info.size_bytes = 21_474_836_480;
        assert!(tag.matches(&info));
        info.size_bytes = 21_474_836_481;
        assert!(!tag.matches(&info));
        info.size_bytes = 0;
        assert!(!tag.matches(&info));
    }

    #[test]
    fn language_tag_checks_containment() {
        let tag = FormatTag::parse("L_French").unwrap();
        let mut info = release(Resolution::R1080p, Source::Bluray);
        info.languages = vec![Language::English, Language::French];
        assert!(tag.matches(&info));

        info.languages = vec![Language::English];
        assert!(!tag.matches(&info));
    }

    #[test]
    fn serde_round_trips_through_raw_token() {
        let tag = FormatTag::parse("C_RQ_Surround").unwrap();
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, "\"C_RQ_Surround\"");
        let back: FormatTag = serde_json::from_str(&json).unwrap();
        assert_eq!(tag, back);

        let bad: Result<FormatTag, _> = serde_json::from_str("\"X_nope\"");
        assert!(bad.is_err());
    }
}
