// SPDX-License-Identifier: GPL-3.0-or-later
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Value Objects & IDs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomFormatId(pub Uuid);

impl CustomFormatId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for CustomFormatId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CustomFormatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub Uuid);

impl ProfileId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Quality Enums
// ============================================================================

/// Vertical resolution of a release, as detected from its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    R2160p,
    R1080p,
    R720p,
    R576p,
    R480p,
    Unknown,
}

impl Resolution {
    pub const ALL: [Resolution; 5] = [
        Resolution::R2160p,
        Resolution::R1080p,
        Resolution::R720p,
        Resolution::R576p,
        Resolution::R480p,
    ];

    /// Look up a resolution by its tag value (the digits only, e.g. `1080`).
    pub fn from_tag_value(value: &str) -> Option<Self> {
        match value {
            "2160" => Some(Resolution::R2160p),
            "1080" => Some(Resolution::R1080p),
            "720" => Some(Resolution::R720p),
            "576" => Some(Resolution::R576p),
            "480" => Some(Resolution::R480p),
            _ => None,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::R2160p => write!(f, "2160p"),
            Resolution::R1080p => write!(f, "1080p"),
            Resolution::R720p => write!(f, "720p"),
            Resolution::R576p => write!(f, "576p"),
            Resolution::R480p => write!(f, "480p"),
            Resolution::Unknown => write!(f, "unknown"),
        }
    }
}

/// Where a release originated (disc rip, web download, broadcast capture...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cam,
    Telesync,
    Telecine,
    Workprint,
    Dvd,
    Tv,
    Webdl,
    Bluray,
    Unknown,
}

impl Source {
    pub const ALL: [Source; 8] = [
        Source::Cam,
        Source::Telesync,
        Source::Telecine,
        Source::Workprint,
        Source::Dvd,
        Source::Tv,
        Source::Webdl,
        Source::Bluray,
    ];

    /// Look up a source by its lowercased tag value (e.g. `bluray`).
    pub fn from_tag_value(value: &str) -> Option<Self> {
        match value {
            "cam" => Some(Source::Cam),
            "telesync" => Some(Source::Telesync),
            "telecine" => Some(Source::Telecine),
            "workprint" => Some(Source::Workprint),
            "dvd" => Some(Source::Dvd),
            "tv" => Some(Source::Tv),
            "webdl" => Some(Source::Webdl),
            "bluray" => Some(Source::Bluray),
            _ => None,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Cam => write!(f, "cam"),
            Source::Telesync => write!(f, "telesync"),
            Source::Telecine => write!(f, "telecine"),
            Source::Workprint => write!(f, "workprint"),
            Source::Dvd => write!(f, "dvd"),
            Source::Tv => write!(f, "tv"),
            Source::Webdl => write!(f, "webdl"),
            Source::Bluray => write!(f, "bluray"),
            Source::Unknown => write!(f, "unknown"),
        }
    }
}

/// Spoken/audio language advertised by a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    French,
    Spanish,
    German,
    Italian,
    Danish,
    Dutch,
    Japanese,
    Russian,
    Portuguese,
    Swedish,
    Norwegian,
    Finnish,
    Hindi,
    Korean,
    Chinese,
}

impl Language {
    /// Look up a language by its lowercased tag value (e.g. `french`).
    pub fn from_tag_value(value: &str) -> Option<Self> {
        match value {
            "english" => Some(Language::English),
            "french" => Some(Language::French),
            "spanish" => Some(Language::Spanish),
            "german" => Some(Language::German),
            "italian" => Some(Language::Italian),
            "danish" => Some(Language::Danish),
            "dutch" => Some(Language::Dutch),
            "japanese" => Some(Language::Japanese),
            "russian" => Some(Language::Russian),
            "portuguese" => Some(Language::Portuguese),
            "swedish" => Some(Language::Swedish),
            "norwegian" => Some(Language::Norwegian),
            "finnish" => Some(Language::Finnish),
            "hindi" => Some(Language::Hindi),
            "korean" => Some(Language::Korean),
            "chinese" => Some(Language::Chinese),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Language::English => "english",
            Language::French => "french",
            Language::Spanish => "spanish",
            Language::German => "german",
            Language::Italian => "italian",
            Language::Danish => "danish",
            Language::Dutch => "dutch",
            Language::Japanese => "japanese",
            Language::Russian => "russian",
            Language::Portuguese => "portuguese",
            Language::Swedish => "swedish",
            Language::Norwegian => "norwegian",
            Language::Finnish => "finnish",
            Language::Hindi => "hindi",
            Language::Korean => "korean",
            Language::Chinese => "chinese",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// Parsed Release Snapshot
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityModel {
    pub resolution: Resolution,
    pub source: Source,
}

impl QualityModel {
    pub fn new(resolution: Resolution, source: Source) -> Self {
        Self { resolution, source }
    }
}

impl Default for QualityModel {
    fn default() -> Self {
        Self {
            resolution: Resolution::Unknown,
            source: Source::Unknown,
        }
    }
}

/// Metadata parsed out of a single release or file, evaluated against custom
/// formats. This is a read-only value snapshot; the matching engine never
/// mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ParsedReleaseInfo {
    /// The release title exactly as the indexer or filesystem provided it.
    pub release_title: String,
    /// Lowercased title with separators and bracketed chunks stripped.
    pub simple_release_title: String,
    pub edition: Option<String>,
    pub quality: QualityModel,
    pub languages: Vec<Language>,
    pub size_bytes: u64,
    /// Present when the release under evaluation is a file on disk.
    pub filename: Option<String>,
}

impl ParsedReleaseInfo {
    pub fn new(release_title: impl Into<String>) -> Self {
        let release_title = release_title.into();
        Self {
            simple_release_title: release_title.to_lowercase(),
            release_title,
            edition: None,
            quality: QualityModel::default(),
            languages: Vec::new(),
            size_bytes: 0,
            filename: None,
        }
    }
}

// ============================================================================
// Domain Validation
// ============================================================================

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

pub trait Validate {
    fn validate(&self) -> Result<(), Vec<ValidationError>>;
}

// ============================================================================
// Tests
// ============================================================================
