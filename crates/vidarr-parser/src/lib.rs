// SPDX-License-Identifier: GPL-3.0-or-later

//! Release title parsing.
//!
//! Turns a raw indexer or filesystem title like
//! `Movie.Title.2020.1080p.BluRay.x264-GROUP` into a [`ParsedReleaseInfo`]
//! snapshot: a simplified lowercase title plus detected resolution, source,
//! edition and languages. The custom-format engine consumes the snapshot
//! read-only; detection here is keyword-based and deliberately forgiving,
//! since a failed detection just means a tag will not match.

use lazy_static::lazy_static;
use regex::Regex;
use vidarr_domain::{Language, ParsedReleaseInfo, QualityModel, Resolution, Source};

/// Parse a release title into the metadata snapshot the matching engine
/// evaluates. `size_bytes` is supplied by the caller (indexer response or
/// file size); pass 0 when unknown.
pub fn parse_release_title(title: &str, size_bytes: u64) -> ParsedReleaseInfo {
    let simple = simplify_release_title(title);

    ParsedReleaseInfo {
        release_title: title.to_string(),
        edition: detect_edition(&simple),
        quality: QualityModel::new(detect_resolution(&simple), detect_source(&simple)),
        languages: detect_languages(&simple),
        size_bytes,
        filename: None,
        simple_release_title: simple,
    }
}

/// Lowercase a title and flatten scene-style separators: bracketed chunks are
/// dropped, dots and underscores become spaces, whitespace is collapsed.
pub fn simplify_release_title(title: &str) -> String {
    let stripped = strip_bracketed_chunks(title);
    let separated = stripped.replace(['.', '_'], " ");
    normalize_whitespace(&separated).to_lowercase()
}

fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}

fn strip_bracketed_chunks(value: &str) -> String {
    lazy_static! {
        static ref BRACKETED_REGEX: Regex =
            Regex::new(r"\[[^\]]*\]|\{[^\}]*\}").expect("valid bracketed regex");
    }

    BRACKETED_REGEX.replace_all(value, " ").to_string()
}

fn detect_resolution(simple_title: &str) -> Resolution {
    lazy_static! {
        static ref R2160_REGEX: Regex =
            Regex::new(r"(?i)\b(2160p|4k|uhd)\b").expect("valid 2160p regex");
        static ref R1080_REGEX: Regex =
            Regex::new(r"(?i)\b(1080[pi])\b").expect("valid 1080p regex");
        static ref R720_REGEX: Regex = Regex::new(r"(?i)\b(720p)\b").expect("valid 720p regex");
        static ref R576_REGEX: Regex = Regex::new(r"(?i)\b(576p)\b").expect("valid 576p regex");
        static ref R480_REGEX: Regex =
            Regex::new(r"(?i)\b(480[pi])\b").expect("valid 480p regex");
    }

    if R2160_REGEX.is_match(simple_title) {
        Resolution::R2160p
    } else if R1080_REGEX.is_match(simple_title) {
        Resolution::R1080p
    } else if R720_REGEX.is_match(simple_title) {
        Resolution::R720p
    } else if R576_REGEX.is_match(simple_title) {
        Resolution::R576p
    } else if R480_REGEX.is_match(simple_title) {
        Resolution::R480p
    } else {
        Resolution::Unknown
    }
}

fn detect_source(simple_title: &str) -> Source {
    lazy_static! {
        static ref BLURAY_REGEX: Regex =
            Regex::new(r"(?i)\b(blu-?ray|bluray|bd-?rip|br-?rip|bd-?remux|remux)\b")
                .expect("valid bluray regex");
        static ref WEBDL_REGEX: Regex =
            Regex::new(r"(?i)\b(web-?dl|web-?rip|web|amzn|nf|atvp|dsnp)\b")
                .expect("valid webdl regex");
        static ref TV_REGEX: Regex =
            Regex::new(r"(?i)\b(hdtv|pdtv|sdtv|dsr|tvrip)\b").expect("valid tv regex");
        static ref DVD_REGEX: Regex =
            Regex::new(r"(?i)\b(dvd-?rip|dvd|ntsc|pal|xvidvd)\b").expect("valid dvd regex");
        static ref TELECINE_REGEX: Regex =
            Regex::new(r"(?i)\b(telecine|hdtc)\b").expect("valid telecine regex");
        static ref TELESYNC_REGEX: Regex =
            Regex::new(r"(?i)\b(telesync|hdts)\b").expect("valid telesync regex");
        static ref WORKPRINT_REGEX: Regex =
            Regex::new(r"(?i)\b(workprint)\b").expect("valid workprint regex");
        static ref CAM_REGEX: Regex =
            Regex::new(r"(?i)\b(cam-?rip|cam|hdcam)\b").expect("valid cam regex");
    }

    // Disc rips first: a bluray remux title may also carry "web" tokens from
    // the movie name itself.
    if BLURAY_REGEX.is_match(simple_title) {
        Source::Bluray
    } else if WEBDL_REGEX.is_match(simple_title) {
        Source::Webdl
    } else if TV_REGEX.is_match(simple_title) {
        Source::Tv
    } else if DVD_REGEX.is_match(simple_title) {
        Source::Dvd
    } else if TELECINE_REGEX.is_match(simple_title) {
        Source::Telecine
    } else if TELESYNC_REGEX.is_match(simple_title) {
        Source::Telesync
    } else if WORKPRINT_REGEX.is_match(simple_title) {
        Source::Workprint
    } else if CAM_REGEX.is_match(simple_title) {
        Source::Cam
    } else {
        Source::Unknown
    }
}

fn detect_edition(simple_title: &str) -> Option<String> {
    lazy_static! {
        static ref EDITION_REGEX: Regex = Regex::new(
            r"(?i)\b(director'?s cut|extended (?:cut|edition)|extended|theatrical (?:cut|edition)|theatrical|unrated|uncut|remastered|restored|imax|special edition|ultimate edition|anniversary edition|limited edition)\b"
        )
        .expect("valid edition regex");
    }

    EDITION_REGEX
        .find(simple_title)
        .map(|m| m.as_str().to_lowercase())
}

fn detect_languages(simple_title: &str) -> Vec<Language> {
    lazy_static! {
        static ref LANGUAGE_KEYWORDS: Vec<(&'static str, Language)> = vec![
            ("french", Language::French),
            ("vostfr", Language::French),
            ("spanish", Language::Spanish),
            ("german", Language::German),
            ("italian", Language::Italian),
            ("danish", Language::Danish),
            ("dutch", Language::Dutch),
            ("flemish", Language::Dutch),
            ("japanese", Language::Japanese),
            ("russian", Language::Russian),
            ("portuguese", Language::Portuguese),
            ("swedish", Language::Swedish),
            ("norwegian", Language::Norwegian),
            ("finnish", Language::Finnish),
            ("hindi", Language::Hindi),
            ("korean", Language::Korean),
            ("chinese", Language::Chinese),
            ("mandarin", Language::Chinese),
            ("english", Language::English),
        ];
    }

    let mut languages: Vec<Language> = Vec::new();
    for (keyword, language) in LANGUAGE_KEYWORDS.iter() {
        if simple_title.contains(keyword) && !languages.contains(language) {
            languages.push(*language);
        }
    }

    // Untagged releases are overwhelmingly English; a release only advertises
    // a language when it deviates from that.
    if languages.is_empty() {
        languages.push(Language::English);
    }

    languages
}
