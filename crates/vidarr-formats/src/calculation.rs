// SPDX-License-Identifier: GPL-3.0-or-later

//! Runs every defined custom format against one release snapshot.
//!
//! Profile filtering happens later: callers intersect the matched list with a
//! profile's format items when deciding grabs and upgrades, so the same
//! matched list can be reused across profiles.

use tracing::trace;
use vidarr_domain::ParsedReleaseInfo;

use crate::format::{evaluate, CustomFormat, FormatEvaluation};

/// Return the subset of `all_formats` matching `info`, ordered by name for
/// stable presentation.
pub fn matching_formats(info: &ParsedReleaseInfo, all_formats: &[CustomFormat]) -> Vec<CustomFormat> {
    let mut matches: Vec<CustomFormat> = all_formats
        .iter()
        .filter(|format| evaluate(format, info).did_match)
        .cloned()
        .collect();

    matches.sort_by(|a, b| a.name.cmp(&b.name));

    trace!(
        target: "formats",
        release = %info.release_title,
        matched = matches.len(),
        total = all_formats.len(),
        "custom format calculation finished"
    );

    matches
}

/// Same evaluation as [`matching_formats`] with the full per-tag-group match
/// detail kept, for the format-test surface and diagnostics.
pub fn match_format_tags(
    info: &ParsedReleaseInfo,
    all_formats: &[CustomFormat],
) -> Vec<FormatEvaluation> {
    all_formats
        .iter()
        .map(|format| evaluate(format, info))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidarr_domain::{QualityModel, Resolution, Source};

    fn formats() -> Vec<CustomFormat> {
        vec![
            CustomFormat::parse("Bluray HD", &["R_1080", "S_BLURAY"]).unwrap(),
            CustomFormat::parse("4K", &["R_2160"]).unwrap(),
            CustomFormat::parse("x264", &["C_x264"]).unwrap(),
        ]
    }

    fn bluray_1080p() -> ParsedReleaseInfo {
        let mut info = ParsedReleaseInfo::new("Movie.Title.2020.1080p.BluRay.x264-GROUP");
        info.simple_release_title = "movie title 2020 1080p bluray x264-group".to_string();
        info.quality = QualityModel::new(Resolution::R1080p, Source::Bluray);
        info
    }

    #[test]
    fn returns_matching_subset_sorted_by_name() {
        let matched = matching_formats(&bluray_1080p(), &formats());
        let names: Vec<&str> = matched.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Bluray HD", "x264"]);
    }

    #[test]
    fn empty_catalog_matches_nothing() {
        assert!(matching_formats(&bluray_1080p(), &[]).is_empty());
    }

    #[test]
    fn diagnostics_cover_every_format() {
        let evaluations = match_format_tags(&bluray_1080p(), &formats());
        assert_eq!(evaluations.len(), 3);
        assert!(evaluations.iter().any(|e| e.format_name == "4K" && !e.did_match));
        assert!(evaluations.iter().any(|e| e.format_name == "x264" && e.did_match));
    }

    #[test]
    fn partially_parsed_release_never_fails() {
        // Unknown quality, zero size, no edition: everything is just a miss.
        let info = ParsedReleaseInfo::new("mystery");
        let all = vec![
            CustomFormat::parse("Sized", &["G_10<>20"]).unwrap(),
            CustomFormat::parse("Edition", &["E_imax"]).unwrap(),
        ];
        assert!(matching_formats(&info, &all).is_empty());
    }
}
