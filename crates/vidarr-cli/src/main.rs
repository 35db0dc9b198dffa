// SPDX-License-Identifier: GPL-3.0-or-later

//! Format test tool: evaluates configured custom formats against release
//! titles.
//!
//! With one title argument, prints the full per-tag match report as JSON.
//! With two, additionally compares both releases under the configured
//! profile. Configuration comes from the file named by `VIDARR_CONFIG` (or
//! defaults) plus `VIDARR_`-prefixed environment overrides.

use std::cmp::Ordering;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vidarr_config::{load as load_config, AppConfig};
use vidarr_domain::ParsedReleaseInfo;
use vidarr_formats::{
    attach_format_to_profiles, compare_formats, match_format_tags, matching_formats, CustomFormat,
    FormatCatalog, FormatEvaluation, FormatProfile, ProfileFormatItem,
};
use vidarr_parser::parse_release_title;

#[derive(Serialize)]
struct FormatTestReport {
    title: String,
    parsed: ParsedReleaseInfo,
    matched_formats: Vec<String>,
    matches: Vec<FormatEvaluation>,
}

fn main() -> Result<()> {
    init_tracing();

    let config_path = std::env::var_os("VIDARR_CONFIG").map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;

    let catalog = build_catalog(&config)?;
    let profile = build_profile(&config, &catalog);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [title] => {
            let report = test_title(title, &catalog);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        [first_title, second_title] => {
            let first = matching_formats(&parse_release_title(first_title, 0), catalog.all());
            let second = matching_formats(&parse_release_title(second_title, 0), catalog.all());
            let verdict = match compare_formats(&first, &second, &profile) {
                Ordering::Greater => "the first release is better",
                Ordering::Less => "the second release is better",
                Ordering::Equal => "the releases are equivalent",
            };
            println!("{}", verdict);
        }
        _ => bail!("usage: vidarr-cli <release-title> [<other-release-title>]"),
    }

    Ok(())
}

fn init_tracing() {
    let fmt_layer = fmt::layer().with_target(true).with_level(true);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn build_catalog(config: &AppConfig) -> Result<FormatCatalog> {
    let mut catalog = FormatCatalog::new();
    for definition in &config.formats.definitions {
        let format = CustomFormat::parse(&definition.name, &definition.tags)
            .with_context(|| format!("custom format '{}'", definition.name))?;
        catalog
            .insert(format)
            .with_context(|| format!("custom format '{}'", definition.name))?;
    }
    Ok(catalog)
}

/// Materialize the configured profile: named items in configured order, then
/// any remaining catalog formats attached least-preferred so the profile
/// covers the catalog exactly once.
fn build_profile(config: &AppConfig, catalog: &FormatCatalog) -> FormatProfile {
    let mut profile = FormatProfile::new(&config.formats.profile.name);

    for item in &config.formats.profile.items {
        match catalog.find_by_name(&item.name) {
            Some(format) => profile.format_items.push(ProfileFormatItem {
                format_id: format.id,
                allowed: item.allowed,
            }),
            None => warn!(
                target: "cli",
                format = %item.name,
                "profile references an unknown custom format; ignoring"
            ),
        }
    }

    let mut profiles = [profile];
    for format in catalog.all() {
        if !profiles[0].contains(format.id) {
            attach_format_to_profiles(format.id, &mut profiles);
        }
    }
    let [profile] = profiles;
    profile
}

fn test_title(title: &str, catalog: &FormatCatalog) -> FormatTestReport {
    let parsed = parse_release_title(title, 0);
    let matched_formats = matching_formats(&parsed, catalog.all())
        .into_iter()
        .map(|format| format.name)
        .collect();
    let matches = match_format_tags(&parsed, catalog.all());

    FormatTestReport {
        title: title.to_string(),
        parsed,
        matched_formats,
        matches,
    }
}
