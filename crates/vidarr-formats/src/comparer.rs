// SPDX-License-Identifier: GPL-3.0-or-later

//! The formats comparer: decides which of two matched-format sets is better
//! under a profile's ranking table. This is the decision function behind
//! upgrade checks, queue ordering and cutoff checks, so the two-level rule is
//! implemented exactly: best rank first, then the count of matched allowed
//! formats at or below the tied best rank.

use std::cmp::Ordering;
use tracing::debug;

use crate::format::CustomFormat;
use crate::profile::FormatProfile;

/// Compare two matched-format sets under `profile`.
///
/// `Greater` means `first` is the better set. Disallowed formats and formats
/// the profile does not know (catalog/profile drift after a deletion) never
/// contribute; drift is logged at debug and tolerated so a dangling reference
/// cannot abort a queue sort.
///
/// The comparison is antisymmetric and reflexive-zero: swapping the sides
/// flips the ordering, and identical contributions compare `Equal`.
pub fn compare_formats(
    first: &[CustomFormat],
    second: &[CustomFormat],
    profile: &FormatProfile,
) -> Ordering {
    let first_ranks = matched_ranks(first, profile);
    let second_ranks = matched_ranks(second, profile);

    match (first_ranks.is_empty(), second_ranks.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    let first_best = first_ranks.iter().max().copied().unwrap_or(0);
    let second_best = second_ranks.iter().max().copied().unwrap_or(0);

    // A worse top pick loses outright; extra lower-ranked matches only break
    // ties. Every matched rank sits at or below the side's best, so the
    // at-or-below-tied-rank count is the side's full count.
    first_best
        .cmp(&second_best)
        .then(first_ranks.len().cmp(&second_ranks.len()))
}

fn matched_ranks(formats: &[CustomFormat], profile: &FormatProfile) -> Vec<usize> {
    let mut ranks = Vec::with_capacity(formats.len());
    for format in formats {
        if !profile.contains(format.id) {
            debug!(
                target: "formats",
                format = %format.name,
                format_id = %format.id,
                profile = %profile.name,
                "matched custom format is not present in the profile; ignoring"
            );
            continue;
        }
        if let Some(rank) = profile.rank_of(format.id) {
            ranks.push(rank);
        }
    }
    ranks
}
