use std::cmp::Reverse;

use crate::models::Trailer;

/// Picks the single trailer to show for a title
///
/// Official assets win over unofficial ones; within the same officialness the
/// kind priority decides (trailer > teaser > clip > anything else). Remaining
/// ties keep the first candidate in input order, so the result is the head of
/// a stable sort over `(official, kind)`.
pub fn select_trailer(candidates: &[Trailer]) -> Option<&Trailer> {
    candidates
        .iter()
        .min_by_key(|trailer| (Reverse(trailer.is_official), Reverse(trailer.kind.priority())))
}
