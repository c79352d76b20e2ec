//! Quality score for one documentation file

use crate::DocumentationQuality;

const OVERVIEW_WEIGHT: f64 = 0.20;
const USAGE_WEIGHT: f64 = 0.25;
const API_REFERENCE_WEIGHT: f64 = 0.20;
const EXAMPLES_WEIGHT: f64 = 0.15;
/// Applies to every doc regardless of file type
const HEADINGS_WEIGHT: f64 = 0.10;

/// Bonus for docs longer than twice the minimum word count
const LENGTH_BONUS: f64 = 1.1;

/// Score in [0, 1] from the content signals, the file type's required
/// sections and its priority's minimum word count.
///
/// The base score is the achieved share of the applicable weights. It is then
/// scaled down by `words / minimum` for short docs, or given a 10% bonus
/// (capped at 1.0) for docs above twice the minimum.
pub fn quality_score(
    quality: &DocumentationQuality,
    required: &[String],
    minimum_words: u32,
) -> f64 {
    let requires = |name: &str| required.iter().any(|s| s == name);

    let checks = [
        (requires("overview"), OVERVIEW_WEIGHT, quality.has_overview),
        (requires("usage"), USAGE_WEIGHT, quality.has_usage_examples),
        (requires("api_reference"), API_REFERENCE_WEIGHT, quality.has_api_documentation),
        (requires("examples"), EXAMPLES_WEIGHT, quality.has_code_examples),
        (true, HEADINGS_WEIGHT, quality.has_proper_headings),
    ];

    let (achieved, total) = checks
        .iter()
        .filter(|(applies, _, _)| *applies)
        .fold((0.0, 0.0), |(achieved, total), (_, weight, present)| {
            (achieved + if *present { *weight } else { 0.0 }, total + weight)
        });

    let base = if total > 0.0 { achieved / total } else { 0.0 };
    length_adjusted(base, quality.word_count, minimum_words).clamp(0.0, 1.0)
}

fn length_adjusted(score: f64, words: usize, minimum_words: u32) -> f64 {
    let words = words as f64;
    let minimum = f64::from(minimum_words);
    if words < minimum {
        score * (words / minimum)
    } else if words > minimum * 2.0 {
        (score * LENGTH_BONUS).min(1.0)
    } else {
        score
    }
}
