//! Markdown content signals and required-section detection

use regex::Regex;
use std::sync::OnceLock;

/// Header signals recorded on every assessed doc
pub(crate) struct SignalPatterns {
    pub overview: Regex,
    pub usage: Regex,
    pub api: Regex,
    pub installation: Regex,
    pub configuration: Regex,
    pub troubleshooting: Regex,
    pub heading: Regex,
}

pub(crate) fn signal_patterns() -> &'static SignalPatterns {
    static PATTERNS: OnceLock<SignalPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| SignalPatterns {
        overview: header(r"Overview|Description|About"),
        usage: header(r"Usage|Examples?|Getting Started"),
        api: header(r"API|Reference|Methods?|Props?"),
        installation: header(r"Installation|Setup|Getting Started"),
        configuration: header(r"Configuration|Config|Options"),
        troubleshooting: header(r"Troubleshooting|FAQ|Common Issues"),
        heading: Regex::new(r"##?\s+\w+").expect("static pattern"),
    })
}

/// `##?\s*(alternatives)`, case-insensitive
fn header(alternatives: &str) -> Regex {
    Regex::new(&format!(r"(?i)##?\s*(?:{alternatives})")).expect("static pattern")
}

/// Section name -> header pattern. Names absent here are never reported missing.
const SECTION_TABLE: &[(&str, &str)] = &[
    ("overview", r"Overview|Description|About"),
    ("usage", r"Usage|Getting Started|How to Use"),
    ("api_reference", r"API|Reference|Methods?|Props?"),
    ("examples", r"Examples?|Sample Code"),
    ("installation", r"Installation|Setup"),
    ("configuration", r"Configuration|Config|Options"),
    ("troubleshooting", r"Troubleshooting|FAQ|Common Issues"),
    ("props", r"Props|Properties|Parameters"),
];

fn section_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        SECTION_TABLE
            .iter()
            .map(|(name, alternatives)| (*name, header(alternatives)))
            .collect()
    })
}

fn section_pattern(name: &str) -> Option<&'static Regex> {
    section_patterns()
        .iter()
        .find(|(section, _)| *section == name)
        .map(|(_, re)| re)
}

/// Required sections absent from `content`, in the order given
pub fn missing_sections(content: &str, required: &[String]) -> Vec<String> {
    required
        .iter()
        .filter(|name| section_pattern(name).is_some_and(|re| !re.is_match(content)))
        .cloned()
        .collect()
}
