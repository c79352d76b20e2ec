//! Textual signal extraction: exported symbols and a complexity proxy.
//!
//! This is regex-based and approximate. Callers only see [`SignalExtractor`],
//! so a real parser can replace [`RegexSignalExtractor`] without touching them.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Everything the analyzer needs from a file's text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSignals {
    pub exported_functions: BTreeSet<String>,
    pub exported_classes: BTreeSet<String>,
    pub exported_types: BTreeSet<String>,
    pub exported_constants: BTreeSet<String>,
    /// 1 + number of branching/exception/logical tokens
    pub complexity: u32,
}

/// Extracts exports and complexity from source text
pub trait SignalExtractor: Send + Sync {
    fn extract(&self, text: &str) -> SourceSignals;
}

struct Patterns {
    functions: Vec<Regex>,
    classes: Vec<Regex>,
    types: Vec<Regex>,
    constants: Vec<Regex>,
    complexity: Vec<Regex>,
}

fn compile(sources: &[&str]) -> Vec<Regex> {
    sources
        .iter()
        .map(|s| Regex::new(s).expect("static pattern"))
        .collect()
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        functions: compile(&[
            r"export\s+(?:async\s+)?function\s+(\w+)",
            r"export\s+const\s+(\w+)\s*=\s*(?:async\s+)?\(",
            r"export\s+const\s+(\w+)\s*:\s*[^=]*=\s*(?:async\s+)?\(",
        ]),
        classes: compile(&[r"export\s+class\s+(\w+)", r"export\s+abstract\s+class\s+(\w+)"]),
        types: compile(&[
            r"export\s+type\s+(\w+)",
            r"export\s+interface\s+(\w+)",
            r"export\s+enum\s+(\w+)",
        ]),
        // `\s*` may match nothing, so `= (x) => x` and `= async () =>` are
        // constants as well as functions.
        constants: compile(&[r"export\s+const\s+(\w+)\s*=\s*[^(]"]),
        complexity: compile(&[
            r"\bif\b",
            r"\belse\b",
            r"\bfor\b",
            r"\bwhile\b",
            r"\bswitch\b",
            r"\bcase\b",
            r"\btry\b",
            r"\bcatch\b",
            r"\bfinally\b",
            r"\?\s*:",
            r"&&",
            r"\|\|",
        ]),
    })
}

fn capture_names(text: &str, regexes: &[Regex]) -> BTreeSet<String> {
    regexes
        .iter()
        .flat_map(|re| re.captures_iter(text))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Default extractor backed by a fixed set of regexes
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexSignalExtractor;

impl RegexSignalExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 1 plus every occurrence of every complexity token
    pub fn complexity(text: &str) -> u32 {
        let hits: usize = patterns()
            .complexity
            .iter()
            .map(|re| re.find_iter(text).count())
            .sum();
        u32::try_from(hits).unwrap_or(u32::MAX).saturating_add(1)
    }
}

impl SignalExtractor for RegexSignalExtractor {
    fn extract(&self, text: &str) -> SourceSignals {
        let p = patterns();
        SourceSignals {
            exported_functions: capture_names(text, &p.functions),
            exported_classes: capture_names(text, &p.classes),
            exported_types: capture_names(text, &p.types),
            exported_constants: capture_names(text, &p.constants),
            complexity: Self::complexity(text),
        }
    }
}
