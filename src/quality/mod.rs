//! Quality assessor - locates co-located docs, rejects stubs and grades the rest

mod scoring;
mod sections;

pub use scoring::quality_score;
pub use sections::missing_sections;

use crate::config::Config;
use crate::{CodeFileAnalysis, DocumentationQuality, Effort, FileType, Priority};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// Trimmed docs shorter than this are never meaningful
const MIN_MEANINGFUL_CHARS: usize = 50;
/// Word count a doc needs to be meaningful without a heading
const SUBSTANTIAL_WORDS: usize = 20;
/// Fallback doc name when no co-located pattern is configured
const DEFAULT_DOC_NAME: &str = "index.md";

struct StubPatterns {
    placeholders: Vec<Regex>,
    generated_marker: Regex,
}

fn stub_patterns() -> &'static StubPatterns {
    static PATTERNS: OnceLock<StubPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| StubPatterns {
        placeholders: [
            r"(?im)^\s*TODO\s*:?\s*$",
            r"(?im)^\s*STUB\s*:?\s*$",
            r"(?im)^\s*Coming soon\s*\.?\s*$",
            r"(?im)^\s*Documentation\s+coming\s+soon\s*\.?\s*$",
            r"(?im)^\s*Placeholder\s*\.?\s*$",
            r"(?im)^\s*TBD\s*\.?\s*$",
            r"(?im)^\s*WIP\s*\.?\s*$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("static pattern"))
        .collect(),
        generated_marker: Regex::new(
            r"(?i)Documentation Needed.*This file was automatically generated",
        )
        .expect("static pattern"),
    })
}

/// Whether doc text is real documentation rather than a stub.
///
/// Too-short text and any bare placeholder line reject. Auto-generated stubs
/// need both a heading and some prose; anything else needs one of the two.
pub fn is_meaningful(content: &str) -> bool {
    let content = content.trim();
    if content.chars().count() < MIN_MEANINGFUL_CHARS {
        return false;
    }

    let stubs = stub_patterns();
    if stubs.placeholders.iter().any(|re| re.is_match(content)) {
        return false;
    }

    let has_heading = sections::signal_patterns().heading.is_match(content);
    let substantial = content.split_whitespace().count() > SUBSTANTIAL_WORDS;

    if stubs.generated_marker.is_match(content) {
        has_heading && substantial
    } else {
        has_heading || substantial
    }
}

/// File variant of [`is_meaningful`]; unreadable files are not meaningful
pub fn is_meaningful_file(path: &Path) -> bool {
    match fs::read_to_string(path) {
        Ok(content) => is_meaningful(&content),
        Err(e) => {
            debug!("Cannot read doc candidate {}: {}", path.display(), e);
            false
        }
    }
}

/// Grade doc text for a file type and priority
pub fn assess_content(
    content: &str,
    config: &Config,
    file_type: FileType,
    priority: Priority,
) -> DocumentationQuality {
    let p = sections::signal_patterns();
    let required = config.required_sections_for(file_type);

    let mut quality = DocumentationQuality {
        has_overview: p.overview.is_match(content),
        has_usage_examples: p.usage.is_match(content),
        has_api_documentation: p.api.is_match(content),
        has_installation_guide: p.installation.is_match(content),
        has_configuration_docs: p.configuration.is_match(content),
        has_troubleshooting: p.troubleshooting.is_match(content),
        has_code_examples: content.contains("```"),
        has_proper_headings: p.heading.is_match(content),
        word_count: content.split_whitespace().count(),
        line_count: content.lines().count(),
        quality_score: 0.0,
        missing_sections: missing_sections(content, required),
    };
    quality.quality_score = quality_score(&quality, required, config.minimum_words_for(priority));
    quality
}

/// Effort to lift an existing doc to the quality floor
pub fn estimate_effort(quality: &DocumentationQuality) -> Effort {
    if quality.quality_score < 0.3 {
        Effort::High
    } else if quality.quality_score < 0.6 {
        Effort::Medium
    } else {
        Effort::Low
    }
}

/// Effort to write docs from scratch
pub fn estimate_effort_for_missing(priority: Priority) -> Effort {
    match priority {
        Priority::Critical => Effort::High,
        Priority::High => Effort::Medium,
        Priority::Medium | Priority::Low => Effort::Low,
    }
}

/// Finds and grades documentation for analyzed code files
pub struct QualityAssessor {
    config: Arc<Config>,
    root: PathBuf,
}

impl QualityAssessor {
    pub fn new(config: Arc<Config>, root: PathBuf) -> Self {
        Self { config, root }
    }

    /// Code path -> first meaningful co-located doc, both root-relative.
    /// Files without one are absent.
    pub fn find_docs(&self, code_files: &[CodeFileAnalysis]) -> BTreeMap<PathBuf, PathBuf> {
        code_files
            .iter()
            .filter_map(|file| {
                let doc = self.find_doc(&file.path)?;
                Some((file.path.clone(), doc))
            })
            .collect()
    }

    fn find_doc(&self, code_path: &Path) -> Option<PathBuf> {
        let dir = code_path.parent().unwrap_or(Path::new(""));
        self.config
            .documentation_discovery
            .co_located_patterns
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| {
                let abs = self.root.join(candidate);
                abs.is_file() && is_meaningful_file(&abs)
            })
    }

    /// Grade a root-relative doc. An unreadable doc scores zero.
    pub fn assess(
        &self,
        doc_path: &Path,
        file_type: FileType,
        priority: Priority,
    ) -> DocumentationQuality {
        match fs::read_to_string(self.root.join(doc_path)) {
            Ok(content) => assess_content(&content, &self.config, file_type, priority),
            Err(e) => {
                warn!("Failed to read documentation {}: {}", doc_path.display(), e);
                DocumentationQuality::default()
            }
        }
    }

    /// Where documentation for `code_path` should be created
    pub fn expected_doc_path(&self, code_path: &Path) -> PathBuf {
        let name = self
            .config
            .documentation_discovery
            .co_located_patterns
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_DOC_NAME);
        code_path.parent().unwrap_or(Path::new("")).join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiscoveryConfig;
    use tempfile::TempDir;

    const GOOD_DOC: &str = "# Button\n\n## Overview\n\nA clickable button used across the dashboard for primary and secondary actions.\n\n## Usage\n\nImport it and pass a label plus an onClick handler.\n\n```tsx\n<Button label=\"Save\" onClick={save} />\n```\n";

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn code_file(path: &str) -> CodeFileAnalysis {
        CodeFileAnalysis {
            path: PathBuf::from(path),
            name: String::new(),
            file_type: FileType::Component,
            language: crate::Language::Tsx,
            size_lines: 10,
            complexity_score: 1,
            exported_functions: Default::default(),
            exported_classes: Default::default(),
            exported_types: Default::default(),
            exported_constants: Default::default(),
            has_tests: false,
            is_public_api: true,
            documentation_required: true,
            priority: Priority::Medium,
        }
    }

    fn assessor(root: &Path) -> QualityAssessor {
        QualityAssessor::new(Arc::new(Config::default()), root.to_path_buf())
    }

    #[test]
    fn test_placeholder_is_not_meaningful() {
        assert!(!is_meaningful("TODO"));
        assert!(!is_meaningful("todo:"));
        assert!(!is_meaningful("Coming soon."));
    }

    #[test]
    fn test_placeholder_line_rejects_long_doc() {
        let doc =
            "# Widget\n\nThis widget renders a chart of monthly usage for every account.\n\nTBD\n";
        assert!(!is_meaningful(doc));
    }

    #[test]
    fn test_heading_with_prose_is_meaningful() {
        let words = vec!["word"; 25].join(" ");
        assert!(is_meaningful(&format!("## Usage\n\n{words}")));
    }

    #[test]
    fn test_prose_without_heading_is_meaningful() {
        let words = vec!["word"; 21].join(" ");
        assert!(is_meaningful(&words));
    }

    #[test]
    fn test_short_prose_without_heading_is_not() {
        // 60 chars, 2 words, no heading
        let text = format!("{} {}", "a".repeat(30), "b".repeat(29));
        assert!(!is_meaningful(&text));
    }

    #[test]
    fn test_generated_stub_needs_heading_and_prose() {
        let marker = "Documentation Needed: This file was automatically generated by the docs bot.";
        assert!(!is_meaningful(&format!("## Button\n\n{marker}")));
        let words = vec!["detail"; 20].join(" ");
        assert!(is_meaningful(&format!("## Button\n\n{marker}\n\n{words}")));
        assert!(!is_meaningful(&format!("{marker}\n\n{words}")));
    }

    #[test]
    fn test_find_docs_prefers_configured_order() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/components/Button.tsx", "");
        write(dir.path(), "src/components/README.md", GOOD_DOC);
        write(dir.path(), "src/components/index.md", GOOD_DOC);

        let docs = assessor(dir.path()).find_docs(&[code_file("src/components/Button.tsx")]);
        assert_eq!(
            docs.get(Path::new("src/components/Button.tsx")),
            Some(&PathBuf::from("src/components/index.md"))
        );
    }

    #[test]
    fn test_find_docs_skips_stub_candidates() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/components/index.md", "Coming soon.");
        write(dir.path(), "src/components/docs.md", GOOD_DOC);

        let docs = assessor(dir.path()).find_docs(&[code_file("src/components/Button.tsx")]);
        assert_eq!(
            docs.get(Path::new("src/components/Button.tsx")),
            Some(&PathBuf::from("src/components/docs.md"))
        );
    }

    #[test]
    fn test_find_docs_omits_undocumented_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/components/index.md", "Coming soon.");
        let docs = assessor(dir.path()).find_docs(&[code_file("src/components/Button.tsx")]);
        assert!(docs.is_empty());
    }

    #[test]
    fn test_assess_component_doc() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/components/index.md", GOOD_DOC);

        let q = assessor(dir.path()).assess(
            Path::new("src/components/index.md"),
            FileType::Component,
            Priority::Low,
        );

        assert!(q.has_overview);
        assert!(q.has_usage_examples);
        assert!(q.has_code_examples);
        assert!(q.has_proper_headings);
        assert!(!q.has_troubleshooting);
        assert_eq!(q.missing_sections, vec!["props", "examples"]);
        assert!(q.quality_score > 0.0 && q.quality_score <= 1.0);
    }

    #[test]
    fn test_assess_unreadable_doc_is_zero() {
        let dir = TempDir::new().unwrap();
        let q = assessor(dir.path()).assess(
            Path::new("missing/index.md"),
            FileType::Service,
            Priority::High,
        );
        assert_eq!(q, DocumentationQuality::default());
    }

    #[test]
    fn test_expected_doc_path() {
        let dir = TempDir::new().unwrap();
        let a = assessor(dir.path());
        assert_eq!(
            a.expected_doc_path(Path::new("src/lib/services/auth.ts")),
            PathBuf::from("src/lib/services/index.md")
        );

        let config = Config {
            documentation_discovery: DiscoveryConfig {
                co_located_patterns: Vec::new(),
                centralized_patterns: Vec::new(),
            },
            ..Config::default()
        };
        let a = QualityAssessor::new(Arc::new(config), dir.path().to_path_buf());
        assert_eq!(
            a.expected_doc_path(Path::new("src/a.ts")),
            PathBuf::from("src/index.md")
        );
    }

    #[test]
    fn test_effort() {
        let mut q = DocumentationQuality::default();
        assert_eq!(estimate_effort(&q), Effort::High);
        q.quality_score = 0.3;
        assert_eq!(estimate_effort(&q), Effort::Medium);
        q.quality_score = 0.6;
        assert_eq!(estimate_effort(&q), Effort::Low);

        assert_eq!(estimate_effort_for_missing(Priority::Critical), Effort::High);
        assert_eq!(estimate_effort_for_missing(Priority::High), Effort::Medium);
        assert_eq!(estimate_effort_for_missing(Priority::Low), Effort::Low);
    }
}
