//! docgap: Documentation Coverage Linter
//!
//! This library inspects a TypeScript/JavaScript source tree, decides which
//! files need accompanying documentation, locates and grades co-located docs,
//! and aggregates everything into a [`CoverageReport`] for CI gating.

pub mod analyzer;
pub mod checker;
pub mod config;
pub mod quality;
pub mod reporter;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Classification of a source file, inferred from its path
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Component,
    Service,
    Utility,
    Hook,
    ApiRoute,
    Middleware,
    Types,
    Page,
    Layout,
    Loading,
    Error,
    NotFound,
    Globals,
    Constants,
    Template,
    Unknown,
}

impl FileType {
    /// Key used for `required_sections` lookups and report breakdowns
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Component => "component",
            FileType::Service => "service",
            FileType::Utility => "utility",
            FileType::Hook => "hook",
            FileType::ApiRoute => "api_route",
            FileType::Middleware => "middleware",
            FileType::Types => "types",
            FileType::Page => "page",
            FileType::Layout => "layout",
            FileType::Loading => "loading",
            FileType::Error => "error",
            FileType::NotFound => "not_found",
            FileType::Globals => "globals",
            FileType::Constants => "constants",
            FileType::Template => "template",
            FileType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source language, inferred from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    Tsx,
    JavaScript,
    Unknown,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::TypeScript => write!(f, "typescript"),
            Language::Tsx => write!(f, "tsx"),
            Language::JavaScript => write!(f, "javascript"),
            Language::Unknown => write!(f, "unknown"),
        }
    }
}

/// Documentation urgency. Ordered most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    /// Key used for `minimum_word_count` lookups
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analysis of a single discovered source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeFileAnalysis {
    /// Path relative to the analysis root
    pub path: PathBuf,
    /// File stem
    pub name: String,
    pub file_type: FileType,
    pub language: Language,
    pub size_lines: usize,
    /// Textual proxy for cyclomatic complexity (1 + branch tokens)
    pub complexity_score: u32,
    pub exported_functions: BTreeSet<String>,
    pub exported_classes: BTreeSet<String>,
    pub exported_types: BTreeSet<String>,
    pub exported_constants: BTreeSet<String>,
    pub has_tests: bool,
    pub is_public_api: bool,
    pub documentation_required: bool,
    pub priority: Priority,
}

/// Structural quality of one documentation file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentationQuality {
    pub has_overview: bool,
    pub has_usage_examples: bool,
    pub has_api_documentation: bool,
    pub has_installation_guide: bool,
    pub has_configuration_docs: bool,
    pub has_troubleshooting: bool,
    pub has_code_examples: bool,
    pub has_proper_headings: bool,
    pub word_count: usize,
    pub line_count: usize,
    /// Heuristic score in [0, 1]
    pub quality_score: f64,
    pub missing_sections: Vec<String>,
}

/// Why a required file is counted as a gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapType {
    /// No meaningful documentation file was found
    Missing,
    /// Documentation exists but scores below the quality floor
    Inadequate,
}

impl std::fmt::Display for GapType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GapType::Missing => write!(f, "missing"),
            GapType::Inadequate => write!(f, "inadequate"),
        }
    }
}

/// Rough effort needed to close a gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Effort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effort::Low => write!(f, "low"),
            Effort::Medium => write!(f, "medium"),
            Effort::High => write!(f, "high"),
        }
    }
}

/// A required file that is not adequately documented
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentationGap {
    pub code_file: PathBuf,
    /// Where docs should be created (missing) or where the weak doc lives (inadequate)
    pub expected_doc_path: PathBuf,
    pub gap_type: GapType,
    pub file_type: FileType,
    pub priority: Priority,
    pub required_sections: Vec<String>,
    pub quality_issues: Vec<String>,
    pub estimated_effort: Effort,
}

/// Per-file-type gap counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapCounts {
    pub missing: usize,
    pub inadequate: usize,
}

impl GapCounts {
    pub fn record(&mut self, gap_type: GapType) {
        match gap_type {
            GapType::Missing => self.missing += 1,
            GapType::Inadequate => self.inadequate += 1,
        }
    }
}

/// The result of one coverage run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Files whose documentation is required
    pub total_code_files: usize,
    /// Files with a matched, meaningful documentation file
    pub documented_files: usize,
    pub adequately_documented: usize,
    pub missing_documentation: usize,
    pub inadequate_documentation: usize,
    /// Adequate / total * 100; 100 when nothing is required
    pub coverage_percentage: f64,
    /// Mean score over files that had a matched doc
    pub quality_score: f64,
    pub gaps: Vec<DocumentationGap>,
    pub by_priority: BTreeMap<Priority, usize>,
    pub by_file_type: BTreeMap<FileType, GapCounts>,
    pub timestamp: String,
}

impl CoverageReport {
    /// Report for a run with nothing to check
    pub fn perfect() -> Self {
        Self {
            total_code_files: 0,
            documented_files: 0,
            adequately_documented: 0,
            missing_documentation: 0,
            inadequate_documentation: 0,
            coverage_percentage: 100.0,
            quality_score: 1.0,
            gaps: Vec::new(),
            by_priority: empty_priority_breakdown(),
            by_file_type: BTreeMap::new(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Whether coverage reaches the given percentage floor
    pub fn meets_threshold(&self, minimum_coverage_percentage: f64) -> bool {
        self.coverage_percentage >= minimum_coverage_percentage
    }
}

/// Priority breakdown with every priority present at zero
pub fn empty_priority_breakdown() -> BTreeMap<Priority, usize> {
    Priority::ALL.iter().map(|p| (*p, 0)).collect()
}

/// Public API: run a full coverage check over `root`.
///
/// * `root` - directory the configured glob patterns are relative to
/// * `config_path` - config file; defaults to `.docgaprc.json` inside `root`
pub fn check_coverage(root: &Path, config_path: Option<&Path>) -> CoverageReport {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.join(config::CONFIG_FILENAME));
    let config = config::ConfigManager::load(&path).build();
    checker::CoverageChecker::new(config, root.to_path_buf()).check()
}
