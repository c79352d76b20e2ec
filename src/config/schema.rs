//! Config schema and defaults

use crate::{FileType, Priority};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Word-count floor used when a priority has no configured minimum
pub const DEFAULT_MINIMUM_WORDS: u32 = 50;

/// Thresholds and per-type expectations for documentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentationStandards {
    /// Docs scoring at or above this count as adequate
    pub minimum_quality_score: f64,
    /// Coverage floor for CI gating
    pub minimum_coverage_percentage: f64,
    /// File type key -> ordered section names
    pub required_sections: BTreeMap<String, Vec<String>>,
    /// Priority key -> minimum word count
    pub minimum_word_count: BTreeMap<String, u32>,
}

impl Default for DocumentationStandards {
    fn default() -> Self {
        let sections = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let required_sections = [
            ("api_route", sections(&["overview", "usage", "api_reference", "examples"])),
            ("component", sections(&["overview", "props", "usage", "examples"])),
            ("service", sections(&["overview", "usage", "api_reference", "configuration"])),
            ("utility", sections(&["overview", "usage", "examples"])),
            ("hook", sections(&["overview", "usage", "examples", "api_reference"])),
            ("page", sections(&["overview", "usage", "examples"])),
            ("layout", sections(&["overview", "usage", "examples"])),
            ("types", sections(&["overview", "usage", "examples"])),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let minimum_word_count = [("critical", 200), ("high", 150), ("medium", 100), ("low", 50)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        Self {
            minimum_quality_score: 0.7,
            minimum_coverage_percentage: 85.0,
            required_sections,
            minimum_word_count,
        }
    }
}

/// Complexity cut-offs used by the requirement and priority rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityThresholds {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
    pub critical: u32,
}

impl Default for ComplexityThresholds {
    fn default() -> Self {
        Self {
            low: 10,
            medium: 25,
            high: 50,
            critical: 100,
        }
    }
}

/// Source discovery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeAnalysisConfig {
    /// Label -> glob, relative to the analysis root
    pub file_patterns: BTreeMap<String, String>,
    /// Substrings (after stripping `*`) that exclude a path
    pub exclude_patterns: Vec<String>,
    pub complexity_thresholds: ComplexityThresholds,
}

impl Default for CodeAnalysisConfig {
    fn default() -> Self {
        let file_patterns = [
            ("components", "src/components/**/*.tsx"),
            ("app_components", "src/app/**/components/**/*.tsx"),
            ("app_pages", "src/app/**/page.tsx"),
            ("app_layouts", "src/app/**/layout.tsx"),
            ("app_loading", "src/app/**/loading.tsx"),
            ("app_error", "src/app/**/error.tsx"),
            ("app_not_found", "src/app/**/not-found.tsx"),
            ("app_globals", "src/app/**/globals.tsx"),
            ("app_admin", "src/app/admin/**/*.tsx"),
            ("app_utils", "src/app/**/utils/**/*.ts"),
            ("app_hooks", "src/app/**/hooks/**/*.ts"),
            ("app_types", "src/app/**/types/**/*.ts"),
            ("app_constants", "src/app/**/constants/**/*.ts"),
            ("app_services", "src/app/**/services/**/*.ts"),
            ("app_misc_ts", "src/app/**/*.ts"),
            ("services", "src/lib/services/**/*.ts"),
            ("utilities", "src/lib/utils/**/*.ts"),
            ("hooks", "src/lib/hooks/**/*.ts"),
            ("types", "src/lib/types/**/*.ts"),
            ("lib_components", "src/lib/components/**/*.tsx"),
            ("lib_misc", "src/lib/**/*.ts"),
            ("api_routes", "src/app/api/**/route.ts"),
            ("middleware", "src/middleware/**/*.ts"),
            ("templates", "src/templates/**/*.tsx"),
            ("template_utils", "src/templates/**/*.ts"),
            ("root_files", "src/*.ts"),
            ("root_components", "src/*.tsx"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let exclude_patterns = [
            "**/*.test.*",
            "**/*.spec.*",
            "**/test/**",
            "**/__tests__/**",
            "**/node_modules/**",
            "**/.next/**",
            "**/build/**",
            "**/dist/**",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self {
            file_patterns,
            exclude_patterns,
            complexity_thresholds: ComplexityThresholds::default(),
        }
    }
}

/// Where documentation is looked for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Filenames checked in each code file's directory, most preferred first
    pub co_located_patterns: Vec<String>,
    /// Central doc locations. Informational; matching is co-located only.
    pub centralized_patterns: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            co_located_patterns: ["index.md", "README.md", "docs.md", "documentation.md"]
                .into_iter()
                .map(String::from)
                .collect(),
            centralized_patterns: vec!["jekyll/**/*.md".to_string()],
        }
    }
}

/// Root config structure for .docgaprc.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub documentation_standards: DocumentationStandards,
    pub code_analysis: CodeAnalysisConfig,
    pub documentation_discovery: DiscoveryConfig,
}

impl Config {
    /// Required section names for a file type (empty if unconfigured)
    pub fn required_sections_for(&self, file_type: FileType) -> &[String] {
        self.documentation_standards
            .required_sections
            .get(file_type.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Minimum word count for a priority
    pub fn minimum_words_for(&self, priority: Priority) -> u32 {
        self.documentation_standards
            .minimum_word_count
            .get(priority.as_str())
            .copied()
            .unwrap_or(DEFAULT_MINIMUM_WORDS)
    }

    pub fn thresholds(&self) -> &ComplexityThresholds {
        &self.code_analysis.complexity_thresholds
    }

    pub fn minimum_quality_score(&self) -> f64 {
        self.documentation_standards.minimum_quality_score
    }

    pub fn minimum_coverage_percentage(&self) -> f64 {
        self.documentation_standards.minimum_coverage_percentage
    }
}
