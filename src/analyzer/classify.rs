//! Classification rules: file type, public-API vote, documentation
//! requirement and priority.
//!
//! Each verdict is an ordered table of (predicate, outcome) rows evaluated top
//! to bottom; the first row whose predicate holds decides.

use crate::config::ComplexityThresholds;
use crate::{FileType, Language, Priority};
use std::path::Path;

/// Facts about one file that the requirement and priority rules look at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFacts {
    pub file_type: FileType,
    pub complexity: u32,
    pub function_count: usize,
    pub class_count: usize,
    pub is_public_api: bool,
    pub size_lines: usize,
}

/// One row of a decision table
pub struct DecisionRule<T> {
    pub name: &'static str,
    pub applies: fn(&FileFacts, &ComplexityThresholds) -> bool,
    pub outcome: T,
}

/// First matching row wins; `fallback` when none match
pub fn decide<T: Copy>(
    rules: &[DecisionRule<T>],
    facts: &FileFacts,
    thresholds: &ComplexityThresholds,
    fallback: T,
) -> T {
    rules
        .iter()
        .find(|rule| (rule.applies)(facts, thresholds))
        .map(|rule| rule.outcome)
        .unwrap_or(fallback)
}

/// Name of the first matching row, for diagnostics
pub fn matching_rule<T>(
    rules: &[DecisionRule<T>],
    facts: &FileFacts,
    thresholds: &ComplexityThresholds,
) -> Option<&'static str> {
    rules
        .iter()
        .find(|rule| (rule.applies)(facts, thresholds))
        .map(|rule| rule.name)
}

fn is_one_of(file_type: FileType, types: &[FileType]) -> bool {
    types.contains(&file_type)
}

// ---------------------------------------------------------------------------
// File type

/// Keywords that must all appear (case-insensitively) in the path, in priority order
const FILE_TYPE_RULES: &[(&[&str], FileType)] = &[
    (&["components"], FileType::Component),
    (&["services"], FileType::Service),
    (&["utils"], FileType::Utility),
    (&["hooks"], FileType::Hook),
    (&["api", "route"], FileType::ApiRoute),
    (&["middleware"], FileType::Middleware),
    (&["types"], FileType::Types),
    (&["page.tsx"], FileType::Page),
    (&["layout.tsx"], FileType::Layout),
    (&["loading.tsx"], FileType::Loading),
    (&["error.tsx"], FileType::Error),
    (&["not-found.tsx"], FileType::NotFound),
    (&["globals.tsx"], FileType::Globals),
    (&["constants"], FileType::Constants),
    (&["templates"], FileType::Template),
];

/// Infer the file type from a root-relative path
pub fn file_type_for(path: &str) -> FileType {
    let lower = path.to_lowercase();
    FILE_TYPE_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().all(|k| lower.contains(k)))
        .map(|(_, file_type)| *file_type)
        .unwrap_or(FileType::Unknown)
}

pub fn language_for(path: &Path) -> Language {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ts") => Language::TypeScript,
        Some("tsx") => Language::Tsx,
        Some("js" | "jsx" | "mjs" | "cjs") => Language::JavaScript,
        _ => Language::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Public API vote

/// Votes needed out of the six signals
const PUBLIC_API_QUORUM: usize = 2;

/// At least two of six fixed signals must hold. The three "not internal"
/// signals are true for almost every path, so in practice nearly any file
/// passes.
pub fn is_public_api(path: &str, content: &str) -> bool {
    let lower = path.to_lowercase();
    let signals = [
        content.contains("export"),
        lower.contains("api"),
        lower.contains("public"),
        !path.starts_with("src/lib/internal/"),
        !path.contains("_internal"),
        !path.contains(".internal."),
    ];
    signals.iter().filter(|s| **s).count() >= PUBLIC_API_QUORUM
}

// ---------------------------------------------------------------------------
// Documentation requirement

/// `Some(false)` exempts, `Some(true)` requires
pub static REQUIREMENT_RULES: [DecisionRule<bool>; 6] = [
    DecisionRule {
        name: "simple-api-route-exempt",
        applies: |f, t| {
            f.file_type == FileType::ApiRoute
                && f.complexity < t.medium
                && f.function_count <= 2
                && f.class_count == 0
        },
        outcome: false,
    },
    DecisionRule {
        name: "public-service-or-component",
        applies: |f, _| {
            f.is_public_api && is_one_of(f.file_type, &[FileType::Service, FileType::Component])
        },
        outcome: true,
    },
    DecisionRule {
        name: "complex",
        applies: |f, t| f.complexity > t.medium,
        outcome: true,
    },
    DecisionRule {
        name: "many-exports",
        applies: |f, _| f.function_count + f.class_count > 3,
        outcome: true,
    },
    DecisionRule {
        name: "documented-file-type",
        applies: |f, _| {
            is_one_of(
                f.file_type,
                &[
                    FileType::Service,
                    FileType::Component,
                    FileType::Hook,
                    FileType::Page,
                    FileType::Layout,
                ],
            )
        },
        outcome: true,
    },
    DecisionRule {
        name: "substantial-utility",
        applies: |f, _| {
            f.file_type == FileType::Utility && (f.complexity > 20 || f.function_count > 2)
        },
        outcome: true,
    },
];

pub fn requires_documentation(facts: &FileFacts, thresholds: &ComplexityThresholds) -> bool {
    decide(&REQUIREMENT_RULES, facts, thresholds, false)
}

// ---------------------------------------------------------------------------
// Priority

pub static PRIORITY_RULES: [DecisionRule<Priority>; 8] = [
    DecisionRule {
        name: "complex-public-service",
        applies: |f, _| f.is_public_api && f.file_type == FileType::Service && f.complexity > 30,
        outcome: Priority::Critical,
    },
    DecisionRule {
        name: "large-view",
        applies: |f, _| {
            is_one_of(
                f.file_type,
                &[FileType::Component, FileType::Page, FileType::Layout],
            ) && f.size_lines > 300
        },
        outcome: Priority::Critical,
    },
    DecisionRule {
        name: "very-complex",
        applies: |f, t| f.complexity > t.high,
        outcome: Priority::Critical,
    },
    DecisionRule {
        name: "substantial-code",
        applies: |f, _| {
            is_one_of(
                f.file_type,
                &[
                    FileType::Component,
                    FileType::Service,
                    FileType::Page,
                    FileType::Layout,
                ],
            ) && f.size_lines > 150
        },
        outcome: Priority::High,
    },
    DecisionRule {
        name: "complex",
        applies: |f, t| f.complexity > t.medium,
        outcome: Priority::High,
    },
    DecisionRule {
        name: "public-endpoint",
        applies: |f, _| {
            f.is_public_api
                && is_one_of(f.file_type, &[FileType::ApiRoute, FileType::Service])
                && f.complexity > 15
        },
        outcome: Priority::High,
    },
    DecisionRule {
        name: "public-helper",
        applies: |f, _| {
            f.is_public_api
                && is_one_of(
                    f.file_type,
                    &[FileType::Hook, FileType::Utility, FileType::Template],
                )
        },
        outcome: Priority::Medium,
    },
    DecisionRule {
        name: "mid-size-view",
        applies: |f, _| {
            is_one_of(f.file_type, &[FileType::Component, FileType::Page]) && f.size_lines > 50
        },
        outcome: Priority::Medium,
    },
];

pub fn priority_for(facts: &FileFacts, thresholds: &ComplexityThresholds) -> Priority {
    decide(&PRIORITY_RULES, facts, thresholds, Priority::Low)
}
