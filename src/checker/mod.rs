//! Coverage orchestration - discovery, doc matching, grading and aggregation

pub mod git;

pub use git::DiffRange;

use crate::analyzer::CodeAnalyzer;
use crate::config::Config;
use crate::quality::{self, QualityAssessor};
use crate::{
    empty_priority_breakdown, CodeFileAnalysis, CoverageReport, DocumentationGap, GapCounts,
    GapType,
};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

const MISSING_DOC_ISSUE: &str = "Documentation file does not exist";

/// Verdict for one required file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Doc found and scored at or above the quality floor
    Adequate { score: f64 },
    /// Doc found but scored below the floor
    Inadequate { score: f64, gap: DocumentationGap },
    /// No meaningful doc found
    Missing { gap: DocumentationGap },
}

/// Running totals over file outcomes. Merging is associative, so partial
/// tallies can be combined in any grouping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    pub total: usize,
    pub documented: usize,
    pub adequate: usize,
    pub quality_sum: f64,
    pub gaps: Vec<DocumentationGap>,
}

impl Tally {
    pub fn record(mut self, outcome: FileOutcome) -> Self {
        self.total += 1;
        match outcome {
            FileOutcome::Adequate { score } => {
                self.documented += 1;
                self.adequate += 1;
                self.quality_sum += score;
            }
            FileOutcome::Inadequate { score, gap } => {
                self.documented += 1;
                self.quality_sum += score;
                self.gaps.push(gap);
            }
            FileOutcome::Missing { gap } => self.gaps.push(gap),
        }
        self
    }

    pub fn merge(mut self, other: Tally) -> Self {
        self.total += other.total;
        self.documented += other.documented;
        self.adequate += other.adequate;
        self.quality_sum += other.quality_sum;
        self.gaps.extend(other.gaps);
        self
    }

    /// Final report; gaps are ordered by code path
    pub fn into_report(mut self) -> CoverageReport {
        self.gaps.sort_by(|a, b| a.code_file.cmp(&b.code_file));

        let coverage_percentage = if self.total == 0 {
            100.0
        } else {
            self.adequate as f64 / self.total as f64 * 100.0
        };
        let quality_score = if self.documented == 0 {
            0.0
        } else {
            self.quality_sum / self.documented as f64
        };

        let mut by_priority = empty_priority_breakdown();
        let mut by_file_type = BTreeMap::new();
        for gap in &self.gaps {
            *by_priority.entry(gap.priority).or_insert(0) += 1;
            by_file_type
                .entry(gap.file_type)
                .or_insert_with(GapCounts::default)
                .record(gap.gap_type);
        }

        let count = |gap_type: GapType| self.gaps.iter().filter(|g| g.gap_type == gap_type).count();

        CoverageReport {
            total_code_files: self.total,
            documented_files: self.documented,
            adequately_documented: self.adequate,
            missing_documentation: count(GapType::Missing),
            inadequate_documentation: count(GapType::Inadequate),
            coverage_percentage,
            quality_score,
            by_priority,
            by_file_type,
            gaps: self.gaps,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Runs a full or PR-scoped coverage check over one root
pub struct CoverageChecker {
    config: Arc<Config>,
    analyzer: CodeAnalyzer,
    assessor: QualityAssessor,
}

impl CoverageChecker {
    pub fn new(config: Config, root: PathBuf) -> Self {
        let config = Arc::new(config);
        let analyzer = CodeAnalyzer::new(Arc::clone(&config), root);
        let assessor = QualityAssessor::new(Arc::clone(&config), analyzer.root().to_path_buf());
        Self {
            config,
            analyzer,
            assessor,
        }
    }

    /// Check every discovered file
    pub fn check(&self) -> CoverageReport {
        let files = self.analyzer.discover();
        self.check_files(&files)
    }

    /// Check only files changed in `range`. When none of the required files
    /// changed the report is trivially perfect.
    pub fn check_scoped(&self, range: &DiffRange) -> CoverageReport {
        let changed = git::changed_source_files(self.analyzer.root(), range);
        info!("{} changed source files in {}", changed.len(), range);

        let files: Vec<CodeFileAnalysis> = self
            .analyzer
            .discover()
            .into_iter()
            .filter(|file| changed.contains(&file.path))
            .collect();

        if files.is_empty() {
            info!("No changed files require documentation");
            return CoverageReport::perfect();
        }
        self.check_files(&files)
    }

    /// Match, grade and aggregate already-analyzed files
    pub fn check_files(&self, files: &[CodeFileAnalysis]) -> CoverageReport {
        let docs = self.assessor.find_docs(files);
        info!("{} meaningful documentation files", docs.len());

        let outcomes: Vec<FileOutcome> = files
            .par_iter()
            .map(|file| self.outcome(file, docs.get(&file.path)))
            .collect();
        outcomes
            .into_iter()
            .fold(Tally::default(), Tally::record)
            .into_report()
    }

    fn outcome(&self, file: &CodeFileAnalysis, doc: Option<&PathBuf>) -> FileOutcome {
        let required_sections = self.config.required_sections_for(file.file_type).to_vec();

        let Some(doc) = doc else {
            return FileOutcome::Missing {
                gap: DocumentationGap {
                    code_file: file.path.clone(),
                    expected_doc_path: self.assessor.expected_doc_path(&file.path),
                    gap_type: GapType::Missing,
                    file_type: file.file_type,
                    priority: file.priority,
                    required_sections,
                    quality_issues: vec![MISSING_DOC_ISSUE.to_string()],
                    estimated_effort: quality::estimate_effort_for_missing(file.priority),
                },
            };
        };

        let assessed = self.assessor.assess(doc, file.file_type, file.priority);
        let score = assessed.quality_score;
        if score >= self.config.minimum_quality_score() {
            return FileOutcome::Adequate { score };
        }

        FileOutcome::Inadequate {
            score,
            gap: DocumentationGap {
                code_file: file.path.clone(),
                expected_doc_path: doc.clone(),
                gap_type: GapType::Inadequate,
                file_type: file.file_type,
                priority: file.priority,
                required_sections,
                estimated_effort: quality::estimate_effort(&assessed),
                quality_issues: assessed.missing_sections,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Effort, FileType, Priority};
    use std::path::Path;

    fn gap(
        path: &str,
        gap_type: GapType,
        priority: Priority,
        file_type: FileType,
    ) -> DocumentationGap {
        DocumentationGap {
            code_file: PathBuf::from(path),
            expected_doc_path: Path::new(path).with_file_name("index.md"),
            gap_type,
            file_type,
            priority,
            required_sections: Vec::new(),
            quality_issues: Vec::new(),
            estimated_effort: Effort::Low,
        }
    }

    fn outcomes() -> Vec<FileOutcome> {
        vec![
            FileOutcome::Adequate { score: 0.9 },
            FileOutcome::Inadequate {
                score: 0.3,
                gap: gap("b.ts", GapType::Inadequate, Priority::High, FileType::Service),
            },
            FileOutcome::Missing {
                gap: gap("a.ts", GapType::Missing, Priority::Critical, FileType::Service),
            },
            FileOutcome::Missing {
                gap: gap("c.tsx", GapType::Missing, Priority::Low, FileType::Component),
            },
        ]
    }

    #[test]
    fn test_empty_tally_is_full_coverage() {
        let report = Tally::default().into_report();
        assert_eq!(report.coverage_percentage, 100.0);
        assert_eq!(report.quality_score, 0.0);
        assert_eq!(report.by_priority.len(), 4);
    }

    #[test]
    fn test_tally_report() {
        let report = outcomes()
            .into_iter()
            .fold(Tally::default(), Tally::record)
            .into_report();

        assert_eq!(report.total_code_files, 4);
        assert_eq!(report.documented_files, 2);
        assert_eq!(report.adequately_documented, 1);
        assert_eq!(report.missing_documentation, 2);
        assert_eq!(report.inadequate_documentation, 1);
        assert_eq!(report.coverage_percentage, 25.0);
        assert!((report.quality_score - 0.6).abs() < 1e-9);
        assert_eq!(report.by_priority[&Priority::Critical], 1);
        assert_eq!(report.by_priority[&Priority::Medium], 0);
        assert_eq!(report.by_file_type[&FileType::Service].missing, 1);
        assert_eq!(report.by_file_type[&FileType::Service].inadequate, 1);
        assert_eq!(report.by_file_type[&FileType::Component].missing, 1);

        let order: Vec<_> = report.gaps.iter().map(|g| g.code_file.clone()).collect();
        assert_eq!(
            order,
            vec![PathBuf::from("a.ts"), PathBuf::from("b.ts"), PathBuf::from("c.tsx")]
        );
    }

    #[test]
    fn test_merge_grouping_does_not_matter() {
        let all = outcomes();
        let sequential = all.iter().cloned().fold(Tally::default(), Tally::record);
        let (left, right) = all.split_at(2);
        let merged = left
            .iter()
            .cloned()
            .fold(Tally::default(), Tally::record)
            .merge(right.iter().cloned().fold(Tally::default(), Tally::record));

        let a = sequential.into_report();
        let mut b = merged.into_report();
        b.timestamp = a.timestamp.clone();
        assert_eq!(a, b);
    }
}
