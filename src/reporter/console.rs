//! Console reporter with colored output

use crate::{CoverageReport, DocumentationGap, GapType, Priority};
use colored::{ColoredString, Colorize};

/// Gaps listed per priority before the rest are summarized
const MAX_GAPS_PER_PRIORITY: usize = 10;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to list every gap
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// List every gap instead of the first few per priority
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Print the summary and gap list
    pub fn report(&self, report: &CoverageReport, minimum_coverage: f64) {
        print!("{}", self.render(report, minimum_coverage));
    }

    /// Print a single summary line
    pub fn report_quiet(&self, report: &CoverageReport) {
        println!("{}", self.render_quiet(report));
    }

    pub fn render_quiet(&self, report: &CoverageReport) -> String {
        format!(
            "coverage: {:.1}% ({}/{} adequate, {} gaps)",
            report.coverage_percentage,
            report.adequately_documented,
            report.total_code_files,
            report.gaps.len()
        )
    }

    pub fn render(&self, report: &CoverageReport, minimum_coverage: f64) -> String {
        let mut lines = self.summary_lines(report, minimum_coverage);
        if !report.gaps.is_empty() {
            lines.extend(self.gap_lines(report));
        }
        lines.iter().map(|line| format!("{line}\n")).collect()
    }

    fn summary_lines(&self, report: &CoverageReport, minimum_coverage: f64) -> Vec<String> {
        vec![
            String::new(),
            self.paint("Documentation Coverage", |s| s.bold()),
            "=".repeat(60),
            format!(
                "   Coverage: {} (minimum {:.1}%)",
                self.coverage_bar(report.coverage_percentage, minimum_coverage),
                minimum_coverage
            ),
            format!("   Quality:  {:.2}", report.quality_score),
            format!(
                "   Required: {} | Documented: {} | Adequate: {} | Missing: {} | Inadequate: {}",
                report.total_code_files,
                report.documented_files,
                report.adequately_documented,
                report.missing_documentation,
                report.inadequate_documentation
            ),
            String::new(),
        ]
    }

    fn gap_lines(&self, report: &CoverageReport) -> Vec<String> {
        let mut lines = vec![format!("   {}", self.paint("Gaps by priority:", |s| s.bold()))];
        for priority in Priority::ALL {
            let gaps: Vec<&DocumentationGap> =
                report.gaps.iter().filter(|g| g.priority == priority).collect();
            if gaps.is_empty() {
                continue;
            }

            let heading = format!("{} ({})", priority.as_str().to_uppercase(), gaps.len());
            lines.push(format!("   {}", self.colorize_priority(priority, heading)));

            let shown = if self.verbose {
                gaps.len()
            } else {
                gaps.len().min(MAX_GAPS_PER_PRIORITY)
            };
            lines.extend(gaps[..shown].iter().map(|gap| self.gap_line(gap)));
            if shown < gaps.len() {
                lines.push(format!(
                    "     ... {} more (use --verbose to show)",
                    gaps.len() - shown
                ));
            }
        }
        lines.push(String::new());
        lines
    }

    fn gap_line(&self, gap: &DocumentationGap) -> String {
        match gap.gap_type {
            GapType::Missing => format!(
                "     {} {} [{}] create {} (effort: {})",
                self.paint("x", |s| s.red()),
                gap.code_file.display(),
                gap.file_type,
                gap.expected_doc_path.display(),
                gap.estimated_effort
            ),
            GapType::Inadequate => {
                let issues = if gap.quality_issues.is_empty() {
                    "low quality score".to_string()
                } else {
                    format!("missing {}", gap.quality_issues.join(", "))
                };
                format!(
                    "     {} {} [{}] improve {}: {} (effort: {})",
                    self.paint("!", |s| s.yellow()),
                    gap.code_file.display(),
                    gap.file_type,
                    gap.expected_doc_path.display(),
                    issues,
                    gap.estimated_effort
                )
            }
        }
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.use_colors {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn colorize_priority(&self, priority: Priority, text: String) -> String {
        if !self.use_colors {
            return text;
        }
        match priority {
            Priority::Critical => text.red().bold().to_string(),
            Priority::High => text.red().to_string(),
            Priority::Medium => text.yellow().to_string(),
            Priority::Low => text.dimmed().to_string(),
        }
    }

    fn coverage_bar(&self, coverage: f64, minimum: f64) -> String {
        let filled = ((coverage.clamp(0.0, 100.0) / 100.0) * 20.0).round() as usize;
        let bar = format!(
            "[{}{}] {:>5.1}%",
            "#".repeat(filled),
            "-".repeat(20 - filled),
            coverage
        );

        if !self.use_colors {
            bar
        } else if coverage >= minimum {
            bar.green().to_string()
        } else if coverage >= minimum * 0.75 {
            bar.yellow().to_string()
        } else {
            bar.red().to_string()
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Effort, FileType};
    use std::path::PathBuf;

    fn gap(path: &str, gap_type: GapType, priority: Priority) -> DocumentationGap {
        DocumentationGap {
            code_file: PathBuf::from(path),
            expected_doc_path: PathBuf::from("src/lib/services/index.md"),
            gap_type,
            file_type: FileType::Service,
            priority,
            required_sections: Vec::new(),
            quality_issues: match gap_type {
                GapType::Missing => vec!["Documentation file does not exist".to_string()],
                GapType::Inadequate => vec!["usage".to_string(), "examples".to_string()],
            },
            estimated_effort: Effort::Medium,
        }
    }

    fn report() -> CoverageReport {
        let mut report = CoverageReport::perfect();
        report.total_code_files = 4;
        report.documented_files = 3;
        report.adequately_documented = 2;
        report.missing_documentation = 1;
        report.inadequate_documentation = 1;
        report.coverage_percentage = 50.0;
        report.quality_score = 0.65;
        report.gaps = vec![
            gap("src/lib/services/a.ts", GapType::Missing, Priority::Critical),
            gap("src/lib/services/b.ts", GapType::Inadequate, Priority::Low),
        ];
        report
    }

    #[test]
    fn test_render_summary() {
        let out = ConsoleReporter::new().without_colors().render(&report(), 85.0);
        assert!(out.contains("Documentation Coverage"));
        assert!(out.contains(" 50.0%"));
        assert!(out.contains("minimum 85.0%"));
        assert!(out.contains("Quality:  0.65"));
        assert!(
            out.contains("Required: 4 | Documented: 3 | Adequate: 2 | Missing: 1 | Inadequate: 1")
        );
    }

    #[test]
    fn test_render_groups_gaps_by_priority() {
        let out = ConsoleReporter::new().without_colors().render(&report(), 85.0);
        let critical = out.find("CRITICAL (1)").unwrap();
        let low = out.find("LOW (1)").unwrap();
        assert!(critical < low);
        assert!(!out.contains("HIGH ("));
        assert!(out.contains("src/lib/services/a.ts [service] create src/lib/services/index.md"));
        assert!(out.contains("missing usage, examples"));
    }

    #[test]
    fn test_render_is_newline_terminated_lines() {
        let out = ConsoleReporter::new()
            .without_colors()
            .render(&CoverageReport::perfect(), 85.0);
        assert!(out.starts_with("\nDocumentation Coverage\n====="));
        assert!(out.ends_with("Inadequate: 0\n\n"));
    }

    #[test]
    fn test_render_without_gaps_has_no_gap_section() {
        let out = ConsoleReporter::new()
            .without_colors()
            .render(&CoverageReport::perfect(), 85.0);
        assert!(!out.contains("Gaps by priority"));
        assert!(out.contains("100.0%"));
    }

    #[test]
    fn test_long_gap_lists_are_truncated_unless_verbose() {
        let mut r = report();
        r.gaps = (0..12)
            .map(|i| gap(&format!("src/lib/services/s{i:02}.ts"), GapType::Missing, Priority::High))
            .collect();

        let out = ConsoleReporter::new().without_colors().render(&r, 85.0);
        assert!(out.contains("... 2 more"));
        assert!(!out.contains("s11.ts"));

        let out = ConsoleReporter::new().without_colors().verbose().render(&r, 85.0);
        assert!(!out.contains("more (use --verbose"));
        assert!(out.contains("s11.ts"));
    }

    #[test]
    fn test_render_quiet() {
        let line = ConsoleReporter::new().render_quiet(&report());
        assert_eq!(line, "coverage: 50.0% (2/4 adequate, 2 gaps)");
    }
}
