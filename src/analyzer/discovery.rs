//! Source discovery and per-file analysis

use super::classify::{self, FileFacts};
use super::signals::{RegexSignalExtractor, SignalExtractor, SourceSignals};
use crate::config::Config;
use crate::{CodeFileAnalysis, Language, Priority};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Extensions probed when looking for a file's tests
const TEST_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Discovers source files under a root and classifies each one
pub struct CodeAnalyzer {
    config: Arc<Config>,
    root: PathBuf,
    extractor: Box<dyn SignalExtractor>,
}

impl CodeAnalyzer {
    pub fn new(config: Arc<Config>, root: PathBuf) -> Self {
        Self {
            config,
            root: normalize_root(root),
            extractor: Box::new(RegexSignalExtractor::new()),
        }
    }

    /// Swap the export/complexity extractor
    pub fn with_extractor(mut self, extractor: Box<dyn SignalExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Analyze every configured source file and keep the ones that need docs.
    /// The result is sorted by path.
    pub fn discover(&self) -> Vec<CodeFileAnalysis> {
        let candidates: Vec<PathBuf> = self.candidate_paths().into_iter().collect();
        debug!("{} candidate source files", candidates.len());

        let mut required: Vec<CodeFileAnalysis> = candidates
            .par_iter()
            .map(|rel| self.analyze(rel))
            .filter(|analysis| analysis.documentation_required)
            .collect();
        required.sort_by(|a, b| a.path.cmp(&b.path));

        info!("{} code files requiring documentation", required.len());
        required
    }

    /// Root-relative paths matched by any file pattern and not excluded
    pub fn candidate_paths(&self) -> BTreeSet<PathBuf> {
        let root = self.root.to_string_lossy();
        let escaped_root = glob::Pattern::escape(root.trim_end_matches('/'));
        let mut paths = BTreeSet::new();

        for (label, pattern) in &self.config.code_analysis.file_patterns {
            let full = format!("{}/{}", escaped_root, pattern);
            let entries = match glob::glob(&full) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Skipping invalid file pattern {} ({}): {}", label, pattern, e);
                    continue;
                }
            };
            for entry in entries.flatten() {
                if !entry.is_file() {
                    continue;
                }
                let Ok(rel) = entry.strip_prefix(&self.root) else {
                    warn!(
                        "Skipping {}: not under root {}",
                        entry.display(),
                        self.root.display()
                    );
                    continue;
                };
                if !self.is_excluded(rel) {
                    paths.insert(rel.to_path_buf());
                }
            }
        }
        paths
    }

    /// Substring test of the root-relative path against each exclusion with
    /// its wildcards stripped
    pub fn is_excluded(&self, rel: &Path) -> bool {
        let haystack = slash_path(rel);
        self.config
            .code_analysis
            .exclude_patterns
            .iter()
            .map(|pattern| pattern.replace("**", "").replace('*', ""))
            .filter(|needle| !needle.is_empty())
            .any(|needle| haystack.contains(&needle))
    }

    /// Analyze one root-relative path. An unreadable file yields a
    /// non-required record rather than an error.
    pub fn analyze(&self, rel: &Path) -> CodeFileAnalysis {
        let rel_str = slash_path(rel);
        let content = match fs::read_to_string(self.root.join(rel)) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {}", rel.display(), e);
                return unreadable_record(rel, &rel_str);
            }
        };

        let SourceSignals {
            exported_functions,
            exported_classes,
            exported_types,
            exported_constants,
            complexity,
        } = self.extractor.extract(&content);

        let facts = FileFacts {
            file_type: classify::file_type_for(&rel_str),
            complexity,
            function_count: exported_functions.len(),
            class_count: exported_classes.len(),
            is_public_api: classify::is_public_api(&rel_str, &content),
            size_lines: content.lines().count(),
        };
        let thresholds = self.config.thresholds();
        let documentation_required = classify::requires_documentation(&facts, thresholds);
        let priority = classify::priority_for(&facts, thresholds);

        debug!(
            "{}: {} complexity={} required={} ({}) priority={}",
            rel_str,
            facts.file_type,
            complexity,
            documentation_required,
            classify::matching_rule(&classify::REQUIREMENT_RULES, &facts, thresholds)
                .unwrap_or("no rule"),
            priority
        );

        CodeFileAnalysis {
            path: rel.to_path_buf(),
            name: file_stem(rel),
            file_type: facts.file_type,
            language: classify::language_for(rel),
            size_lines: facts.size_lines,
            complexity_score: complexity,
            exported_functions,
            exported_classes,
            exported_types,
            exported_constants,
            has_tests: self.has_tests(rel),
            is_public_api: facts.is_public_api,
            documentation_required,
            priority,
        }
    }

    /// Sibling `.test`/`.spec` files or a `__tests__` entry for the same stem
    pub fn has_tests(&self, rel: &Path) -> bool {
        let abs = self.root.join(rel);
        let Some(dir) = abs.parent() else {
            return false;
        };
        let stem = file_stem(rel);
        let own_ext = rel.extension().and_then(|e| e.to_str());

        let mut extensions: Vec<&str> = own_ext.into_iter().collect();
        extensions.extend(TEST_EXTENSIONS.iter().filter(|e| Some(**e) != own_ext));

        extensions.iter().any(|ext| {
            [
                dir.join(format!("{stem}.test.{ext}")),
                dir.join(format!("{stem}.spec.{ext}")),
                dir.join("__tests__").join(format!("{stem}.{ext}")),
                dir.join("__tests__").join(format!("{stem}.test.{ext}")),
            ]
            .iter()
            .any(|candidate| candidate.is_file())
        })
    }
}

/// Absolute form of `root` so glob results strip back to relative paths.
/// A root that cannot be resolved keeps its lexical form without `.` parts.
fn normalize_root(root: PathBuf) -> PathBuf {
    match fs::canonicalize(&root) {
        Ok(resolved) => resolved,
        Err(e) => {
            warn!("Cannot resolve root {}: {}", root.display(), e);
            root.components()
                .filter(|c| !matches!(c, Component::CurDir))
                .collect()
        }
    }
}

fn unreadable_record(rel: &Path, rel_str: &str) -> CodeFileAnalysis {
    CodeFileAnalysis {
        path: rel.to_path_buf(),
        name: file_stem(rel),
        file_type: classify::file_type_for(rel_str),
        language: Language::Unknown,
        size_lines: 0,
        complexity_score: 0,
        exported_functions: BTreeSet::new(),
        exported_classes: BTreeSet::new(),
        exported_types: BTreeSet::new(),
        exported_constants: BTreeSet::new(),
        has_tests: false,
        is_public_api: false,
        documentation_required: false,
        priority: Priority::Low,
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Path with `/` separators on every platform
pub(crate) fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileType;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn analyzer(root: &Path) -> CodeAnalyzer {
        CodeAnalyzer::new(Arc::new(Config::default()), root.to_path_buf())
    }

    fn complex_body(branches: usize) -> String {
        (0..branches).map(|i| format!("if (x{i}) {{ y(); }}\n")).collect()
    }

    #[test]
    fn test_discover_keeps_required_files_sorted() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/lib/services/zeta.ts", "export function z() {}");
        write(dir.path(), "src/lib/services/alpha.ts", "export function a() {}");
        write(dir.path(), "src/components/Button.tsx", "export const Button = () => null;");
        // utility with one export and low complexity is not required
        write(dir.path(), "src/lib/utils/format.ts", "export function fmt() {}");

        let found = analyzer(dir.path()).discover();
        let paths: Vec<_> = found.iter().map(|a| slash_path(&a.path)).collect();

        assert_eq!(
            paths,
            vec![
                "src/components/Button.tsx",
                "src/lib/services/alpha.ts",
                "src/lib/services/zeta.ts",
            ]
        );
        assert!(found.iter().all(|a| a.documentation_required));
    }

    #[test]
    fn test_overlapping_patterns_are_analyzed_once() {
        let dir = TempDir::new().unwrap();
        // matched by both `services` and `lib_misc`
        write(dir.path(), "src/lib/services/auth.ts", "export function login() {}");

        let candidates = analyzer(dir.path()).candidate_paths();
        assert_eq!(candidates.len(), 1);
        assert_eq!(analyzer(dir.path()).discover().len(), 1);
    }

    #[test]
    fn test_exclusion_is_substring_of_stripped_pattern() {
        let dir = TempDir::new().unwrap();
        let a = analyzer(dir.path());
        assert!(a.is_excluded(Path::new("src/lib/__tests__/auth.ts")));
        assert!(a.is_excluded(Path::new("src/node_modules/pkg/index.ts")));
        assert!(a.is_excluded(Path::new("src/build/out.ts")));
        // `**/*.test.*` strips to `/.test.`, which a normal test file name does not contain
        assert!(!a.is_excluded(Path::new("src/lib/utils/format.test.ts")));
        assert!(!a.is_excluded(Path::new("src/lib/utils/format.ts")));
    }

    #[test]
    fn test_leading_slash_exclusion_does_not_match_relative_paths() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.code_analysis.exclude_patterns = vec!["*/src/*".to_string()];
        let a = CodeAnalyzer::new(Arc::new(config), dir.path().to_path_buf());

        assert!(!a.is_excluded(Path::new("src/lib/services/auth.ts")));
        assert!(a.is_excluded(Path::new("packages/web/src/index.ts")));
    }

    #[test]
    fn test_root_is_resolved_to_an_absolute_path() {
        let dir = TempDir::new().unwrap();
        let dotted = dir.path().join(".").join("sub").join(".");
        fs::create_dir_all(dir.path().join("sub")).unwrap();

        let a = analyzer(&dotted);
        assert!(a.root().is_absolute());
        assert!(!a.root().components().any(|c| c == Component::CurDir));
        assert!(a.root().ends_with("sub"));
    }

    #[test]
    fn test_unresolvable_root_drops_current_dir_parts() {
        let root = normalize_root(PathBuf::from("./does-not-exist-docgap/./src"));
        assert_eq!(root, PathBuf::from("does-not-exist-docgap/src"));
    }

    #[test]
    fn test_excluded_paths_are_not_candidates() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/lib/dist/bundle.ts", "export function b() {}");
        write(dir.path(), "src/lib/ok.ts", "export function ok() {}");

        let candidates = analyzer(dir.path()).candidate_paths();
        assert_eq!(
            candidates.into_iter().collect::<Vec<_>>(),
            vec![PathBuf::from("src/lib/ok.ts")]
        );
    }

    #[test]
    fn test_analyze_public_service() {
        let dir = TempDir::new().unwrap();
        let body = format!("export function run() {{\n{}}}\n", complex_body(34));
        write(dir.path(), "src/lib/services/billing.ts", &body);

        let analysis = analyzer(dir.path()).analyze(Path::new("src/lib/services/billing.ts"));

        assert_eq!(analysis.file_type, FileType::Service);
        assert_eq!(analysis.language, Language::TypeScript);
        assert_eq!(analysis.complexity_score, 35);
        assert_eq!(analysis.name, "billing");
        assert!(analysis.is_public_api);
        assert!(analysis.documentation_required);
        assert_eq!(analysis.priority, Priority::Critical);
        assert_eq!(analysis.size_lines, 36);
    }

    #[test]
    fn test_analyze_unreadable_file() {
        let dir = TempDir::new().unwrap();
        let analysis = analyzer(dir.path()).analyze(Path::new("src/components/Gone.tsx"));

        assert_eq!(analysis.file_type, FileType::Component);
        assert_eq!(analysis.language, Language::Unknown);
        assert_eq!(analysis.priority, Priority::Low);
        assert!(!analysis.documentation_required);
        assert_eq!(analysis.complexity_score, 0);
    }

    #[test]
    fn test_has_tests() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/lib/utils/a.ts", "");
        write(dir.path(), "src/lib/utils/a.test.ts", "");
        write(dir.path(), "src/lib/utils/b.ts", "");
        write(dir.path(), "src/lib/utils/__tests__/b.ts", "");
        write(dir.path(), "src/lib/utils/c.tsx", "");
        write(dir.path(), "src/lib/utils/c.spec.ts", "");
        write(dir.path(), "src/lib/utils/d.ts", "");

        let a = analyzer(dir.path());
        assert!(a.has_tests(Path::new("src/lib/utils/a.ts")));
        assert!(a.has_tests(Path::new("src/lib/utils/b.ts")));
        assert!(a.has_tests(Path::new("src/lib/utils/c.tsx")));
        assert!(!a.has_tests(Path::new("src/lib/utils/d.ts")));
    }

    #[test]
    fn test_custom_extractor() {
        struct Fixed;
        impl SignalExtractor for Fixed {
            fn extract(&self, _text: &str) -> SourceSignals {
                SourceSignals {
                    complexity: 99,
                    ..SourceSignals::default()
                }
            }
        }

        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/index.ts", "const x = 1;");
        let a = analyzer(dir.path()).with_extractor(Box::new(Fixed));
        let analysis = a.analyze(Path::new("src/index.ts"));

        assert_eq!(analysis.complexity_score, 99);
        assert!(analysis.documentation_required);
        assert_eq!(analysis.priority, Priority::Critical);
    }

    #[test]
    fn test_empty_root_discovers_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(analyzer(dir.path()).discover().is_empty());
    }
}
