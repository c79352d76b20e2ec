//! Analyzer module - source discovery and classification

pub mod classify;
pub mod discovery;
pub mod signals;

pub use discovery::CodeAnalyzer;
pub use signals::{RegexSignalExtractor, SignalExtractor, SourceSignals};
