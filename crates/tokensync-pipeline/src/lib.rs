//! Request orchestration: normalize, build the alias graph, detect conventions, emit, analyze.

mod dedup;
mod generator;
mod lint;
mod request;

pub use dedup::WarningDeduplicator;
pub use generator::Generator;
pub use lint::Linter;
pub use request::{Category, GenerationConfig, GenerationOutput, GenerationRequest};

pub use tokensync_analyzer::{ConsistencyReport, FileAnalysis};
pub use tokensync_conventions::DetectedConventions;
