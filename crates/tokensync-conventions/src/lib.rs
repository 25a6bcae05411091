mod conventions;
mod detector;
pub mod heuristics;

pub use conventions::{
    ConventionDimension, ConventionSource, DetectedConventions, Detection, HexCase, ImportStyle,
    KotlinArchitecture, NamingCase, ScssColorStructure, Separator, SwiftContainer,
    SwiftPrimitiveFormat, SwiftSemanticFormat,
};
pub use detector::ConventionDetector;
