pub mod color;
pub mod graph;
pub mod normalizer;
pub mod types;
pub mod walker;

pub use color::{is_hex_color, ColorValue};
pub use graph::{CycleReport, GraphNode, TokenGraph, DEFAULT_MAX_DEPTH};
pub use normalizer::{detect_format, normalize, SourceFormat};
pub use types::{
    alias_extensions, alias_target_of, BorderValue, Dimension, FontWeightValue, GradientStop,
    GradientValue, ShadowLayer, TokenNode, TokenType, TokenValue, TransitionValue, TypographyValue,
};
pub use walker::{join_path, TokenGroup, TokenTree, TreeNode, UnknownTypeCounts};
