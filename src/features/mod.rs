pub mod assembler;
pub mod extractor;

pub use assembler::{build_row, FeatureAssembler};
pub use extractor::FeatureExtractor;
