pub mod exploder;
pub mod normalizer;
pub mod partitioner;
pub mod pipeline;

pub use exploder::ForecastExploder;
pub use normalizer::ReadingNormalizer;
pub use partitioner::{Partition, SchemaPartitioner};
pub use pipeline::TransformPipeline;
