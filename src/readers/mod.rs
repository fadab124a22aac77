pub mod feed_reader;

pub use feed_reader::{FeedReader, FetchBatch, ReadingFetcher};
