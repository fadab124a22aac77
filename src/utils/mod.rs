pub mod constants;
pub mod dedup;
pub mod progress;
pub mod url;

pub use constants::*;
pub use dedup::dedup_first_by;
pub use progress::ProgressReporter;
pub use url::trailing_segment;
