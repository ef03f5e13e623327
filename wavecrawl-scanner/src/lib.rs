pub mod error;
pub mod fetch;
pub mod normalize;
pub mod result;
pub mod wave;

pub use error::ScanError;
pub use fetch::{HttpFetcher, PageFetcher, extract_links};
pub use normalize::{Normalizer, normalize, unique};
pub use result::LinkSet;
pub use wave::scan;
