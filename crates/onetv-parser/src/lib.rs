pub mod extractor;
pub mod media;
