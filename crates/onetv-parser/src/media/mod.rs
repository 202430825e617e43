pub mod formats;
pub mod media_info;
pub mod stream_info;
pub mod stream_set;
pub mod weight;

pub use formats::{MediaFormat, StreamFormat};
pub use media_info::MediaInfo;
pub use stream_info::StreamInfo;
pub use stream_set::StreamSet;
pub use weight::{Dimension, StreamWeight, compare_weights, stream_weight};
