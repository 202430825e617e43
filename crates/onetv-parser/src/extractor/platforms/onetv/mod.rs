mod builder;
mod channel;
mod live;
pub mod models;
mod session;
mod vod;

pub use builder::{OneTv, OneTvEndpoints};
pub use channel::{
    CHANNEL_ALIASES, Channel, ChannelRequest, can_handle_url, classify, resolve_alias,
};
pub use session::SessionCredentials;
pub use vod::{VodStreams, find_vod_data_path};
