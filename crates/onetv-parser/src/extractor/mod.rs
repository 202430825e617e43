mod default;
pub mod error;
pub mod factory;
pub mod platform_extractor;
pub mod platforms;
pub mod utils;

pub use default::{ProxyConfig, create_client, default_client, default_factory, factory_with_proxy};

pub mod dash_extractor;
pub mod hls_extractor;
pub mod manifest;
