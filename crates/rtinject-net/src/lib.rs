mod download;
mod proxy;

pub use download::{
    build_client, check_url_reachable, download_to_file, download_to_file_with_progress,
    Reachability, REACHABILITY_TIMEOUT,
};
pub use proxy::{
    is_no_proxy_match, parse_proxy_url, ProxyAuth, ProxyConfig, ProxyOptions, ProxyResolver,
};
