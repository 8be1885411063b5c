use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::Proxy;
use rtinject_core::Error;
use tracing::{debug, info};

use crate::{ProxyConfig, ProxyResolver};

pub const REACHABILITY_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("rtinject/", env!("CARGO_PKG_VERSION"));
const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reachability {
    pub status: u16,
    pub reachable: bool,
}

/// Blocking client routed through `proxy`, or explicitly direct when `None`.
pub fn build_client(proxy: Option<&ProxyConfig>, timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    builder = match proxy {
        Some(config) => {
            let mut proxy = Proxy::all(config.url())
                .with_context(|| format!("failed to configure proxy {config}"))?;
            if let Some(auth) = &config.auth {
                proxy = proxy.basic_auth(&auth.username, &auth.password);
            }
            builder.proxy(proxy)
        }
        None => builder.no_proxy(),
    };
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("failed to build HTTP client")
}

pub fn download_to_file(resolver: &ProxyResolver, url: &str, dest: &Path) -> Result<u64> {
    download_to_file_with_progress(resolver, url, dest, |_, _| {})
}

/// Streams `url` into `dest`, reporting `(downloaded, total)` after each chunk.
///
/// The body is written to a `.part` sibling first and renamed into place once
/// complete, so `dest` never holds a truncated download.
pub fn download_to_file_with_progress<F>(
    resolver: &ProxyResolver,
    url: &str,
    dest: &Path,
    mut on_progress: F,
) -> Result<u64>
where
    F: FnMut(u64, Option<u64>),
{
    let proxy = resolver.resolve_for_url(url)?;
    match &proxy {
        Some(config) => debug!(url, proxy = %config, "downloading through proxy"),
        None => debug!(url, "downloading directly"),
    }
    let client = build_client(proxy.as_ref(), None)?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create download dir: {}", parent.display()))?;
    }
    let part_path = dest.with_file_name(format!(
        "{}.part",
        dest.file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("download")
    ));

    let result = stream_to_file(&client, url, &part_path, &mut on_progress);
    let downloaded = match result {
        Ok(downloaded) => downloaded,
        Err(err) => {
            let _ = fs::remove_file(&part_path);
            return Err(err);
        }
    };

    fs::rename(&part_path, dest)
        .with_context(|| format!("failed to move download into place: {}", dest.display()))?;
    info!(url, bytes = downloaded, "download complete");
    Ok(downloaded)
}

fn stream_to_file<F>(client: &Client, url: &str, path: &Path, on_progress: &mut F) -> Result<u64>
where
    F: FnMut(u64, Option<u64>),
{
    let failure = |reason: String| Error::DownloadFailure {
        url: url.to_string(),
        reason,
    };

    let mut response = client
        .get(url)
        .send()
        .map_err(|err| failure(err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(failure(format!("HTTP status {status}")).into());
    }

    let total = response.content_length();
    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut buffer = vec![0_u8; CHUNK_SIZE];
    let mut downloaded = 0_u64;
    loop {
        let read = response
            .read(&mut buffer)
            .map_err(|err| failure(err.to_string()))?;
        if read == 0 {
            break;
        }
        file.write_all(&buffer[..read])
            .with_context(|| format!("failed to write {}", path.display()))?;
        downloaded += read as u64;
        on_progress(downloaded, total);
    }
    file.flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;

    if downloaded == 0 {
        on_progress(0, total);
    }
    Ok(downloaded)
}

/// HEAD request with a short timeout. Transport errors are reported as
/// `DownloadFailure`; HTTP error statuses come back as unreachable.
pub fn check_url_reachable(resolver: &ProxyResolver, url: &str) -> Result<Reachability> {
    let proxy = resolver.resolve_for_url(url)?;
    let client = build_client(proxy.as_ref(), Some(REACHABILITY_TIMEOUT))?;
    let response = client
        .head(url)
        .send()
        .map_err(|err| Error::DownloadFailure {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
    let status = response.status();
    Ok(Reachability {
        status: status.as_u16(),
        reachable: status.is_success() || status.is_redirection(),
    })
}
