//! Offline asset cache policy used by the service worker.
//!
//! The manifest (cache version + asset list) is embedded from `assets.json`.
//! The fetch policy is network-first: a good network response is copied into
//! the cache before it is returned; if the network fails, a cached copy is
//! served; if there is none, the network error goes back to the caller.
//!
//! The policy is written against the small [`Network`] and [`AssetCache`]
//! traits so it runs on the host in tests; the service worker binary supplies
//! the browser implementations.

use log::{debug, warn};
use serde::Deserialize;
use std::fmt;

const EMBEDDED_MANIFEST: &str = include_str!("../assets.json");

#[derive(Debug)]
pub enum CacheError {
    Manifest(String),
    Network(String),
    Storage(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Manifest(msg) => write!(f, "Invalid asset manifest: {}", msg),
            CacheError::Network(msg) => write!(f, "Network request failed: {}", msg),
            CacheError::Storage(msg) => write!(f, "Cache storage failed: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::Manifest(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CacheManifest {
    pub version: String,
    pub assets: Vec<String>,
}

impl CacheManifest {
    pub fn embedded() -> Result<Self, CacheError> {
        Self::from_json(EMBEDDED_MANIFEST)
    }

    pub fn from_json(json: &str) -> Result<Self, CacheError> {
        let manifest: CacheManifest = serde_json::from_str(json)?;
        if manifest.version.trim().is_empty() {
            return Err(CacheError::Manifest("empty cache version".to_string()));
        }
        Ok(manifest)
    }

    /// Cache names left over from other versions, in the order given.
    pub fn stale<'a, I>(&self, cache_names: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        cache_names
            .into_iter()
            .filter(|name| *name != self.version)
            .collect()
    }
}

/// The network side of a fetch.
#[allow(async_fn_in_trait)]
pub trait Network {
    type Request;
    type Response;

    async fn fetch(&self, request: &Self::Request) -> Result<Self::Response, CacheError>;

    /// Whether the response is good enough to keep for offline use.
    fn is_success(&self, response: &Self::Response) -> bool;

    /// Copy a response so one copy can be stored and the other returned.
    fn duplicate(&self, response: &Self::Response) -> Result<Self::Response, CacheError>;
}

/// A named cache holding responses keyed by request.
#[allow(async_fn_in_trait)]
pub trait AssetCache<Req, Resp> {
    async fn lookup(&self, request: &Req) -> Result<Option<Resp>, CacheError>;
    async fn store(&self, request: &Req, response: Resp) -> Result<(), CacheError>;
}

/// Serve `request` network-first with cache fallback.
pub async fn network_first<N, S>(
    network: &N,
    cache: &S,
    request: &N::Request,
) -> Result<N::Response, CacheError>
where
    N: Network,
    S: AssetCache<N::Request, N::Response>,
{
    match network.fetch(request).await {
        Ok(response) => {
            if network.is_success(&response) {
                match network.duplicate(&response) {
                    Ok(copy) => {
                        if let Err(e) = cache.store(request, copy).await {
                            warn!("Keeping network response uncached: {}", e);
                        }
                    }
                    Err(e) => warn!("Could not copy response for caching: {}", e),
                }
            }
            Ok(response)
        }
        Err(network_err) => {
            debug!("Network failed, trying cache: {}", network_err);
            match cache.lookup(request).await {
                Ok(Some(cached)) => Ok(cached),
                Ok(None) => Err(network_err),
                Err(e) => {
                    warn!("Cache lookup failed: {}", e);
                    Err(network_err)
                }
            }
        }
    }
}
