//! Service worker keeping the app usable offline.
//!
//! `sw.js` registers the install/activate/fetch listeners and forwards each
//! event to the exports below once this module has loaded.

use js_sys::{Array, Promise};
use log::{info, warn};
use multi_timer::cache::{network_first, AssetCache, CacheError, CacheManifest, Network};
use multi_timer::config::DEFAULT_LOG_LEVEL;
use multi_timer::logging;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Cache, CacheStorage, Request, Response, ServiceWorkerGlobalScope};

fn scope() -> ServiceWorkerGlobalScope {
    js_sys::global().unchecked_into()
}

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn to_js(err: CacheError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

async fn await_promise(promise: Promise) -> Result<JsValue, JsValue> {
    JsFuture::from(promise).await
}

fn storage() -> Result<CacheStorage, CacheError> {
    scope()
        .caches()
        .map_err(|e| CacheError::Storage(js_message(&e)))
}

async fn open_cache(storage: &CacheStorage, name: &str) -> Result<Cache, CacheError> {
    await_promise(storage.open(name))
        .await
        .map(|cache| cache.unchecked_into())
        .map_err(|e| CacheError::Storage(js_message(&e)))
}

struct WorkerNetwork {
    scope: ServiceWorkerGlobalScope,
}

impl Network for WorkerNetwork {
    type Request = Request;
    type Response = Response;

    async fn fetch(&self, request: &Request) -> Result<Response, CacheError> {
        await_promise(self.scope.fetch_with_request(request))
            .await
            .map(|resp| resp.unchecked_into())
            .map_err(|e| CacheError::Network(js_message(&e)))
    }

    fn is_success(&self, response: &Response) -> bool {
        response.ok()
    }

    fn duplicate(&self, response: &Response) -> Result<Response, CacheError> {
        response
            .clone()
            .map_err(|e| CacheError::Storage(js_message(&e)))
    }
}

struct WorkerCache {
    cache: Cache,
}

impl AssetCache<Request, Response> for WorkerCache {
    async fn lookup(&self, request: &Request) -> Result<Option<Response>, CacheError> {
        let found = await_promise(self.cache.match_with_request(request))
            .await
            .map_err(|e| CacheError::Storage(js_message(&e)))?;
        if found.is_undefined() || found.is_null() {
            Ok(None)
        } else {
            Ok(Some(found.unchecked_into()))
        }
    }

    async fn store(&self, request: &Request, response: Response) -> Result<(), CacheError> {
        await_promise(self.cache.put_with_request(request, &response))
            .await
            .map(|_| ())
            .map_err(|e| CacheError::Storage(js_message(&e)))
    }
}

/// Pre-cache every asset of the current version.
#[wasm_bindgen]
pub async fn handle_install() -> Result<(), JsValue> {
    let manifest = CacheManifest::embedded().map_err(to_js)?;
    let cache = open_cache(&storage().map_err(to_js)?, &manifest.version)
        .await
        .map_err(to_js)?;

    let assets: Array = manifest.assets.iter().map(|a| JsValue::from_str(a)).collect();
    await_promise(cache.add_all_with_str_sequence(&assets)).await?;
    info!("Cached {} assets as {}", manifest.assets.len(), manifest.version);

    if let Ok(skip) = scope().skip_waiting() {
        await_promise(skip).await?;
    }
    Ok(())
}

/// Delete caches from older versions and take over open pages.
#[wasm_bindgen]
pub async fn handle_activate() -> Result<(), JsValue> {
    let manifest = CacheManifest::embedded().map_err(to_js)?;
    let storage = storage().map_err(to_js)?;

    let keys: Array = await_promise(storage.keys()).await?.unchecked_into();
    let names: Vec<String> = keys.iter().filter_map(|k| k.as_string()).collect();
    let deletions = manifest
        .stale(names.iter().map(String::as_str))
        .into_iter()
        .map(|name| {
            info!("Deleting stale cache {}", name);
            await_promise(storage.delete(name))
        });
    for result in futures::future::join_all(deletions).await {
        if let Err(e) = result {
            warn!("Failed to delete stale cache: {}", js_message(&e));
        }
    }

    await_promise(scope().clients().claim()).await?;
    Ok(())
}

/// Network-first fetch with cache fallback. Non-GET requests bypass the cache.
#[wasm_bindgen]
pub async fn handle_fetch(request: Request) -> Result<Response, JsValue> {
    let network = WorkerNetwork { scope: scope() };
    if request.method() != "GET" {
        return network.fetch(&request).await.map_err(to_js);
    }

    let manifest = CacheManifest::embedded().map_err(to_js)?;
    let cache = match storage() {
        Ok(storage) => open_cache(&storage, &manifest.version).await,
        Err(e) => Err(e),
    };
    match cache {
        Ok(cache) => network_first(&network, &WorkerCache { cache }, &request)
            .await
            .map_err(to_js),
        Err(e) => {
            warn!("Cache unavailable, going to network only: {}", e);
            network.fetch(&request).await.map_err(to_js)
        }
    }
}

fn main() {
    // Set the panic hook to log detailed errors to the console
    console_error_panic_hook::set_once();
    logging::init(DEFAULT_LOG_LEVEL);
}
