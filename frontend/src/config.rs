use serde::{Deserialize, Serialize};
use std::{sync::OnceLock, time::Duration};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_AUTH_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub api_base_url: Option<String>,
    pub auth_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub api_base_url: String,
    pub auth_timeout: Duration,
}

impl RuntimeConfig {
    /// Keeps the values already set and takes the rest from `fallback`.
    pub fn or(self, fallback: RuntimeConfig) -> RuntimeConfig {
        RuntimeConfig {
            api_base_url: self.api_base_url.or(fallback.api_base_url),
            auth_timeout_ms: self.auth_timeout_ms.or(fallback.auth_timeout_ms),
        }
    }

    fn is_complete(&self) -> bool {
        self.api_base_url.is_some() && self.auth_timeout_ms.is_some()
    }

    pub fn resolve(self) -> ResolvedConfig {
        let api_base_url = self
            .api_base_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let timeout_ms = self
            .auth_timeout_ms
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_AUTH_TIMEOUT_MS);
        ResolvedConfig {
            api_base_url,
            auth_timeout: Duration::from_millis(timeout_ms),
        }
    }
}

static RESOLVED: OnceLock<ResolvedConfig> = OnceLock::new();

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::RuntimeConfig;
    use anyhow::{anyhow, bail, Context};
    use wasm_bindgen::JsValue;

    fn read_field(obj: &js_sys::Object, keys: &[&str]) -> Option<JsValue> {
        keys.iter().find_map(|key| {
            js_sys::Reflect::get(obj, &(*key).into())
                .ok()
                .filter(|v| !v.is_undefined() && !v.is_null())
        })
    }

    fn read_global(name: &str) -> RuntimeConfig {
        let Some(w) = web_sys::window() else {
            return RuntimeConfig::default();
        };
        let any = match js_sys::Reflect::get(&w, &name.into()) {
            Ok(v) if !v.is_undefined() && !v.is_null() => v,
            _ => return RuntimeConfig::default(),
        };
        let obj = js_sys::Object::from(any);
        let api_base_url =
            read_field(&obj, &["API_BASE_URL", "api_base_url"]).and_then(|v| v.as_string());
        let auth_timeout_ms = read_field(&obj, &["AUTH_TIMEOUT_MS", "auth_timeout_ms"])
            .and_then(|v| {
                v.as_f64()
                    .map(|n| n as u64)
                    .or_else(|| v.as_string().and_then(|s| s.trim().parse().ok()))
            });
        RuntimeConfig {
            api_base_url,
            auth_timeout_ms,
        }
    }

    /// `window.__HOSPITAL_ENV` (env.js) wins over `window.__HOSPITAL_CONFIG`.
    pub(super) fn snapshot_from_globals() -> RuntimeConfig {
        read_global("__HOSPITAL_ENV").or(read_global("__HOSPITAL_CONFIG"))
    }

    pub(super) fn write_window_config(cfg: &RuntimeConfig) {
        let Some(w) = web_sys::window() else {
            return;
        };
        let obj = js_sys::Object::new();
        if let Some(url) = &cfg.api_base_url {
            let _ = js_sys::Reflect::set(&obj, &"api_base_url".into(), &JsValue::from_str(url));
        }
        if let Some(ms) = cfg.auth_timeout_ms {
            let _ = js_sys::Reflect::set(
                &obj,
                &"auth_timeout_ms".into(),
                &JsValue::from_f64(ms as f64),
            );
        }
        let _ = js_sys::Reflect::set(&w, &"__HOSPITAL_CONFIG".into(), &obj);
    }

    pub(super) async fn fetch_runtime_config() -> anyhow::Result<RuntimeConfig> {
        let origin = web_sys::window()
            .ok_or_else(|| anyhow!("no global `window` exists"))?
            .location()
            .origin()
            .map_err(|_| anyhow!("window.location.origin is unavailable"))?;
        let resp = reqwest::get(format!("{}/config.json", origin))
            .await
            .context("failed to request config.json")?;
        if !resp.status().is_success() {
            bail!("config.json returned {}", resp.status());
        }
        resp.json::<RuntimeConfig>()
            .await
            .context("config.json is not valid runtime config")
    }
}

#[cfg(target_arch = "wasm32")]
use browser::{fetch_runtime_config, snapshot_from_globals, write_window_config};

#[cfg(not(target_arch = "wasm32"))]
fn snapshot_from_globals() -> RuntimeConfig {
    RuntimeConfig::default()
}

#[cfg(not(target_arch = "wasm32"))]
fn write_window_config(_cfg: &RuntimeConfig) {}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch_runtime_config() -> anyhow::Result<RuntimeConfig> {
    anyhow::bail!("runtime config is only served to the browser build")
}

pub async fn await_config() -> ResolvedConfig {
    if let Some(cached) = RESOLVED.get() {
        return cached.clone();
    }
    let mut cfg = snapshot_from_globals();
    if !cfg.is_complete() {
        match fetch_runtime_config().await {
            Ok(fetched) => {
                write_window_config(&fetched);
                cfg = cfg.or(fetched);
            }
            Err(err) => log::debug!("Using built-in runtime config defaults: {:#}", err),
        }
    }
    let resolved = cfg.resolve();
    RESOLVED.get_or_init(|| resolved).clone()
}

pub async fn await_api_base_url() -> String {
    await_config().await.api_base_url
}

pub async fn await_auth_timeout() -> Duration {
    await_config().await.auth_timeout
}

pub async fn init() {
    let cfg = await_config().await;
    log::info!(
        "Runtime config initialized (api: {}, auth timeout: {:?})",
        cfg.api_base_url,
        cfg.auth_timeout
    );
}
