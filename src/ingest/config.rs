// src/ingest/config.rs
// Provider wiring from a TOML or JSON config file.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::providers::{
    hacker_news::{self, HackerNewsProvider},
    tech_rss::TechRssProvider,
};
use crate::ingest::SourceProvider;

const ENV_PATH: &str = "PROVIDERS_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderSpec {
    /// "hacker_news" or "rss".
    pub kind: String,
    /// Source tag; required for "rss", defaulted for "hacker_news".
    #[serde(default)]
    pub name: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct ProvidersFile {
    providers: Vec<ProviderSpec>,
}

/// Load provider specs from an explicit path. Supports TOML or JSON.
pub fn load_specs_from(path: &Path) -> Result<Vec<ProviderSpec>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading provider config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_specs(&content, ext.as_str())
}

/// Load provider specs using env var + fallbacks:
/// 1) $PROVIDERS_CONFIG_PATH
/// 2) config/providers.toml
/// 3) built-in defaults (Hacker News + TechCrunch)
pub fn load_specs_default() -> Result<Vec<ProviderSpec>> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_specs_from(&pb);
        }
        return Err(anyhow!("PROVIDERS_CONFIG_PATH points to non-existent path"));
    }
    let toml_p = PathBuf::from("config/providers.toml");
    if toml_p.exists() {
        return load_specs_from(&toml_p);
    }
    Ok(default_specs())
}

pub fn default_specs() -> Vec<ProviderSpec> {
    vec![
        ProviderSpec {
            kind: "hacker_news".into(),
            name: None,
            url: hacker_news::DEFAULT_BASE_URL.into(),
        },
        ProviderSpec {
            kind: "rss".into(),
            name: Some("TechCrunch".into()),
            url: "https://techcrunch.com/feed/".into(),
        },
    ]
}

fn parse_specs(s: &str, hint_ext: &str) -> Result<Vec<ProviderSpec>> {
    let try_toml = hint_ext == "toml" || s.contains("[[providers]]");
    if try_toml {
        if let Ok(v) = toml::from_str::<ProvidersFile>(s) {
            return Ok(v.providers);
        }
    }
    if let Ok(v) = serde_json::from_str::<ProvidersFile>(s) {
        return Ok(v.providers);
    }
    if !try_toml {
        if let Ok(v) = toml::from_str::<ProvidersFile>(s) {
            return Ok(v.providers);
        }
    }
    Err(anyhow!("unsupported provider config format"))
}

/// Instantiates providers from specs. Unknown kinds are a config error, not
/// a silent skip.
pub fn build_providers(specs: &[ProviderSpec]) -> Result<Vec<Box<dyn SourceProvider>>> {
    let mut out: Vec<Box<dyn SourceProvider>> = Vec::with_capacity(specs.len());
    for spec in specs {
        match spec.kind.as_str() {
            "hacker_news" => out.push(Box::new(HackerNewsProvider::from_url(spec.url.clone()))),
            "rss" => {
                let name = spec
                    .name
                    .clone()
                    .ok_or_else(|| anyhow!("rss provider needs a name: {}", spec.url))?;
                out.push(Box::new(TechRssProvider::from_url(name, spec.url.clone())));
            }
            other => return Err(anyhow!("unknown provider kind: {other:?}")),
        }
    }
    Ok(out)
}
