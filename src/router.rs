// ?distrito= / ?comuna= / ?candidato= handling
use reqwest::Url;

use crate::comunas::ComunaMap;
use crate::normalize::{normalize_district_code, DistrictCode};

pub const PARAM_DISTRITO: &str = "distrito";
pub const PARAM_COMUNA: &str = "comuna";
pub const PARAM_CANDIDATO: &str = "candidato";

const PARSE_BASE: &str = "http://localhost/";

/// Where the current query string lives. The browser implementation
/// replaces the URL in place, it never pushes a history entry.
pub trait UrlStore {
    fn query(&self) -> String;
    fn replace_query(&mut self, query: &str);
}

/// In-memory URL, for tests and non-browser hosts.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryUrl {
    pub query: String,
    pub replacements: usize,
}

impl MemoryUrl {
    pub fn new(query: &str) -> Self {
        Self { query: query.trim_start_matches('?').to_string(), replacements: 0 }
    }
}

impl UrlStore for MemoryUrl {
    fn query(&self) -> String {
        self.query.clone()
    }

    fn replace_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.replacements += 1;
    }
}

/// Ordered `application/x-www-form-urlencoded` pairs, like `URLSearchParams`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {

    pub fn parse(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let mut url = match Url::parse(PARSE_BASE) {
            Ok(o) => o,
            Err(_) => return Self::default(),
        };
        url.set_query(Some(query));
        Self {
            pairs: url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Replaces the first occurrence in place and drops any duplicates.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(pos) => {
                self.pairs[pos].1 = value.to_string();
                let mut i = 0;
                self.pairs.retain(|(k, _)| {
                    let keep = k != key || i == pos;
                    i += 1;
                    keep
                });
            },
            None => self.pairs.push((key.to_string(), value.to_string())),
        }
    }

    pub fn delete(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn to_query_string(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }
        let mut url = match Url::parse(PARSE_BASE) {
            Ok(o) => o,
            Err(_) => return String::new(),
        };
        url.query_pairs_mut().extend_pairs(self.pairs.iter());
        url.query().unwrap_or_default().to_string()
    }
}

/// Filter state as found in the URL, before any data is loaded.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParamState {
    pub distrito: Option<DistrictCode>,
    pub comuna: Option<String>,
    pub candidato: Option<String>,
}

/// Resolves `data_url` against the page address, the way `fetch` does.
/// Absolute URLs are returned unchanged.
pub fn resolve_data_url(base: &str, data_url: &str) -> Option<Url> {
    Url::parse(base).ok()?.join(data_url.trim()).ok()
}

/// A comuna that resolves through the map wins over a stale `distrito`.
pub fn load_from_params(params: &QueryParams, map: &ComunaMap) -> ParamState {
    let non_empty = |k: &str| params.get(k).filter(|v| !v.is_empty()).map(|v| v.to_string());

    let mut distrito = non_empty(PARAM_DISTRITO)
        .map(|d| normalize_district_code(&d))
        .filter(|d| !d.is_empty());

    let comuna = non_empty(PARAM_COMUNA);
    if let Some(d) = comuna.as_deref().and_then(|c| map.distrito_de(c)) {
        distrito = Some(d.clone());
    }

    ParamState {
        distrito,
        comuna,
        candidato: non_empty(PARAM_CANDIDATO),
    }
}

/// Sets `key` (or removes it for `None` / empty) and replaces the URL.
pub fn write_param<U: UrlStore + ?Sized>(store: &mut U, key: &str, value: Option<&str>) {
    let mut params = QueryParams::parse(&store.query());
    match value {
        Some(v) if !v.is_empty() => params.set(key, v),
        _ => params.delete(key),
    }
    store.replace_query(&params.to_query_string());
}
