use wasm_bindgen::prelude::*;

use crate::config::AppConfig;
use crate::filter::FilterState;
use crate::loader::Catalogo;

#[macro_use]
pub mod log;

pub mod normalize;
pub mod comunas;
pub mod candidato;
pub mod filter;
pub mod router;
pub mod loader;
pub mod links;
pub mod ui;
pub mod config;
pub mod bindings;
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod web;

/// Entry point for the host page: binds the listeners, fetches the data
/// and renders. `config` is an optional JSON [`AppConfig`].
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start(config: String) {
    let config = AppConfig::from_string(&config);
    logd!("start {config:?}");
    crate::web::start(config);
}

#[wasm_bindgen]
pub fn normalize_distrito(s: String) -> String {
    crate::normalize::normalize_district_code(&s).to_string()
}

/// District code for a comuna name (accents optional), empty if unknown.
#[wasm_bindgen]
pub fn comuna_distrito(s: String) -> String {
    crate::comunas::ComunaMap::builtin()
        .distrito_de(&s)
        .map(|d| d.to_string())
        .unwrap_or_default()
}

/// Filters a `{ "candidatos": [...] }` document with a JSON [`FilterState`],
/// returns the matching records as a JSON array.
#[wasm_bindgen]
pub fn filter_candidatos(data: String, state: String) -> String {
    let catalogo = match Catalogo::from_json(&data) {
        Ok(o) => o,
        Err(e) => return e.to_string(),
    };
    let state = FilterState::from_string(&state);
    let visibles = crate::filter::apply_filters(&catalogo.candidatos, &state);
    serde_json::to_string(&visibles).unwrap_or_default()
}

#[wasm_bindgen]
pub fn default_config() -> String {
    serde_json::to_string(&AppConfig::default()).unwrap_or_default()
}
