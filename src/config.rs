use serde_derive::{Serialize, Deserialize};

pub const DEFAULT_DATA_URL: &str = "candidatos2.json";
pub const DEFAULT_DEBOUNCE_MS: i32 = 180;
pub const DEFAULT_CARD_EJES: usize = 3;

/// Passed in by the host page as JSON; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_url")]
    pub data_url: String,
    /// Quiet period of the search box before re-filtering.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: i32,
    #[serde(default = "default_card_ejes")]
    pub card_ejes: usize,
}

fn default_data_url() -> String {
    DEFAULT_DATA_URL.to_string()
}

fn default_debounce_ms() -> i32 {
    DEFAULT_DEBOUNCE_MS
}

fn default_card_ejes() -> usize {
    DEFAULT_CARD_EJES
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_url: default_data_url(),
            debounce_ms: default_debounce_ms(),
            card_ejes: default_card_ejes(),
        }
    }
}

impl AppConfig {
    pub fn from_string(s: &str) -> AppConfig {
        serde_json::from_str::<AppConfig>(s)
        .unwrap_or_default()
    }
}

#[test]
fn config_defaults() {
    assert_eq!(AppConfig::from_string(""), AppConfig::default());
    assert_eq!(AppConfig::from_string("no json"), AppConfig::default());
    let c = AppConfig::from_string(r#"{"debounce_ms": 300}"#);
    assert_eq!(c.debounce_ms, 300);
    assert_eq!(c.data_url, "candidatos2.json");
    assert_eq!(c.card_ejes, 3);
}
