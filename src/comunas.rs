use std::collections::BTreeMap;

use crate::normalize::{comparison_key, DistrictCode, normalize_district_code};

pub type ComunaMapRaw = BTreeMap<String, String>;

/// Comuna -> distrito table, baked in from `src/comunas.json` by `build.rs`.
#[derive(Debug, Clone)]
pub struct ComunaMap {
    // (display name, district), sorted for the selector
    entries: Vec<(String, DistrictCode)>,
    by_key: BTreeMap<String, usize>,
}

impl Default for ComunaMap {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ComunaMap {

    pub fn builtin() -> Self {
        let raw: ComunaMapRaw = include!(concat!(env!("OUT_DIR"), "/comunas.rs"));
        Self::from_raw(&raw)
    }

    pub fn from_raw(raw: &ComunaMapRaw) -> Self {
        let mut entries = raw
            .iter()
            .map(|(k, v)| (k.clone(), normalize_district_code(v)))
            .collect::<Vec<_>>();

        // roughly localeCompare(.., 'es'): accents sort with their base letter
        entries.sort_by(|a, b| {
            comparison_key(&a.0)
                .cmp(&comparison_key(&b.0))
                .then_with(|| a.0.cmp(&b.0))
        });

        let by_key = entries
            .iter()
            .enumerate()
            .map(|(i, (k, _))| (comparison_key(k), i))
            .collect();

        Self { entries, by_key }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Accent- and case-insensitive lookup. Returns the stored display name
    /// together with its district.
    pub fn lookup(&self, name: &str) -> Option<(&str, &DistrictCode)> {
        let i = *self.by_key.get(&comparison_key(name))?;
        let (k, v) = self.entries.get(i)?;
        Some((k.as_str(), v))
    }

    pub fn distrito_de(&self, name: &str) -> Option<&DistrictCode> {
        self.lookup(name).map(|(_, d)| d)
    }

    pub fn sorted_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &DistrictCode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn comunas_of<'a>(&'a self, distrito: &'a DistrictCode) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(_, d)| d == distrito)
            .map(|(k, _)| k.as_str())
    }
}
