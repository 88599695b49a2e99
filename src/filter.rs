use serde_derive::{Serialize, Deserialize};

use crate::candidato::Candidato;
use crate::comunas::ComunaMap;
use crate::normalize::{normalize_district_code, DistrictCode};

/// Selected district, selected comuna and search text.
///
/// A mapped comuna always carries its district. Choosing a district
/// directly drops the comuna; choosing a comuna derives the district.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub distrito: Option<DistrictCode>,
    #[serde(default)]
    pub comuna: Option<String>,
    #[serde(default)]
    pub search: String,
}

impl FilterState {

    pub fn from_string(s: &str) -> FilterState {
        serde_json::from_str::<FilterState>(s)
        .unwrap_or_default()
    }

    pub fn select_distrito(&mut self, code: &str) {
        let code = normalize_district_code(code.trim());
        self.distrito = if code.is_empty() { None } else { Some(code) };
        self.comuna = None;
    }

    /// Returns `true` when the comuna was found in the map.
    ///
    /// An unknown comuna is still recorded but leaves the district as it was.
    pub fn select_comuna(&mut self, name: &str, map: &ComunaMap) -> bool {
        if name.is_empty() {
            self.comuna = None;
            self.distrito = None;
            return false;
        }

        self.comuna = Some(name.to_string());
        match map.distrito_de(name) {
            Some(d) => {
                self.distrito = Some(d.clone());
                true
            },
            None => false,
        }
    }

    pub fn clear_filter(&mut self) {
        self.comuna = None;
        self.distrito = None;
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
    }

    pub fn is_filtered(&self) -> bool {
        self.distrito.is_some() || self.comuna.is_some()
    }

    /// Text of the banner above the grid, `None` when nothing is selected.
    pub fn filter_label(&self) -> Option<String> {
        match (&self.comuna, &self.distrito) {
            (Some(c), Some(d)) => Some(format!("Candidatos — Distrito {d} ({c})")),
            (Some(c), None) => Some(format!("Candidatos — ({c})")),
            (None, Some(d)) => Some(format!("Candidatos — Distrito {d}")),
            (None, None) => None,
        }
    }
}

/// Stable filter: district (if selected) and case-insensitive name search.
pub fn apply_filters<'a>(candidatos: &'a [Candidato], state: &FilterState) -> Vec<&'a Candidato> {
    let search = state.search.trim().to_lowercase();
    let distrito = state.distrito.as_ref().filter(|d| !d.is_empty());

    candidatos
        .iter()
        .filter(|c| {
            let ok_dist = distrito.map(|d| c.distrito_code() == *d).unwrap_or(true);
            let ok_search = search.is_empty() || c.nombre.to_lowercase().contains(&search);
            ok_dist && ok_search
        })
        .collect()
}

pub fn result_count_label(n: usize) -> String {
    format!("{n} resultado{}", if n == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(nombre: &str, distrito: &str) -> Candidato {
        Candidato {
            nombre: nombre.to_string(),
            distrito: distrito.to_string(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Candidato> {
        vec![
            c("Ana Soto", "Distrito 10"),
            c("Bruno Díaz", "8"),
            c("Carla Rojas", "D10"),
            c("Daniel Soto", "D09"),
            c("Elena Muñoz", ""),
        ]
    }

    fn names(v: &[&Candidato]) -> Vec<String> {
        v.iter().map(|c| c.nombre.clone()).collect()
    }

    #[test]
    fn no_filter_returns_everything_in_order() {
        let data = sample();
        let out = apply_filters(&data, &FilterState::default());
        assert_eq!(names(&out), names(&data.iter().collect::<Vec<_>>()));
    }

    #[test]
    fn district_filter_uses_canonical_codes() {
        let data = sample();
        let mut state = FilterState::default();
        state.select_distrito("Distrito 10");
        assert_eq!(names(&apply_filters(&data, &state)), vec!["Ana Soto", "Carla Rojas"]);
        state.select_distrito("D08");
        assert_eq!(names(&apply_filters(&data, &state)), vec!["Bruno Díaz"]);
    }

    #[test]
    fn search_is_trimmed_and_case_insensitive() {
        let data = sample();
        let mut state = FilterState::default();
        state.set_search("  SOTO ");
        assert_eq!(state.search, "  SOTO ");
        assert_eq!(names(&apply_filters(&data, &state)), vec!["Ana Soto", "Daniel Soto"]);
        state.select_distrito("D09");
        assert_eq!(names(&apply_filters(&data, &state)), vec!["Daniel Soto"]);
    }

    #[test]
    fn search_never_grows_result() {
        let data = sample();
        for distrito in ["", "D08", "D09", "D10", "D11"] {
            let mut state = FilterState::default();
            state.select_distrito(distrito);
            let without = apply_filters(&data, &state).len();
            for term in ["a", "so", "z", "elena", " "] {
                state.set_search(term);
                assert!(apply_filters(&data, &state).len() <= without);
            }
        }
    }

    #[test]
    fn district_selection_clears_comuna_keeps_search() {
        let map = ComunaMap::builtin();
        let mut state = FilterState::default();
        state.set_search("ana");
        assert!(state.select_comuna("Maipú", &map));
        assert_eq!(state.distrito.as_ref().map(|d| d.as_str()), Some("D08"));
        state.select_distrito("D09");
        assert_eq!(state.comuna, None);
        assert_eq!(state.distrito.as_ref().map(|d| d.as_str()), Some("D09"));
        assert_eq!(state.search, "ana");
        state.select_distrito("");
        assert_eq!(state.distrito, None);
    }

    #[test]
    fn every_comuna_derives_its_district() {
        let map = ComunaMap::builtin();
        for (name, distrito) in map.entries() {
            let variants = [
                name.to_string(),
                name.to_uppercase(),
                name.to_lowercase(),
                crate::normalize::comparison_key(name),
                format!("  {name} "),
            ];
            for v in variants.iter() {
                let mut state = FilterState::default();
                state.select_distrito("D99");
                assert!(state.select_comuna(v, &map), "{v}");
                assert_eq!(state.distrito.as_ref(), Some(distrito), "{v}");
                assert_eq!(state.comuna.as_deref(), Some(v.as_str()));
            }
        }
    }

    #[test]
    fn unknown_comuna_keeps_district() {
        let map = ComunaMap::builtin();
        let mut state = FilterState::default();
        state.select_distrito("D11");
        assert!(!state.select_comuna("Valparaíso", &map));
        assert_eq!(state.comuna.as_deref(), Some("Valparaíso"));
        assert_eq!(state.distrito.as_ref().map(|d| d.as_str()), Some("D11"));
    }

    #[test]
    fn blank_comuna_is_a_value() {
        let map = ComunaMap::builtin();
        let mut state = FilterState::default();
        state.select_distrito("D12");
        assert!(!state.select_comuna(" ", &map));
        assert_eq!(state.comuna.as_deref(), Some(" "));
        assert_eq!(state.distrito.as_ref().map(|d| d.as_str()), Some("D12"));
    }

    #[test]
    fn empty_comuna_and_clear() {
        let map = ComunaMap::builtin();
        let mut state = FilterState::default();
        state.set_search("x");
        state.select_comuna("Renca", &map);
        state.select_comuna("", &map);
        assert_eq!(state, FilterState { search: "x".to_string(), ..Default::default() });

        state.select_comuna("Renca", &map);
        state.clear_filter();
        assert!(!state.is_filtered());
        assert_eq!(state.search, "x");
    }

    #[test]
    fn labels() {
        let map = ComunaMap::builtin();
        let mut state = FilterState::default();
        assert_eq!(state.filter_label(), None);
        state.select_distrito("9");
        assert_eq!(state.filter_label().as_deref(), Some("Candidatos — Distrito D09"));
        state.select_comuna("santiago", &map);
        assert_eq!(state.filter_label().as_deref(), Some("Candidatos — Distrito D10 (santiago)"));

        assert_eq!(result_count_label(0), "0 resultados");
        assert_eq!(result_count_label(1), "1 resultado");
        assert_eq!(result_count_label(7), "7 resultados");
    }
}
