use std::collections::BTreeMap;

use serde::Deserializer;
use serde_derive::{Serialize, Deserialize};
use serde_json::Value;

use crate::normalize::{create_slug, normalize_district_code, DistrictCode};

/// The fetched document: `{ "candidatos": [...], "icons": {...} }`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CandidatosData {
    #[serde(default, deserialize_with = "lenient_records")]
    pub candidatos: Vec<Candidato>,
    #[serde(default, deserialize_with = "lenient_icons")]
    pub icons: BTreeMap<String, String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidato {
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub nombre: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub profesion: String,
    /// Raw label as found in the data ("Distrito 8", "8", "D08", ...).
    #[serde(default, deserialize_with = "lenient_string")]
    pub distrito: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub foto_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub motivacion: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub numero_en_voto: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub ejes: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub logros: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub compromisos_partido: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub compromisos_electo: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub telefono: String,
    #[serde(default, deserialize_with = "lenient_redes")]
    pub redes: Redes,
    #[serde(default, deserialize_with = "lenient_string")]
    pub web: String,
}

/// Social handles / URLs per platform.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redes {
    #[serde(default, deserialize_with = "lenient_list")]
    pub x: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub facebook: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub instagram: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tiktok: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub youtube: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub linkedin: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub otros: Vec<String>,
}

impl Candidato {

    pub fn distrito_code(&self) -> DistrictCode {
        normalize_district_code(&self.distrito)
    }

    /// `slug` from the data, or one derived from name and district.
    pub fn slug_or_derived(&self) -> String {
        if self.slug.trim().is_empty() {
            create_slug(&self.nombre, &self.distrito)
        } else {
            self.slug.clone()
        }
    }
}

// strings, numbers and bools become text, null / objects / arrays become ""
fn value_to_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let v = <Value as serde::Deserialize>::deserialize(d)?;
    Ok(value_to_text(&v).unwrap_or_default())
}

fn lenient_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let v = <Value as serde::Deserialize>::deserialize(d)?;
    Ok(match v {
        Value::Array(a) => a.iter().filter_map(value_to_text).collect(),
        _ => Vec::new(),
    })
}

fn lenient_redes<'de, D: Deserializer<'de>>(d: D) -> Result<Redes, D::Error> {
    let v = <Value as serde::Deserialize>::deserialize(d)?;
    Ok(serde_json::from_value::<Redes>(v).unwrap_or_default())
}

fn lenient_icons<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, String>, D::Error> {
    let v = <Value as serde::Deserialize>::deserialize(d)?;
    Ok(match v {
        Value::Object(o) => o
            .iter()
            .filter_map(|(k, v)| Some((k.clone(), value_to_text(v)?)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

// a single malformed record (e.g. a bare string) is skipped, not fatal
fn lenient_records<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Candidato>, D::Error> {
    let v = <Value as serde::Deserialize>::deserialize(d)?;
    Ok(match v {
        Value::Array(a) => a
            .into_iter()
            .filter(|v| v.is_object())
            .filter_map(|v| serde_json::from_value::<Candidato>(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_record() {
        let s = r#"{
            "candidatos": [{
                "slug": "ana-soto-d10",
                "nombre": "Ana Soto",
                "profesion": "Profesora",
                "distrito": "Distrito 10",
                "fotoUrl": "img/ana.jpg",
                "numeroEnVoto": 123,
                "ejes": ["Educación", null, "", "Salud"],
                "logros": null,
                "compromisosPartido": "no es lista",
                "email": "ana@example.org",
                "redes": { "x": ["https://x.com/ana"], "otros": ["@ana Tik Tok"] }
            }],
            "icons": { "x": "fa-brands fa-x-twitter" }
        }"#;
        let data = serde_json::from_str::<CandidatosData>(s).unwrap();
        let c = &data.candidatos[0];
        assert_eq!(c.nombre, "Ana Soto");
        assert_eq!(c.distrito_code().as_str(), "D10");
        assert_eq!(c.numero_en_voto, "123");
        assert_eq!(c.ejes, vec!["Educación", "Salud"]);
        assert!(c.logros.is_empty());
        assert!(c.compromisos_partido.is_empty());
        assert_eq!(c.redes.x, vec!["https://x.com/ana"]);
        assert_eq!(c.redes.otros, vec!["@ana Tik Tok"]);
        assert!(c.web.is_empty());
        assert_eq!(data.icons.get("x").map(|s| s.as_str()), Some("fa-brands fa-x-twitter"));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let data = serde_json::from_str::<CandidatosData>(r#"{"candidatos":[{"nombre":"Sin Datos"}, "basura", {"redes": 5}]}"#).unwrap();
        assert_eq!(data.candidatos.len(), 2);
        assert_eq!(data.candidatos[0].nombre, "Sin Datos");
        assert_eq!(data.candidatos[1].redes, Redes::default());
        assert!(data.icons.is_empty());
    }

    #[test]
    fn no_candidatos_key() {
        let data = serde_json::from_str::<CandidatosData>(r#"{"otra_cosa": 1}"#).unwrap();
        assert!(data.candidatos.is_empty());
        let data = serde_json::from_str::<CandidatosData>(r#"{"candidatos": {}}"#).unwrap();
        assert!(data.candidatos.is_empty());
    }

    #[test]
    fn slug_fallback() {
        let c = Candidato {
            nombre: "María Pía".to_string(),
            distrito: "D12".to_string(),
            ..Default::default()
        };
        assert_eq!(c.slug_or_derived(), "maria-pia-d12");
        let c = Candidato { slug: "mp".to_string(), ..c };
        assert_eq!(c.slug_or_derived(), "mp");
    }
}
