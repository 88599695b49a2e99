use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use thiserror::Error;

use crate::candidato::{Candidato, CandidatosData};
use crate::normalize::DistrictCode;

/// Why the dataset could not be loaded. Only ever shown as one status line.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Error {status}")]
    Network { status: u16 },
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("JSON inválido: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("URL inválida: {0}")]
    Url(String),
}

impl LoadError {
    pub fn status_message(&self) -> String {
        format!("No se pudo cargar candidatos.json ({self}).")
    }
}

/// Everything loaded at startup, immutable for the rest of the session.
#[derive(Debug, Default, Clone)]
pub struct Catalogo {
    pub candidatos: Vec<Candidato>,
    pub icons: BTreeMap<String, String>,
    index_by_slug: BTreeMap<String, usize>,
    distritos: BTreeSet<DistrictCode>,
}

impl Catalogo {

    pub fn new(data: CandidatosData) -> Self {
        let CandidatosData { candidatos, icons } = data;

        let mut index_by_slug = BTreeMap::new();
        for (i, c) in candidatos.iter().enumerate() {
            // later duplicates win, like `new Map(entries)`
            index_by_slug.insert(c.slug_or_derived(), i);
        }

        let distritos = candidatos
            .iter()
            .map(|c| c.distrito_code())
            .filter(|d| !d.is_empty())
            .collect();

        Self { candidatos, icons, index_by_slug, distritos }
    }

    pub fn from_json(body: &str) -> Result<Self, LoadError> {
        let value = serde_json::from_str::<Value>(body)?;
        // a document that is not an object simply has no candidates
        let data = if value.is_object() {
            serde_json::from_value::<CandidatosData>(value)?
        } else {
            CandidatosData::default()
        };
        Ok(Self::new(data))
    }

    /// Status check and parse, without the network part of [`load`].
    pub fn from_response(status: u16, body: &str) -> Result<Self, LoadError> {
        if !(200..300).contains(&status) {
            return Err(LoadError::Network { status });
        }
        Self::from_json(body)
    }

    pub fn get(&self, slug: &str) -> Option<&Candidato> {
        self.index_by_slug.get(slug).and_then(|i| self.candidatos.get(*i))
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.index_by_slug.contains_key(slug)
    }

    /// Distinct district codes present in the data, sorted.
    pub fn distritos(&self) -> impl Iterator<Item = &DistrictCode> {
        self.distritos.iter()
    }

    pub fn len(&self) -> usize {
        self.candidatos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidatos.is_empty()
    }
}

/// Fetches the dataset once. No retry, no partial result.
pub async fn load(url: reqwest::Url) -> Result<Catalogo, LoadError> {
    logd!("fetching {url}");
    let response = reqwest::get(url).await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    let catalogo = Catalogo::from_response(status, &body)?;
    logd!("loaded {} candidatos, {} distritos", catalogo.len(), catalogo.distritos.len());
    Ok(catalogo)
}
