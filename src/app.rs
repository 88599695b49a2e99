use crate::comunas::ComunaMap;
use crate::config::AppConfig;
use crate::filter::{apply_filters, result_count_label, FilterState};
use crate::links::IconTable;
use crate::loader::{Catalogo, LoadError};
use crate::router::{
    load_from_params, write_param, QueryParams, UrlStore, PARAM_CANDIDATO, PARAM_COMUNA,
    PARAM_DISTRITO,
};
use crate::ui;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    DistritoChanged(String),
    ComunaChanged(String),
    ClearFilter,
    SearchChanged(String),
    OpenDetalle(String),
    CloseDetalle,
}

/// Everything the page shows, as strings ready to be put into the DOM.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct View {
    pub distrito_options: String,
    pub comuna_options: String,
    pub distrito_value: String,
    pub comuna_value: String,
    pub filtro_info: String,
    pub contador: String,
    pub grid: String,
    pub resultados: usize,
    pub estado: Option<String>,
    pub detalle: Option<String>,
}

/// The single owned application state. All mutation goes through
/// [`App::finish_load`] and [`App::handle`].
#[derive(Debug)]
pub struct App<U: UrlStore> {
    config: AppConfig,
    comunas: ComunaMap,
    catalogo: Catalogo,
    icons: IconTable,
    filter: FilterState,
    detalle: Option<String>,
    load_error: Option<String>,
    loaded: bool,
    url: U,
}

impl<U: UrlStore> App<U> {

    pub fn new(config: AppConfig, url: U) -> Self {
        Self {
            config,
            comunas: ComunaMap::builtin(),
            catalogo: Catalogo::default(),
            icons: IconTable::default(),
            filter: FilterState::default(),
            detalle: None,
            load_error: None,
            loaded: false,
            url,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn catalogo(&self) -> &Catalogo {
        &self.catalogo
    }

    pub fn detalle(&self) -> Option<&str> {
        self.detalle.as_deref()
    }

    pub fn url(&self) -> &U {
        &self.url
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Result of the one startup fetch. On failure the app stays empty for
    /// the rest of the session.
    pub fn finish_load(&mut self, result: Result<Catalogo, LoadError>) {
        match result {
            Ok(catalogo) => {
                self.icons = IconTable::new(&catalogo.icons);
                self.catalogo = catalogo;
                self.loaded = true;
                self.load_error = None;
                self.apply_params();
            },
            Err(e) => {
                loge!("load failed: {e}");
                self.catalogo = Catalogo::default();
                self.loaded = false;
                self.load_error = Some(e.status_message());
            },
        }
    }

    fn apply_params(&mut self) {
        let params = QueryParams::parse(&self.url.query());
        let p = load_from_params(&params, &self.comunas);
        logd!("params: distrito={:?} comuna={:?} candidato={:?}", p.distrito, p.comuna, p.candidato);

        self.filter.distrito = p.distrito;
        self.filter.comuna = p.comuna;

        if let Some(slug) = p.candidato {
            if self.catalogo.contains(&slug) {
                self.open_detalle(&slug);
            } else {
                logw!("unknown candidato in url: {slug}");
            }
        }
    }

    fn open_detalle(&mut self, slug: &str) {
        if !self.catalogo.contains(slug) {
            logw!("no candidato with slug {slug}");
            return;
        }
        self.detalle = Some(slug.to_string());
        write_param(&mut self.url, PARAM_CANDIDATO, Some(slug));
    }

    fn sync_filter_params(&mut self) {
        let distrito = self.filter.distrito.as_ref().map(|d| d.as_str().to_string());
        let comuna = self.filter.comuna.clone();
        write_param(&mut self.url, PARAM_DISTRITO, distrito.as_deref());
        write_param(&mut self.url, PARAM_COMUNA, comuna.as_deref());
    }

    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::DistritoChanged(code) => {
                self.filter.select_distrito(&code);
                self.sync_filter_params();
            },
            AppEvent::ComunaChanged(name) => {
                let mapped = self.filter.select_comuna(&name, &self.comunas);
                // an unmapped comuna is kept in memory only
                if mapped || name.is_empty() {
                    self.sync_filter_params();
                } else {
                    logw!("comuna without distrito: {name}");
                }
            },
            AppEvent::ClearFilter => {
                self.filter.clear_filter();
                self.sync_filter_params();
            },
            AppEvent::SearchChanged(text) => {
                self.filter.set_search(&text);
            },
            AppEvent::OpenDetalle(slug) => {
                self.open_detalle(&slug);
            },
            AppEvent::CloseDetalle => {
                self.detalle = None;
                write_param(&mut self.url, PARAM_CANDIDATO, None);
            },
        }
    }

    pub fn view(&self) -> View {
        let visibles = apply_filters(&self.catalogo.candidatos, &self.filter);

        let (distrito_options, comuna_options) = if self.loaded {
            (
                ui::render_distrito_options(self.catalogo.distritos()),
                ui::render_comuna_options(self.comunas.sorted_names()),
            )
        } else {
            (
                ui::render_distrito_options(std::iter::empty()),
                ui::render_comuna_options(std::iter::empty()),
            )
        };

        // show the canonical spelling so the <select> finds its option
        let comuna_value = match self.filter.comuna.as_deref() {
            Some(c) => self.comunas.lookup(c).map(|(k, _)| k).unwrap_or(c).to_string(),
            None => String::new(),
        };

        let estado = match &self.load_error {
            Some(e) => Some(e.clone()),
            None if self.loaded && visibles.is_empty() => Some(ui::MSG_SIN_RESULTADOS.to_string()),
            None => None,
        };

        let detalle = self
            .detalle
            .as_deref()
            .and_then(|slug| self.catalogo.get(slug))
            .map(|c| ui::render_detalle(c, &self.icons));

        View {
            distrito_options,
            comuna_options,
            distrito_value: self.filter.distrito.as_ref().map(|d| d.as_str().to_string()).unwrap_or_default(),
            comuna_value,
            filtro_info: ui::render_filter_info(self.filter.filter_label().as_deref()),
            contador: result_count_label(visibles.len()),
            grid: ui::render_cards(&visibles, self.config.card_ejes),
            resultados: visibles.len(),
            estado,
            detalle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::MemoryUrl;

    const DATA: &str = r#"{"candidatos": [
        {"slug": "ana", "nombre": "Ana Soto", "distrito": "Distrito 8"},
        {"slug": "beto", "nombre": "Beto Rojas", "distrito": "D10"},
        {"slug": "carla", "nombre": "Carla Soto", "distrito": "10"}
    ]}"#;

    fn app(query: &str) -> App<MemoryUrl> {
        let mut app = App::new(AppConfig::default(), MemoryUrl::new(query));
        app.finish_load(Catalogo::from_response(200, DATA));
        app
    }

    #[test]
    fn comuna_then_distrito() {
        let mut app = app("");
        app.handle(AppEvent::ComunaChanged("Maipú".to_string()));
        assert_eq!(app.filter().distrito.as_ref().map(|d| d.as_str()), Some("D08"));
        assert_eq!(app.view().resultados, 1);

        app.handle(AppEvent::DistritoChanged("D09".to_string()));
        assert_eq!(app.filter().comuna, None);
        assert_eq!(app.url().query, "distrito=D09");
        let v = app.view();
        assert_eq!(v.resultados, 0);
        assert_eq!(v.estado.as_deref(), Some(ui::MSG_SIN_RESULTADOS));
    }

    #[test]
    fn params_applied_after_load() {
        let app = app("comuna=santiago&distrito=D08&candidato=beto");
        assert_eq!(app.filter().distrito.as_ref().map(|d| d.as_str()), Some("D10"));
        assert_eq!(app.detalle(), Some("beto"));
        let v = app.view();
        assert_eq!(v.resultados, 2);
        assert_eq!(v.comuna_value, "Santiago");
        assert_eq!(v.distrito_value, "D10");
        assert!(v.detalle.unwrap().contains("Beto Rojas"));
        assert!(v.filtro_info.contains("Candidatos — Distrito D10 (santiago)"));
    }

    #[test]
    fn unknown_slug_in_url_is_ignored() {
        let app = app("candidato=nadie");
        assert_eq!(app.detalle(), None);
        assert_eq!(app.view().detalle, None);
    }

    #[test]
    fn unmapped_comuna_does_not_touch_url() {
        let mut app = app("distrito=D10");
        app.handle(AppEvent::ComunaChanged("Valparaíso".to_string()));
        assert_eq!(app.url().replacements, 0);
        assert_eq!(app.filter().comuna.as_deref(), Some("Valparaíso"));
        assert_eq!(app.view().resultados, 2);
    }

    #[test]
    fn search_and_clear() {
        let mut app = app("");
        app.handle(AppEvent::ComunaChanged("Ñuñoa".to_string()));
        app.handle(AppEvent::SearchChanged("soto".to_string()));
        assert_eq!(app.view().resultados, 1);
        app.handle(AppEvent::ClearFilter);
        assert_eq!(app.url().query, "");
        let v = app.view();
        assert_eq!(v.resultados, 2);
        assert_eq!(v.contador, "2 resultados");
        assert_eq!(v.filtro_info, "");
    }

    #[test]
    fn detalle_open_close() {
        let mut app = app("distrito=D08");
        app.handle(AppEvent::OpenDetalle("ana".to_string()));
        assert_eq!(app.url().query, "distrito=D08&candidato=ana");
        app.handle(AppEvent::CloseDetalle);
        assert_eq!(app.url().query, "distrito=D08");
        assert_eq!(app.view().detalle, None);

        app.handle(AppEvent::OpenDetalle("nadie".to_string()));
        assert_eq!(app.detalle(), None);
    }

    #[test]
    fn load_failure_leaves_app_empty() {
        let mut app = App::new(AppConfig::default(), MemoryUrl::new("distrito=D08"));
        app.finish_load(Catalogo::from_response(500, ""));
        let v = app.view();
        assert_eq!(v.resultados, 0);
        assert_eq!(v.grid, "");
        assert_eq!(v.estado.as_deref(), Some("No se pudo cargar candidatos.json (Error 500)."));
        assert_eq!(v.distrito_options, "<option value=''>Todos los distritos</option>");
        assert_eq!(v.comuna_options, "<option value=''>Todas las comunas</option>");
        assert!(app.load_error().is_some());
    }
}
