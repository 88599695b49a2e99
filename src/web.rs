// browser side: DOM updates, event listeners, history.replaceState
use std::cell::{Cell, RefCell};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlDialogElement, HtmlElement, HtmlInputElement, HtmlSelectElement};

use crate::app::{App, AppEvent, View};
use crate::bindings::{bindings, Action, Binding};
use crate::config::AppConfig;
use crate::loader::LoadError;
use crate::router::{resolve_data_url, UrlStore};
use crate::ui;

thread_local! {
    static APP: RefCell<Option<App<BrowserUrl>>> = RefCell::new(None);
    static LAST_VIEW: RefCell<Option<View>> = RefCell::new(None);
    static SEARCH_TIMER: Cell<Option<i32>> = Cell::new(None);
}

/// `location.search` + `history.replaceState`, never `pushState`.
#[derive(Debug, Default)]
pub struct BrowserUrl;

impl UrlStore for BrowserUrl {
    fn query(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default()
    }

    fn replace_query(&mut self, query: &str) {
        let window = match web_sys::window() {
            Some(s) => s,
            None => return,
        };
        let path = window.location().pathname().unwrap_or_default();
        let url = if query.is_empty() { path } else { format!("{path}?{query}") };
        let result = window
            .history()
            .and_then(|h| h.replace_state_with_url(&JsValue::NULL, "", Some(&url)));
        if let Err(e) = result {
            logw!("replaceState failed: {e:?}");
        }
    }
}

fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

pub fn start(config: AppConfig) {
    let document = match document() {
        Some(s) => s,
        None => {
            loge!("no document, not starting");
            return;
        },
    };

    let data_url = config.data_url.clone();
    let debounce_ms = config.debounce_ms;
    APP.with(|a| *a.borrow_mut() = Some(App::new(config, BrowserUrl)));
    bind_events(&document, debounce_ms);

    let page = web_sys::window()
        .and_then(|w| w.location().href().ok())
        .unwrap_or_default();
    let url = match resolve_data_url(&page, &data_url) {
        Some(s) => s,
        None => {
            loge!("cannot resolve {data_url} against {page}");
            APP.with(|a| {
                if let Some(app) = a.borrow_mut().as_mut() {
                    app.finish_load(Err(LoadError::Url(data_url)));
                }
            });
            render();
            return;
        },
    };

    wasm_bindgen_futures::spawn_local(async move {
        let result = crate::loader::load(url).await;
        APP.with(|a| {
            if let Some(app) = a.borrow_mut().as_mut() {
                app.finish_load(result);
            }
        });
        render();
    });
}

fn bind_events(document: &Document, debounce_ms: i32) {
    for b in bindings() {
        let element = match document.get_element_by_id(b.element) {
            Some(s) => s,
            None => {
                logw!("element #{} not found, {:?} not bound", b.element, b.action);
                continue;
            },
        };
        let closure = Closure::<dyn FnMut(Event)>::new(move |ev: Event| on_event(b, &ev, debounce_ms));
        if let Err(e) = element.add_event_listener_with_callback(b.event.dom_name(), closure.as_ref().unchecked_ref()) {
            loge!("could not bind #{}: {e:?}", b.element);
        }
        // listeners live as long as the page
        closure.forget();
    }
}

fn select_value(target: &Option<EventTarget>) -> String {
    target
        .as_ref()
        .and_then(|t| t.dyn_ref::<HtmlSelectElement>())
        .map(|s| s.value())
        .unwrap_or_default()
}

fn input_value(target: &Option<EventTarget>) -> String {
    target
        .as_ref()
        .and_then(|t| t.dyn_ref::<HtmlInputElement>())
        .map(|s| s.value())
        .unwrap_or_default()
}

fn on_event(b: Binding, ev: &Event, debounce_ms: i32) {
    let target = ev.target();

    let delegated = match b.delegate {
        Some(selector) => {
            let hit = target
                .as_ref()
                .and_then(|t| t.dyn_ref::<Element>())
                .and_then(|e| e.closest(selector).ok().flatten());
            match hit {
                Some(s) => Some(s),
                None => return,
            }
        },
        None => None,
    };

    let event = match b.action {
        Action::SelectDistrito => AppEvent::DistritoChanged(select_value(&target)),
        Action::SelectComuna => AppEvent::ComunaChanged(select_value(&target)),
        Action::ClearFilter => AppEvent::ClearFilter,
        Action::Search => {
            schedule_search(input_value(&target), debounce_ms);
            return;
        },
        Action::OpenDetalle => match delegated.and_then(|e| e.get_attribute("data-slug")) {
            Some(slug) => AppEvent::OpenDetalle(slug),
            None => return,
        },
        Action::CloseDetalle => AppEvent::CloseDetalle,
    };

    dispatch(event);
}

// restart the quiet period on every keystroke
fn schedule_search(text: String, debounce_ms: i32) {
    let window = match web_sys::window() {
        Some(s) => s,
        None => return,
    };

    if let Some(handle) = SEARCH_TIMER.with(|t| t.take()) {
        window.clear_timeout_with_handle(handle);
    }

    let callback = Closure::once_into_js(move || {
        SEARCH_TIMER.with(|t| t.set(None));
        dispatch(AppEvent::SearchChanged(text));
    });

    match window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), debounce_ms) {
        Ok(handle) => SEARCH_TIMER.with(|t| t.set(Some(handle))),
        Err(e) => loge!("setTimeout failed: {e:?}"),
    }
}

fn dispatch(event: AppEvent) {
    APP.with(|a| {
        if let Some(app) = a.borrow_mut().as_mut() {
            app.handle(event);
        }
    });
    render();
}

fn render() {
    let view = match APP.with(|a| a.borrow().as_ref().map(|app| app.view())) {
        Some(s) => s,
        None => return,
    };
    let document = match document() {
        Some(s) => s,
        None => return,
    };

    let last = LAST_VIEW.with(|l| l.borrow_mut().take()).unwrap_or_default();
    apply_view(&document, &view, &last);
    LAST_VIEW.with(|l| *l.borrow_mut() = Some(view));
}

fn element(document: &Document, id: &str) -> Option<Element> {
    let e = document.get_element_by_id(id);
    if e.is_none() {
        logw!("element #{id} not found");
    }
    e
}

fn set_html(document: &Document, id: &str, html: &str) {
    if let Some(e) = element(document, id) {
        e.set_inner_html(html);
    }
}

fn set_hidden(document: &Document, id: &str, hidden: bool) {
    if let Some(e) = element(document, id).and_then(|e| e.dyn_into::<HtmlElement>().ok()) {
        e.set_hidden(hidden);
    }
}

fn set_select(document: &Document, id: &str, options: &str, options_changed: bool, value: &str) {
    let select = match element(document, id).and_then(|e| e.dyn_into::<HtmlSelectElement>().ok()) {
        Some(s) => s,
        None => return,
    };
    if options_changed {
        select.set_inner_html(options);
    }
    select.set_value(value);
}

fn apply_view(document: &Document, view: &View, last: &View) {
    let first = last == &View::default();

    set_select(
        document,
        ui::ID_SELECT_DISTRITO,
        &view.distrito_options,
        first || view.distrito_options != last.distrito_options,
        &view.distrito_value,
    );
    set_select(
        document,
        ui::ID_SELECT_COMUNA,
        &view.comuna_options,
        first || view.comuna_options != last.comuna_options,
        &view.comuna_value,
    );

    if first || view.grid != last.grid {
        set_html(document, ui::ID_GRID, &view.grid);
    }

    if let Some(e) = element(document, ui::ID_CONTADOR) {
        e.set_text_content(Some(&view.contador));
    }

    set_html(document, ui::ID_FILTRO_INFO, &view.filtro_info);
    set_hidden(document, ui::ID_FILTRO_INFO, view.filtro_info.is_empty());

    match &view.estado {
        Some(msg) => {
            if let Some(e) = element(document, ui::ID_ESTADO) {
                e.set_text_content(Some(msg));
            }
            set_hidden(document, ui::ID_ESTADO, false);
        },
        None => set_hidden(document, ui::ID_ESTADO, true),
    }

    let dialog = match element(document, ui::ID_MODAL).and_then(|e| e.dyn_into::<HtmlDialogElement>().ok()) {
        Some(s) => s,
        None => return,
    };
    match &view.detalle {
        Some(html) => {
            if view.detalle != last.detalle {
                set_html(document, ui::ID_MODAL_CONTENIDO, html);
            }
            if !dialog.open() {
                if let Err(e) = dialog.show_modal() {
                    logw!("showModal failed: {e:?}");
                    dialog.set_open(true);
                }
            }
        },
        None => {
            if dialog.open() {
                dialog.close();
            }
        },
    }
}
