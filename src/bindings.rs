use crate::ui::{
    ID_BTN_LIMPIAR, ID_BUSCADOR, ID_FILTRO_INFO, ID_GRID, ID_MODAL, ID_MODAL_CERRAR,
    ID_SELECT_COMUNA, ID_SELECT_DISTRITO,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventKind {
    Change,
    Input,
    Click,
    Close,
}

impl EventKind {
    pub fn dom_name(&self) -> &'static str {
        match self {
            EventKind::Change => "change",
            EventKind::Input => "input",
            EventKind::Click => "click",
            EventKind::Close => "close",
        }
    }
}

/// What a bound event does once it fires.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    /// value of the district `<select>`
    SelectDistrito,
    /// value of the comuna `<select>`
    SelectComuna,
    ClearFilter,
    /// value of the search box, debounced
    Search,
    /// `data-slug` of the clicked card button
    OpenDetalle,
    CloseDetalle,
}

/// One (element, event, action) triple.
///
/// With `delegate` set, the listener sits on `element` and only fires for
/// clicks inside a descendant matching the selector (cards are re-rendered,
/// the grid is not).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Binding {
    pub element: &'static str,
    pub event: EventKind,
    pub action: Action,
    pub delegate: Option<&'static str>,
}

const fn bind(element: &'static str, event: EventKind, action: Action) -> Binding {
    Binding { element, event, action, delegate: None }
}

pub const SELECTOR_SLUG: &str = "[data-slug]";
pub const SELECTOR_LIMPIAR: &str = "[data-accion='limpiar']";

pub fn bindings() -> Vec<Binding> {
    vec![
        bind(ID_SELECT_DISTRITO, EventKind::Change, Action::SelectDistrito),
        bind(ID_SELECT_COMUNA, EventKind::Change, Action::SelectComuna),
        bind(ID_BTN_LIMPIAR, EventKind::Click, Action::ClearFilter),
        bind(ID_BUSCADOR, EventKind::Input, Action::Search),
        bind(ID_MODAL_CERRAR, EventKind::Click, Action::CloseDetalle),
        // Esc closes the <dialog> without going through the button
        bind(ID_MODAL, EventKind::Close, Action::CloseDetalle),
        Binding { delegate: Some(SELECTOR_LIMPIAR), ..bind(ID_FILTRO_INFO, EventKind::Click, Action::ClearFilter) },
        Binding { delegate: Some(SELECTOR_SLUG), ..bind(ID_GRID, EventKind::Click, Action::OpenDetalle) },
    ]
}

#[test]
fn every_action_is_bound_once_per_element() {
    let b = bindings();
    let mut seen = std::collections::BTreeSet::new();
    for x in b.iter() {
        assert!(seen.insert((x.element, x.event.dom_name())), "{x:?}");
    }
    for a in [Action::SelectDistrito, Action::SelectComuna, Action::ClearFilter, Action::Search, Action::OpenDetalle, Action::CloseDetalle] {
        assert!(b.iter().any(|x| x.action == a), "{a:?}");
    }
    assert!(b.iter().filter(|x| x.action == Action::Search).all(|x| x.event == EventKind::Input));
}
