use base64::Engine;

use crate::candidato::Candidato;
use crate::links::{grupos_redes, sitio_web, Enlace, IconTable};
use crate::normalize::DistrictCode;

pub const ID_GRID: &str = "grid";
pub const ID_ESTADO: &str = "estado";
pub const ID_CONTADOR: &str = "contador";
pub const ID_FILTRO_INFO: &str = "filtro-info";
pub const ID_SELECT_DISTRITO: &str = "filtro-distrito";
pub const ID_SELECT_COMUNA: &str = "filtro-comuna";
pub const ID_BTN_LIMPIAR: &str = "btn-limpiar";
pub const ID_BUSCADOR: &str = "buscador";
pub const ID_MODAL: &str = "modal-detalle";
pub const ID_MODAL_CONTENIDO: &str = "modal-contenido";
pub const ID_MODAL_CERRAR: &str = "modal-cerrar";

pub const MSG_SIN_RESULTADOS: &str = "No hay resultados para los filtros actuales.";

const AVATAR_SVG: &str = "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 64 64'>\
<rect width='64' height='64' fill='#e5e7eb'/>\
<circle cx='32' cy='24' r='12' fill='#9ca3af'/>\
<path d='M10 60c2-14 12-20 22-20s20 6 22 20z' fill='#9ca3af'/></svg>";

pub fn base64_encode<T: AsRef<[u8]>>(input: T) -> String {
    base64::engine::general_purpose::STANDARD.encode(input)
}

fn foto_src(c: &Candidato) -> String {
    if c.foto_url.trim().is_empty() {
        format!("data:image/svg+xml;base64,{}", base64_encode(AVATAR_SVG))
    } else {
        c.foto_url.clone()
    }
}

fn text(s: &str) -> String {
    html_escape::encode_text(s).to_string()
}

fn attr(s: &str) -> String {
    html_escape::encode_single_quoted_attribute(s).to_string()
}

pub fn render_distrito_options<'a>(distritos: impl Iterator<Item = &'a DistrictCode>) -> String {
    let mut s = "<option value=''>Todos los distritos</option>".to_string();
    for d in distritos {
        s += &format!("<option value='{}'>{}</option>", attr(d.as_str()), text(&d.display_label()));
    }
    s
}

pub fn render_comuna_options<'a>(comunas: impl Iterator<Item = &'a str>) -> String {
    let mut s = "<option value=''>Todas las comunas</option>".to_string();
    for c in comunas {
        s += &format!("<option value='{}'>{}</option>", attr(c), text(c));
    }
    s
}

/// Banner above the grid, hidden when there is no district / comuna filter.
pub fn render_filter_info(label: Option<&str>) -> String {
    let label = match label {
        Some(s) => s,
        None => return String::new(),
    };

    normalize_for_js(format!("
        <div style='margin:0 0 var(--space-lg) 0;display:flex;align-items:center;gap:8px;font-weight:600;color:var(--muted);'>
            <span style='opacity:0.9;'>📍</span>
            <span>{label}</span>
            <button type='button' title='Quitar filtro' data-accion='limpiar' style='background:transparent;border:0;cursor:pointer;font-weight:700;padding:4px 8px;'>✕</button>
        </div>
    ", label = text(label)))
}

pub fn render_card(c: &Candidato, ejes_max: usize) -> String {
    let ejes = c.ejes.iter().take(ejes_max).map(|e| text(e)).collect::<Vec<_>>();
    let ejes = if ejes.is_empty() {
        String::new()
    } else {
        format!("<p class='ejes'>• {}</p>", ejes.join(" · "))
    };

    normalize_for_js(format!("
        <article class='card'>
            <img class='card-img' src='{foto}' alt='{alt}' loading='lazy' />
            <div class='card-body'>
                <div class='badge'>{distrito}</div>
                <h3 class='card-title'>{nombre}</h3>
                <p class='muted'>{profesion}</p>
                {ejes}
                <div class='card-actions'>
                    <button class='btn' type='button' data-slug='{slug}'>Ver más</button>
                </div>
            </div>
        </article>
    ",
        foto = attr(&foto_src(c)),
        alt = attr(&c.nombre),
        distrito = text(c.distrito_code().as_str()),
        nombre = text(&c.nombre),
        profesion = text(&c.profesion),
        slug = attr(&c.slug_or_derived()),
    ))
}

pub fn render_cards(candidatos: &[&Candidato], ejes_max: usize) -> String {
    candidatos
        .iter()
        .map(|c| render_card(c, ejes_max))
        .collect::<Vec<_>>()
        .join("")
}

fn render_section(titulo: &str, body: &str) -> String {
    format!("<section class='detalle-seccion'><h4>{}</h4>{body}</section>", text(titulo))
}

fn render_list_section(titulo: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let li = items.iter().map(|i| format!("<li>{}</li>", text(i))).collect::<Vec<_>>().join("");
    render_section(titulo, &format!("<ul>{li}</ul>"))
}

fn render_enlace(e: &Enlace) -> String {
    let url = match e.href() {
        Some(s) => s,
        None => return format!("<span><i class='{}'></i> {} ({})</span>", attr(&e.icon), text(&e.label), text(&e.url)),
    };
    format!(
        "<a href='{url}' target='_blank' rel='noopener'><i class='{icon}'></i> {label}</a>",
        url = attr(url),
        icon = attr(&e.icon),
        label = text(&e.label),
    )
}

fn render_enlaces(c: &Candidato, icons: &IconTable) -> String {
    let mut items = Vec::new();
    if let Some(web) = sitio_web(c, icons) {
        items.push(render_enlace(&web));
    }
    for g in grupos_redes(&c.redes, icons) {
        let links = g.enlaces.iter().map(render_enlace).collect::<Vec<_>>().join(" · ");
        items.push(format!("{}: {links}", text(g.label)));
    }

    if items.is_empty() {
        return String::new();
    }

    let li = items.iter().map(|i| format!("<li>{i}</li>")).collect::<Vec<_>>().join("");
    render_section("Enlaces", &format!("<ul>{li}</ul>"))
}

pub fn detalle_subtitulo(c: &Candidato) -> String {
    let voto = if c.numero_en_voto.is_empty() {
        String::new()
    } else {
        format!("N° voto: {}", c.numero_en_voto)
    };
    let distrito = c.distrito_code();
    let parts = [distrito.as_str(), c.profesion.as_str(), voto.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();
    parts.join(" • ")
}

/// Body of the detail dialog.
pub fn render_detalle(c: &Candidato, icons: &IconTable) -> String {
    let motivacion = if c.motivacion.trim().is_empty() {
        String::new()
    } else {
        render_section("Motivación", &format!("<p>{}</p>", text(&c.motivacion)))
    };

    let mut contacto = Vec::new();
    if !c.email.is_empty() {
        contacto.push(format!("Email: {}", c.email));
    }
    if !c.telefono.is_empty() {
        contacto.push(format!("Teléfono: {}", c.telefono));
    }

    normalize_for_js(format!("
        <div class='detalle'>
            <img class='detalle-foto' src='{foto}' alt='{alt}' />
            <h2 class='detalle-titulo'>{nombre}</h2>
            <p class='detalle-subtitulo'>{subtitulo}</p>
            {motivacion}
            {ejes}
            {logros}
            {compromisos_partido}
            {compromisos_electo}
            {contacto}
            {enlaces}
        </div>
    ",
        foto = attr(&foto_src(c)),
        alt = attr(&c.nombre),
        nombre = text(&c.nombre),
        subtitulo = text(&detalle_subtitulo(c)),
        ejes = render_list_section("Ejes", &c.ejes),
        logros = render_list_section("Logros", &c.logros),
        compromisos_partido = render_list_section("Compromisos con el partido", &c.compromisos_partido),
        compromisos_electo = render_list_section("Compromisos si es electo", &c.compromisos_electo),
        contacto = render_list_section("Contacto", &contacto),
        enlaces = render_enlaces(c, icons),
    ))
}

pub fn normalize_for_js(s: String) -> String {
    s.lines()
        .map(|s| s.trim().replace('`', "'"))
        .collect::<Vec<_>>()
        .join("")
}
