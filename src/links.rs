use std::collections::BTreeMap;

use crate::candidato::{Candidato, Redes};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Platform {
    X,
    Facebook,
    Instagram,
    Tiktok,
    Youtube,
    Linkedin,
    Kwai,
    Otros,
}

impl Platform {

    pub fn key(&self) -> &'static str {
        use Platform::*;
        match self {
            X => "x",
            Facebook => "facebook",
            Instagram => "instagram",
            Tiktok => "tiktok",
            Youtube => "youtube",
            Linkedin => "linkedin",
            Kwai => "kwai",
            Otros => "otros",
        }
    }

    pub fn label(&self) -> &'static str {
        use Platform::*;
        match self {
            X => "X/Twitter",
            Facebook => "Facebook",
            Instagram => "Instagram",
            Tiktok => "TikTok",
            Youtube => "YouTube",
            Linkedin => "LinkedIn",
            Kwai => "Kwai",
            Otros => "Otros",
        }
    }

    pub fn default_icon(&self) -> &'static str {
        use Platform::*;
        match self {
            X => "fa-brands fa-x-twitter",
            Facebook => "fa-brands fa-facebook",
            Instagram => "fa-brands fa-instagram",
            Tiktok => "fa-brands fa-tiktok",
            Youtube => "fa-brands fa-youtube",
            Linkedin => "fa-brands fa-linkedin",
            Kwai => "fa-solid fa-video",
            Otros => "fa-solid fa-link",
        }
    }

    fn profile_base(&self) -> Option<&'static str> {
        use Platform::*;
        match self {
            Facebook => Some("https://www.facebook.com/"),
            Instagram => Some("https://www.instagram.com/"),
            Tiktok => Some("https://www.tiktok.com/"),
            Kwai => Some("https://www.kwai.com/"),
            _ => None,
        }
    }
}

/// Icon classes from the dataset, with a built-in class per platform for
/// keys the dataset does not define.
#[derive(Debug, Default, Clone)]
pub struct IconTable {
    icons: BTreeMap<String, String>,
}

impl IconTable {
    pub fn new(icons: &BTreeMap<String, String>) -> Self {
        Self { icons: icons.clone() }
    }

    pub fn icon(&self, p: Platform) -> &str {
        self.icons
            .get(p.key())
            .map(|s| s.as_str())
            .unwrap_or(p.default_icon())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enlace {
    pub label: String,
    pub url: String,
    pub icon: String,
}

impl Enlace {
    /// `url` when it may be used as an `href`: absolute `http`, `https`
    /// or `mailto` only. Anything else is shown as plain text.
    pub fn href(&self) -> Option<&str> {
        let url = reqwest::Url::parse(self.url.trim()).ok()?;
        match url.scheme() {
            "http" | "https" | "mailto" => Some(self.url.trim()),
            _ => None,
        }
    }
}

/// One line in the "Enlaces" section: `Facebook: <a>..</a> · <a>..</a>`.
#[derive(Debug, Clone, PartialEq)]
pub struct GrupoEnlaces {
    pub label: &'static str,
    pub enlaces: Vec<Enlace>,
}

fn is_url(s: &str) -> bool {
    let s = s.to_ascii_lowercase();
    s.starts_with("http://") || s.starts_with("https://")
}

/// Best-effort guess for free-text entries under `otros`, e.g.
/// `"@usuario TikTok"` -> (`TikTok`, `https://www.tiktok.com/@usuario`).
///
/// `None` means the entry stays a generic link.
pub fn infer_platform(entry: &str) -> Option<(Platform, String)> {
    let lower = entry.to_lowercase();
    let platform = if lower.contains("tiktok") || lower.contains("tik tok") {
        Platform::Tiktok
    } else if lower.contains("kwai") {
        Platform::Kwai
    } else if lower.contains("facebook") {
        Platform::Facebook
    } else if lower.contains("instagram") {
        Platform::Instagram
    } else {
        return None;
    };

    let handle = entry.split_whitespace().next().unwrap_or_default();
    if is_url(handle) {
        return Some((platform, handle.to_string()));
    }

    let handle = match platform {
        Platform::Instagram => handle.trim_start_matches('@'),
        _ => handle,
    };
    let base = platform.profile_base().unwrap_or_default();
    Some((platform, format!("{base}{handle}")))
}

fn grupo(label: &'static str, entries: &[String], platform: Platform, icons: &IconTable) -> Option<GrupoEnlaces> {
    if entries.is_empty() {
        return None;
    }

    let enlaces = entries.iter().map(|u| {
        let detected = match platform {
            Platform::Otros => infer_platform(u),
            _ => None,
        };
        match detected {
            Some((p, url)) => Enlace {
                label: p.label().to_string(),
                url,
                icon: icons.icon(p).to_string(),
            },
            None => Enlace {
                label: label.to_string(),
                url: u.clone(),
                icon: icons.icon(platform).to_string(),
            },
        }
    }).collect();

    Some(GrupoEnlaces { label, enlaces })
}

pub fn grupos_redes(redes: &Redes, icons: &IconTable) -> Vec<GrupoEnlaces> {
    let lists: [(&[String], Platform); 7] = [
        (redes.x.as_slice(), Platform::X),
        (redes.facebook.as_slice(), Platform::Facebook),
        (redes.instagram.as_slice(), Platform::Instagram),
        (redes.tiktok.as_slice(), Platform::Tiktok),
        (redes.youtube.as_slice(), Platform::Youtube),
        (redes.linkedin.as_slice(), Platform::Linkedin),
        (redes.otros.as_slice(), Platform::Otros),
    ];
    lists
        .iter()
        .filter_map(|(entries, p)| grupo(p.label(), entries, *p, icons))
        .collect()
}

/// `Sitio web` entry, listed before the social groups.
pub fn sitio_web(c: &Candidato, icons: &IconTable) -> Option<Enlace> {
    if c.web.trim().is_empty() {
        return None;
    }
    Some(Enlace {
        label: "Sitio web".to_string(),
        url: c.web.clone(),
        icon: icons.icon(Platform::Otros).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_from_free_text() {
        assert_eq!(infer_platform("@ana.soto Tik Tok"), Some((Platform::Tiktok, "https://www.tiktok.com/@ana.soto".to_string())));
        assert_eq!(infer_platform("@ana instagram"), Some((Platform::Instagram, "https://www.instagram.com/ana".to_string())));
        assert_eq!(infer_platform("ana.soto Facebook"), Some((Platform::Facebook, "https://www.facebook.com/ana.soto".to_string())));
        assert_eq!(infer_platform("anasoto Kwai"), Some((Platform::Kwai, "https://www.kwai.com/anasoto".to_string())));
        assert_eq!(infer_platform("https://www.tiktok.com/@ana"), Some((Platform::Tiktok, "https://www.tiktok.com/@ana".to_string())));
        assert_eq!(infer_platform("https://blog.example.org"), None);
        assert_eq!(infer_platform(""), None);
    }

    #[test]
    fn dataset_icons_override_builtin() {
        let mut m = BTreeMap::new();
        m.insert("x".to_string(), "icon-x".to_string());
        let icons = IconTable::new(&m);
        assert_eq!(icons.icon(Platform::X), "icon-x");
        assert_eq!(icons.icon(Platform::Kwai), "fa-solid fa-video");
    }

    #[test]
    fn groups_keep_platform_order() {
        let redes = Redes {
            x: vec!["https://x.com/ana".to_string()],
            otros: vec!["@ana tiktok".to_string(), "https://ana.cl".to_string()],
            ..Default::default()
        };
        let g = grupos_redes(&redes, &IconTable::default());
        assert_eq!(g.len(), 2);
        assert_eq!(g[0].label, "X/Twitter");
        assert_eq!(g[0].enlaces[0].url, "https://x.com/ana");
        assert_eq!(g[1].label, "Otros");
        assert_eq!(g[1].enlaces[0].label, "TikTok");
        assert_eq!(g[1].enlaces[0].icon, "fa-brands fa-tiktok");
        assert_eq!(g[1].enlaces[1].label, "Otros");
        assert_eq!(g[1].enlaces[1].icon, "fa-solid fa-link");
    }

    #[test]
    fn only_web_schemes_are_linkable() {
        let enlace = |url: &str| Enlace { label: "Otros".to_string(), url: url.to_string(), icon: String::new() };
        assert_eq!(enlace("https://ana.cl").href(), Some("https://ana.cl"));
        assert_eq!(enlace(" HTTP://ana.cl/x ").href(), Some("HTTP://ana.cl/x"));
        assert_eq!(enlace("mailto:ana@example.org").href(), Some("mailto:ana@example.org"));
        assert_eq!(enlace("javascript:alert(1)").href(), None);
        assert_eq!(enlace("JavaScript:alert(1)").href(), None);
        assert_eq!(enlace("data:text/html,hola").href(), None);
        assert_eq!(enlace("ana.cl").href(), None);
    }

    #[test]
    fn website_link() {
        let c = Candidato { web: "https://ana.cl".to_string(), ..Default::default() };
        let e = sitio_web(&c, &IconTable::default()).unwrap();
        assert_eq!(e.label, "Sitio web");
        assert!(sitio_web(&Candidato::default(), &IconTable::default()).is_none());
    }
}
