//! Shareable links: the state of the auxiliary text panels plus the current input, packed into
//! a URL query string so the page can be restored from it.
//!
//! Query layout: one `0`/`1` character per [`Panel`] (in [`Panel::ALL`] order) followed by the
//! percent-escaped input text. Escaping matches JavaScript's `escape()`, which wrote the older
//! text-only links: `+` stays literal and spaces become `%20`.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use url::Url;

/// Everything but `A-Z a-z 0-9 @ * _ + - . /` is escaped.
const ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'@')
    .remove(b'*')
    .remove(b'_')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'/');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Panel {
    /// The normalised source markup.
    Markup,
    /// The semantic tree as pretty-printed JSON.
    Json,
    /// Markup annotated with semantic attributes.
    Annotated,
    /// The engine's semantic tree dump.
    Semantics,
}

impl Panel {
    pub const ALL: [Panel; 4] = [
        Panel::Markup,
        Panel::Json,
        Panel::Annotated,
        Panel::Semantics,
    ];

    fn slot(self) -> usize {
        match self {
            Panel::Markup => 0,
            Panel::Json => 1,
            Panel::Annotated => 2,
            Panel::Semantics => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PanelFlags([bool; 4]);

impl Default for PanelFlags {
    fn default() -> Self {
        Self([true, true, false, false])
    }
}

impl PanelFlags {
    pub const WIDTH: usize = Panel::ALL.len();

    pub fn none() -> Self {
        Self([false; 4])
    }

    pub fn is_shown(&self, panel: Panel) -> bool {
        self.0[panel.slot()]
    }

    pub fn set(&mut self, panel: Panel, shown: bool) {
        self.0[panel.slot()] = shown;
    }

    pub fn with(mut self, panel: Panel, shown: bool) -> Self {
        self.set(panel, shown);
        self
    }

    pub fn to_bits(&self) -> String {
        self.0.iter().map(|b| if *b { '1' } else { '0' }).collect()
    }

    /// Parses exactly [`PanelFlags::WIDTH`] `0`/`1` characters.
    pub fn from_bits(bits: &str) -> Option<Self> {
        if bits.len() != Self::WIDTH {
            return None;
        }
        let mut out = [false; 4];
        for (slot, b) in out.iter_mut().zip(bits.bytes()) {
            *slot = match b {
                b'0' => false,
                b'1' => true,
                _ => return None,
            };
        }
        Some(Self(out))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShareLink {
    pub panels: PanelFlags,
    pub input: String,
}

impl ShareLink {
    pub fn new(panels: PanelFlags, input: impl Into<String>) -> Self {
        Self {
            panels,
            input: input.into(),
        }
    }

    pub fn to_query(&self) -> String {
        let mut out = self.panels.to_bits();
        out.extend(utf8_percent_encode(&self.input, ESCAPE));
        out
    }

    /// Decodes a query string (with or without the leading `?`).
    ///
    /// Queries without a flag prefix come from text-only links and keep the default panels.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let (panels, rest) = match query
            .get(..PanelFlags::WIDTH)
            .and_then(PanelFlags::from_bits)
        {
            Some(flags) => (flags, &query[PanelFlags::WIDTH..]),
            None => (PanelFlags::default(), query),
        };
        Self {
            panels,
            input: unescape(rest),
        }
    }

    /// Replaces any query on `base` with this link's query.
    pub fn to_url(&self, base: &str) -> String {
        let query = self.to_query();
        match Url::parse(base) {
            Ok(mut url) => {
                url.set_query(Some(&query));
                url.into()
            }
            Err(_) => {
                let base = base.split_once('?').map_or(base, |(head, _)| head);
                format!("{base}?{query}")
            }
        }
    }

    /// Returns `None` when the URL carries no query.
    pub fn from_url(url: &str) -> Option<Self> {
        let query = match Url::parse(url) {
            Ok(parsed) => parsed.query()?.to_string(),
            Err(_) => url.split_once('?')?.1.to_string(),
        };
        if query.is_empty() {
            return None;
        }
        Some(Self::from_query(&query))
    }
}

/// Undoes [`ESCAPE`] as well as the `%uXXXX` escapes `escape()` wrote for characters outside
/// Latin-1.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut units: Vec<u16> = Vec::new();
    let mut rest = text;
    while let Some(at) = rest.find("%u") {
        let (head, tail) = rest.split_at(at);
        let unit = tail
            .get(2..6)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|hex| u16::from_str_radix(hex, 16).ok());
        if !head.is_empty() {
            flush_units(&mut out, &mut units);
            out.push_str(&decode_bytes(head));
        }
        match unit {
            Some(unit) => {
                units.push(unit);
                rest = &tail[6..];
            }
            None => {
                flush_units(&mut out, &mut units);
                out.push_str("%u");
                rest = &tail[2..];
            }
        }
    }
    flush_units(&mut out, &mut units);
    out.push_str(&decode_bytes(rest));
    out
}

fn flush_units(out: &mut String, units: &mut Vec<u16>) {
    if !units.is_empty() {
        out.push_str(&String::from_utf16_lossy(units));
        units.clear();
    }
}

/// `%XX` escapes are UTF-8 from this encoder; a sequence that is not valid UTF-8 is read as
/// Latin-1, which is what `escape()` produced for those characters.
fn decode_bytes(text: &str) -> String {
    let bytes: Vec<u8> = percent_decode_str(text).collect();
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_round_trips_flags_and_text() {
        let link = ShareLink::new(
            PanelFlags::none()
                .with(Panel::Json, true)
                .with(Panel::Semantics, true),
            r"\frac{a+b}{2} = c & d?x=1 % ü",
        );
        let query = link.to_query();
        assert!(query.starts_with("0101"));
        assert!(!query[4..].contains(' '));
        assert_eq!(ShareLink::from_query(&query), link);
    }

    #[test]
    fn url_replaces_existing_query() {
        let link = ShareLink::new(PanelFlags::default(), "x^2");
        let url = link.to_url("https://example.org/vis.html?1100old");
        assert_eq!(url, "https://example.org/vis.html?1100x%5E2");
        assert_eq!(ShareLink::from_url(&url), Some(link));
        assert_eq!(ShareLink::from_url("https://example.org/vis.html"), None);
    }

    #[test]
    fn text_only_queries_keep_default_panels() {
        let link = ShareLink::from_query("?x%2By");
        assert_eq!(link.panels, PanelFlags::default());
        assert_eq!(link.input, "x+y");
    }

    #[test]
    fn text_only_queries_keep_plus_signs() {
        assert_eq!(ShareLink::from_query("?x+y").input, "x+y");
        assert_eq!(ShareLink::from_query("?a%20+%20b%3D2").input, "a + b=2");
    }

    #[test]
    fn text_only_queries_accept_escape_style_unicode_and_latin1() {
        assert_eq!(
            ShareLink::from_query("?%u221Ax%20%E9").input,
            "\u{221A}x \u{e9}"
        );
        assert_eq!(ShareLink::from_query("?%uD835%uDC65").input, "\u{1D465}");
        assert_eq!(ShareLink::from_query("?50%u").input, "50%u");
    }

    #[test]
    fn spaces_and_plus_signs_escape_like_javascript() {
        let link = ShareLink::new(PanelFlags::default(), "x^2 + 1");
        assert_eq!(link.to_query(), "1100x%5E2%20+%201");
        assert_eq!(ShareLink::from_query(&link.to_query()), link);
    }

    #[test]
    fn empty_text_round_trips() {
        let link = ShareLink::new(PanelFlags::none(), "");
        assert_eq!(link.to_query(), "0000");
        assert_eq!(ShareLink::from_query("0000"), link);
    }
}
