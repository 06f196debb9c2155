use std::borrow::Cow;

use url::Url;

use super::fragment::numbered;

/// The id written into links: `preloaded-<N>` becomes `track-<N>`, anything
/// else is used verbatim.
pub fn link_id(track_id: &str) -> Cow<'_, str> {
    match numbered(track_id, "preloaded-") {
        Some(n) => Cow::Owned(format!("track-{n}")),
        None => Cow::Borrowed(track_id),
    }
}

/// Fragment (without `#`) for selecting `track_id`.
pub fn fragment_for_selection(track_id: &str, standalone: bool) -> String {
    let mut fragment = format!("track={}", link_id(track_id));
    if standalone {
        fragment.push_str(";standalone=true");
    }
    fragment
}

/// Percent-decode `raw`; invalid UTF-8 after decoding keeps the raw text.
fn decode_fragment(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// The page location: an optional base URL plus the current fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    page: Option<Url>,
    fragment: String,
}

impl Location {
    /// Accepts a full URL, a `#fragment`, or a bare fragment. The fragment
    /// is stored percent-decoded.
    pub fn parse(link: &str) -> Self {
        let link = link.trim();
        if let Ok(mut url) = Url::parse(link) {
            let fragment = decode_fragment(url.fragment().unwrap_or_default());
            url.set_fragment(None);
            return Self {
                page: Some(url),
                fragment,
            };
        }
        Self {
            page: None,
            fragment: decode_fragment(link.strip_prefix('#').unwrap_or(link)),
        }
    }

    pub fn page(&self) -> Option<&Url> {
        self.page.as_ref()
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Overwrite the current entry's fragment. No history entry is created and
    /// no fragment-change notification is raised.
    pub fn replace_fragment(&mut self, fragment: String) {
        self.fragment = fragment;
    }

    /// Shareable link for the current fragment, built on `base` when given
    /// and on the page URL otherwise.
    pub fn href(&self, base: Option<&Url>) -> String {
        match base.or(self.page.as_ref()) {
            Some(url) => {
                let mut url = url.clone();
                url.set_fragment(Some(&self.fragment));
                url.to_string()
            }
            None => format!("#{}", self.fragment),
        }
    }
}
