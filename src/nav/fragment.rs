/// One recognized part of a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `track-<N>` or `track=<id>`.
    Track(String),
    /// `standalone`, `mode=standalone` or `standalone=true`.
    Standalone,
}

impl Directive {
    /// Match a single fragment part. Unknown shapes yield `None`.
    pub fn parse(part: &str) -> Option<Self> {
        match part {
            "standalone" | "mode=standalone" | "standalone=true" => return Some(Self::Standalone),
            _ => {}
        }

        if let Some(id) = part.strip_prefix("track=") {
            return (!id.is_empty()).then(|| Self::Track(id.to_string()));
        }

        track_position(part).map(|_| Self::Track(part.to_string()))
    }
}

/// What the fragment asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationTarget {
    pub track_id: Option<String>,
    pub standalone: bool,
}

impl NavigationTarget {
    /// Parse a fragment, with or without its leading `#`.
    ///
    /// Parts are separated by `/` or `;`. When several track parts appear the
    /// last one wins.
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);

        let mut target = Self::default();
        for directive in fragment
            .split(['/', ';'])
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .filter_map(Directive::parse)
        {
            match directive {
                Directive::Track(id) => target.track_id = Some(id),
                Directive::Standalone => target.standalone = true,
            }
        }
        target
    }
}

/// `N` for ids of the form `track-<N>`.
pub(super) fn track_position(id: &str) -> Option<usize> {
    numbered(id, "track-")
}

/// The decimal suffix of `<prefix><N>`.
pub(super) fn numbered(id: &str, prefix: &str) -> Option<usize> {
    let digits = id.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
