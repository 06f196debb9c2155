use crate::library::{AudioTrack, public_tracks};

/// Neighbors of the current track within the public subsequence.
#[derive(Debug, Default, PartialEq)]
pub struct Reach<'a> {
    pub previous: Option<&'a AudioTrack>,
    pub next: Option<&'a AudioTrack>,
}

impl Reach<'_> {
    pub fn can_go_previous(&self) -> bool {
        self.previous.is_some()
    }

    pub fn can_go_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Compute next/previous reachability. Standalone mode disables both.
pub fn reach<'a>(tracks: &'a [AudioTrack], current_id: Option<&str>, standalone: bool) -> Reach<'a> {
    let Some(current_id) = current_id.filter(|_| !standalone) else {
        return Reach::default();
    };

    let public: Vec<&AudioTrack> = public_tracks(tracks).collect();
    let Some(pos) = public.iter().position(|t| t.id == current_id) else {
        return Reach::default();
    };

    Reach {
        previous: pos.checked_sub(1).and_then(|p| public.get(p).copied()),
        next: public.get(pos + 1).copied(),
    }
}
