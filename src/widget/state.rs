use std::fmt;

/// Lifecycle of the summary card within one page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    #[default]
    Absent,
    Skeleton,
    Loading,
    Populated,
    Failed,
}

impl fmt::Display for WidgetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WidgetState::Absent => "absent",
            WidgetState::Skeleton => "skeleton",
            WidgetState::Loading => "loading",
            WidgetState::Populated => "populated",
            WidgetState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Card button behaviour, selected by the button's `data-action` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetAction {
    Intro,
    Regenerate,
    Related,
    Home,
}

impl WidgetAction {
    /// Maps a `data-action` value; unknown identifiers yield `None`.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim() {
            "intro" => Some(Self::Intro),
            "regenerate" => Some(Self::Regenerate),
            "related" => Some(Self::Related),
            "home" => Some(Self::Home),
            _ => None,
        }
    }

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Regenerate => "regenerate",
            Self::Related => "related",
            Self::Home => "home",
        }
    }
}

/// Host-page notifications delivered to [`super::WidgetController::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// Document finished loading.
    Ready,
    /// The DOM changed; anchors may have appeared late.
    Mutated,
    /// A card button was clicked; carries its raw `data-action` value.
    Action(String),
    /// Navigation away from the page. Pending work is abandoned.
    Unload,
}
