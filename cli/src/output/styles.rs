//! Terminal colour palette.

use owo_colors::Style;

use crate::application::services::WorkspaceState;

/// One style per kind of output line. Every field is plain by default, so an
/// uncoloured palette needs no special casing at call sites.
#[derive(Default, Clone)]
pub struct Styles {
    pub ok: Style,
    pub caution: Style,
    pub failure: Style,
    /// Field keys, hints, and mirrored guest or container output.
    pub muted: Style,
    pub heading: Style,
    /// Marker in front of in-progress steps.
    pub marker: Style,
}

impl Styles {
    /// Palette used on colour-capable terminals.
    #[must_use]
    pub fn colored() -> Self {
        Self {
            ok: Style::new().green(),
            caution: Style::new().yellow(),
            failure: Style::new().red(),
            muted: Style::new().dimmed(),
            heading: Style::new().bold().cyan(),
            marker: Style::new().cyan(),
        }
    }

    /// Style for a workspace state name in `status` output.
    #[must_use]
    pub fn state(&self, state: WorkspaceState) -> Style {
        match state {
            WorkspaceState::Running => self.ok,
            WorkspaceState::Stopped => self.muted,
            WorkspaceState::Absent => self.caution,
            WorkspaceState::Crashed => self.failure,
        }
    }
}
