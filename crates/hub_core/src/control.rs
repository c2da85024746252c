/// Visible state of one injected save control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Unsaved,
    Saving,
    Saved,
    Failed,
}

impl ControlState {
    /// Clicks start a run only from these states.
    pub fn accepts_click(self) -> bool {
        matches!(self, ControlState::Unsaved | ControlState::Failed)
    }

    pub fn visual(self) -> ControlVisual {
        match self {
            // A failed run reverts the control to its unsaved look.
            ControlState::Unsaved | ControlState::Failed => ControlVisual {
                glyph: "💾",
                tooltip: "Save chat to collection",
                opacity: 1.0,
                disabled: false,
            },
            ControlState::Saving => ControlVisual {
                glyph: "⏳",
                tooltip: "Saving...",
                opacity: 1.0,
                disabled: true,
            },
            ControlState::Saved => ControlVisual {
                glyph: "✅",
                tooltip: "Saved",
                opacity: 0.5,
                disabled: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlVisual {
    pub glyph: &'static str,
    pub tooltip: &'static str,
    pub opacity: f32,
    pub disabled: bool,
}
