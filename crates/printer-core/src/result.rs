//! View model for the externally-owned result panel.

use serde::{Deserialize, Serialize};

/// Host-supplied panel state. Content arrives pre-formatted and may grow
/// while `loading` as the host streams it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultPanelState {
    pub visible: bool,
    pub content: String,
    pub loading: bool,
}

impl ResultPanelState {
    /// Only rendered alongside the paper.
    pub fn is_shown(&self, paper_visible: bool) -> bool {
        self.visible && paper_visible
    }

    /// Non-blank content lines, one paragraph each.
    pub fn lines(&self) -> Vec<&str> {
        self.content
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .collect()
    }

    /// Placeholder while waiting for the first chunk.
    pub fn shows_loading_hint(&self) -> bool {
        self.loading && self.content.is_empty()
    }

    /// Blinking cursor while more content is streaming in.
    pub fn shows_cursor(&self) -> bool {
        self.loading && !self.content.is_empty()
    }

    pub fn shows_actions(&self, action_count: usize) -> bool {
        action_count > 0 && !self.loading
    }
}
