//! Action menu interaction: hover sub-menus and "not implemented" tips.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::timer::{Millis, Scheduler, TimerEvent, TimerId};

/// How long the "not implemented" tip stays up.
pub const ACTION_TIP_MS: Millis = 1500;

/// Renderer-independent description of a menu item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionSpec {
    pub label: String,
    pub has_handler: bool,
    pub disabled: bool,
    pub sub_actions: Vec<ActionSpec>,
}

impl ActionSpec {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_handler(mut self) -> Self {
        self.has_handler = true;
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    #[must_use]
    pub fn with_sub_actions(mut self, sub_actions: Vec<ActionSpec>) -> Self {
        self.sub_actions = sub_actions;
        self
    }

    pub fn has_sub_actions(&self) -> bool {
        !self.sub_actions.is_empty()
    }
}

/// Location of an item: top-level index plus optional sub-menu index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActionPath {
    pub index: usize,
    pub sub: Option<usize>,
}

impl ActionPath {
    pub const fn top(index: usize) -> Self {
        Self { index, sub: None }
    }

    pub const fn sub(index: usize, sub: usize) -> Self {
        Self {
            index,
            sub: Some(sub),
        }
    }

    /// Looks the item up in a menu.
    pub fn resolve<'a>(&self, actions: &'a [ActionSpec]) -> Option<&'a ActionSpec> {
        let item = actions.get(self.index)?;
        match self.sub {
            Some(sub) => item.sub_actions.get(sub),
            None => Some(item),
        }
    }
}

/// What activating an item did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Call the item's handler with the current input.
    Invoke(ActionPath),
    /// No handler: the tip is now showing.
    ShowTip(ActionPath),
    /// Disabled, missing, or a sub-menu parent.
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionMenuState {
    hovered: Option<usize>,
    tips: BTreeMap<ActionPath, TimerId>,
}

impl ActionMenuState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hover(&mut self, index: usize) {
        self.hovered = Some(index);
    }

    pub fn leave(&mut self, index: usize) {
        if self.hovered == Some(index) {
            self.hovered = None;
        }
    }

    /// Index of the item whose sub-menu is open.
    pub fn open_submenu(&self, actions: &[ActionSpec]) -> Option<usize> {
        self.hovered
            .filter(|index| actions.get(*index).is_some_and(ActionSpec::has_sub_actions))
    }

    pub fn is_tip_visible(&self, path: ActionPath) -> bool {
        self.tips.contains_key(&path)
    }

    /// Handles a click. Parents with sub-menus only open on hover.
    pub fn activate(
        &mut self,
        actions: &[ActionSpec],
        path: ActionPath,
        scheduler: &mut Scheduler<TimerEvent>,
    ) -> ActionOutcome {
        let Some(item) = path.resolve(actions) else {
            return ActionOutcome::Ignored;
        };
        if item.disabled || (path.sub.is_none() && item.has_sub_actions()) {
            return ActionOutcome::Ignored;
        }
        if item.has_handler {
            return ActionOutcome::Invoke(path);
        }

        tracing::debug!(label = %item.label, "action has no handler");
        if let Some(id) = self.tips.remove(&path) {
            scheduler.cancel(id);
        }
        let id = scheduler.schedule(ACTION_TIP_MS, TimerEvent::ActionTipExpired(path));
        self.tips.insert(path, id);
        ActionOutcome::ShowTip(path)
    }

    pub fn on_tip_expired(&mut self, path: ActionPath) {
        self.tips.remove(&path);
    }

    /// Closes sub-menus and clears tips, e.g. when the menu hides.
    pub fn reset(&mut self, scheduler: &mut Scheduler<TimerEvent>) {
        self.hovered = None;
        for (_, id) in std::mem::take(&mut self.tips) {
            scheduler.cancel(id);
        }
    }
}
