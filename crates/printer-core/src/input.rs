//! Text field on the paper strip.

/// Host state that blocks submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitGate {
    pub loading: bool,
    /// Seconds of rate-limit countdown left.
    pub delay: u32,
}

impl SubmitGate {
    /// The field is disabled while a request runs or the countdown is live.
    pub fn is_locked(&self) -> bool {
        self.loading || self.delay > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaperInput {
    value: String,
    composing: bool,
}

impl PaperInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            composing: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Returns true if the value actually changed.
    pub fn set_value(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if value == self.value {
            return false;
        }
        self.value = value;
        true
    }

    pub fn composition_start(&mut self) {
        self.composing = true;
    }

    pub fn composition_end(&mut self) {
        self.composing = false;
    }

    /// Whether Enter would submit right now.
    pub fn can_submit(&self, gate: SubmitGate) -> bool {
        !self.value.trim().is_empty() && !self.composing && !gate.is_locked()
    }

    /// Handles a key press. Returns the text to submit when Enter confirms.
    ///
    /// Enter while an IME is composing selects a candidate and must not
    /// submit. The untrimmed value is submitted.
    pub fn key_down(&self, key: &str, gate: SubmitGate) -> Option<String> {
        if key != "Enter" {
            return None;
        }
        if !self.can_submit(gate) {
            tracing::debug!(
                composing = self.composing,
                loading = gate.loading,
                delay = gate.delay,
                "enter ignored"
            );
            return None;
        }
        Some(self.value.clone())
    }
}
