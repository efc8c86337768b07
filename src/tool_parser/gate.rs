use crate::tool_parser::types::markers;

/// Whether the gate has released this turn's tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No terminator seen yet
    Pending,
    /// The terminator arrived and the call was handed off
    Fired,
}

/// Holds back streaming extraction until the turn's terminator appears.
///
/// Arguments may be extended until the model writes `<|eot_id|>` or
/// `<|eom_id|>`, so nothing is parsed before then. The gate opens exactly
/// once per turn; create a new one (or call [`ToolCallGate::reset`]) for the
/// next turn.
#[derive(Debug, Clone)]
pub struct ToolCallGate {
    state: GateState,
    buffer: String,
    terminators: Vec<&'static str>,
}

impl ToolCallGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Pending,
            buffer: String::new(),
            terminators: vec![markers::EOT, markers::EOM],
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn has_fired(&self) -> bool {
        self.state == GateState::Fired
    }

    pub fn contains_terminator(&self, text: &str) -> bool {
        self.terminators.iter().any(|t| text.contains(t))
    }

    /// Evaluate the full text accumulated so far.
    ///
    /// Returns `true` only on the evaluation that moves the gate from
    /// `Pending` to `Fired`.
    pub fn observe(&mut self, current_text: &str) -> bool {
        let terminated = self.contains_terminator(current_text);
        self.transition(terminated, current_text.len())
    }

    fn transition(&mut self, terminated: bool, buffer_len: usize) -> bool {
        if self.state == GateState::Fired || !terminated {
            return false;
        }
        self.state = GateState::Fired;
        tracing::debug!(buffer_len, "terminator reached, releasing tool call");
        true
    }

    /// Append a delta to the gate's own buffer and evaluate it.
    ///
    /// Returns the complete buffer on the evaluation that fires.
    pub fn push_delta(&mut self, delta_text: &str) -> Option<&str> {
        if self.state == GateState::Fired {
            return None;
        }
        self.buffer.push_str(delta_text);

        // A terminator split across deltas is only visible in the buffer.
        let terminated = self.contains_terminator(&self.buffer);
        if self.transition(terminated, self.buffer.len()) {
            Some(self.buffer.as_str())
        } else {
            None
        }
    }

    /// Text accumulated through [`ToolCallGate::push_delta`]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn reset(&mut self) {
        self.state = GateState::Pending;
        self.buffer.clear();
    }
}

impl Default for ToolCallGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_stays_pending_without_terminator() {
        let mut gate = ToolCallGate::new();
        assert!(!gate.observe(r#"{"name": "f", "parameters": {}}"#));
        assert_eq!(gate.state(), GateState::Pending);
    }

    #[test]
    fn test_gate_fires_once() {
        let mut gate = ToolCallGate::new();
        assert!(gate.observe("done<|eot_id|>"));
        assert_eq!(gate.state(), GateState::Fired);
        assert!(!gate.observe("done<|eot_id|>"));
        assert!(!gate.observe("done<|eot_id|> more<|eom_id|>"));
    }

    #[test]
    fn test_gate_fires_on_eom() {
        let mut gate = ToolCallGate::new();
        assert!(gate.observe("<|python_tag|>f.call()<|eom_id|>"));
    }

    #[test]
    fn test_gate_push_delta_split_terminator() {
        let mut gate = ToolCallGate::new();
        assert_eq!(gate.push_delta("abc<|eo"), None);
        assert_eq!(gate.push_delta("t_"), None);
        assert_eq!(gate.push_delta("id|>"), Some("abc<|eot_id|>"));
        assert_eq!(gate.push_delta("tail"), None);
        assert_eq!(gate.buffer(), "abc<|eot_id|>");
    }

    #[test]
    fn test_gate_reset() {
        let mut gate = ToolCallGate::new();
        gate.push_delta("x<|eom_id|>");
        assert!(gate.has_fired());
        gate.reset();
        assert_eq!(gate.state(), GateState::Pending);
        assert_eq!(gate.buffer(), "");
    }
}
