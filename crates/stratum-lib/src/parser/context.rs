use indexmap::IndexMap;

/// Per-parse tracking state shared by feature exec functions.
///
/// Reset by every feature's init hook at the start of a parse and captured
/// by checkpoints, so a reverted speculation also reverts the state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    values: IndexMap<&'static str, i64>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value; unset keys read as zero.
    pub fn get(&self, key: &'static str) -> i64 {
        self.values.get(key).copied().unwrap_or(0)
    }

    pub fn set(&mut self, key: &'static str, value: i64) {
        self.values.insert(key, value);
    }

    /// Returns the value after the increment.
    pub fn increment(&mut self, key: &'static str) -> i64 {
        let value = self.values.entry(key).or_insert(0);
        *value += 1;
        *value
    }

    /// Returns the value after the decrement.
    pub fn decrement(&mut self, key: &'static str) -> i64 {
        let value = self.values.entry(key).or_insert(0);
        *value -= 1;
        *value
    }

    pub fn reset(&mut self, key: &'static str) {
        self.values.shift_remove(key);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
