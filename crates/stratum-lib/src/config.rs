//! Per-grammar parse limits.

pub const DEFAULT_EXEC_FUEL: u32 = 1_000_000;
pub const DEFAULT_RECURSION_FUEL: u32 = 1024;
pub const DEFAULT_MAX_RECOVERY_BRACKETS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    pub exec_fuel: Option<u32>,
    pub recursion_fuel: Option<u32>,
    pub max_recovery_brackets: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            exec_fuel: Some(DEFAULT_EXEC_FUEL),
            recursion_fuel: Some(DEFAULT_RECURSION_FUEL),
            max_recovery_brackets: DEFAULT_MAX_RECOVERY_BRACKETS,
        }
    }
}

impl ParserConfig {
    /// Set execution fuel limit. None = infinite.
    ///
    /// Execution fuel never replenishes: every consumed token costs one unit,
    /// including tokens re-consumed after backtracking.
    pub fn with_exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.exec_fuel = limit;
        self
    }

    /// Set recursion depth limit. None = infinite.
    ///
    /// Recursion fuel restores when exiting a rule call.
    pub fn with_recursion_fuel(mut self, limit: Option<u32>) -> Self {
        self.recursion_fuel = limit;
        self
    }

    /// Upper bound on synthetic opening brackets tried during recovery.
    pub fn with_max_recovery_brackets(mut self, limit: usize) -> Self {
        self.max_recovery_brackets = limit;
        self
    }
}
