use serde::{Deserialize, Serialize};

/// A named savings target, tracked independently of holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialGoal {
    /// Store-assigned identity
    pub id: i64,

    pub name: String,

    /// Target amount (positive)
    pub target: f64,

    /// Progress amount. May exceed `target`.
    pub current: f64,

    /// Calendar date string, e.g. "2026-06-30"
    pub deadline: String,
}

impl FinancialGoal {
    /// Progress towards the target for display, clamped to 100.
    ///
    /// The stored `current` value is never clamped.
    pub fn progress_pct(&self) -> f64 {
        if self.target <= 0.0 {
            return 0.0;
        }
        ((self.current / self.target) * 100.0).min(100.0)
    }

    pub fn is_achieved(&self) -> bool {
        self.target > 0.0 && self.current >= self.target
    }
}

/// A goal that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGoal {
    pub name: String,
    pub target: f64,

    /// Defaults to 0 when omitted.
    #[serde(default)]
    pub current: Option<f64>,

    pub deadline: String,
}

impl NewGoal {
    pub fn new(name: impl Into<String>, target: f64, deadline: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target,
            current: None,
            deadline: deadline.into(),
        }
    }

    pub fn with_current(mut self, current: f64) -> Self {
        self.current = Some(current);
        self
    }
}
