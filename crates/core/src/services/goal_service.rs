use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::goal::{FinancialGoal, NewGoal};
use crate::storage::store::PortfolioStore;

/// Savings goals: validates user input, then hands it to the store.
///
/// Invalid input is rejected with `ValidationError` before any store call.
pub struct GoalService {
    store: Arc<PortfolioStore>,
}

impl GoalService {
    pub fn new(store: Arc<PortfolioStore>) -> Self {
        Self { store }
    }

    /// Create a goal from raw form input. Progress starts at 0.
    pub async fn add_goal(
        &self,
        name: &str,
        raw_target: &str,
        deadline: &str,
    ) -> Result<i64, CoreError> {
        let goal = parse_new_goal(name, raw_target, deadline)?;
        self.store.create_goal(&goal).await
    }

    /// Set the progress amount of a goal from raw input.
    /// An unknown id is not an error; it updates nothing.
    pub async fn update_progress(&self, id: i64, raw_amount: &str) -> Result<usize, CoreError> {
        let amount = parse_amount(raw_amount)?;
        self.store.update_goal_progress(id, amount).await
    }

    pub async fn list(&self) -> Vec<FinancialGoal> {
        self.store.list_goals().await
    }
}

/// Validate goal form fields: all required, target a finite positive number.
pub fn parse_new_goal(name: &str, raw_target: &str, deadline: &str) -> Result<NewGoal, CoreError> {
    let name = name.trim();
    let deadline = deadline.trim();
    if name.is_empty() || raw_target.trim().is_empty() || deadline.is_empty() {
        return Err(CoreError::ValidationError("Please fill all fields".into()));
    }

    let target = parse_amount(raw_target)?;
    if target <= 0.0 {
        return Err(CoreError::ValidationError(format!(
            "Goal target must be positive, got {target}"
        )));
    }

    Ok(NewGoal::new(name, target, deadline).with_current(0.0))
}

/// Parse a user-entered monetary amount.
pub fn parse_amount(raw: &str) -> Result<f64, CoreError> {
    let trimmed = raw.trim();
    let amount: f64 = trimmed
        .parse()
        .map_err(|_| CoreError::ValidationError(format!("'{raw}' is not a number")))?;
    if !amount.is_finite() {
        return Err(CoreError::ValidationError(format!("'{raw}' is not a finite number")));
    }
    Ok(amount)
}

/// Parse a user-entered share count (non-negative whole number).
pub fn parse_shares(raw: &str) -> Result<u32, CoreError> {
    raw.trim().parse().map_err(|_| {
        CoreError::ValidationError(format!(
            "'{raw}' is not a valid number of shares (expected a non-negative whole number)"
        ))
    })
}
