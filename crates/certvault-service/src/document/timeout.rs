//! Time budget for hosted-backend admin calls.

use std::future::Future;
use std::time::Duration;

use certvault_core::error::AppError;
use certvault_core::result::AppResult;

/// Run an admin-credentialed backend call under a time budget.
///
/// A call that exceeds the budget fails with a timeout error instead of
/// hanging the request.
pub async fn with_admin_timeout<T, F>(budget: Duration, call: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(budget, call).await {
        Ok(result) => result,
        Err(_) => Err(AppError::timeout(format!(
            "Backend admin call exceeded {}s budget",
            budget.as_secs()
        ))),
    }
}
