//! Polling waits with a deadline

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use crate::common::{Error, Result};

use super::UiDriver;

/// Poll `check` until it returns true or `timeout` elapses
///
/// The check always runs at least once. On timeout the error names `what`.
pub async fn wait_until<F, Fut>(what: &str, timeout: Duration, poll: Duration, mut check: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if check().await? {
            return Ok(());
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(Error::wait_timeout(what, timeout));
        }
        trace!(what, ?remaining, "still waiting");
        tokio::time::sleep(poll.min(remaining)).await;
    }
}

/// Wait until `text` is visible anywhere on screen
pub async fn wait_for_text(
    driver: &dyn UiDriver,
    text: &str,
    timeout: Duration,
    poll: Duration,
) -> Result<()> {
    wait_until(&format!("text '{}'", text), timeout, poll, move || {
        driver.text_visible(text)
    })
    .await
}

/// Wait until the foreground activity is `name` (simple or qualified)
pub async fn wait_for_activity(
    driver: &dyn UiDriver,
    name: &str,
    timeout: Duration,
    poll: Duration,
) -> Result<()> {
    wait_until(&format!("the {} screen", name), timeout, poll, move || async move {
        let current = driver.current_activity().await?;
        Ok::<_, Error>(current == name || current.ends_with(&format!(".{}", name)))
    })
    .await
}
