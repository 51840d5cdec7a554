//! Polling a render job until it resolves.

use super::{RenderApi, RenderState};
use crate::config::RenderSettings;
use crate::error::{ReelsmithError, Result};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// How often, and how many times, a render's status is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait between two status checks.
    pub interval: Duration,
    /// Maximum number of status checks. `None` polls until the job resolves.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::unbounded(Duration::from_secs(1))
    }
}

impl PollPolicy {
    /// Poll every `interval` with no upper bound.
    pub fn unbounded(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }

    /// Cap the number of status checks.
    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = Some(max);
        self
    }

    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self {
            interval: Duration::from_millis(settings.poll_interval_ms),
            max_attempts: (settings.max_poll_attempts > 0).then_some(settings.max_poll_attempts),
        }
    }
}

/// Wait for a render to finish and return its URL.
///
/// `completed` returns the URL, `failed` returns the service's reason, and
/// any other state is checked again after `policy.interval`. Without a
/// `max_attempts` cap a job that never leaves `pending` blocks forever.
#[instrument(skip(api, policy), fields(interval_ms = policy.interval.as_millis() as u64))]
pub async fn wait_for_render(
    api: &dyn RenderApi,
    render_id: &str,
    policy: &PollPolicy,
) -> Result<String> {
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let status = api.status(render_id).await?;

        match status.status {
            RenderState::Completed => {
                return status.url.filter(|u| !u.is_empty()).ok_or_else(|| {
                    ReelsmithError::RenderFailed(format!(
                        "render {} completed without a URL",
                        render_id
                    ))
                });
            }
            RenderState::Failed => {
                let reason = status
                    .error_message
                    .unwrap_or_else(|| "no reason given".to_string());
                warn!(%render_id, %reason, "Render failed");
                return Err(ReelsmithError::RenderFailed(reason));
            }
            state => debug!(%render_id, %state, attempts, "Render not finished yet"),
        }

        if policy.max_attempts.is_some_and(|max| attempts >= max) {
            return Err(ReelsmithError::RenderTimedOut {
                render_id: render_id.to_string(),
                attempts,
            });
        }

        tokio::time::sleep(policy.interval).await;
    }
}
