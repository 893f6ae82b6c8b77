use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::Error;

/// Repeats requests rejected with [`Error::Busy`].
///
/// Every other error is returned at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    delay: Duration,
    max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(delay: Duration, max_attempts: u32) -> Self {
        Self {
            delay,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub async fn run<F, Fut, T>(&self, label: &str, mut f: F) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let mut attempt = 1;
        loop {
            match f().await {
                Err(Error::Busy { op, message, .. }) => {
                    if attempt >= self.max_attempts {
                        return Err(Error::RetriesExhausted {
                            op,
                            attempts: attempt,
                            message,
                        });
                    }
                    warn!(
                        node    = %label,
                        attempt = %attempt,
                        delay   = ?self.delay,
                        %message,
                        "gateway busy, retrying"
                    );
                    sleep(self.delay).await;
                    attempt += 1
                }
                other => return other,
            }
        }
    }
}
