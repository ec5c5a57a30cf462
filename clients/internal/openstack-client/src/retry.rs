// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Retry helper for idempotent requests

use std::time::Duration;

use crate::error::OpenStackError;

const MAX_RETRIES: u32 = 3;
const INITIAL_DELAY: Duration = Duration::from_millis(150);
const MAX_DELAY: Duration = Duration::from_secs(2);

/// Run `f` until it succeeds, fails with a non-retriable error, or the
/// retry budget is spent. Only use for requests that are safe to repeat.
pub async fn with_retries<F, Fut, T>(mut f: F, op_name: &str) -> Result<T, OpenStackError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, OpenStackError>>,
{
    let mut attempt = 0u32;
    let mut delay = INITIAL_DELAY;

    loop {
        match f().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                attempt += 1;
                if !e.is_retriable() || attempt > MAX_RETRIES {
                    if attempt > 1 {
                        tracing::warn!(op = op_name, attempts = attempt, error = %e, "giving up");
                    }
                    return Err(e);
                }

                tracing::debug!(op = op_name, attempt, error = %e, "retrying");

                // Exponential backoff with jitter
                let jitter: u64 = u64::from(rand::random::<u8>()) % 50;
                tokio::time::sleep(delay + Duration::from_millis(jitter)).await;
                delay = std::cmp::min(delay * 2, MAX_DELAY);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unavailable() -> OpenStackError {
        OpenStackError::Status {
            method: "GET",
            url: "http://nova/flavors".to_string(),
            status: 503,
            body: String::new(),
        }
    }

    #[tokio::test]
    async fn test_with_retries_succeeds_after_errors() {
        let mut attempts = 0u32;
        let res = with_retries(
            || {
                attempts += 1;
                let n = attempts;
                async move { if n < 3 { Err(unavailable()) } else { Ok(42) } }
            },
            "test.op",
        )
        .await;

        assert_eq!(res.unwrap(), 42);
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn test_with_retries_stops_on_client_error() {
        let mut attempts = 0u32;
        let res: Result<(), _> = with_retries(
            || {
                attempts += 1;
                async {
                    Err(OpenStackError::Status {
                        method: "GET",
                        url: "http://nova/servers/x".to_string(),
                        status: 404,
                        body: String::new(),
                    })
                }
            },
            "test.op",
        )
        .await;

        assert_eq!(res.unwrap_err().status(), Some(404));
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn test_with_retries_gives_up() {
        let mut attempts = 0u32;
        let res: Result<(), _> = with_retries(
            || {
                attempts += 1;
                async { Err(unavailable()) }
            },
            "test.op",
        )
        .await;

        assert!(res.is_err());
        assert_eq!(attempts, MAX_RETRIES + 1);
    }
}
