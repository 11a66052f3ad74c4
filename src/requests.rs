//! Tracked network requests. Each request runs on its own task and reports
//! through its own channel, so several can be in flight while pages keep
//! serving; completion resolves the channel exactly once and nothing retries
//! behind the caller's back.

use std::future::Future;

use tokio::sync::watch;
use uuid::Uuid;

use crate::AppResult;

/// Observable lifecycle of one request. It moves from `Pending` to exactly
/// one of the other two states and never back.
#[derive(Debug, Clone)]
pub enum RequestState<T> {
    Pending,
    Success(T),
    Failed(String),
}

/// How a request ended.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    Failed(String),
}

/// Handle on a request in flight. Dropping it does not cancel the task.
pub struct InFlight<T> {
    pub id: Uuid,
    rx: watch::Receiver<RequestState<T>>,
}

pub fn track<T, F>(fut: F) -> InFlight<T>
where
    T: Clone + Send + Sync + 'static,
    F: Future<Output = AppResult<T>> + Send + 'static,
{
    let id = Uuid::now_v7();
    let (tx, rx) = watch::channel(RequestState::Pending);
    tokio::spawn(async move {
        let state = match fut.await {
            Ok(value) => RequestState::Success(value),
            Err(err) => {
                tracing::debug!(request = %id, "request failed: {:#}", err.0);
                RequestState::Failed(err.0.to_string())
            }
        };
        let _ = tx.send(state);
    });
    InFlight { id, rx }
}

impl<T: Clone> InFlight<T> {
    /// Last state seen on the channel, without waiting.
    pub fn state(&self) -> RequestState<T> {
        self.rx.borrow().clone()
    }

    /// Waits for the terminal state.
    pub async fn outcome(mut self) -> Outcome<T> {
        loop {
            match self.rx.borrow().clone() {
                RequestState::Pending => {}
                RequestState::Success(value) => return Outcome::Success(value),
                RequestState::Failed(reason) => return Outcome::Failed(reason),
            }
            if self.rx.changed().await.is_err() {
                return Outcome::Failed("request task abandoned".to_owned());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppError;

    #[tokio::test]
    async fn success_resolves_with_the_value() {
        let req = track(async { Ok::<_, AppError>(7) });
        match req.outcome().await {
            Outcome::Success(v) => assert_eq!(v, 7),
            Outcome::Failed(reason) => panic!("unexpected failure: {reason}"),
        }
    }

    #[tokio::test]
    async fn failure_carries_the_reason() {
        let req = track(async { Err::<(), _>(AppError(anyhow::anyhow!("boom"))) });
        match req.outcome().await {
            Outcome::Failed(reason) => assert!(reason.contains("boom")),
            Outcome::Success(_) => panic!("should have failed"),
        }
    }

    #[tokio::test]
    async fn pending_is_observable_while_in_flight() {
        let (gate_tx, gate_rx) = tokio::sync::oneshot::channel::<()>();
        let req = track(async move {
            let _ = gate_rx.await;
            Ok::<_, AppError>(1)
        });

        assert!(matches!(req.state(), RequestState::Pending));

        gate_tx.send(()).expect("task should still be waiting");
        assert!(matches!(req.outcome().await, Outcome::Success(1)));
    }
}
