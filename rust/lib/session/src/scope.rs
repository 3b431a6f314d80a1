//! Lifetime of a mounted view.
//!
//! Async work started by a view runs through [`ViewScope::run`]; once the
//! view is unmounted the result is discarded instead of being applied to
//! state nobody is looking at.

use std::future::Future;

use tokio_util::sync::{CancellationToken, DropGuard};

#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fut` unless the scope is unmounted first. Returns `None` when
    /// unmounted before or during the call.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        if self.token.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            out = fut => (!self.token.is_cancelled()).then_some(out),
        }
    }

    pub fn unmount(&self) {
        self.token.cancel();
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Guard that unmounts the scope when dropped.
    pub fn guard(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn active_scope_returns_output() {
        let scope = ViewScope::new();
        assert_eq!(scope.run(async { 7 }).await, Some(7));
        assert!(scope.is_active());
    }

    #[tokio::test]
    async fn unmounted_scope_skips_work() {
        let scope = ViewScope::new();
        scope.unmount();
        assert_eq!(scope.run(async { 7 }).await, None);
    }

    #[tokio::test]
    async fn unmount_during_call_drops_result() {
        let scope = ViewScope::new();
        let handle = scope.clone();
        let slow = scope.run(async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            "late"
        });
        let unmount = async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.unmount();
        };
        let (out, ()) = tokio::join!(slow, unmount);
        assert_eq!(out, None);
        assert!(!scope.is_active());
    }

    #[tokio::test]
    async fn dropping_guard_unmounts() {
        let scope = ViewScope::new();
        {
            let _guard = scope.guard();
        }
        assert!(!scope.is_active());
    }
}
