//! Run-wide cancellation
//!
//! One token ends the run. It fires when the operator interrupts (Ctrl-C,
//! or SIGTERM on Unix) and again, harmlessly, once the worker has been
//! joined so the signal listener can exit.

use crate::{
    error::{AppError, Result},
    logging::Logger,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct CancellationController {
    token: CancellationToken,
    interrupted: Arc<AtomicBool>,
    listener: Option<JoinHandle<()>>,
    logger: Logger,
}

impl CancellationController {
    pub fn new(logger: Logger) -> Self {
        Self {
            token: CancellationToken::new(),
            interrupted: Arc::new(AtomicBool::new(false)),
            listener: None,
            logger,
        }
    }

    /// Token to hand to the scheduler and its probes
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Whether the run was ended by an interrupt rather than completion
    pub fn was_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    /// Cancel as if the operator had interrupted the run
    pub fn interrupt(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
        self.token.cancel();
    }

    /// Spawn the task that waits for an interrupt signal.
    ///
    /// `on_interrupt` runs before the token is cancelled, so whatever it
    /// prints appears ahead of output from the aborted probe.
    pub fn listen_for_interrupts<F>(&mut self, on_interrupt: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let token = self.token.clone();
        let interrupted = Arc::clone(&self.interrupted);
        let logger = self.logger.clone();

        self.listener = Some(tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {},
                result = wait_for_interrupt() => match result {
                    Ok(()) => {
                        interrupted.store(true, Ordering::SeqCst);
                        logger.debug("Interrupt received").log();
                        on_interrupt();
                        token.cancel();
                    }
                    Err(e) => {
                        logger
                            .warn("Unable to listen for interrupt signals")
                            .field("error", e.to_string())
                            .log();
                    }
                },
            }
        }));
    }

    /// Wait for the worker to finish, then release the signal listener
    pub async fn join<T>(&mut self, worker: JoinHandle<T>) -> Result<T> {
        let result = worker
            .await
            .map_err(|e| AppError::internal(format!("Probe worker failed: {}", e)));

        self.token.cancel();
        if let Some(listener) = self.listener.take() {
            let _ = listener.await;
        }

        result
    }
}

#[cfg(unix)]
async fn wait_for_interrupt() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_interrupt() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_join_after_completion() {
        let mut controller = CancellationController::new(Logger::quiet("test"));
        controller.listen_for_interrupts(|| panic!("no interrupt expected"));
        let token = controller.token();

        let worker = tokio::spawn(async { 42 });
        let value = assert_ok!(controller.join(worker).await);

        assert_eq!(value, 42);
        assert!(token.is_cancelled());
        assert!(!controller.was_interrupted());
    }

    #[tokio::test]
    async fn test_interrupt_stops_worker() {
        let mut controller = CancellationController::new(Logger::quiet("test"));
        let token = controller.token();

        let worker = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => "cancelled",
                _ = tokio::time::sleep(Duration::from_secs(30)) => "finished",
            }
        });

        controller.interrupt();
        let result = controller.join(worker).await.unwrap();

        assert_eq!(result, "cancelled");
        assert!(controller.was_interrupted());
    }

    #[tokio::test]
    async fn test_panicking_worker_is_internal_error() {
        let mut controller = CancellationController::new(Logger::quiet("test"));
        let worker: JoinHandle<()> = tokio::spawn(async { panic!("boom") });

        let error = assert_err!(controller.join(worker).await);
        assert_eq!(error.category(), "INTERNAL");
    }
}
