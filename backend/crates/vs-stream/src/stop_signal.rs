use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;

/// One-shot stop notification shared by a task and whoever may stop it
#[derive(Clone)]
pub struct StopSignal {
    stop_tx: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (stop_tx, _) = broadcast::channel(1);
        Self {
            stop_tx,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Guard for a task that should stop on this signal.
    /// Create it before spawning so the signal cannot be missed.
    pub fn guard(&self) -> StopGuard {
        StopGuard {
            stop_rx: self.stop_tx.subscribe(),
            triggered: Arc::clone(&self.triggered),
        }
    }

    pub fn trigger(&self) {
        if !self.triggered.swap(true, Ordering::SeqCst) {
            log::debug!("Stop signal triggered");
            let _ = self.stop_tx.send(());
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

pub struct StopGuard {
    stop_rx: broadcast::Receiver<()>,
    triggered: Arc<AtomicBool>,
}

impl StopGuard {
    /// Wait for the stop signal; returns at once if it already fired
    pub async fn wait(&mut self) {
        if self.is_stopped() {
            return;
        }
        let _ = self.stop_rx.recv().await;
    }

    /// Non-blocking check
    pub fn is_stopped(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }
}
