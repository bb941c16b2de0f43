//! Quit signals polled once per loop iteration

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// External request to stop the control loop
pub trait QuitSignal {
    fn should_quit(&mut self) -> bool;
}

impl<Q: QuitSignal + ?Sized> QuitSignal for Box<Q> {
    fn should_quit(&mut self) -> bool {
        (**self).should_quit()
    }
}

/// Set by Ctrl-C
#[derive(Debug, Clone, Default)]
pub struct CtrlCSignal {
    flag: Arc<AtomicBool>,
}

impl CtrlCSignal {
    /// Spawn the Ctrl-C watcher on the current tokio runtime
    pub fn install() -> Self {
        let signal = Self::default();
        let flag = signal.flag.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping after this frame");
                    flag.store(true, Ordering::SeqCst);
                }
                Err(e) => warn!("Ctrl-C handler unavailable: {}", e),
            }
        });
        signal
    }

    /// Request a stop as if Ctrl-C had been pressed
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

impl QuitSignal for CtrlCSignal {
    fn should_quit(&mut self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Stops after a fixed number of polls
#[derive(Debug, Clone)]
pub struct FrameLimit {
    limit: u64,
    seen: u64,
}

impl FrameLimit {
    pub fn new(limit: u64) -> Self {
        Self { limit, seen: 0 }
    }
}

impl QuitSignal for FrameLimit {
    fn should_quit(&mut self) -> bool {
        self.seen += 1;
        self.seen >= self.limit
    }
}
