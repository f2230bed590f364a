use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

/// Elapsed-time accumulator driven by an external clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    period: f32,
    elapsed: f32,
}

impl Interval {
    pub fn new(period: f32) -> Interval {
        Interval {
            period,
            elapsed: 0.0,
        }
    }

    /// Adds `dt` and reports whether the period has been strictly
    /// exceeded, in which case the counter restarts from zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed > self.period {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Runs a closure on a dedicated thread at a fixed period until dropped.
pub struct SnapshotTicker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SnapshotTicker {
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> SnapshotTicker
    where
        F: FnMut() + Send + 'static,
    {
        let (stop, stopped) = mpsc::channel::<()>();
        let handle = std::thread::Builder::new()
            .name("snapshot-ticker".to_string())
            .spawn(move || {
                loop {
                    match stopped.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => on_tick(),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                log::trace!("snapshot ticker stopped");
            });
        let handle = match handle {
            Ok(h) => Some(h),
            Err(e) => {
                log::error!("failed to spawn snapshot ticker: {}", e);
                None
            }
        };
        SnapshotTicker {
            stop: Some(stop),
            handle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SnapshotTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
