//! Audio engine orchestration
//!
//! The engine itself is external (the Csound API, or a process wrapper);
//! this module owns the seam: the [`AudioEngine`] trait, the play/stop
//! status interlock in [`Transport`], and run-script generation in
//! [`script`].

pub mod script;

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use anyhow::Result;

use crate::widgets::WidgetHost;

/// Options for one engine run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Realtime output rather than rendering to file
    pub realtime: bool,
    /// Command-line flags passed through to the engine
    pub flags: Vec<String>,
}

/// The audio-engine collaborator
///
/// Implemented externally; [`NullEngine`] stands in for tests and the CLI.
pub trait AudioEngine {
    fn play(&mut self, options: &RunOptions) -> Result<()>;
    fn pause(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
    fn is_paused(&self) -> bool;

    /// Queue a realtime score event, dispatched after `delay_ms`
    fn queue_event(&mut self, event: &str, delay_ms: u64);

    /// Start recording engine output to `path`
    fn start_recording(&mut self, path: &Path) -> Result<()> {
        let _ = path;
        anyhow::bail!("this engine was built without recording support")
    }

    fn stop_recording(&mut self) {}
}

/// Transport status interlock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayStopStatus {
    Ok,
    Starting,
    Stopping,
}

/// Serializes play/stop against an engine
///
/// A play request arriving while a stop is in flight waits it out; a stop
/// request while starting or already stopping is refused. The widget layout
/// is flushed before a cold start and notified after a stop.
pub struct Transport {
    engine: Mutex<Box<dyn AudioEngine + Send>>,
    status: Mutex<PlayStopStatus>,
}

impl Transport {
    pub fn new(engine: Box<dyn AudioEngine + Send>) -> Self {
        Self {
            engine: Mutex::new(engine),
            status: Mutex::new(PlayStopStatus::Ok),
        }
    }

    fn lock_engine(&self) -> MutexGuard<'_, Box<dyn AudioEngine + Send>> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_status(&self) -> MutexGuard<'_, PlayStopStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> PlayStopStatus {
        *self.lock_status()
    }

    pub fn is_running(&self) -> bool {
        self.lock_engine().is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.lock_engine().is_paused()
    }

    pub fn play(&self, options: &RunOptions, widgets: &mut dyn WidgetHost) -> Result<()> {
        loop {
            if *self.lock_status() != PlayStopStatus::Stopping {
                break;
            }
            tracing::debug!("engine stopping, waiting");
            thread::sleep(Duration::from_millis(100));
        }
        let mut status = self.lock_status();
        *status = PlayStopStatus::Starting;
        let mut engine = self.lock_engine();
        if !engine.is_running() {
            // Flush accumulated widget values before a cold start
            widgets.flush();
        }
        *status = PlayStopStatus::Ok;
        drop(status);
        engine.play(options)
    }

    pub fn pause(&self) {
        self.lock_engine().pause();
    }

    pub fn stop(&self, widgets: &mut dyn WidgetHost) {
        if !self.lock_engine().is_running() {
            tracing::debug!("engine is not running");
            return;
        }
        let mut status = self.lock_status();
        match *status {
            PlayStopStatus::Stopping => {
                tracing::debug!("already stopping");
                return;
            }
            PlayStopStatus::Starting => {
                tracing::debug!("asked to stop while starting");
                return;
            }
            PlayStopStatus::Ok => {}
        }
        *status = PlayStopStatus::Stopping;
        let mut engine = self.lock_engine();
        engine.stop();
        widgets.engine_stopped();
        *status = PlayStopStatus::Ok;
    }

    pub fn queue_event(&self, event: &str, delay_ms: u64) {
        self.lock_engine().queue_event(event, delay_ms);
    }

    pub fn start_recording(&self, path: &Path) -> Result<()> {
        self.lock_engine().start_recording(path)
    }

    pub fn stop_recording(&self) {
        self.lock_engine().stop_recording();
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("status", &self.status())
            .finish()
    }
}

/// A do-nothing engine that tracks its own state. Used in tests and by the
/// CLI, where no synthesis backend is wired up.
#[derive(Debug, Default)]
pub struct NullEngine {
    running: bool,
    paused: bool,
    pub queued: Vec<(String, u64)>,
}

impl AudioEngine for NullEngine {
    fn play(&mut self, _options: &RunOptions) -> Result<()> {
        self.running = true;
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        if self.running {
            self.paused = !self.paused;
        }
    }

    fn stop(&mut self) {
        self.running = false;
        self.paused = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn queue_event(&mut self, event: &str, delay_ms: u64) {
        self.queued.push((event.to_string(), delay_ms));
    }
}
