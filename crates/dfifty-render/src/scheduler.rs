//! Frame pacing
//!
//! The scheduler does not own a thread or a clock. The host loop asks
//! [`RenderScheduler::poll`] with the current time whether a frame is due,
//! which keeps it deterministic under test.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

const DEFAULT_FPS: u32 = 60;

/// Cancels a scheduler from anywhere, including other threads
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    /// Request the scheduler to stop
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.stopped.store(false, Ordering::SeqCst);
    }
}

/// Fixed-rate frame scheduler with an explicit lifecycle
#[derive(Debug)]
pub struct RenderScheduler {
    frame_interval: Duration,
    running: bool,
    next_frame: Option<Instant>,
    frames: u64,
    stop: StopHandle,
}

impl RenderScheduler {
    /// Scheduler targeting `fps` frames per second (0 means 60)
    pub fn new(fps: u32) -> Self {
        let fps = if fps == 0 { DEFAULT_FPS } else { fps };
        Self {
            frame_interval: Duration::from_secs_f64(1.0 / fps as f64),
            running: false,
            next_frame: None,
            frames: 0,
            stop: StopHandle::default(),
        }
    }

    /// Time between frames
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Begin producing frames; the first one is due immediately
    pub fn start(&mut self, now: Instant) {
        self.stop.reset();
        self.running = true;
        self.next_frame = Some(now);
        info!(
            "Render loop started at {:.1} fps",
            1.0 / self.frame_interval.as_secs_f64()
        );
    }

    /// Stop producing frames
    pub fn stop(&mut self) {
        if self.running {
            info!("Render loop stopped after {} frames", self.frames);
        }
        self.running = false;
        self.next_frame = None;
    }

    /// A handle that stops this scheduler
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Whether frames are being produced
    pub fn is_running(&self) -> bool {
        self.running && !self.stop.is_stopped()
    }

    /// Frames produced since creation
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Returns `true` when a frame should be rendered now.
    ///
    /// A late poll produces a single frame rather than a burst of catch-up
    /// frames.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.stop.is_stopped() && self.running {
            debug!("Stop requested through handle");
            self.stop();
        }
        if !self.running {
            return false;
        }
        let Some(due) = self.next_frame else {
            return false;
        };
        if now < due {
            return false;
        }

        let next = due + self.frame_interval;
        self.next_frame = Some(if next <= now {
            now + self.frame_interval
        } else {
            next
        });
        self.frames += 1;
        true
    }

    /// Time left until the next frame, `None` when stopped
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        if !self.is_running() {
            return None;
        }
        self.next_frame
            .map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_frames_before_start() {
        let mut scheduler = RenderScheduler::new(60);
        assert!(!scheduler.poll(Instant::now()));
        assert_eq!(scheduler.frame_count(), 0);
        assert!(scheduler.time_until_next(Instant::now()).is_none());
    }

    #[test]
    fn test_frame_pacing() {
        let mut scheduler = RenderScheduler::new(10);
        let t0 = Instant::now();
        scheduler.start(t0);

        assert!(scheduler.poll(t0));
        assert!(!scheduler.poll(t0 + Duration::from_millis(50)));
        assert!(scheduler.poll(t0 + Duration::from_millis(100)));
        assert_eq!(scheduler.frame_count(), 2);
        assert_eq!(
            scheduler.time_until_next(t0 + Duration::from_millis(150)),
            Some(Duration::from_millis(50))
        );
    }

    #[test]
    fn test_late_poll_does_not_burst() {
        let mut scheduler = RenderScheduler::new(10);
        let t0 = Instant::now();
        scheduler.start(t0);
        assert!(scheduler.poll(t0));

        let late = t0 + Duration::from_secs(1);
        assert!(scheduler.poll(late));
        assert!(!scheduler.poll(late));
        assert!(!scheduler.poll(late + Duration::from_millis(99)));
        assert!(scheduler.poll(late + Duration::from_millis(100)));
    }

    #[test]
    fn test_stop_and_handle() {
        let mut scheduler = RenderScheduler::new(60);
        let t0 = Instant::now();
        scheduler.start(t0);
        scheduler.stop();
        assert!(!scheduler.poll(t0 + Duration::from_secs(1)));

        scheduler.start(t0);
        let handle = scheduler.stop_handle();
        std::thread::spawn(move || handle.stop()).join().unwrap();
        assert!(!scheduler.is_running());
        assert!(!scheduler.poll(t0 + Duration::from_secs(1)));

        // restart clears a previous stop request
        scheduler.start(t0);
        assert!(scheduler.poll(t0));
    }

    #[test]
    fn test_zero_fps_uses_default() {
        let scheduler = RenderScheduler::new(0);
        assert_eq!(scheduler.frame_interval(), Duration::from_secs_f64(1.0 / 60.0));
    }
}
