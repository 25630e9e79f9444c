//! Motion sampling and smoothing.
//!
//! A [`MotionManager`] turns raw attitude samples into a smoothed
//! [`TiltSample`] that renderers poll every frame. Raw samples pass
//! through a one-pole low-pass filter, applied exactly once per sample:
//!
//! `pitch += (raw_pitch * sensitivity - pitch) * smoothing`
//!
//! Device sampling runs on a background thread at 60 Hz. Both tilt
//! components are packed into a single atomic word so readers never see
//! a pitch from one sample paired with a roll from another.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use glint_core::TiltSample;

const SAMPLE_INTERVAL: Duration = Duration::from_millis(16);

/// Supplies raw, unfiltered attitude samples in radians.
pub trait MotionProviding: Send + Sync {
    fn tilt(&self) -> TiltSample;
}

/// Where a [`MotionManager`] gets its raw samples.
#[derive(Clone)]
pub enum MotionSource {
    /// Platform device motion. Hosts without an attitude sensor get a
    /// slow simulated drift so compositions still move.
    Device,
    /// A fixed tilt, applied without smoothing. Suited to pointer-drag
    /// interaction and deterministic tests.
    Manual { pitch: f32, roll: f32 },
    /// A caller-supplied sample source, smoothed like device motion.
    Custom(Arc<dyn MotionProviding>),
}

impl std::fmt::Debug for MotionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MotionSource::Device => f.write_str("Device"),
            MotionSource::Manual { pitch, roll } => f
                .debug_struct("Manual")
                .field("pitch", pitch)
                .field("roll", roll)
                .finish(),
            MotionSource::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Drifting sinusoid standing in for a physical attitude sensor.
struct SimulatedMotion {
    started: Instant,
}

impl MotionProviding for SimulatedMotion {
    fn tilt(&self) -> TiltSample {
        let t = self.started.elapsed().as_secs_f32();
        TiltSample {
            pitch: 0.35 * (t * 0.9).sin(),
            roll: 0.5 * (t * 0.7).sin(),
        }
    }
}

struct Shared {
    // Filtered pitch and roll bit patterns packed into one word.
    tilt: AtomicU64,
    sensitivity: AtomicU32,
    smoothing: AtomicU32,
    running: AtomicBool,
}

fn pack(sample: TiltSample) -> u64 {
    ((sample.pitch.to_bits() as u64) << 32) | sample.roll.to_bits() as u64
}

fn unpack(bits: u64) -> TiltSample {
    TiltSample {
        pitch: f32::from_bits((bits >> 32) as u32),
        roll: f32::from_bits(bits as u32),
    }
}

fn filter_step(current: TiltSample, raw: TiltSample, sensitivity: f32, smoothing: f32) -> TiltSample {
    TiltSample {
        pitch: current.pitch + (raw.pitch * sensitivity - current.pitch) * smoothing,
        roll: current.roll + (raw.roll * sensitivity - current.roll) * smoothing,
    }
}

/// Samples a motion source on a worker thread and exposes the smoothed
/// tilt for per-frame polling.
pub struct MotionManager {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl MotionManager {
    /// A manager with sensitivity 1.0 and smoothing 0.15, stopped.
    pub fn new() -> Self {
        Self::with_tuning(1.0, 0.15)
    }

    pub fn with_tuning(sensitivity: f32, smoothing: f32) -> Self {
        Self {
            shared: Arc::new(Shared {
                tilt: AtomicU64::new(pack(TiltSample::ZERO)),
                sensitivity: AtomicU32::new(sensitivity.to_bits()),
                smoothing: AtomicU32::new(smoothing.to_bits()),
                running: AtomicBool::new(false),
            }),
            worker: None,
        }
    }

    /// The current smoothed tilt. Both components come from the same
    /// sample.
    pub fn tilt(&self) -> TiltSample {
        unpack(self.shared.tilt.load(Ordering::Acquire))
    }

    pub fn sensitivity(&self) -> f32 {
        f32::from_bits(self.shared.sensitivity.load(Ordering::Relaxed))
    }

    /// Takes effect from the next raw sample onward.
    pub fn set_sensitivity(&self, value: f32) {
        self.shared.sensitivity.store(value.to_bits(), Ordering::Relaxed);
    }

    pub fn smoothing(&self) -> f32 {
        f32::from_bits(self.shared.smoothing.load(Ordering::Relaxed))
    }

    /// Takes effect from the next raw sample onward.
    pub fn set_smoothing(&self, value: f32) {
        self.shared.smoothing.store(value.to_bits(), Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Relaxed)
    }

    /// Begins sampling. Calling on an already-running manager does
    /// nothing.
    pub fn start(&mut self, source: MotionSource) {
        if self.shared.running.swap(true, Ordering::AcqRel) {
            return;
        }
        let provider: Arc<dyn MotionProviding> = match source {
            MotionSource::Device => Arc::new(SimulatedMotion {
                started: Instant::now(),
            }),
            MotionSource::Manual { pitch, roll } => {
                // Manual tilt bypasses the filter entirely.
                self.set_manual_tilt(pitch, roll);
                return;
            }
            MotionSource::Custom(provider) => provider,
        };

        debug!("starting motion sampling");
        let shared = Arc::clone(&self.shared);
        self.worker = Some(thread::spawn(move || {
            while shared.running.load(Ordering::Acquire) {
                let raw = provider.tilt();
                let sensitivity = f32::from_bits(shared.sensitivity.load(Ordering::Relaxed));
                let smoothing = f32::from_bits(shared.smoothing.load(Ordering::Relaxed));
                let current = unpack(shared.tilt.load(Ordering::Acquire));
                let next = filter_step(current, raw, sensitivity, smoothing);
                shared.tilt.store(pack(next), Ordering::Release);
                thread::sleep(SAMPLE_INTERVAL);
            }
        }));
    }

    /// Stops sampling and joins the worker. The last smoothed tilt
    /// remains readable. Calling on a stopped manager does nothing.
    pub fn stop(&mut self) {
        self.shared.running.store(false, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    /// Sets the tilt directly, scaled by sensitivity but unsmoothed.
    /// Drives pointer-based interaction on hosts without a sensor.
    pub fn set_manual_tilt(&self, pitch: f32, roll: f32) {
        let sensitivity = self.sensitivity();
        let sample = TiltSample {
            pitch: pitch * sensitivity,
            roll: roll * sensitivity,
        };
        self.shared.tilt.store(pack(sample), Ordering::Release);
    }
}

impl Default for MotionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MotionManager {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTilt(TiltSample);

    impl MotionProviding for FixedTilt {
        fn tilt(&self) -> TiltSample {
            self.0
        }
    }

    #[test]
    fn test_pack_round_trip() {
        let sample = TiltSample {
            pitch: -0.125,
            roll: 2.5,
        };
        assert_eq!(unpack(pack(sample)), sample);
        assert_eq!(unpack(pack(TiltSample::ZERO)), TiltSample::ZERO);
    }

    #[test]
    fn test_filter_converges_to_scaled_target() {
        let raw = TiltSample {
            pitch: 0.4,
            roll: -0.2,
        };
        let mut current = TiltSample::ZERO;
        for _ in 0..200 {
            current = filter_step(current, raw, 2.0, 0.15);
        }
        assert!((current.pitch - 0.8).abs() < 1e-3);
        assert!((current.roll + 0.4).abs() < 1e-3);
    }

    #[test]
    fn test_filter_never_overshoots() {
        let raw = TiltSample {
            pitch: 1.0,
            roll: 1.0,
        };
        let mut current = TiltSample::ZERO;
        for _ in 0..50 {
            current = filter_step(current, raw, 1.0, 0.15);
            assert!(current.pitch <= 1.0);
            assert!(current.roll <= 1.0);
        }
    }

    #[test]
    fn test_unit_smoothing_passes_samples_through() {
        let raw = TiltSample {
            pitch: 0.3,
            roll: 0.7,
        };
        let stepped = filter_step(TiltSample::ZERO, raw, 1.0, 1.0);
        assert_eq!(stepped, raw);
    }

    #[test]
    fn test_manual_tilt_bypasses_smoothing() {
        let mut manager = MotionManager::with_tuning(2.0, 0.15);
        manager.start(MotionSource::Manual {
            pitch: 0.5,
            roll: -0.25,
        });
        let tilt = manager.tilt();
        assert_eq!(tilt.pitch, 1.0);
        assert_eq!(tilt.roll, -0.5);
        assert!(manager.is_running());
    }

    #[test]
    fn test_custom_source_drives_tilt() {
        let mut manager = MotionManager::with_tuning(1.0, 1.0);
        manager.start(MotionSource::Custom(Arc::new(FixedTilt(TiltSample {
            pitch: 0.2,
            roll: 0.1,
        }))));
        thread::sleep(Duration::from_millis(100));
        manager.stop();
        let tilt = manager.tilt();
        assert!((tilt.pitch - 0.2).abs() < 1e-6);
        assert!((tilt.roll - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut manager = MotionManager::new();
        manager.start(MotionSource::Device);
        manager.start(MotionSource::Device);
        assert!(manager.is_running());
        manager.stop();
        assert!(!manager.is_running());
        manager.stop();
    }

    #[test]
    fn test_stop_preserves_last_tilt() {
        let mut manager = MotionManager::with_tuning(1.0, 1.0);
        manager.start(MotionSource::Manual {
            pitch: 0.4,
            roll: 0.0,
        });
        manager.stop();
        assert_eq!(manager.tilt().pitch, 0.4);
    }
}
