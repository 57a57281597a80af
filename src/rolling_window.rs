// src/rolling_window.rs

// time-bucketed rolling statistics shared by concurrent callers

// dependencies
use crate::clock::{Clock, RelativeClock};
use crate::errors::BreakerError;
use parking_lot::RwLock;
use std::time::Duration;

/// Aggregated values recorded during one bucket interval.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bucket {
    /// Sum of all values added to the bucket
    pub sum: f64,
    /// Number of values added to the bucket
    pub count: i64,
}

impl Bucket {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn reset(&mut self) {
        self.sum = 0.0;
        self.count = 0;
    }
}

// fixed ring of buckets, indexes wrap around `size`
#[derive(Debug)]
struct Window {
    buckets: Vec<Bucket>,
    size: usize,
}

impl Window {
    fn new(size: usize) -> Self {
        Self {
            buckets: vec![Bucket::default(); size],
            size,
        }
    }

    fn add(&mut self, offset: usize, value: f64) {
        self.buckets[offset % self.size].add(value);
    }

    fn reset_bucket(&mut self, offset: usize) {
        self.buckets[offset % self.size].reset();
    }

    // visits `count` buckets starting at `start`
    fn reduce<F>(&self, start: usize, count: usize, mut f: F)
    where
        F: FnMut(&Bucket),
    {
        for i in 0..count {
            f(&self.buckets[(start + i) % self.size]);
        }
    }
}

// mutable part of the rolling window, guarded by the lock
#[derive(Debug)]
struct WindowState {
    win: Window,
    offset: usize,
    // start boundary of the bucket at `offset`
    last_time: Duration,
}

/// A rolling window of `size` buckets, each `interval` wide.
///
/// Buckets are reset lazily: [`add`](Self::add) rotates the ring forward over every
/// interval that elapsed since the last write, while [`reduce`](Self::reduce) skips
/// slots that have aged out without touching them. There is no background timer.
///
/// Writes take the exclusive lock, reads share it.
#[derive(Debug)]
pub struct RollingWindow<C = RelativeClock>
where
    C: Clock,
{
    size: usize,
    interval: Duration,
    ignore_current: bool,
    state: RwLock<WindowState>,
    clock: C,
}

impl<C> RollingWindow<C>
where
    C: Clock,
{
    /// Create a window with `size` buckets of `interval` each.
    /// Fails if `size` is zero or `interval` is zero.
    pub fn new(size: usize, interval: Duration, clock: C) -> Result<Self, BreakerError> {
        if size == 0 {
            return Err(BreakerError::InvalidBucketCount);
        }
        if interval.is_zero() {
            return Err(BreakerError::InvalidBucketInterval);
        }

        let last_time = clock.now();
        Ok(Self {
            size,
            interval,
            ignore_current: false,
            state: RwLock::new(WindowState {
                win: Window::new(size),
                offset: 0,
                last_time,
            }),
            clock,
        })
    }

    /// Builder-style: exclude the current, partially filled bucket from [`reduce`](Self::reduce)
    pub fn ignore_current_bucket(mut self, ignore: bool) -> Self {
        self.ignore_current = ignore;
        self
    }

    /// Number of buckets in the ring
    pub fn size(&self) -> usize {
        self.size
    }

    /// Width of each bucket
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Adds `value` to the current bucket, rotating past any expired buckets first.
    pub fn add(&self, value: f64) {
        let mut state = self.state.write();
        self.update_offset(&mut state);
        let offset = state.offset;
        state.win.add(offset, value);
    }

    /// Runs `f` on every bucket still inside the window.
    /// The current bucket is skipped when `ignore_current_bucket` was set and no
    /// interval has elapsed since the last write.
    pub fn reduce<F>(&self, f: F)
    where
        F: FnMut(&Bucket),
    {
        let state = self.state.read();
        let span = self.span(&state, self.clock.now());
        let diff = if span == 0 && self.ignore_current {
            self.size - 1
        } else {
            self.size - span
        };

        if diff > 0 {
            // the slot at `offset + span` is the one the next write lands in, start after it
            let start = (state.offset + span + 1) % self.size;
            state.win.reduce(start, diff, f);
        }
    }

    // number of whole intervals between `last_time` and `now`, `size` if out of range
    fn span(&self, state: &WindowState, now: Duration) -> usize {
        let Some(elapsed) = now.checked_sub(state.last_time) else {
            return self.size;
        };
        let span = elapsed.as_nanos() / self.interval.as_nanos();
        if span < self.size as u128 {
            span as usize
        } else {
            self.size
        }
    }

    fn update_offset(&self, state: &mut WindowState) {
        let now = self.clock.now();
        let span = self.span(state, now);
        if span == 0 {
            return;
        }

        let offset = state.offset;
        for i in 0..span {
            state.win.reset_bucket(offset + i + 1);
        }
        state.offset = (offset + span) % self.size;

        // align to the start of the interval that contains `now`
        state.last_time = match now.checked_sub(state.last_time) {
            Some(elapsed) => {
                let partial = elapsed.as_nanos() % self.interval.as_nanos();
                now - Duration::from_nanos(partial as u64)
            }
            None => now,
        };
    }
}
