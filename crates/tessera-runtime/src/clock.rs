// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Fixed-timestep accumulator.

use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Splits variable frame deltas into whole fixed simulation steps.
///
/// Each frame adds its delta with [`advance`](Self::advance), then the
/// driver consumes steps while [`should_step`](Self::should_step) holds.
/// Deltas are clamped to `max_frame_delta` so a long stall cannot demand an
/// unbounded number of catch-up steps.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    fixed_timestep: Duration,
    max_frame_delta: Duration,
    accumulator: Duration,
    total_time: Duration,
    last_delta: Duration,
}

impl FixedStepClock {
    /// The shortest step the clock runs with.
    pub const MIN_TIMESTEP: Duration = Duration::from_nanos(1);

    /// Creates a clock stepping every `fixed_timestep`.
    ///
    /// A zero step is raised to [`MIN_TIMESTEP`](Self::MIN_TIMESTEP).
    pub fn new(fixed_timestep: Duration, max_frame_delta: Duration) -> Self {
        debug_assert!(!fixed_timestep.is_zero(), "fixed timestep must not be zero");
        Self {
            fixed_timestep: fixed_timestep.max(Self::MIN_TIMESTEP),
            max_frame_delta,
            accumulator: Duration::ZERO,
            total_time: Duration::ZERO,
            last_delta: Duration::ZERO,
        }
    }

    /// Adds one frame's elapsed time, clamped to the maximum frame delta.
    pub fn advance(&mut self, delta: Duration) {
        let delta = delta.min(self.max_frame_delta);
        self.last_delta = delta;
        self.total_time += delta;
        self.accumulator += delta;
    }

    /// Returns `true` while a whole fixed step is pending.
    pub fn should_step(&self) -> bool {
        self.accumulator >= self.fixed_timestep
    }

    /// Consumes one fixed step from the accumulator.
    pub fn consume_step(&mut self) {
        self.accumulator = self.accumulator.saturating_sub(self.fixed_timestep);
    }

    /// Drops the time of steps the driver chose not to run.
    pub fn discard_pending_steps(&mut self) {
        let remainder = self.accumulator.as_nanos() % self.fixed_timestep.as_nanos();
        // Less than one step, which is itself a valid `Duration`.
        self.accumulator = Duration::new(
            (remainder / NANOS_PER_SEC) as u64,
            (remainder % NANOS_PER_SEC) as u32,
        );
    }

    /// Fraction of a fixed step left in the accumulator, in `[0, 1)` once
    /// every pending step has been consumed.
    pub fn interpolation_alpha(&self) -> f64 {
        self.accumulator.as_secs_f64() / self.fixed_timestep.as_secs_f64()
    }

    /// Duration of one fixed step.
    pub fn fixed_timestep(&self) -> Duration {
        self.fixed_timestep
    }

    /// The last delta accepted by [`advance`](Self::advance), after clamping.
    pub fn last_delta(&self) -> Duration {
        self.last_delta
    }

    /// Sum of every accepted delta.
    pub fn total_time(&self) -> Duration {
        self.total_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(10);
    const MAX: Duration = Duration::from_millis(250);

    #[test]
    fn test_accumulates_whole_steps() {
        let mut clock = FixedStepClock::new(STEP, MAX);
        clock.advance(Duration::from_millis(25));

        let mut steps = 0;
        while clock.should_step() {
            clock.consume_step();
            steps += 1;
        }
        assert_eq!(steps, 2);
        assert!((clock.interpolation_alpha() - 0.5).abs() < 1e-9);

        clock.advance(Duration::from_millis(5));
        assert!(clock.should_step());
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut clock = FixedStepClock::new(STEP, MAX);
        clock.advance(Duration::from_secs(3));
        assert_eq!(clock.last_delta(), MAX);
        assert_eq!(clock.total_time(), MAX);
    }

    #[test]
    fn test_discard_keeps_fractional_remainder() {
        let mut clock = FixedStepClock::new(STEP, MAX);
        clock.advance(Duration::from_millis(47));
        clock.discard_pending_steps();
        assert!(!clock.should_step());
        assert!((clock.interpolation_alpha() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_discard_with_tiny_step_terminates() {
        let mut clock = FixedStepClock::new(Duration::from_nanos(3), MAX);
        clock.advance(Duration::from_millis(16));
        clock.discard_pending_steps();
        assert!(!clock.should_step());
        assert!(clock.interpolation_alpha() < 1.0);
    }

    #[test]
    fn test_short_frames_do_not_step() {
        let mut clock = FixedStepClock::new(STEP, MAX);
        clock.advance(Duration::from_millis(4));
        assert!(!clock.should_step());
        assert_eq!(clock.fixed_timestep(), STEP);
    }
}
