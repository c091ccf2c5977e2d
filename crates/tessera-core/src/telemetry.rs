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

//! Read-only access to services for consumers outside the registry.
//!
//! A consumer such as an on-screen performance overlay only needs to find one
//! service and read from it. [`ServiceLocator`] gives it that without exposing
//! any registry mutation, and [`present_timings`] wires a [`TimingSource`]
//! service to a [`PerformanceRenderer`].
//!
//! Producing the timing samples themselves is up to the application.

use crate::service::{Service, ServiceKind, ServiceKindId, ServiceManager, UpdateTiming};

/// Read-only lookup of services by kind.
pub trait ServiceLocator {
    /// Returns the live service answering to `kind`, if any.
    fn locate(&self, kind: ServiceKindId) -> Option<&dyn Service>;
}

impl<'a> dyn ServiceLocator + 'a {
    /// Returns the live service answering to `K`, if any.
    pub fn find<K: ServiceKind>(&self) -> Option<&dyn Service> {
        self.locate(ServiceKindId::of::<K>())
    }

    /// Returns the live service answering to `S`, downcast to `S`.
    pub fn find_as<S: Service + ServiceKind>(&self) -> Option<&S> {
        self.find::<S>()?.downcast_ref::<S>()
    }
}

impl ServiceLocator for ServiceManager {
    fn locate(&self, kind: ServiceKindId) -> Option<&dyn Service> {
        self.find_service(&kind)
    }
}

/// Durations of each dispatch slot over one frame, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTimings {
    /// The frame the samples belong to.
    pub frame: u64,
    slots_ms: [f32; UpdateTiming::COUNT],
}

impl FrameTimings {
    /// Empty samples for `frame`.
    pub fn new(frame: u64) -> Self {
        Self {
            frame,
            slots_ms: [0.0; UpdateTiming::COUNT],
        }
    }

    /// Records the duration spent in `timing`.
    pub fn set(&mut self, timing: UpdateTiming, ms: f32) {
        self.slots_ms[timing.index()] = ms;
    }

    /// The duration spent in `timing`.
    pub fn get(&self, timing: UpdateTiming) -> f32 {
        self.slots_ms[timing.index()]
    }

    /// Sum over all slots.
    pub fn total_ms(&self) -> f32 {
        self.slots_ms.iter().sum()
    }

    /// Iterates over every slot and its duration, in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = (UpdateTiming, f32)> + '_ {
        UpdateTiming::ALL.into_iter().map(|t| (t, self.get(t)))
    }
}

/// A service publishing the timings of the last completed frame.
pub trait TimingSource {
    /// The most recent samples, or `None` before the first complete frame.
    fn latest_timings(&self) -> Option<FrameTimings>;
}

/// A consumer that draws frame timings.
///
/// A presentation always calls `begin_render`, then `render` once, then
/// `end_render`.
pub trait PerformanceRenderer {
    /// Prepares the renderer for a new presentation.
    fn begin_render(&mut self);

    /// Draws one set of samples.
    fn render(&mut self, timings: &FrameTimings);

    /// Finishes the presentation.
    fn end_render(&mut self);
}

/// Feeds the samples of the `S` service to `renderer`.
///
/// Returns `false`, leaving the renderer untouched, when no `S` is
/// registered or it has no samples yet.
pub fn present_timings<S>(locator: &dyn ServiceLocator, renderer: &mut dyn PerformanceRenderer) -> bool
where
    S: Service + ServiceKind + TimingSource,
{
    let Some(timings) = locator.find_as::<S>().and_then(|source| source.latest_timings()) else {
        return false;
    };

    renderer.begin_render();
    renderer.render(&timings);
    renderer.end_render();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Profiler {
        last: Option<FrameTimings>,
    }
    crate::service_kind!(Profiler);

    impl Service for Profiler {}

    impl TimingSource for Profiler {
        fn latest_timings(&self) -> Option<FrameTimings> {
            self.last
        }
    }

    #[derive(Default)]
    struct Transcript(Vec<String>);

    impl PerformanceRenderer for Transcript {
        fn begin_render(&mut self) {
            self.0.push("begin".into());
        }

        fn render(&mut self, timings: &FrameTimings) {
            self.0.push(format!("frame {} {:.1}ms", timings.frame, timings.total_ms()));
        }

        fn end_render(&mut self) {
            self.0.push("end".into());
        }
    }

    #[test]
    fn test_frame_timings_accumulate_per_slot() {
        let mut timings = FrameTimings::new(7);
        timings.set(UpdateTiming::Frame, 2.0);
        timings.set(UpdateTiming::Draw, 1.5);
        timings.set(UpdateTiming::Frame, 3.0);

        assert_eq!(timings.get(UpdateTiming::Frame), 3.0);
        assert_eq!(timings.get(UpdateTiming::FixedStep), 0.0);
        assert_eq!(timings.total_ms(), 4.5);
        assert_eq!(timings.iter().count(), UpdateTiming::COUNT);
    }

    #[test]
    fn test_present_follows_render_contract() {
        let mut timings = FrameTimings::new(3);
        timings.set(UpdateTiming::Frame, 1.0);

        let mut services = ServiceManager::new();
        services.add_service(Profiler { last: Some(timings) }).unwrap();

        let mut transcript = Transcript::default();
        assert!(present_timings::<Profiler>(&services, &mut transcript));
        assert_eq!(transcript.0, vec!["begin", "frame 3 1.0ms", "end"]);
    }

    #[test]
    fn test_present_without_samples_is_skipped() {
        let mut services = ServiceManager::new();
        let mut transcript = Transcript::default();
        assert!(!present_timings::<Profiler>(&services, &mut transcript));

        services.add_service(Profiler { last: None }).unwrap();
        assert!(!present_timings::<Profiler>(&services, &mut transcript));
        assert!(transcript.0.is_empty());
    }

    #[test]
    fn test_locator_hides_removed_services() {
        let mut services = ServiceManager::new();
        services.add_service(Profiler { last: None }).unwrap();

        let locator: &dyn ServiceLocator = &services;
        assert!(locator.find_as::<Profiler>().is_some());

        services.remove_service::<Profiler>().unwrap();
        let locator: &dyn ServiceLocator = &services;
        assert!(locator.find::<Profiler>().is_none());
    }
}
