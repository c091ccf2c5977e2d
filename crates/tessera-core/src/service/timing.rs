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

//! The named dispatch slots a service can hook into.

use std::fmt;

/// A named phase of the per-frame dispatch sequence.
///
/// The discriminant doubles as the slot index inside an
/// [`UpdateTable`](super::UpdateTable), so the declaration order is the
/// global dispatch order within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UpdateTiming {
    /// Right before each fixed simulation step.
    BeforeFixedStep = 0,
    /// The fixed simulation step itself (physics, deterministic logic).
    FixedStep,
    /// Right after each fixed simulation step.
    AfterFixedStep,
    /// Before the variable-rate frame update.
    BeforeFrame,
    /// The variable-rate frame update.
    Frame,
    /// After the variable-rate frame update.
    AfterFrame,
    /// Before the draw submission.
    BeforeDraw,
    /// The draw submission.
    Draw,
    /// After the draw submission.
    AfterDraw,
    /// Application stop. Only dispatched by
    /// [`ServiceManager::shutdown_services`](super::ServiceManager::shutdown_services).
    OnShutdown,
}

impl UpdateTiming {
    /// Number of slots.
    pub const COUNT: usize = 10;

    /// Every slot, in discriminant order.
    pub const ALL: [UpdateTiming; Self::COUNT] = [
        UpdateTiming::BeforeFixedStep,
        UpdateTiming::FixedStep,
        UpdateTiming::AfterFixedStep,
        UpdateTiming::BeforeFrame,
        UpdateTiming::Frame,
        UpdateTiming::AfterFrame,
        UpdateTiming::BeforeDraw,
        UpdateTiming::Draw,
        UpdateTiming::AfterDraw,
        UpdateTiming::OnShutdown,
    ];

    /// The slots of one fixed simulation step, repeated zero or more times per frame.
    pub const FIXED_STEP_ORDER: [UpdateTiming; 3] = [
        UpdateTiming::BeforeFixedStep,
        UpdateTiming::FixedStep,
        UpdateTiming::AfterFixedStep,
    ];

    /// The slots run exactly once per frame, after the fixed steps.
    pub const FRAME_ORDER: [UpdateTiming; 6] = [
        UpdateTiming::BeforeFrame,
        UpdateTiming::Frame,
        UpdateTiming::AfterFrame,
        UpdateTiming::BeforeDraw,
        UpdateTiming::Draw,
        UpdateTiming::AfterDraw,
    ];

    /// Returns the slot index used by dispatch tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// A short, stable name suitable for logs and metric labels.
    pub const fn as_str(self) -> &'static str {
        match self {
            UpdateTiming::BeforeFixedStep => "before_fixed_step",
            UpdateTiming::FixedStep => "fixed_step",
            UpdateTiming::AfterFixedStep => "after_fixed_step",
            UpdateTiming::BeforeFrame => "before_frame",
            UpdateTiming::Frame => "frame",
            UpdateTiming::AfterFrame => "after_frame",
            UpdateTiming::BeforeDraw => "before_draw",
            UpdateTiming::Draw => "draw",
            UpdateTiming::AfterDraw => "after_draw",
            UpdateTiming::OnShutdown => "on_shutdown",
        }
    }
}

impl fmt::Display for UpdateTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_declaration_order() {
        for (expected, timing) in UpdateTiming::ALL.iter().enumerate() {
            assert_eq!(timing.index(), expected);
        }
        assert_eq!(UpdateTiming::OnShutdown.index(), UpdateTiming::COUNT - 1);
    }

    #[test]
    fn test_frame_orders_exclude_shutdown_and_are_disjoint() {
        assert!(!UpdateTiming::FRAME_ORDER.contains(&UpdateTiming::OnShutdown));
        assert!(!UpdateTiming::FIXED_STEP_ORDER.contains(&UpdateTiming::OnShutdown));
        for timing in UpdateTiming::FIXED_STEP_ORDER {
            assert!(!UpdateTiming::FRAME_ORDER.contains(&timing));
        }
        assert_eq!(
            UpdateTiming::FIXED_STEP_ORDER.len() + UpdateTiming::FRAME_ORDER.len() + 1,
            UpdateTiming::COUNT
        );
    }

    #[test]
    fn test_display_uses_snake_case_names() {
        assert_eq!(UpdateTiming::BeforeDraw.to_string(), "before_draw");
        assert_eq!(UpdateTiming::FixedStep.to_string(), "fixed_step");
    }
}
