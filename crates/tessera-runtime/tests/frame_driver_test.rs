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

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::bail;
use tessera_core::service::{Service, ServiceStatus, StartupInfo, UpdateTable, UpdateTiming};
use tessera_core::{service_kind, EngineContext};
use tessera_runtime::{FrameDriver, RuntimeConfig};

type Journal = Rc<RefCell<Vec<&'static str>>>;

/// Journals every slot it is dispatched for.
struct Recorder {
    journal: Journal,
}
service_kind!(Recorder);

impl Service for Recorder {
    fn startup(&mut self) -> anyhow::Result<StartupInfo> {
        self.journal.borrow_mut().push("startup");
        let mut table = UpdateTable::new();
        for timing in UpdateTiming::ALL {
            table.register(timing, move |r: &mut Recorder| {
                r.journal.borrow_mut().push(timing.as_str());
                Ok(())
            });
        }
        Ok(StartupInfo::new(table))
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        self.journal.borrow_mut().push("shutdown");
        Ok(())
    }
}

struct Faulty;
service_kind!(Faulty);

impl Service for Faulty {
    fn startup(&mut self) -> anyhow::Result<StartupInfo> {
        Ok(StartupInfo::new(UpdateTable::new().on(
            UpdateTiming::AfterFrame,
            |_: &mut Faulty| bail!("faulty service"),
        )))
    }
}

fn driver() -> FrameDriver {
    FrameDriver::new(RuntimeConfig {
        fixed_timestep_hz: 100.0,
        ..RuntimeConfig::default()
    })
    .unwrap()
}

fn drain(journal: &Journal) -> Vec<&'static str> {
    journal.borrow_mut().drain(..).collect()
}

#[test]
fn test_frame_dispatches_slots_in_order() {
    let journal = Journal::default();
    let mut context = EngineContext::new();
    context
        .services_mut()
        .add_service(Recorder { journal: journal.clone() })
        .unwrap();

    let report = driver().step(&mut context, Duration::from_millis(20)).unwrap();
    assert_eq!(report.fixed_steps, 2);
    assert_eq!(
        drain(&journal),
        vec![
            "startup",
            "before_fixed_step",
            "fixed_step",
            "after_fixed_step",
            "before_fixed_step",
            "fixed_step",
            "after_fixed_step",
            "before_frame",
            "frame",
            "after_frame",
            "before_draw",
            "draw",
            "after_draw",
        ]
    );
    context.stop().unwrap();
}

#[test]
fn test_service_added_between_frames_starts_next_frame() {
    let journal = Journal::default();
    let mut context = EngineContext::new();
    let mut driver = driver();

    driver.step(&mut context, Duration::ZERO).unwrap();
    context
        .services_mut()
        .add_service(Recorder { journal: journal.clone() })
        .unwrap();
    assert!(drain(&journal).is_empty());

    driver.step(&mut context, Duration::ZERO).unwrap();
    let entries = drain(&journal);
    assert_eq!(entries.first(), Some(&"startup"));
    assert!(entries.contains(&"frame"));
    context.stop().unwrap();
}

#[test]
fn test_removed_service_finishes_frame_then_shuts_down() {
    let journal = Journal::default();
    let mut context = EngineContext::new();
    let mut driver = driver();
    context
        .services_mut()
        .add_service(Recorder { journal: journal.clone() })
        .unwrap();
    driver.step(&mut context, Duration::ZERO).unwrap();
    drain(&journal);

    context.services_mut().remove_service::<Recorder>().unwrap();
    assert_eq!(
        context.services().service_status::<Recorder>(),
        Ok(ServiceStatus::Shutdown)
    );

    driver.step(&mut context, Duration::ZERO).unwrap();
    let entries = drain(&journal);
    assert_eq!(entries.first(), Some(&"before_frame"));
    assert_eq!(entries.last(), Some(&"shutdown"));
    assert!(context.services().is_empty());
}

#[test]
fn test_stop_dispatches_on_shutdown_once() {
    let journal = Journal::default();
    let mut context = EngineContext::new();
    context
        .services_mut()
        .add_service(Recorder { journal: journal.clone() })
        .unwrap();
    driver().step(&mut context, Duration::ZERO).unwrap();
    assert!(!drain(&journal).contains(&"on_shutdown"));

    context.stop().unwrap();
    assert_eq!(drain(&journal), vec!["on_shutdown", "shutdown"]);
    context.stop().unwrap();
    assert!(drain(&journal).is_empty());
}

#[test]
fn test_callback_error_aborts_frame() {
    let mut context = EngineContext::new();
    let mut driver = driver();
    context.services_mut().add_service(Faulty).unwrap();

    let err = driver.step(&mut context, Duration::ZERO).unwrap_err();
    assert_eq!(err.to_string(), "faulty service");
    assert_eq!(context.frame(), 0);
    context.stop().unwrap();
}
