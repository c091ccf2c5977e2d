use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tessera_core::service::{Service, ServiceManager, StartupInfo, UpdateTable, UpdateTiming};
use tessera_core::service_kind;

macro_rules! ticking_services {
    ($($name:ident),*) => {
        $(
            #[derive(Default)]
            struct $name(u64);
            service_kind!($name);

            impl Service for $name {
                fn startup(&mut self) -> anyhow::Result<StartupInfo> {
                    Ok(StartupInfo::new(
                        UpdateTable::new()
                            .on(UpdateTiming::FixedStep, |s: &mut $name| {
                                s.0 = s.0.wrapping_add(1);
                                Ok(())
                            })
                            .on(UpdateTiming::Frame, |s: &mut $name| {
                                s.0 = s.0.wrapping_mul(3);
                                Ok(())
                            }),
                    ))
                }
            }
        )*
    };
}

ticking_services!(S0, S1, S2, S3, S4, S5, S6, S7, S8, S9, S10, S11, S12, S13, S14, S15);

fn populated_manager() -> ServiceManager {
    let mut services = ServiceManager::new();
    services.add_service(S0::default()).unwrap();
    services.add_service(S1::default()).unwrap();
    services.add_service(S2::default()).unwrap();
    services.add_service(S3::default()).unwrap();
    services.add_service(S4::default()).unwrap();
    services.add_service(S5::default()).unwrap();
    services.add_service(S6::default()).unwrap();
    services.add_service(S7::default()).unwrap();
    services.add_service(S8::default()).unwrap();
    services.add_service(S9::default()).unwrap();
    services.add_service(S10::default()).unwrap();
    services.add_service(S11::default()).unwrap();
    services.add_service(S12::default()).unwrap();
    services.add_service(S13::default()).unwrap();
    services.add_service(S14::default()).unwrap();
    services.add_service(S15::default()).unwrap();
    services.startup_services().unwrap();
    services
}

fn bench_dispatch(c: &mut Criterion) {
    let mut services = populated_manager();

    // Sleeping services keep their tables cached but are skipped.
    services.set_active_service::<S1>(false).unwrap();
    services.set_active_service::<S3>(false).unwrap();
    services.set_active_service::<S5>(false).unwrap();
    services.set_active_service::<S7>(false).unwrap();

    let mut group = c.benchmark_group("Service Dispatch");

    group.bench_function("Single slot (16 services)", |b| {
        b.iter(|| {
            services.update_services(black_box(UpdateTiming::Frame)).unwrap();
        });
    });

    group.bench_function("Full frame order (16 services)", |b| {
        b.iter(|| {
            for timing in UpdateTiming::FIXED_STEP_ORDER {
                services.update_services(black_box(timing)).unwrap();
            }
            for timing in UpdateTiming::FRAME_ORDER {
                services.update_services(black_box(timing)).unwrap();
            }
            services.cleanup_services().unwrap();
        });
    });

    group.bench_function("Lookup by kind", |b| {
        b.iter(|| black_box(services.try_get_service::<S15>().is_some()));
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
