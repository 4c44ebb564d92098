use std::collections::HashSet;
use std::sync::atomic::Ordering;

use gtop::core::gpu_monitor::{MetricsCollector, RawProcess, SampleSource, POWER_UNSUPPORTED};
use gtop::GtopError;

use super::support::{FakeDeviceQuery, FakeGpu, FakeIntrospector};

fn open(query: FakeDeviceQuery, introspector: FakeIntrospector) -> MetricsCollector {
    MetricsCollector::open(Box::new(query), Box::new(introspector), 0.1).unwrap()
}

#[test]
fn test_no_devices_is_gpu_not_available() {
    let result = MetricsCollector::open(
        Box::new(FakeDeviceQuery::default()),
        Box::new(FakeIntrospector::default()),
        0.1,
    );

    match result {
        Err(e) => assert!(e.is_gpu_not_available()),
        Ok(_) => panic!("expected GpuNotAvailable"),
    }
}

#[test]
fn test_reads_every_device_in_order() {
    let query = FakeDeviceQuery::with_gpus(vec![FakeGpu::new("GPU A"), FakeGpu::new("GPU B")]);
    let mut collector = open(query, FakeIntrospector::default());
    assert_eq!(collector.device_count(), 2);

    let sample = collector.collect_at(5.0).unwrap();
    assert_eq!(sample.timestamp, 5.0);
    assert_eq!(sample.devices.len(), 2);
    assert_eq!(sample.devices[0].name, "GPU A");
    assert_eq!(sample.devices[1].name, "GPU B");
    assert_eq!(sample.devices[1].device_index, 1);
    assert_eq!(sample.devices[0].memory_percent(), 25.0);
    assert_eq!(sample.devices[0].pci_rx, 12.0);
}

#[test]
fn test_timestamp_never_below_min_interval() {
    let query = FakeDeviceQuery::with_gpus(vec![FakeGpu::new("GPU A")]);
    let mut collector = open(query, FakeIntrospector::default());

    let sample = collector.collect_at(0.0).unwrap();
    assert_eq!(sample.timestamp, 0.1);
    assert_eq!(sample.devices[0].timestamp, 0.1);
}

#[test]
fn test_unsupported_power_uses_sentinel() {
    let mut gpu = FakeGpu::new("No Sensor");
    gpu.power = None;
    let mut collector = open(FakeDeviceQuery::with_gpus(vec![gpu]), FakeIntrospector::default());

    let sample = collector.next_sample().unwrap();
    let reading = &sample.devices[0];
    assert_eq!(reading.power_usage, POWER_UNSUPPORTED);
    assert!(!reading.power_supported());
    assert_eq!(reading.utilization_percent, 40.0);
}

#[test]
fn test_vanished_process_is_dropped() {
    let mut gpu = FakeGpu::new("Busy GPU");
    gpu.processes = vec![
        RawProcess {
            pid: 100,
            used_memory_bytes: 512 * 1024 * 1024,
        },
        RawProcess {
            pid: 200,
            used_memory_bytes: 1024 * 1024 * 1024,
        },
        RawProcess {
            pid: 300,
            used_memory_bytes: 64 * 1024 * 1024,
        },
    ];
    let introspector = FakeIntrospector {
        vanished: HashSet::from([200]),
    };
    let mut collector = open(FakeDeviceQuery::with_gpus(vec![gpu]), introspector);

    let sample = collector.collect_at(1.0).unwrap();
    let processes = &sample.devices[0].processes;

    let pids: Vec<u32> = processes.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![100, 300]);
    assert_eq!(processes[0].gpu_memory_used, 512.0);
    assert_eq!(processes[0].user, "tester");
    assert_eq!(processes[0].command, "worker --pid 100");
    assert_eq!(processes[1].device_index, 0);
}

#[test]
fn test_query_failure_propagates() {
    let query = FakeDeviceQuery {
        gpus: vec![FakeGpu::new("Flaky GPU")],
        broken_temperature: true,
        ..Default::default()
    };
    let mut collector = open(query, FakeIntrospector::default());

    let result = collector.collect_at(1.0);
    assert!(matches!(result, Err(GtopError::MetricCollection(_))));
}

#[test]
fn test_devices_released_once() {
    let query = FakeDeviceQuery::with_gpus(vec![FakeGpu::new("GPU A")]);
    let closes = query.closes.clone();

    let mut collector = open(query, FakeIntrospector::default());
    collector.close();
    collector.close();
    drop(collector);

    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_process_on_two_gpus_reads_same_host_usage() {
    use gtop::platform::SysinfoIntrospector;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    let pid = std::process::id();
    let shared = RawProcess {
        pid,
        used_memory_bytes: 256 * 1024 * 1024,
    };
    let mut first = FakeGpu::new("GPU A");
    first.processes = vec![shared];
    let mut second = FakeGpu::new("GPU B");
    second.processes = vec![shared];

    let mut collector = MetricsCollector::open(
        Box::new(FakeDeviceQuery::with_gpus(vec![first, second])),
        Box::new(SysinfoIntrospector::new()),
        0.1,
    )
    .unwrap();

    let spinning = Arc::new(AtomicBool::new(true));
    let spinner = {
        let spinning = Arc::clone(&spinning);
        thread::spawn(move || {
            while spinning.load(Ordering::Relaxed) {
                std::hint::spin_loop();
            }
        })
    };

    let mut samples = Vec::new();
    for tick in 0..3 {
        samples.push(collector.collect_at(tick as f64).unwrap());
        thread::sleep(Duration::from_millis(300));
    }
    spinning.store(false, Ordering::Relaxed);
    spinner.join().unwrap();

    for sample in &samples {
        let on_first = &sample.devices[0].processes[0];
        let on_second = &sample.devices[1].processes[0];
        assert_eq!(on_first.pid, pid);
        assert_eq!(on_second.pid, pid);
        assert_eq!(on_first.cpu_percent, on_second.cpu_percent);
        assert_eq!(on_first.host_memory_used, on_second.host_memory_used);
    }
}
