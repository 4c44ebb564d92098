use std::thread;
use std::time::Duration;

use gtop::core::gpu_monitor::{HistoryBuffer, LoopState, MetricsCollector, PollLoop, StopSignal};
use gtop::GtopError;

use super::support::{FakeDeviceQuery, FakeGpu, FakeIntrospector};

fn collector(query: FakeDeviceQuery) -> MetricsCollector {
    MetricsCollector::open(Box::new(query), Box::new(FakeIntrospector::default()), 0.1).unwrap()
}

#[test]
fn test_render_sees_every_sample_until_stopped() {
    let mut source = collector(FakeDeviceQuery::with_gpus(vec![FakeGpu::new("GPU A")]));
    let mut poll = PollLoop::new(Duration::from_millis(1), HistoryBuffer::new(3));
    let stop = StopSignal::new();

    let mut lengths = Vec::new();
    let result = poll.run(
        &mut source,
        |history| {
            lengths.push(history.len());
            if lengths.len() == 5 {
                stop.raise();
            }
            Ok(())
        },
        &stop,
    );

    assert!(result.is_ok());
    assert_eq!(lengths, vec![1, 2, 3, 3, 3]);
    assert_eq!(poll.state(), LoopState::Stopped);

    let timestamps = poll.history().timestamps();
    assert!(timestamps.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_raised_before_start_takes_no_samples() {
    let mut source = collector(FakeDeviceQuery::with_gpus(vec![FakeGpu::new("GPU A")]));
    let mut poll = PollLoop::new(Duration::from_secs(60), HistoryBuffer::new(3));
    let stop = StopSignal::new();
    stop.raise();

    poll.run(&mut source, |_| Ok(()), &stop).unwrap();

    assert!(poll.history().is_empty());
    assert_eq!(poll.state(), LoopState::Stopped);
}

#[test]
fn test_collection_error_stops_loop() {
    let query = FakeDeviceQuery {
        gpus: vec![FakeGpu::new("Flaky GPU")],
        broken_temperature: true,
        ..Default::default()
    };
    let mut source = collector(query);
    let mut poll = PollLoop::new(Duration::from_millis(1), HistoryBuffer::new(3));
    let stop = StopSignal::new();

    let result = poll.run(&mut source, |_| Ok(()), &stop);

    assert!(matches!(result, Err(GtopError::MetricCollection(_))));
    assert_eq!(poll.state(), LoopState::Stopped);
    assert!(poll.into_history().is_empty());
}

#[test]
fn test_stop_from_another_thread() {
    let mut poll = PollLoop::new(Duration::from_millis(5), HistoryBuffer::new(10));
    let status = poll.status();
    assert_eq!(status.get(), LoopState::Idle);

    let stop = StopSignal::new();
    let loop_stop = stop.clone();

    let poller = thread::Builder::new()
        .name("gtop-poll".to_string())
        .spawn(move || {
            let mut source = collector(FakeDeviceQuery::with_gpus(vec![FakeGpu::new("GPU A")]));
            let result = poll.run(&mut source, |_| Ok(()), &loop_stop);
            (result, poll.into_history())
        })
        .unwrap();

    while status.get() != LoopState::Running {
        thread::sleep(Duration::from_millis(1));
    }
    thread::sleep(Duration::from_millis(20));
    stop.raise();

    let (result, history) = poller.join().unwrap();
    assert!(result.is_ok());
    assert!(!history.is_empty());
    assert_eq!(status.get(), LoopState::Stopped);
}
