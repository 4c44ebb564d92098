use gtop::core::gpu_monitor::HistoryBuffer;
use gtop::GtopError;

use super::support::sample_at;

#[test]
fn test_oldest_sample_evicted_at_capacity() {
    let mut history = HistoryBuffer::new(3);
    for t in [0.1, 1.1, 2.1, 3.1] {
        history.append(sample_at(t));
    }

    assert_eq!(history.len(), 3);
    assert!(history.is_full());
    assert_eq!(history.timestamps(), vec![1.1, 2.1, 3.1]);
    assert_eq!(history.first().unwrap().timestamp, 1.1);
    assert_eq!(history.last().unwrap().timestamp, 3.1);
}

#[test]
fn test_empty_history_has_no_endpoints() {
    let history = HistoryBuffer::new(5);
    assert!(history.is_empty());
    assert!(matches!(history.first(), Err(GtopError::EmptyBuffer)));
    assert!(matches!(history.last(), Err(GtopError::EmptyBuffer)));
}

#[test]
fn test_iteration_is_oldest_first() {
    let mut history = HistoryBuffer::new(4);
    for t in [1.0, 2.0, 3.0] {
        history.append(sample_at(t));
    }

    let seen: Vec<f64> = (&history).into_iter().map(|s| s.timestamp).collect();
    assert_eq!(seen, vec![1.0, 2.0, 3.0]);
    assert!(!history.is_full());
}
