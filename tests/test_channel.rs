use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use phaselight::channel::BlockingChannel;
use phaselight::phase::Phase;
use proptest::prelude::*;

#[test]
fn sequential_sends_are_received_newest_first() {
    let channel = BlockingChannel::new();
    channel.send("v1").unwrap();
    channel.send("v2").unwrap();
    channel.send("v3").unwrap();

    assert_eq!(channel.receive(), "v3");
    assert_eq!(channel.receive(), "v2");
    assert_eq!(channel.receive(), "v1");
    assert!(channel.is_empty());
}

#[test]
fn receive_wakes_promptly_after_send_from_other_thread() {
    let channel = Arc::new(BlockingChannel::new());

    let rx = Arc::clone(&channel);
    let receiver = thread::spawn(move || {
        let start = Instant::now();
        let phase = rx.receive();
        (phase, start.elapsed())
    });

    let tx = Arc::clone(&channel);
    let sender = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        tx.send(Phase::Green).unwrap();
    });

    sender.join().unwrap();
    let (phase, blocked) = receiver.join().unwrap();

    assert_eq!(phase, Phase::Green);
    assert!(
        blocked < Duration::from_millis(100),
        "receive stayed blocked for {blocked:?}"
    );
}

#[test]
fn receive_does_not_return_before_send() {
    let channel = Arc::new(BlockingChannel::<u32>::new());
    let returned = Arc::new(AtomicUsize::new(0));

    let receiver = {
        let c = Arc::clone(&channel);
        let r = Arc::clone(&returned);
        thread::spawn(move || {
            let v = c.receive();
            r.fetch_add(1, Ordering::SeqCst);
            v
        })
    };

    thread::sleep(Duration::from_millis(100));
    assert_eq!(returned.load(Ordering::SeqCst), 0);

    channel.send(5).unwrap();
    assert_eq!(receiver.join().unwrap(), 5);
    assert_eq!(returned.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_operations_never_lose_or_duplicate_values() {
    let channel = Arc::new(BlockingChannel::new());
    let threads = 8;
    let per_thread = 500;

    let receivers: Vec<_> = (0..threads)
        .map(|_| {
            let c = Arc::clone(&channel);
            thread::spawn(move || {
                let mut got = Vec::with_capacity(per_thread);
                for _ in 0..per_thread {
                    got.push(c.receive());
                    // Pending count is a valid (non-negative) size at every step.
                    assert!(c.len() <= threads * per_thread);
                }
                got
            })
        })
        .collect();

    let senders: Vec<_> = (0..threads)
        .map(|t| {
            let c = Arc::clone(&channel);
            thread::spawn(move || {
                for i in 0..per_thread {
                    c.send(t * per_thread + i).unwrap();
                }
            })
        })
        .collect();

    for s in senders {
        s.join().unwrap();
    }
    let mut all: Vec<usize> = receivers
        .into_iter()
        .flat_map(|r| r.join().unwrap())
        .collect();
    all.sort_unstable();
    all.dedup();

    assert_eq!(all.len(), threads * per_thread);
    assert!(channel.is_empty());
}

#[test]
fn many_blocked_receivers_each_get_one_value() {
    let channel = Arc::new(BlockingChannel::new());
    let receivers: Vec<_> = (0..5)
        .map(|_| {
            let c = Arc::clone(&channel);
            thread::spawn(move || c.receive())
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    for i in 0..5 {
        channel.send(i).unwrap();
    }

    let mut got: Vec<i32> = receivers.into_iter().map(|r| r.join().unwrap()).collect();
    got.sort_unstable();
    assert_eq!(got, vec![0, 1, 2, 3, 4]);
}

proptest! {
    #[test]
    fn drained_values_come_out_in_reverse_send_order(values in prop::collection::vec(any::<u16>(), 0..64)) {
        let channel = BlockingChannel::new();
        for v in &values {
            channel.send(*v).unwrap();
        }
        prop_assert_eq!(channel.len(), values.len());

        let drained: Vec<u16> = std::iter::from_fn(|| channel.try_receive()).collect();
        let expected: Vec<u16> = values.iter().rev().copied().collect();
        prop_assert_eq!(drained, expected);
    }

    #[test]
    fn size_tracks_sends_minus_receives(ops in prop::collection::vec(any::<bool>(), 0..128)) {
        let channel = BlockingChannel::new();
        let mut expected: usize = 0;
        for send in ops {
            if send {
                channel.send(()).unwrap();
                expected += 1;
            } else if expected > 0 {
                channel.receive();
                expected -= 1;
            } else {
                prop_assert!(channel.try_receive().is_none());
            }
            prop_assert_eq!(channel.len(), expected);
        }
    }
}
