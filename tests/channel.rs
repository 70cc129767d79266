//! Tests for channels and endpoint views.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering::SeqCst;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_utils::thread::scope;
use rand::{thread_rng, Rng};

use csp_channel::{Channel, Receiver, Sender, ThreadGuard};

fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

#[test]
fn ping_pong() {
    let c = Channel::<char>::new();

    scope(|scope| {
        let a = c.clone();
        scope.spawn(move |_| {
            a.send('A');
            assert_eq!(a.recv(), 'B');
        });

        let b = c.clone();
        scope.spawn(move |_| {
            assert_eq!(b.recv(), 'A');
            b.send('B');
        });
    })
    .unwrap();
}

#[test]
fn many_senders_many_receivers() {
    let c = Channel::<char>::new();

    scope(|scope| {
        for &ch in &['A', 'B'] {
            let tx = c.sender();
            scope.spawn(move |_| tx.send(ch));
        }
        for _ in 0..2 {
            let rx = c.receiver();
            scope.spawn(move |_| {
                let r = rx.recv();
                assert!(r == 'A' || r == 'B');
            });
        }
    })
    .unwrap();
}

#[test]
fn rendezvous_blocks_sender() {
    let c = Channel::<i32>::new();
    let done = AtomicBool::new(false);

    scope(|scope| {
        let tx = c.sender();
        let done = &done;
        scope.spawn(move |_| {
            tx.send(1);
            done.store(true, SeqCst);
        });

        thread::sleep(ms(200));
        assert!(!done.load(SeqCst));

        assert_eq!(c.recv(), 1);
    })
    .unwrap();

    assert!(done.load(SeqCst));
}

#[test]
fn buffered_capacity_three() {
    let c = Channel::with_capacity(3);

    // These complete on the current thread: the buffer has room.
    c.send('A');
    c.send('B');
    c.send('C');

    assert_eq!(c.recv(), 'A');
    assert_eq!(c.recv(), 'B');
    assert_eq!(c.recv(), 'C');
}

#[test]
fn buffered_capacity_three_across_threads() {
    let c = Channel::with_capacity(3);

    c.send('A');
    c.send('B');
    c.send('C');

    let rx = c.receiver();
    let _guard = ThreadGuard::new(thread::spawn(move || {
        assert_eq!(rx.recv(), 'A');
        assert_eq!(rx.recv(), 'B');
        assert_eq!(rx.recv(), 'C');
    }));
}

#[test]
fn fifo_order_rendezvous() {
    let c = Channel::<u32>::new();

    scope(|scope| {
        let tx = c.sender();
        scope.spawn(move |_| {
            for i in 0..100 {
                tx.send(i);
            }
        });

        for i in 0..100 {
            assert_eq!(c.recv(), i);
        }
    })
    .unwrap();
}

#[test]
fn fifo_order_buffered() {
    let c = Channel::<u32>::with_capacity(4);

    scope(|scope| {
        let tx = c.sender();
        scope.spawn(move |_| {
            for i in 0..50 {
                tx.send(i);
            }
        });

        for i in 0..50 {
            assert_eq!(c.recv(), i);
        }
    })
    .unwrap();
}

#[test]
fn recv_shapes() {
    let c = Channel::with_capacity(2);
    c.send("seven".to_string());
    c.send("eight".to_string());

    let mut slot = String::new();
    c.recv_into(&mut slot);
    assert_eq!(slot, "seven");

    assert_eq!(*c.recv_boxed(), "eight");
}

#[test]
fn recv_shapes_on_receiver_view() {
    let c = Channel::with_capacity(3);
    let rx = c.receiver();
    c.send(1);
    c.send(2);
    c.send(3);

    assert_eq!(rx.recv(), 1);
    let mut slot = 0;
    rx.recv_into(&mut slot);
    assert_eq!(slot, 2);
    assert_eq!(*rx.recv_boxed(), 3);
}

#[test]
fn capacity_is_reported_on_every_view() {
    let c = Channel::<u8>::with_capacity(5);
    assert_eq!(c.capacity(), 5);
    assert_eq!(c.sender().capacity(), 5);
    assert_eq!(c.receiver().capacity(), 5);

    let r = Channel::<u8>::new();
    assert_eq!(r.capacity(), 0);
}

#[test]
fn clones_compare_equal() {
    let c = Channel::<i32>::new();
    let d = c.clone();
    assert_eq!(c, d);

    let e = Channel::<i32>::new();
    assert_ne!(c, e);
}

#[test]
fn assignment_rebinds_identity() {
    let c = Channel::<i32>::new();
    let mut d = Channel::<i32>::new();
    assert_ne!(c, d);

    d = c.clone();
    assert_eq!(c, d);
}

#[test]
fn views_compare_equal_to_their_channel() {
    let c = Channel::<i32>::new();
    let r = c.receiver();
    let s = c.sender();

    assert_eq!(c, r);
    assert_eq!(r, c);
    assert_eq!(c, s);
    assert_eq!(s, c);

    let r2 = r.clone();
    let s2 = s.clone();
    assert_eq!(r, r2);
    assert_eq!(s, s2);

    let other = Channel::<i32>::new();
    assert_ne!(other, r);
    assert_ne!(other, s);
}

#[test]
fn conversions_preserve_identity() {
    let c = Channel::<i32>::new();
    let r: Receiver<i32> = (&c).into();
    let s: Sender<i32> = (&c).into();

    assert_eq!(c, r);
    assert_eq!(c, s);
}

#[test]
fn directed_views() {
    let c = Channel::<i32>::new();
    let done = AtomicBool::new(false);

    scope(|scope| {
        let tx: Sender<i32> = (&c).into();
        scope.spawn(move |_| tx.send(7));

        let rx: Receiver<i32> = (&c).into();
        let done = &done;
        scope.spawn(move |_| {
            assert_eq!(rx.recv(), 7);
            done.store(true, SeqCst);
        });
    })
    .unwrap();

    assert!(done.load(SeqCst));
}

#[test]
fn higher_order_channel() {
    let c = Channel::<Channel<bool>>::new();
    let done = Channel::<bool>::new();

    let rx = c.receiver();
    let _guard = ThreadGuard::new(thread::spawn(move || {
        let d = rx.recv();
        d.send(true);
    }));

    c.send(done.clone());
    assert!(done.recv());
}

#[test]
fn higher_order_channel_with_cast() {
    let c = Channel::<Channel<bool>>::new();
    let done = Channel::<bool>::new();

    let rx = c.receiver();
    let _guard = ThreadGuard::new(thread::spawn(move || {
        let d: Sender<bool> = rx.recv().into();
        d.send(true);
    }));

    c.send(done.clone());
    assert!(done.recv());
}

// Send the sequence 2, 3, 4, ..., limit to the channel.
fn generate(c: Sender<u32>, limit: u32) {
    for i in 2..=limit {
        c.send(i);
    }
}

// Copy values from `input` to `out`, dropping multiples of `prime`.
fn filter(input: Receiver<u32>, out: Sender<u32>, prime: u32, limit: u32) {
    loop {
        let i = input.recv();
        if i % prime != 0 {
            out.send(i);
        }
        if i >= limit {
            break;
        }
    }
}

// The classical inefficient concurrent prime sieve: daisy-chain a filter
// thread per prime.
fn sieve(primes: Sender<u32>, limit: u32) {
    let mut c = Channel::new();
    let mut threads = Vec::new();

    let tx = c.sender();
    threads.push(thread::spawn(move || generate(tx, limit)));

    loop {
        let prime = c.recv();
        primes.send(prime);

        if prime >= limit {
            break;
        }

        let next = Channel::new();
        let input = c.receiver();
        let out = next.sender();
        threads.push(thread::spawn(move || filter(input, out, prime, limit)));
        c = next;
    }

    for t in threads {
        t.join().unwrap();
    }
}

#[test]
fn sieve_to_97() {
    let primes = Channel::<u32>::new();

    let tx = primes.sender();
    let _guard = ThreadGuard::new(thread::spawn(move || sieve(tx, 97)));

    let expected = [
        2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83,
        89, 97,
    ];
    for &p in expected.iter() {
        assert_eq!(primes.recv(), p);
    }
}

#[test]
fn dining_philosophers_deadlock_free() {
    const N: usize = 5;

    let picksup: Vec<Channel<usize>> = (0..N).map(|_| Channel::new()).collect();
    let putsdown: Vec<Channel<usize>> = (0..N).map(|_| Channel::new()).collect();

    scope(|scope| {
        for i in 0..N {
            // A fork is used twice, once by each neighboring philosopher.
            let up = picksup[i].clone();
            let down = putsdown[i].clone();
            scope.spawn(move |_| {
                up.recv();
                down.recv();
                up.recv();
                down.recv();
            });
        }

        for i in 0..N {
            let left_up = picksup[i].clone();
            let right_up = picksup[(i + 1) % N].clone();
            let left_down = putsdown[i].clone();
            let right_down = putsdown[(i + 1) % N].clone();
            scope.spawn(move |_| {
                if i == 0 {
                    // One philosopher reaches for the higher-indexed fork
                    // first, which breaks the waiting cycle.
                    right_up.send(i);
                    left_up.send(i);
                } else {
                    left_up.send(i);
                    right_up.send(i);
                }
                left_down.send(i);
                right_down.send(i);
            });
        }
    })
    .unwrap();
}

#[test]
fn stress_mpmc() {
    const COUNT: usize = 100;
    const THREADS: usize = 4;

    let mut rng = thread_rng();

    for _ in 0..4 {
        let c = Channel::<usize>::with_capacity(rng.gen_range(0..4));
        let total = AtomicUsize::new(0);

        scope(|scope| {
            for _ in 0..THREADS {
                let tx = c.sender();
                scope.spawn(move |_| {
                    for i in 0..COUNT {
                        tx.send(i);
                    }
                });
            }
            for _ in 0..THREADS {
                let rx = c.receiver();
                let total = &total;
                scope.spawn(move |_| {
                    let mut sum = 0;
                    for _ in 0..COUNT {
                        sum += rx.recv();
                    }
                    total.fetch_add(sum, SeqCst);
                });
            }
        })
        .unwrap();

        assert_eq!(total.load(SeqCst), THREADS * COUNT * (COUNT - 1) / 2);
    }
}

#[test]
fn guard_joins_on_drop() {
    let flag = Arc::new(AtomicBool::new(false));

    {
        let flag = flag.clone();
        let _guard = ThreadGuard::new(thread::spawn(move || {
            thread::sleep(ms(100));
            flag.store(true, SeqCst);
        }));
    }

    assert!(flag.load(SeqCst));
}

#[test]
fn guard_explicit_join_returns_value() {
    let guard = ThreadGuard::new(thread::spawn(|| 7));
    assert_eq!(guard.join(), 7);
}
