//! Concurrent prime sieve: prints one prime per line, up to 97.
//!
//! A generator thread feeds 2, 3, 4, ... into a chain of filter threads,
//! one per prime found so far; each filter drops the multiples of its
//! prime and forwards the rest.

use std::thread;

use csp_channel::{Channel, Receiver, Sender};

const LIMIT: u32 = 97;

// Send the sequence 2, 3, 4, ..., LIMIT to the channel.
fn generate(out: Sender<u32>) {
    for i in 2..=LIMIT {
        out.send(i);
    }
}

// Copy values from `input` to `out`, dropping multiples of `prime`.
fn filter(input: Receiver<u32>, out: Sender<u32>, prime: u32) {
    loop {
        let i = input.recv();
        if i % prime != 0 {
            out.send(i);
        }
        if i >= LIMIT {
            break;
        }
    }
}

fn main() {
    let mut c = Channel::new();
    let mut threads = Vec::new();

    let tx = c.sender();
    threads.push(thread::spawn(move || generate(tx)));

    loop {
        let prime = c.recv();
        println!("{}", prime);

        if prime >= LIMIT {
            break;
        }

        let next = Channel::new();
        let input = c.receiver();
        let out = next.sender();
        threads.push(thread::spawn(move || filter(input, out, prime)));
        c = next;
    }

    for t in threads {
        t.join().unwrap();
    }
}
