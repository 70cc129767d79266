//! Event listener driven by select.
//!
//! Two producer threads emit events on separate channels; the main thread
//! multiplexes them with either blocking or polling selects, depending on
//! the command-line argument. Producers finish with the sentinel `'!'`.
//!
//! Usage: `events <wait|try_once>`

use std::cell::Cell;
use std::env;
use std::process;
use std::thread;
use std::time::Duration;

use csp_channel::{select, Channel, ThreadGuard};

fn on_event(kind: &str, event: char, open: &Cell<u32>) {
    if event == '!' {
        open.set(open.get() - 1);
    } else {
        println!("{}: {}", kind, event);
    }
}

fn main() {
    let mode = env::args().nth(1);
    let blocking = match mode.as_deref() {
        Some("wait") => true,
        Some("try_once") => false,
        _ => {
            eprintln!("usage: events <wait|try_once>");
            process::exit(1);
        }
    };

    let keys = Channel::<char>::new();
    let ticks = Channel::<char>::with_capacity(4);

    let tx = keys.sender();
    let _keys_guard = ThreadGuard::new(thread::spawn(move || {
        for &ch in &['h', 'e', 'l', 'l', 'o', '!'] {
            thread::sleep(Duration::from_millis(30));
            tx.send(ch);
        }
    }));

    let tx = ticks.sender();
    let _ticks_guard = ThreadGuard::new(thread::spawn(move || {
        for _ in 0..8 {
            thread::sleep(Duration::from_millis(20));
            tx.send('.');
        }
        tx.send('!');
    }));

    // Each producer stays open until its sentinel arrives.
    let open = Cell::new(2);
    while open.get() > 0 {
        let sel = select()
            .recv(&keys, |ch| on_event("key", ch, &open))
            .recv(&ticks, |ch| on_event("tick", ch, &open));

        if blocking {
            sel.wait();
        } else if sel.try_once().is_err() {
            thread::sleep(Duration::from_millis(5));
        }
    }
}
