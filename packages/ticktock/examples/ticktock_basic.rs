//! Profiling nested code sections and merging the statistics of worker threads.
//!
//! Run with: `cargo run --example ticktock_basic`

use std::hint::black_box;
use std::thread;
use std::time::Duration;

use ticktock::{TickTock, TimeUnit};

fn main() {
    let mut tt = TickTock::new();

    tt.tick();

    for _ in 0..5 {
        let mut request = tt.profile("request");
        {
            let _parse = request.profile("parse");
            thread::sleep(Duration::from_millis(2));
        }
        {
            let _respond = request.profile("respond");
            thread::sleep(Duration::from_millis(5));
        }
    }

    // Quick operations are measured in batches.
    {
        let _sum = tt.profile_hits("sum", 1_000_000);
        let mut sum = 0_u64;
        for i in 0..1_000_000_u64 {
            sum = black_box(sum.wrapping_add(i));
        }
    }

    println!(
        "Main thread profiled for {:?}",
        tt.tock().expect("the timer was started above")
    );
    println!();
    tt.stringify_sections(Some(TimeUnit::Millisecond))
        .expect("all profiles were ended")
        .print_to_stdout();
    println!();

    // Every worker profiles the same code with its own instance.
    let workers: Vec<_> = (0..4)
        .map(|_| {
            thread::spawn(|| {
                let mut tt = TickTock::new();
                for _ in 0..3 {
                    let _job = tt.profile("job");
                    thread::sleep(Duration::from_millis(3));
                }
                tt
            })
        })
        .collect();

    let instances: Vec<TickTock> = workers
        .into_iter()
        .map(|worker| worker.join().expect("worker threads do not panic"))
        .collect();
    let references: Vec<&TickTock> = instances.iter().collect();

    let fused = TickTock::fuse_multiple(&references).expect("all workers profile the same code");

    println!("Fused statistics of {} workers:", instances.len());
    fused
        .stringify_sections(None)
        .expect("the fused instance has no open profiles")
        .print_to_stdout();
}
