#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Stopwatch timers and a hierarchical profiler of named code sections.
//!
//! The core functionality includes:
//! - [`TickTock`] - Stopwatch timers plus the profiler that accumulates hits and time per
//!   code section
//! - [`ProfileGuard`] - Keeps a profile open for as long as it is alive
//! - [`Profile`] - Aggregated hits and time of one code section at one place in the tree
//! - [`Report`] - Formatted statistics of all profiles, ready for printing
//! - [`thread_default`] - A default instance for every thread
//!
//! # Stopwatch
//!
//! ```
//! use ticktock::TickTock;
//!
//! let mut tt = TickTock::new();
//!
//! tt.tick();
//! // Some work.
//! let elapsed = tt.tock().unwrap();
//!
//! // Several timers can run at once under different names.
//! tt.tick_named("download");
//! // Some other work.
//! let download = tt.tock_named("download").unwrap();
//! # _ = (elapsed, download);
//! ```
//!
//! # Profiling
//!
//! Profiles opened while another profile is open are nested inside it. The resulting
//! tree mirrors the call structure of the profiled code, with every place in the tree
//! accumulating its own statistics.
//!
//! ```
//! use ticktock::{TickTock, TimeUnit};
//!
//! let mut tt = TickTock::new();
//!
//! for _ in 0..3 {
//!     let mut outer = tt.profile("outer");
//!     {
//!         let _inner = outer.profile("inner");
//!         // Inner work.
//!     }
//!     // Outer work.
//! }
//!
//! let report = tt.stringify_sections(Some(TimeUnit::Millisecond)).unwrap();
//! report.print_to_stdout();
//! ```
//!
//! The printed report lists every profile with its total time, its share of the
//! enclosing profile's time, its hit count and the mean time per hit:
//!
//! ```text
//!  Profile | Total time | Percentage | Hits | Average
//! ---------+------------+------------+------+---------
//!  outer   |    0.01 ms |     100.00 |    3 | 3.21 us
//!    inner |    0.00 ms |    10.40 < |    3 | 0.33 us
//! ```
//!
//! # Threading
//!
//! A [`TickTock`] belongs to the thread that created it and profiling from another thread
//! is reported as a warning through `tracing`. Multithreaded work is profiled by giving
//! every thread its own instance and combining them afterwards with
//! [`TickTock::fuse()`] or [`TickTock::fuse_multiple()`].

mod error;
mod pal;
mod profile;
mod profile_guard;
mod profiles;
mod report;
mod thousands;
pub mod thread_default;
mod ticktock;
mod time_unit;
mod timer_id;

pub use error::{Error, Result};
pub use profile::{Profile, ProfileId};
pub(crate) use profile::ProfileKey;
pub use profile_guard::ProfileGuard;
pub use profiles::Profiles;
pub use report::{Report, ReportRow};
pub use ticktock::TickTock;
pub use time_unit::TimeUnit;
pub use timer_id::TimerId;
