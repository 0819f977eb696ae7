//! A default [`TickTock`] instance for every thread.
//!
//! Code that does not want to pass an instance around can profile through the default
//! instance of the current thread. As every thread has its own default instance, the
//! statistics gathered by worker threads have to be collected separately, e.g. by
//! cloning the worker's default instance at the end of its work and fusing the clones
//! with [`TickTock::fuse_multiple()`].
//!
//! # Examples
//!
//! ```
//! use ticktock::thread_default;
//!
//! fn load() {
//!     thread_default::with(|tt| {
//!         let _load = tt.profile("load");
//!         // Loading.
//!     });
//! }
//!
//! load();
//! load();
//!
//! let hits = thread_default::with(|tt| tt.stats_by_profile_name("load").unwrap().0);
//! assert_eq!(hits, 2);
//! ```

use std::cell::RefCell;

use crate::TickTock;

thread_local! {
    // Created on first use, so it is owned by the thread it belongs to.
    static DEFAULT: RefCell<TickTock> = RefCell::new(TickTock::new());
}

/// Runs a function with exclusive access to the default instance of the current thread.
///
/// # Panics
///
/// Panics if called from within the function given to another call of `with()` on the
/// same thread.
pub fn with<R>(f: impl FnOnce(&mut TickTock) -> R) -> R {
    DEFAULT.with_borrow_mut(f)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn state_persists_between_calls() {
        with(|tt| {
            tt.reset().unwrap();
            tt.start_profile("persistent");
        });

        with(|tt| {
            assert!(tt.is_profiling());
            tt.end_profile_named("persistent").unwrap();
        });

        let hits = with(|tt| tt.stats_by_profile_name("persistent").unwrap().0);
        assert_eq!(hits, 1);
    }

    #[test]
    fn each_thread_has_own_instance() {
        with(|tt| {
            let _p = tt.profile("main thread only");
        });

        let seen_by_other_thread = thread::spawn(|| {
            with(|tt| tt.stats_by_profile_name("main thread only").is_some())
        })
        .join()
        .unwrap();

        assert!(!seen_by_other_thread);
    }

    #[test]
    fn worker_defaults_can_be_fused() {
        let workers: Vec<TickTock> = (0..3)
            .map(|_| {
                thread::spawn(|| {
                    with(|tt| {
                        {
                            let _work = tt.profile("work");
                        }
                        tt.clone()
                    })
                })
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|worker| worker.join().unwrap())
            .collect();

        let instances: Vec<&TickTock> = workers.iter().collect();
        let fused = TickTock::fuse_multiple(&instances).unwrap();

        assert_eq!(fused.stats_by_profile_name("work").unwrap().0, 3);
    }

    #[test]
    #[should_panic]
    fn nested_access_panics() {
        with(|_outer| {
            with(|_inner| {});
        });
    }
}
