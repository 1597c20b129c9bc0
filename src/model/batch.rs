// Per-unit programs are independent, so the batch is an embarrassingly
// parallel map over unit indices.  Each task returns a small per-unit
// record; the caller scatters those into the result structures after the
// join, so no synchronization is needed beyond the final collect.

cfg_if::cfg_if! {
    if #[cfg(feature = "parallel")] {
        use rayon::prelude::*;

        /// Maps `f` over `0..nunits`, bounded by `max_threads` workers
        /// (0 = let the pool decide).
        pub(crate) fn run_units<R, F>(nunits: usize, max_threads: u32, f: F) -> Vec<R>
        where
            R: Send,
            F: Fn(usize) -> R + Sync + Send,
        {
            if max_threads == 0 {
                return (0..nunits).into_par_iter().map(f).collect();
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(max_threads as usize)
                .build();
            match pool {
                Ok(pool) => pool.install(|| (0..nunits).into_par_iter().map(&f).collect()),
                // pool construction can only fail on resource exhaustion;
                // fall back to the serial path
                Err(_) => (0..nunits).map(f).collect(),
            }
        }
    } else {
        pub(crate) fn run_units<R, F>(nunits: usize, _max_threads: u32, f: F) -> Vec<R>
        where
            R: Send,
            F: Fn(usize) -> R + Sync + Send,
        {
            (0..nunits).map(f).collect()
        }
    }
}
