use std::sync::atomic::{AtomicUsize, Ordering};

/// Ordered set of upstream base URLs. The position of a target defines its
/// place in the rotation; the set never changes after startup.
pub struct UpstreamPool {
    targets: Vec<String>,
}

impl UpstreamPool {
    pub fn new(targets: Vec<String>) -> Self {
        Self { targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn target(&self, index: usize) -> Option<&str> {
        self.targets.get(index).map(String::as_str)
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }
}

/// Round-robin rotation over an [`UpstreamPool`].
///
/// The cursor is one atomic counter shared by every in-flight request.
/// `fetch_add` hands each request a distinct turn, so N concurrent picks over
/// a pool of N targets land on N distinct targets.
pub struct RoundRobin {
    cursor: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self {
            cursor: AtomicUsize::new(0),
        }
    }

    /// Next target in rotation. `None` only for an empty pool.
    pub fn pick<'p>(&self, pool: &'p UpstreamPool) -> Option<&'p str> {
        if pool.is_empty() {
            return None;
        }

        let turn = self.cursor.fetch_add(1, Ordering::Relaxed);
        pool.target(turn % pool.len())
    }
}

impl Default for RoundRobin {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn pool(n: usize) -> UpstreamPool {
        UpstreamPool::new((0..n).map(|i| format!("http://10.0.0.{}:9000", i + 1)).collect())
    }

    #[test]
    fn cycles_through_targets_in_order() {
        let pool = pool(3);
        let rr = RoundRobin::new();

        let picks: Vec<&str> = (0..6).filter_map(|_| rr.pick(&pool)).collect();
        assert_eq!(
            picks,
            vec![
                "http://10.0.0.1:9000",
                "http://10.0.0.2:9000",
                "http://10.0.0.3:9000",
                "http://10.0.0.1:9000",
                "http://10.0.0.2:9000",
                "http://10.0.0.3:9000",
            ]
        );
    }

    #[test]
    fn wraps_back_to_the_first_target() {
        let pool = pool(4);
        let rr = RoundRobin::new();

        let first = rr.pick(&pool);
        for _ in 0..3 {
            rr.pick(&pool);
        }
        assert_eq!(rr.pick(&pool), first);
    }

    #[test]
    fn single_target_pool_always_picks_it() {
        let pool = pool(1);
        let rr = RoundRobin::new();

        for _ in 0..5 {
            assert_eq!(rr.pick(&pool), Some("http://10.0.0.1:9000"));
        }
    }

    #[test]
    fn empty_pool_yields_nothing() {
        let pool = UpstreamPool::new(Vec::new());
        let rr = RoundRobin::new();
        assert!(rr.pick(&pool).is_none());
    }

    #[test]
    fn concurrent_picks_cover_every_target_exactly_once() {
        let pool = Arc::new(pool(8));
        let rr = Arc::new(RoundRobin::new());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let pool = pool.clone();
            let rr = rr.clone();
            handles.push(std::thread::spawn(move || {
                rr.pick(&pool).map(str::to_string)
            }));
        }

        let mut picked: Vec<String> = handles
            .into_iter()
            .filter_map(|handle| handle.join().expect("pick thread panicked"))
            .collect();
        picked.sort();
        picked.dedup();
        assert_eq!(picked.len(), 8);
    }
}
