//! Lock-free disjoint-set forest over dense u32 ids.
//!
//! `union` and `find` may be called concurrently from any number of threads.
//! `find` performs path halving with relaxed compare-and-swaps (a lost swap
//! only delays compression); the parent write that merges two trees uses
//! acquire-release so a root observed by another thread carries its final
//! linkage.

use std::sync::atomic::{AtomicU32, Ordering};

pub struct ConcurrentUnionFind {
    parent: Vec<AtomicU32>,
    rank: Vec<AtomicU32>,
}

impl ConcurrentUnionFind {
    /// Every element starts as its own singleton root.
    pub fn new(n: usize) -> Self {
        ConcurrentUnionFind {
            parent: (0..n as u32).map(AtomicU32::new).collect(),
            rank: (0..n).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of the set containing `x`, halving the path on the way up.
    pub fn find(&self, mut x: u32) -> u32 {
        loop {
            let p = self.parent[x as usize].load(Ordering::Relaxed);
            if p == x {
                return x;
            }
            let gp = self.parent[p as usize].load(Ordering::Relaxed);
            if gp == p {
                return p;
            }
            let _ = self.parent[x as usize].compare_exchange_weak(
                p,
                gp,
                Ordering::Relaxed,
                Ordering::Relaxed,
            );
            x = gp;
        }
    }

    /// Merge the sets containing `a` and `b`.
    ///
    /// Union by rank: the lower-rank root is linked under the higher. On
    /// equal ranks the higher id goes under the lower, so concurrent retries
    /// always agree on a direction.
    pub fn union(&self, a: u32, b: u32) {
        loop {
            let ra = self.find(a);
            let rb = self.find(b);
            if ra == rb {
                return;
            }
            let rank_a = self.rank[ra as usize].load(Ordering::Relaxed);
            let rank_b = self.rank[rb as usize].load(Ordering::Relaxed);
            let (child, root, bump) = if rank_a < rank_b {
                (ra, rb, false)
            } else if rank_b < rank_a {
                (rb, ra, false)
            } else if ra > rb {
                (ra, rb, true)
            } else {
                (rb, ra, true)
            };
            if self.parent[child as usize]
                .compare_exchange(child, root, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                if bump {
                    self.rank[root as usize].fetch_add(1, Ordering::Relaxed);
                }
                return;
            }
        }
    }

    /// Whether `a` and `b` are currently in the same set. Only meaningful
    /// once no concurrent `union` can interleave, e.g. after a join barrier.
    pub fn same_set(&self, a: u32, b: u32) -> bool {
        self.find(a) == self.find(b)
    }
}
