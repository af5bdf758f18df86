//! MinHash fingerprints for approximate Jaccard on high-degree pairs.
//!
//! A fingerprint holds `num_samples` coordinated minima over the closed
//! neighborhood, one per keyed hash stream `h_s(x) = H(offset + samples*x +
//! s)`. The fraction of sample positions on which two fingerprints agree is
//! an unbiased estimate of the closed-neighborhood Jaccard index. Only
//! high-degree vertices with at least one high-degree neighbor are sketched;
//! no other vertex is ever compared through this table.

use rayon::prelude::*;
use xxhash_rust::xxh3::xxh3_64;

use crate::graph::CsrGraph;

pub(crate) struct MinHashSketch {
    num_samples: u32,
    row: Vec<u32>, // vertex -> fingerprint row, u32::MAX when absent
    mins: Vec<u64>,
}

impl MinHashSketch {
    pub(crate) fn build(graph: &CsrGraph, high: &[bool], num_samples: u32, seed: u64) -> Self {
        let n = graph.num_vertices();
        let samples = num_samples as usize;

        let sketched: Vec<u32> = (0..n)
            .into_par_iter()
            .filter(|&v| {
                high[v as usize] && graph.neighbors(v).iter().any(|&u| high[u as usize])
            })
            .collect();
        let mut row = vec![u32::MAX; n as usize];
        for (i, &v) in sketched.iter().enumerate() {
            row[v as usize] = i as u32;
        }

        let mins: Vec<u64> = sketched
            .par_iter()
            .flat_map_iter(|&v| {
                let mut fp = vec![u64::MAX; samples];
                fold_member(&mut fp, seed, num_samples, v);
                for &u in graph.neighbors(v) {
                    fold_member(&mut fp, seed, num_samples, u);
                }
                fp
            })
            .collect();

        MinHashSketch {
            num_samples,
            row,
            mins,
        }
    }

    /// Fraction of matching sample positions between the fingerprints of two
    /// sketched vertices.
    pub(crate) fn estimate(&self, u: u32, v: u32) -> f32 {
        let a = self.fingerprint(u);
        let b = self.fingerprint(v);
        let matches = a.iter().zip(b).filter(|(x, y)| x == y).count();
        matches as f32 / self.num_samples as f32
    }

    fn fingerprint(&self, v: u32) -> &[u64] {
        let samples = self.num_samples as usize;
        let r = self.row[v as usize] as usize;
        &self.mins[r * samples..(r + 1) * samples]
    }
}

/// Lower every sample minimum by one closed-neighborhood member.
#[inline]
fn fold_member(fp: &mut [u64], seed: u64, num_samples: u32, x: u32) {
    let base = seed
        .wrapping_add((num_samples as u64).wrapping_mul(x as u64));
    for (s, min) in fp.iter_mut().enumerate() {
        let h = xxh3_64(&base.wrapping_add(s as u64).to_le_bytes());
        if h < *min {
            *min = h;
        }
    }
}
