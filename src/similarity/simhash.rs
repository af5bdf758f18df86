//! SimHash fingerprints for approximate cosine on high-degree pairs.
//!
//! Each participating vertex is assigned `num_samples` i.i.d. standard
//! normals derived from the seed. The fingerprint bit i of a high-degree
//! vertex is the sign of the closed-neighborhood sum of the i-th normals, so
//! two fingerprints disagree on a bit with probability angle/pi. Participants
//! are the high-degree vertices plus anyone adjacent to one; only high-degree
//! vertices get fingerprints.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rayon::prelude::*;
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::graph::CsrGraph;

pub(crate) struct SimHashSketch {
    num_samples: u32,
    words_per_fp: usize,
    row: Vec<u32>, // vertex -> fingerprint row, u32::MAX when absent
    bits: Vec<u64>,
}

impl SimHashSketch {
    pub(crate) fn build(graph: &CsrGraph, high: &[bool], num_samples: u32, seed: u64) -> Self {
        let n = graph.num_vertices();
        let samples = num_samples as usize;

        let participants: Vec<u32> = (0..n)
            .into_par_iter()
            .filter(|&v| {
                high[v as usize] || graph.neighbors(v).iter().any(|&u| high[u as usize])
            })
            .collect();
        let mut normal_row = vec![u32::MAX; n as usize];
        for (i, &v) in participants.iter().enumerate() {
            normal_row[v as usize] = i as u32;
        }

        // one RNG stream per vertex keyed off the seed, so the table does not
        // depend on the parallel schedule
        let normals: Vec<f64> = participants
            .par_iter()
            .flat_map_iter(|&v| {
                let mut rng = StdRng::seed_from_u64(vertex_stream(seed, v));
                (0..samples).map(move |_| rng.sample(StandardNormal))
            })
            .collect();

        let fingerprinted: Vec<u32> = (0..n)
            .into_par_iter()
            .filter(|&v| high[v as usize])
            .collect();
        let mut row = vec![u32::MAX; n as usize];
        for (i, &v) in fingerprinted.iter().enumerate() {
            row[v as usize] = i as u32;
        }

        let words_per_fp = samples.div_ceil(64);
        let normals_ref = &normals;
        let normal_row_ref = &normal_row;
        let bits: Vec<u64> = fingerprinted
            .par_iter()
            .flat_map_iter(|&v| {
                let mut words = vec![0u64; words_per_fp];
                for i in 0..samples {
                    // sequential closed-neighborhood sum keeps the sign
                    // independent of the thread count
                    let mut dot = normals_ref[normal_row_ref[v as usize] as usize * samples + i];
                    for &u in graph.neighbors(v) {
                        dot += normals_ref[normal_row_ref[u as usize] as usize * samples + i];
                    }
                    if dot >= 0.0 {
                        words[i / 64] |= 1u64 << (i % 64);
                    }
                }
                words
            })
            .collect();

        SimHashSketch {
            num_samples,
            words_per_fp,
            row,
            bits,
        }
    }

    /// Estimated cosine between the closed-neighborhood vectors of two
    /// fingerprinted vertices. Bits beyond `num_samples` are never set, so
    /// the popcount needs no masking.
    pub(crate) fn estimate(&self, u: u32, v: u32) -> f32 {
        let a = self.fingerprint(u);
        let b = self.fingerprint(v);
        let hamming: u32 = a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum();
        let angle = std::f64::consts::PI * hamming as f64 / self.num_samples as f64;
        (angle.cos() as f32).clamp(-1.0, 1.0)
    }

    fn fingerprint(&self, v: u32) -> &[u64] {
        let r = self.row[v as usize] as usize;
        &self.bits[r * self.words_per_fp..(r + 1) * self.words_per_fp]
    }
}

fn vertex_stream(seed: u64, v: u32) -> u64 {
    xxh3_64_with_seed(&(v as u64).to_le_bytes(), seed)
}
