//! Sorted-list intersection with positional output.
//!
//! The triangle-counting kernel needs every common element of two adjacency
//! lists *and* its position in each list, because per-edge counters are
//! addressed by those positions. A plain merge covers similarly-sized lists;
//! when one list is much shorter, each of its elements is binary-searched in
//! the longer list from a moving cursor instead.

/// Length ratio above which the search strategy beats the merge.
const SEARCH_RATIO: usize = 8;

/// Invokes `on_match(common, pos_in_a, pos_in_b)` for every id present in
/// both slices. Both inputs must be sorted ascending and duplicate-free.
pub fn intersect_with_index<F>(a: &[u32], b: &[u32], mut on_match: F)
where
    F: FnMut(u32, usize, usize),
{
    if a.len() * SEARCH_RATIO < b.len() {
        search_smaller(a, b, on_match);
    } else if b.len() * SEARCH_RATIO < a.len() {
        search_smaller(b, a, |x, pos_b, pos_a| on_match(x, pos_a, pos_b));
    } else {
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    on_match(a[i], i, j);
                    i += 1;
                    j += 1;
                }
            }
        }
    }
}

/// For each element of `small`, binary-search its slot in `large[cursor..]`.
/// The cursor only moves forward, so the total cost is
/// O(|small| log |large|).
fn search_smaller<F>(small: &[u32], large: &[u32], mut on_match: F)
where
    F: FnMut(u32, usize, usize),
{
    let mut cursor = 0;
    for (i, &x) in small.iter().enumerate() {
        if cursor >= large.len() {
            return;
        }
        let pos = cursor + large[cursor..].partition_point(|&y| y < x);
        if pos < large.len() && large[pos] == x {
            on_match(x, i, pos);
            cursor = pos + 1;
        } else {
            cursor = pos;
        }
    }
}
