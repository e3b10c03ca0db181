/* src/sampler/top_k.rs
 *
 * Copyright 2023 Romeo Calota
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <http://www.gnu.org/licenses/>.
 *
 * SPDX-License-Identifier: GPL-3.0-or-later
 */

use super::UsageEntry;

/// How many processes are reported every tick.
pub const TOP_K: usize = 5;

pub fn top5(entries: &mut [UsageEntry]) -> &mut [UsageEntry] {
    top_k(entries, TOP_K)
}

/// Moves the `k` entries with the highest usage to the front of `entries`, sorted highest first,
/// and returns that prefix.
///
/// Quickselect narrows the slice down to the `k` largest entries in expected linear time, after
/// which only those `k` get sorted. Entries past the prefix are left in unspecified order, and
/// ties are ordered arbitrarily.
pub fn top_k(entries: &mut [UsageEntry], k: usize) -> &mut [UsageEntry] {
    let k = k.min(entries.len());
    if k == 0 {
        return &mut entries[..0];
    }

    if k < entries.len() {
        select(entries, k - 1);
    }

    let prefix = &mut entries[..k];
    prefix.sort_unstable_by(|a, b| b.pct.total_cmp(&a.pct));
    prefix
}

/// Partitions `entries` so that `rank` holds the value it would have if sorted descending, with
/// everything before it greater or equal and everything after it less or equal.
fn select(entries: &mut [UsageEntry], rank: usize) {
    let mut low = 0;
    let mut high = entries.len() - 1;

    while low < high {
        let pivot = partition(entries, low, high);
        if pivot == rank {
            break;
        } else if pivot < rank {
            low = pivot + 1;
        } else {
            high = pivot - 1;
        }
    }
}

/// Lomuto partition of `entries[low..=high]` around a median-of-three pivot.
///
/// Entries strictly greater than the pivot end up on its left. Returns the pivot's final index.
fn partition(entries: &mut [UsageEntry], low: usize, high: usize) -> usize {
    move_median_to_high(entries, low, high);
    let pivot = entries[high].pct;

    let mut store = low;
    for i in low..high {
        if entries[i].pct > pivot {
            entries.swap(i, store);
            store += 1;
        }
    }
    entries.swap(store, high);

    store
}

/// Sorted or reverse-sorted input would make a fixed last-element pivot quadratic.
fn move_median_to_high(entries: &mut [UsageEntry], low: usize, high: usize) {
    if high - low < 2 {
        return;
    }

    let mut candidates = [low, low + (high - low) / 2, high];
    candidates.sort_unstable_by(|&a, &b| entries[a].pct.total_cmp(&entries[b].pct));
    entries.swap(candidates[1], high);
}

#[cfg(test)]
mod test {
    use super::*;

    fn entries(pcts: &[f64]) -> Vec<UsageEntry> {
        pcts.iter()
            .enumerate()
            .map(|(i, pct)| UsageEntry {
                pid: i as i32 + 1,
                name: Default::default(),
                pct: *pct,
            })
            .collect()
    }

    fn pcts(entries: &[UsageEntry]) -> Vec<f64> {
        entries.iter().map(|e| e.pct).collect()
    }

    /// Reference answer: full sort, take the first `k`.
    fn expected(values: &[f64], k: usize) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| b.total_cmp(a));
        sorted.truncate(k);
        sorted
    }

    /// Small deterministic generator so the tests do not depend on a RNG crate.
    fn lcg(seed: &mut u64) -> u64 {
        *seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        *seed >> 33
    }

    #[test]
    fn test_seven_entries() {
        let mut e = entries(&[10., 90., 30., 70., 20., 60., 5.]);
        assert_eq!(pcts(top5(&mut e)), [90., 70., 60., 30., 20.]);
    }

    #[test]
    fn test_short_inputs() {
        let mut e = entries(&[]);
        assert!(top5(&mut e).is_empty());

        let mut e = entries(&[3.]);
        assert_eq!(pcts(top5(&mut e)), [3.]);

        let mut e = entries(&[1., 4., 2., 5., 3.]);
        assert_eq!(pcts(top5(&mut e)), [5., 4., 3., 2., 1.]);

        let mut e = entries(&[2., 7., 1.]);
        assert_eq!(pcts(top5(&mut e)), [7., 2., 1.]);
    }

    #[test]
    fn test_idempotent() {
        let mut e = entries(&[10., 90., 30., 70., 20., 60., 5.]);
        let mut first = top5(&mut e).to_vec();
        let again = pcts(top5(&mut first));

        assert_eq!(again, pcts(&first));
        assert_eq!(again, [90., 70., 60., 30., 20.]);
    }

    #[test]
    fn test_sorted_and_reversed_inputs() {
        let ascending = (0..2000).map(|i| i as f64).collect::<Vec<_>>();
        let mut e = entries(&ascending);
        assert_eq!(pcts(top5(&mut e)), [1999., 1998., 1997., 1996., 1995.]);

        let descending = ascending.iter().rev().copied().collect::<Vec<_>>();
        let mut e = entries(&descending);
        assert_eq!(pcts(top5(&mut e)), [1999., 1998., 1997., 1996., 1995.]);
    }

    #[test]
    fn test_ties() {
        let mut e = entries(&[0., 0., 0., 0., 0., 0., 0., 0., 0.]);
        assert_eq!(pcts(top5(&mut e)), [0.; 5]);

        let mut e = entries(&[1., 5., 5., 1., 5., 0., 5., 5., 5., 1.]);
        assert_eq!(pcts(top5(&mut e)), [5.; 5]);

        let mut e = entries(&[3., 1., 3., 2., 3., 2., 1., 2.]);
        assert_eq!(pcts(top5(&mut e)), [3., 3., 3., 2., 2.]);
    }

    #[test]
    fn test_matches_full_sort() {
        let mut seed = 0x5eed_u64;
        for round in 0..200 {
            let len = (lcg(&mut seed) % 64) as usize + round % 3;
            let values = (0..len)
                .map(|_| (lcg(&mut seed) % 50) as f64 / 2.)
                .collect::<Vec<_>>();

            let mut e = entries(&values);
            let top = top5(&mut e);

            assert_eq!(top.len(), len.min(5));
            assert_eq!(pcts(top), expected(&values, 5), "input {:?}", values);
        }
    }

    #[test]
    fn test_output_is_subset_of_input() {
        let mut e = entries(&[4., 8., 15., 16., 23., 42., 0.5, 99.]);
        let top = top5(&mut e).to_vec();

        let mut pids = top.iter().map(|e| e.pid).collect::<Vec<_>>();
        pids.sort_unstable();
        pids.dedup();
        assert_eq!(pids.len(), 5);
        assert_eq!(pcts(&top), [99., 42., 23., 16., 15.]);
        // the pid travels with its value
        assert!(top.iter().all(|t| t.pid == 8 || t.pct != 99.));
    }

    #[test]
    fn test_other_k() {
        let mut e = entries(&[5., 1., 9., 3.]);
        assert_eq!(pcts(top_k(&mut e, 1)), [9.]);

        let mut e = entries(&[5., 1., 9., 3.]);
        assert!(top_k(&mut e, 0).is_empty());

        let mut e = entries(&[5., 1., 9., 3.]);
        assert_eq!(pcts(top_k(&mut e, 10)), [9., 5., 3., 1.]);
    }
}
