//! Sort permutation for directory listings.

use std::cmp::Ordering;

use strum::Display;

use remdu_scan::Attrs;

/// Attribute a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SortKey {
    #[strum(to_string = "name")]
    Name,
    #[strum(to_string = "size")]
    Size,
    #[strum(to_string = "count")]
    Count,
    #[strum(to_string = "average size")]
    AverageSize,
}

/// The single active sort key and its direction.
///
/// `direction` is `+1` for the key's normal order (ascending names,
/// largest-first numerics) and `-1` for the reverse. Exactly one key is
/// active at a time; choosing another key deactivates the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: i8,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::Size,
            direction: 1,
        }
    }
}

impl SortState {
    /// Create a state with `key` active in its normal direction.
    pub fn new(key: SortKey) -> Self {
        Self { key, direction: 1 }
    }

    /// Toggle `key`: a newly selected key starts in its normal direction,
    /// repeated presses flip the direction.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = -self.direction;
        } else {
            *self = Self::new(key);
        }
    }
}

/// One row of the snapshot handed to the sorter: the entry's identity key
/// and its attributes at snapshot time.
#[derive(Debug, Clone)]
pub struct SortRow {
    pub key: String,
    pub attrs: Attrs,
}

/// Compute the display permutation and its inverse for `rows` under `sort`.
///
/// The permutation maps display rank to underlying index; the inverse maps
/// underlying index to display rank. Recomputing with the same inputs
/// yields the same result.
pub fn compute_permutation(rows: &[SortRow], sort: SortState) -> (Vec<usize>, Vec<usize>) {
    let mut perm: Vec<usize> = (0..rows.len()).collect();
    perm.sort_by(|&a, &b| compare(&rows[a], &rows[b], sort));
    let mut inverse = vec![0; perm.len()];
    for (rank, &index) in perm.iter().enumerate() {
        inverse[index] = rank;
    }
    (perm, inverse)
}

fn compare(a: &SortRow, b: &SortRow, sort: SortState) -> Ordering {
    let primary = match sort.key {
        // identity keys are unique, name order is already total
        SortKey::Name => return directed(a.key.cmp(&b.key), sort.direction),
        SortKey::Size => directed(b.attrs.size.cmp(&a.attrs.size), sort.direction),
        SortKey::Count => directed(b.attrs.count.cmp(&a.attrs.count), sort.direction),
        SortKey::AverageSize => {
            let by_average = directed(
                b.attrs.average_size().total_cmp(&a.attrs.average_size()),
                sort.direction,
            );
            // equal averages fall back to size before the name tie-break
            by_average.then(directed(
                b.attrs.size.cmp(&a.attrs.size),
                sort.direction,
            ))
        }
    };
    primary.then_with(|| a.key.cmp(&b.key))
}

fn directed(ord: Ordering, direction: i8) -> Ordering {
    if direction < 0 { ord.reverse() } else { ord }
}
