//! Bin comparators
//!
//! Every comparator is a total order, so `sort_by` (stable) is deterministic
//! and the `_desc` variants are exact reversals of their ascending form.

use crate::bin::Bin;
use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

pub type BinComparator<T> = fn(&Bin<T>, &Bin<T>) -> Ordering;

fn float_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("static pattern compiles")
    })
}

/// Numeric value of a label that reads as a float
fn label_number(label: &str) -> Option<f64> {
    let trimmed = label.trim();
    if !float_pattern().is_match(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

pub fn sort_by_count<T>(a: &Bin<T>, b: &Bin<T>) -> Ordering {
    a.count().cmp(&b.count())
}

pub fn sort_by_count_desc<T>(a: &Bin<T>, b: &Bin<T>) -> Ordering {
    sort_by_count(a, b).reverse()
}

/// Numbers, then text, then the empty and invalid sentinels
pub fn sort_by_key<T>(a: &Bin<T>, b: &Bin<T>) -> Ordering {
    a.key().cmp(b.key())
}

pub fn sort_by_key_desc<T>(a: &Bin<T>, b: &Bin<T>) -> Ordering {
    sort_by_key(a, b).reverse()
}

/// Numeric labels compare as numbers and come before all other labels
pub fn sort_by_label<T>(a: &Bin<T>, b: &Bin<T>) -> Ordering {
    match (label_number(a.label()), label_number(b.label())) {
        (Some(x), Some(y)) => (x + 0.0).total_cmp(&(y + 0.0)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.label().cmp(b.label()),
    }
}

pub fn sort_by_label_desc<T>(a: &Bin<T>, b: &Bin<T>) -> Ordering {
    sort_by_label(a, b).reverse()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BinSort {
    #[default]
    Count,
    Key,
    Label,
}

impl BinSort {
    pub fn comparator<T>(&self, descending: bool) -> BinComparator<T> {
        match (self, descending) {
            (Self::Count, false) => sort_by_count,
            (Self::Count, true) => sort_by_count_desc,
            (Self::Key, false) => sort_by_key,
            (Self::Key, true) => sort_by_key_desc,
            (Self::Label, false) => sort_by_label,
            (Self::Label, true) => sort_by_label_desc,
        }
    }

    /// Stable in-place sort
    pub fn sort<T>(&self, bins: &mut [Bin<T>], descending: bool) {
        bins.sort_by(self.comparator(descending));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::BinKey;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn bin(key: BinKey, label: &str, count: usize) -> Bin<u32> {
        let mut bin = Bin::new(key, label);
        for i in 0..count {
            bin.add_item(Arc::new(i as u32));
        }
        bin
    }

    fn labels(bins: &[Bin<u32>]) -> Vec<&str> {
        bins.iter().map(|b| b.label()).collect()
    }

    #[test]
    fn test_sort_by_count() {
        let mut bins = vec![
            bin(BinKey::from("a"), "a", 3),
            bin(BinKey::from("b"), "b", 1),
            bin(BinKey::from("c"), "c", 2),
            bin(BinKey::from("d"), "d", 1),
        ];
        bins.sort_by(sort_by_count);
        assert_eq!(labels(&bins), vec!["b", "d", "c", "a"]);

        bins.sort_by(sort_by_count_desc);
        assert_eq!(labels(&bins), vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn test_sort_by_key() {
        let mut bins = vec![
            bin(BinKey::Empty, "No field", 1),
            bin(BinKey::Number(20.0), "20", 1),
            bin(BinKey::from("x"), "x", 1),
            bin(BinKey::Number(3.0), "3", 1),
        ];
        bins.sort_by(sort_by_key);
        assert_eq!(labels(&bins), vec!["3", "20", "x", "No field"]);
    }

    #[test]
    fn test_sort_by_label() {
        let mut bins = vec![
            bin(BinKey::from("b"), "banana", 1),
            bin(BinKey::from("10"), "10", 1),
            bin(BinKey::from("9.5"), "9.5", 1),
            bin(BinKey::from("a"), "apple", 1),
            bin(BinKey::from("-1e2"), "-1e2", 1),
        ];
        bins.sort_by(sort_by_label);
        assert_eq!(labels(&bins), vec!["-1e2", "9.5", "10", "apple", "banana"]);

        BinSort::Label.sort(&mut bins, true);
        assert_eq!(labels(&bins), vec!["banana", "apple", "10", "9.5", "-1e2"]);
    }

    #[test]
    fn test_label_number() {
        assert_eq!(label_number("1.5"), Some(1.5));
        assert_eq!(label_number(".5"), Some(0.5));
        assert_eq!(label_number("+3e-2"), Some(0.03));
        assert_eq!(label_number("10 to 20"), None);
        assert_eq!(label_number("NaN"), None);
        assert_eq!(label_number("inf"), None);
    }

    fn arb_bin() -> impl Strategy<Value = Bin<u32>> {
        let key = prop_oneof![
            Just(BinKey::Empty),
            Just(BinKey::Invalid),
            (-50i32..50).prop_map(|n| BinKey::Number(f64::from(n))),
            "[a-c]{0,2}".prop_map(BinKey::Text),
        ];
        let label = prop_oneof!["[a-c]{0,3}", (-50i32..50).prop_map(|n| n.to_string()), Just("1.0".to_string())];
        (key, label, 0usize..4).prop_map(|(key, label, count)| bin(key, &label, count))
    }

    proptest! {
        #[test]
        fn prop_desc_is_reverse(a in arb_bin(), b in arb_bin()) {
            for sort in [BinSort::Count, BinSort::Key, BinSort::Label] {
                let asc = sort.comparator::<u32>(false)(&a, &b);
                let desc = sort.comparator::<u32>(true)(&a, &b);
                prop_assert_eq!(desc, asc.reverse());
                prop_assert_eq!(sort.comparator::<u32>(false)(&b, &a), asc.reverse());
            }
        }

        #[test]
        fn prop_sort_is_idempotent(mut bins in proptest::collection::vec(arb_bin(), 0..12)) {
            for sort in [BinSort::Count, BinSort::Key, BinSort::Label] {
                for descending in [false, true] {
                    sort.sort(&mut bins, descending);
                    let once: Vec<(String, String, usize)> = bins
                        .iter()
                        .map(|b| (b.key().to_string(), b.label().to_string(), b.count()))
                        .collect();
                    sort.sort(&mut bins, descending);
                    let twice: Vec<(String, String, usize)> = bins
                        .iter()
                        .map(|b| (b.key().to_string(), b.label().to_string(), b.count()))
                        .collect();
                    prop_assert_eq!(once, twice);
                }
            }
        }
    }
}
