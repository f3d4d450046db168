//! Round-trip properties across the two engines.
//!
//! Flattening then nesting reproduces a nested tree up to mark-order
//! canonicalization; nesting then flattening reproduces a flat tree exactly,
//! provided its mark lists already follow the canonical order. The proptest
//! below drives the second form, since every canonically marked flat tree is
//! a fixed point.

use crate::common::{
    doc, em, flatten_basic, fp, marked, nest_basic, p, root, strong, t, SCHEMA,
};
use markweave::{FlatNode, Mark};
use proptest::prelude::*;

#[test]
fn nested_emphasis_survives_a_full_round_trip() {
    let original = root(vec![p(vec![
        t("This "),
        em(vec![t("is a "), strong(vec![t("document.")])]),
    ])]);

    let flat = flatten_basic(&original).unwrap();
    let rebuilt = nest_basic(&flat).unwrap();
    assert_eq!(rebuilt, original);
}

#[test]
fn canonicalization_reorders_marks_but_round_trips_stably() {
    // strong(emphasis(..)) flattens to the canonical [em, strong] list, so
    // the rebuilt tree nests emphasis outermost. A second round trip then
    // reproduces the rebuilt tree exactly.
    let original = root(vec![p(vec![strong(vec![em(vec![t("x")])])])]);

    let flat = flatten_basic(&original).unwrap();
    let rebuilt = nest_basic(&flat).unwrap();
    assert_eq!(rebuilt, root(vec![p(vec![em(vec![strong(vec![t("x")])])])]));

    let flat_again = flatten_basic(&rebuilt).unwrap();
    assert_eq!(flat_again, flat);
    assert_eq!(nest_basic(&flat_again).unwrap(), rebuilt);
}

#[test]
fn conversion_is_deterministic() {
    let tree = root(vec![p(vec![
        t("a "),
        em(vec![t("b "), strong(vec![t("c")])]),
        t(" d"),
    ])]);

    let first = flatten_basic(&tree).unwrap();
    let second = flatten_basic(&tree).unwrap();
    assert_eq!(first, second);

    let nested_first = nest_basic(&first).unwrap();
    let nested_second = nest_basic(&second).unwrap();
    assert_eq!(nested_first, nested_second);
}

fn canonical_mark_list() -> impl Strategy<Value = Vec<Mark>> {
    let link = || Mark::new("link").with_attr("href", "https://a.example");
    prop_oneof![
        Just(vec![]),
        Just(vec![Mark::new("em")]),
        Just(vec![Mark::new("strong")]),
        Just(vec![Mark::new("em"), Mark::new("strong")]),
        Just(vec![link()]),
        Just(vec![link(), Mark::new("em")]),
        Just(vec![link(), Mark::new("em"), Mark::new("strong")]),
    ]
}

fn leaf() -> impl Strategy<Value = FlatNode> {
    ("[a-z]{1,8}", canonical_mark_list()).prop_map(|(text, marks)| marked(&text, marks))
}

fn paragraph() -> impl Strategy<Value = FlatNode> {
    prop::collection::vec(leaf(), 1..6).prop_map(fp)
}

fn flat_doc() -> impl Strategy<Value = FlatNode> {
    prop::collection::vec(paragraph(), 1..4).prop_map(doc)
}

proptest! {
    #[test]
    fn canonically_marked_flat_trees_are_round_trip_fixed_points(tree in flat_doc()) {
        let nested = nest_basic(&tree).unwrap();
        let rebuilt = flatten_basic(&nested).unwrap();
        prop_assert_eq!(rebuilt, tree);
    }

    #[test]
    fn every_mark_list_comes_back_in_canonical_order(tree in flat_doc()) {
        let nested = nest_basic(&tree).unwrap();
        let rebuilt = flatten_basic(&nested).unwrap();
        for paragraph in rebuilt.children() {
            for leaf in paragraph.children() {
                let ranks: Vec<usize> = leaf
                    .marks
                    .iter()
                    .map(|mark| SCHEMA.mark_rank(&mark.tag))
                    .collect();
                let mut sorted = ranks.clone();
                sorted.sort_unstable();
                prop_assert_eq!(&ranks, &sorted);
            }
        }
    }
}
