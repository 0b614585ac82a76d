// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property tests for taxonomy distance and cause classification.

use errview_core::{Fault, KindId, Taxonomy};
use proptest::prelude::*;

/// Build a random forest: kind `i` hangs under one of the kinds before it
/// (or the root).
fn forest(parents: &[usize]) -> (Taxonomy, Vec<KindId>) {
    let mut b = Taxonomy::builder();
    let mut ids: Vec<KindId> = Vec::with_capacity(parents.len());
    for (i, p) in parents.iter().enumerate() {
        let choice = p % (i + 1);
        let parent = if choice == i { KindId::ROOT } else { ids[choice] };
        ids.push(b.register(format!("k{i}_"), parent).unwrap());
    }
    (b.build(), ids)
}

proptest! {
    #[test]
    fn depth_zero_on_own_name(parents in proptest::collection::vec(0usize..16, 1..12)) {
        let (t, ids) = forest(&parents);
        for (i, id) in ids.iter().enumerate() {
            prop_assert_eq!(t.depth(*id, &format!("k{i}_")), Some(0));
        }
    }

    #[test]
    fn depth_matches_ancestor_position(parents in proptest::collection::vec(0usize..16, 1..12)) {
        let (t, ids) = forest(&parents);
        for id in &ids {
            for (pos, ancestor) in t.ancestors(*id).enumerate() {
                if ancestor == KindId::ROOT {
                    continue;
                }
                let name = t.name(ancestor).to_string();
                prop_assert_eq!(t.depth(*id, &name), Some(pos));
                prop_assert!(t.is_a(*id, ancestor));
            }
        }
    }

    #[test]
    fn root_is_always_reached(parents in proptest::collection::vec(0usize..16, 1..12)) {
        let (t, ids) = forest(&parents);
        for id in &ids {
            prop_assert_eq!(t.ancestors(*id).last(), Some(KindId::ROOT));
            prop_assert!(t.depth(*id, "Error").is_some());
        }
    }

    #[test]
    fn innermost_classifiable_cause_wins(nesting in 1usize..6) {
        let mut b = Taxonomy::builder();
        let kinds: Vec<KindId> = (0..nesting)
            .map(|i| b.register(format!("layer{i}"), KindId::ROOT).unwrap())
            .collect();
        let t = b.build();

        let mut fault = Fault::new(kinds[nesting - 1], "innermost");
        for i in (0..nesting - 1).rev() {
            fault = Fault::new(kinds[i], "wrapper").with_source(fault);
        }
        prop_assert_eq!(fault.kind(), kinds[0]);
        prop_assert_eq!(t.most_specific_kind(&fault), kinds[nesting - 1]);
    }
}
