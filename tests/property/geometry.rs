//! Box algebra laws.

use proptest::prelude::*;
use provloc::NormBBox;

/// Well-formed boxes inside the unit square.
pub fn bbox_strategy() -> impl Strategy<Value = NormBBox> {
    (0.0..0.9f64, 0.0..0.9f64, 0.0..0.1f64, 0.0..0.1f64)
        .prop_map(|(x0, top, w, h)| NormBBox::new(x0, top, x0 + w, top + h))
}

proptest! {
    #[test]
    fn prop_intersection_with_self_is_self(b in bbox_strategy()) {
        prop_assert_eq!(b & b, Some(b));
    }

    #[test]
    fn prop_area_non_negative(b in bbox_strategy()) {
        prop_assert!(b.area() >= 0.0);
    }

    #[test]
    fn prop_union_commutative(a in bbox_strategy(), b in bbox_strategy()) {
        prop_assert_eq!(a + b, b + a);
    }

    #[test]
    fn prop_union_associative(a in bbox_strategy(), b in bbox_strategy(), c in bbox_strategy()) {
        prop_assert_eq!((a + b) + c, a + (b + c));
    }

    #[test]
    fn prop_combine_contains_all(boxes in prop::collection::vec(bbox_strategy(), 1..12)) {
        let union = NormBBox::combine(&boxes).unwrap();
        for b in &boxes {
            prop_assert!(union.contains(b), "{:?} not in {:?}", b, union);
        }
    }

    #[test]
    fn prop_intersection_symmetric_and_contained(a in bbox_strategy(), b in bbox_strategy()) {
        prop_assert_eq!(a & b, b & a);
        if let Some(i) = a & b {
            prop_assert!(a.contains(&i));
            prop_assert!(b.contains(&i));
            prop_assert!(i.area() <= a.area().min(b.area()));
        }
    }

    #[test]
    fn prop_normalized_is_valid_and_idempotent(x0 in 0.0..1.0f64, top in 0.0..1.0f64, x1 in 0.0..1.0f64, bottom in 0.0..1.0f64) {
        let n = NormBBox::new(x0, top, x1, bottom).normalized();
        prop_assert!(n.x0 <= n.x1 && n.top <= n.bottom);
        prop_assert_eq!(n.normalized(), n);
    }
}
