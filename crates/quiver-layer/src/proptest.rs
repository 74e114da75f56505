//! Property-based tests for tuple encoding and subspaces.
//!
//! 1. **Roundtrip**: unpack(pack(t)) == t for all tuples
//! 2. **Ordering**: t1 < t2 iff pack(t1) < pack(t2)
//! 3. **Prefix stability**: pack(a) is a prefix of pack(a ++ b)
//! 4. **Containment**: a subspace contains and decodes every key it packs

use proptest::prelude::*;

use crate::Element;
use crate::Subspace;
use crate::Tuple;

// =============================================================================
// Strategies for generating test data
// =============================================================================

/// Strategy for generating arbitrary Element values.
fn arb_element() -> impl Strategy<Value = Element> {
    prop_oneof![
        Just(Element::Null),
        "[a-zA-Z0-9_]{0,20}".prop_map(Element::String),
        // Arbitrary unicode, including embedded nulls
        any::<String>().prop_map(Element::String),
        prop::collection::vec(any::<u8>(), 0..50).prop_map(Element::Bytes),
        // Bytes biased toward nulls and 0xFF to exercise escaping
        prop::collection::vec(prop_oneof![Just(0x00u8), Just(0xFFu8), any::<u8>()], 0..10).prop_map(Element::Bytes),
        any::<i64>().prop_map(Element::Int),
        (-1000i64..1000i64).prop_map(Element::Int),
    ]
}

/// Strategy for generating tuples with 0-5 elements.
fn arb_tuple() -> impl Strategy<Value = Tuple> {
    prop::collection::vec(arb_element(), 0..5).prop_map(Tuple::from)
}

/// Strategy for generating simple string tuples.
fn arb_string_tuple() -> impl Strategy<Value = Tuple> {
    prop::collection::vec("[a-z]{1,5}", 1..4).prop_map(|strings| strings.into_iter().map(Element::String).collect())
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// Property: pack followed by unpack is identity.
    #[test]
    fn prop_roundtrip(tuple in arb_tuple()) {
        let packed = tuple.pack();
        let unpacked = Tuple::unpack(&packed).expect("unpack should succeed");
        prop_assert_eq!(tuple, unpacked, "roundtrip failed");
    }

    /// Property: integer encoding preserves ordering.
    #[test]
    fn prop_int_ordering(a in any::<i64>(), b in any::<i64>()) {
        let packed_a = Tuple::new().push(a).pack();
        let packed_b = Tuple::new().push(b).pack();
        prop_assert_eq!(a.cmp(&b), packed_a.cmp(&packed_b), "ordering failed for {} vs {}", a, b);
    }

    /// Property: byte strings keep their order through escaping.
    #[test]
    fn prop_bytes_ordering(
        a in prop::collection::vec(prop_oneof![Just(0x00u8), Just(0xFFu8), any::<u8>()], 0..8),
        b in prop::collection::vec(prop_oneof![Just(0x00u8), Just(0xFFu8), any::<u8>()], 0..8),
    ) {
        let packed_a = Tuple::new().push(a.clone()).pack();
        let packed_b = Tuple::new().push(b.clone()).pack();
        prop_assert_eq!(a.cmp(&b), packed_a.cmp(&packed_b));
    }

    /// Property: element-wise tuple order matches packed byte order.
    #[test]
    fn prop_tuple_ordering(a in arb_tuple(), b in arb_tuple()) {
        prop_assert_eq!(a.cmp(&b), a.pack().cmp(&b.pack()));
    }

    /// Property: a tuple's packing is a prefix of any extension's packing.
    #[test]
    fn prop_prefix_stability(prefix in arb_tuple(), suffix in arb_tuple()) {
        let packed_prefix = prefix.pack();

        let mut combined = prefix.clone();
        for elem in suffix.iter() {
            combined.push_mut(elem.clone());
        }

        prop_assert!(combined.pack().starts_with(&packed_prefix));
    }

    /// Property: the tuple range captures every strict extension.
    #[test]
    fn prop_range_captures_prefix(prefix in arb_string_tuple(), suffix in arb_string_tuple()) {
        let (start, end) = prefix.range();

        let mut key_tuple = prefix.clone();
        for elem in suffix.iter() {
            key_tuple.push_mut(elem.clone());
        }
        let key = key_tuple.pack();

        prop_assert!(key >= start && key < end, "key {:?} not in [{:?}, {:?})", key, start, end);
    }

    /// Property: subspace pack/unpack roundtrip.
    #[test]
    fn prop_subspace_roundtrip(prefix in arb_tuple(), key in arb_tuple()) {
        let subspace = Subspace::new(&prefix);
        let packed = subspace.pack(&key);
        let unpacked = subspace.unpack(&packed).expect("unpack should succeed");
        prop_assert_eq!(key, unpacked);
    }

    /// Property: a subspace contains every nested subspace's prefix.
    #[test]
    fn prop_subspace_contains_nested(prefix in arb_tuple(), elements in prop::collection::vec(arb_element(), 0..4)) {
        let subspace = Subspace::new(&prefix);
        let nested = subspace.subspace(&Tuple::from(elements));
        prop_assert!(subspace.contains(nested.raw_prefix()));
    }

    /// Property: sibling string subspaces never contain each other's keys.
    #[test]
    fn prop_sibling_isolation(a in "[a-z]{1,6}", b in "[a-z]{1,6}", key in arb_tuple()) {
        prop_assume!(a != b);
        let root = Subspace::from_bytes(vec![0x15, 0x01]);
        let space_a = root.sub(a.as_str());
        let space_b = root.sub(b.as_str());
        prop_assert!(!space_b.contains(&space_a.pack(&key)));
    }
}
