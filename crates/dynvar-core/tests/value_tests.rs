//! Tests for the `Value` type: tags, construction, accessors, truthiness,
//! display, key equality and the dynamic container protocol.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use dynvar_core::{ErrorKind, Tag, Value, TAG_COUNT};

fn hash_of(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn ints(values: &[i32]) -> Value {
    Value::list(values.iter().copied().map(Value::from))
}

// ============================================================================
// Tags
// ============================================================================

#[test]
fn tags_are_contiguous_from_zero() {
    assert_eq!(Tag::ALL.len(), TAG_COUNT);
    for (i, tag) in Tag::ALL.iter().enumerate() {
        assert_eq!(tag.index(), i);
        assert_eq!(Tag::from_index(i), Some(*tag));
    }
    assert_eq!(Tag::from_index(TAG_COUNT), None);
}

#[test]
fn numeric_ranks_ascend_in_declaration_order() {
    let ranks: Vec<u8> = Tag::NUMERIC.iter().filter_map(|t| t.rank()).collect();
    assert_eq!(ranks.len(), Tag::NUMERIC.len());
    assert!(ranks.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(Tag::Bool.rank(), Some(0));
    assert_eq!(Tag::Str.rank(), None);
}

#[test]
fn tag_classification() {
    assert!(Tag::Bool.is_integer() && Tag::Bool.is_unsigned());
    assert!(Tag::I64.is_signed() && !Tag::I64.is_unsigned());
    assert!(Tag::F32.is_float() && Tag::F32.is_numeric());
    assert!(Tag::Str.is_heap() && !Tag::Str.is_container());
    assert!(Tag::Graph.is_container());
    assert!(!Tag::None.is_numeric() && !Tag::None.is_heap());
}

#[test]
fn tag_names_parse_back() {
    for tag in Tag::ALL {
        assert_eq!(tag.name().parse::<Tag>().unwrap(), tag);
    }
    assert_eq!("OrderedDict".parse::<Tag>().unwrap(), Tag::OrderedDict);
    assert_eq!("double".parse::<Tag>().unwrap(), Tag::F64);
    assert!("complex".parse::<Tag>().is_err());
}

// ============================================================================
// Construction and tag coherence
// ============================================================================

#[test]
fn every_constructor_reports_its_tag() {
    let cases = [
        (Value::none(), Tag::None),
        (Value::from(true), Tag::Bool),
        (Value::from(1u32), Tag::U32),
        (Value::from(1u64), Tag::U64),
        (Value::from(1u128), Tag::U128),
        (Value::from(1i32), Tag::I32),
        (Value::from(1i64), Tag::I64),
        (Value::from(1i128), Tag::I128),
        (Value::from(1.0f32), Tag::F32),
        (Value::from(1.0f64), Tag::F64),
        (Value::from("s"), Tag::Str),
        (Value::list([]), Tag::List),
        (Value::set([]), Tag::Set),
        (Value::dict([]), Tag::Dict),
        (Value::ordered_set([]), Tag::OrderedSet),
        (Value::ordered_dict([]), Tag::OrderedDict),
        (Value::graph(0), Tag::Graph),
    ];
    for (value, tag) in cases {
        assert_eq!(value.tag(), tag, "{value:?}");
        assert_eq!(value.type_name(), tag.name());
    }
}

#[test]
fn default_is_none() {
    assert!(Value::default().is_none());
}

#[test]
fn conversions_from_native_types() {
    assert_eq!(Value::from(7usize).tag(), Tag::U64);
    assert_eq!(Value::from(String::from("x")), Value::from("x"));
    assert_eq!(Value::from(Some(3)), Value::I32(3));
    assert!(Value::from(None::<i32>).is_none());
    assert_eq!(Value::from(vec![Value::from(1)]), ints(&[1]));

    let collected: Value = (0..3).map(Value::from).collect();
    assert_eq!(collected, ints(&[0, 1, 2]));
}

// ============================================================================
// Accessors
// ============================================================================

#[test]
fn checked_accessor_matches_tag() {
    let v = Value::from(42i64);
    assert!(v.is_i64());
    assert_eq!(v.as_i64().unwrap(), 42);
}

#[test]
fn checked_accessor_rejects_wrong_tag() {
    let v = Value::from(42i64);
    let err = v.as_i32().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert!(err.to_string().contains("i64"));

    assert!(Value::from(1).as_list().is_err());
    assert!(Value::from("x").as_str().is_ok());
}

#[test]
fn unchecked_accessor_after_tag_check() {
    let v = Value::from(2.5f32);
    if v.tag() == Tag::F32 {
        // SAFETY: tag checked above.
        assert_eq!(unsafe { v.as_f32_unchecked() }, 2.5);
    }
    let l = ints(&[1, 2]);
    assert!(l.is_list());
    // SAFETY: is_list checked above.
    assert_eq!(unsafe { l.as_list_unchecked() }.len(), 2);
}

#[test]
fn mutable_heap_accessor() {
    let mut v = ints(&[1]);
    v.as_list_mut().unwrap().push(Value::from(2));
    assert_eq!(v, ints(&[1, 2]));
}

// ============================================================================
// Copy and move
// ============================================================================

#[test]
fn clone_deep_copies_heap_payload() {
    let original = Value::dict([(Value::from("k"), ints(&[1]))]);
    let mut copy = original.clone();
    copy.set_item(Value::from("k"), ints(&[9])).unwrap();
    copy.set_item(Value::from("extra"), Value::none()).unwrap();

    assert_eq!(original.get(&Value::from("k")).unwrap(), ints(&[1]));
    assert_eq!(original.len().unwrap(), 1);
    assert_eq!(copy.len().unwrap(), 2);
}

#[test]
fn take_leaves_none_behind() {
    let mut v = ints(&[1, 2, 3]);
    let moved = v.take();
    assert!(v.is_none());
    assert_eq!(moved.len().unwrap(), 3);
}

#[test]
fn replace_returns_previous() {
    let mut v = Value::from("old");
    let previous = v.replace(Value::from(5));
    assert_eq!(previous, Value::from("old"));
    assert_eq!(v, Value::I32(5));
}

// ============================================================================
// Truthiness
// ============================================================================

#[test]
fn falsy_values() {
    for v in [
        Value::none(),
        Value::from(false),
        Value::from(0u32),
        Value::from(0i128),
        Value::from(0.0),
        Value::from(""),
        Value::list([]),
        Value::set([]),
        Value::dict([]),
        Value::graph(0),
    ] {
        assert!(!v.truthy(), "{v:?} should be falsy");
    }
}

#[test]
fn truthy_values() {
    for v in [
        Value::from(true),
        Value::from(-1),
        Value::from(f64::NAN),
        Value::from(" "),
        ints(&[0]),
        Value::graph(1),
    ] {
        assert!(v.truthy(), "{v:?} should be truthy");
    }
}

// ============================================================================
// Display
// ============================================================================

#[test]
fn scalar_display() {
    assert_eq!(Value::none().to_string(), "None");
    assert_eq!(Value::from(true).to_string(), "True");
    assert_eq!(Value::from(-12).to_string(), "-12");
    assert_eq!(Value::from(u128::MAX).to_string(), u128::MAX.to_string());
    assert_eq!(Value::from(2.0).to_string(), "2.0");
    assert_eq!(Value::from(0.1f32).to_string(), "0.1");
    assert_eq!(Value::from(f64::NAN).to_string(), "nan");
    assert_eq!(Value::from(f64::NEG_INFINITY).to_string(), "-inf");
    assert_eq!(Value::from("plain").to_string(), "plain");
}

#[test]
fn container_display() {
    let words = Value::list([Value::from("a"), Value::from("it's")]);
    assert_eq!(words.to_string(), r"['a', 'it\'s']");
    assert_eq!(Value::set([]).to_string(), "set()");
    assert_eq!(Value::set([Value::from(1)]).to_string(), "{1}");
    assert_eq!(
        Value::dict([(Value::from("a"), Value::from(1))]).to_string(),
        "{'a': 1}"
    );
    assert_eq!(
        Value::ordered_set([Value::from(2), Value::from(1)]).to_string(),
        "OrderedSet([2, 1])"
    );
    assert_eq!(
        Value::ordered_dict([
            (Value::from("b"), Value::from(2)),
            (Value::from("a"), Value::none()),
        ])
        .to_string(),
        "OrderedDict({'b': 2, 'a': None})"
    );
}

#[test]
fn graph_display_counts_undirected_edge_once() {
    let mut g = Value::graph(3);
    let graph = g.as_graph_mut().unwrap();
    graph.add_edge(0, 1, 1.5, false).unwrap();
    graph.add_edge(1, 2, 1.0, true).unwrap();
    assert_eq!(g.to_string(), "<Graph nodes=3 edges=2>");
}

#[test]
fn undirected_self_loops_count_once_each() {
    let mut g = Value::graph(2);
    let graph = g.as_graph_mut().unwrap();
    graph.add_edge(0, 0, 1.0, false).unwrap();
    graph.add_edge(0, 0, 2.0, false).unwrap();
    assert_eq!(graph.edge_count(), 2);
    graph.add_edge(0, 1, 1.0, false).unwrap();
    graph.add_edge(1, 1, 1.0, true).unwrap();
    assert_eq!(graph.edge_count(), 4);
    assert_eq!(g.to_string(), "<Graph nodes=2 edges=4>");

    let graph = g.as_graph_mut().unwrap();
    assert!(graph.remove_edge(0, 0).unwrap());
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn removing_a_missing_edge_is_not_a_mutation() {
    let mut g = Value::graph(2);
    let graph = g.as_graph_mut().unwrap();
    assert!(!graph.remove_edge(0, 1).unwrap());
    assert_eq!(graph.version(), 0);
}

#[test]
fn repr_quotes_text() {
    assert_eq!(Value::from("a\nb").repr(), r"'a\nb'");
    assert_eq!(Value::from(3).repr(), "3");
}

// ============================================================================
// Key equality and hashing
// ============================================================================

#[test]
fn numeric_keys_compare_by_value_across_widths() {
    let a = Value::from(1i32);
    let b = Value::from(1u128);
    let c = Value::from(1.0f64);
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_eq!(hash_of(&a), hash_of(&b));
    assert_eq!(hash_of(&a), hash_of(&c));
    assert_ne!(Value::from(1.5), Value::from(1));
}

#[test]
fn nan_is_a_usable_key() {
    let nan = Value::from(f64::NAN);
    assert_eq!(nan, nan.clone());
    assert_eq!(hash_of(&nan), hash_of(&Value::from(f32::NAN)));

    let set = Value::set([nan.clone(), nan.clone()]);
    assert_eq!(set.len().unwrap(), 1);
    assert!(set.contains(&nan).unwrap());
}

#[test]
fn set_dedups_equal_numbers() {
    let set = Value::set([Value::from(2u32), Value::from(2i64), Value::from(2.0f32)]);
    assert_eq!(set.len().unwrap(), 1);
}

#[test]
fn different_kinds_are_distinct_keys() {
    assert_ne!(Value::from("1"), Value::from(1));
    assert_ne!(Value::list([]), Value::set([]));
    assert_ne!(Value::none(), Value::from(false));

    let mut seen = HashSet::new();
    seen.insert(Value::from("1"));
    seen.insert(Value::from(1));
    seen.insert(ints(&[1]));
    assert_eq!(seen.len(), 3);
}

#[test]
fn hash_set_equality_ignores_order() {
    let a = Value::set([Value::from(1), Value::from(2)]);
    let b = Value::set([Value::from(2), Value::from(1)]);
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn ordered_kinds_equality_respects_order() {
    let a = Value::ordered_set([Value::from(1), Value::from(2)]);
    let b = Value::ordered_set([Value::from(2), Value::from(1)]);
    assert_ne!(a, b);
}

// ============================================================================
// Container protocol
// ============================================================================

#[test]
fn len_counts_characters_and_nodes() {
    assert_eq!(Value::from("héllo").len().unwrap(), 5);
    assert_eq!(Value::graph(4).len().unwrap(), 4);
    assert!(Value::list([]).is_empty().unwrap());
    assert_eq!(Value::from(3).len().unwrap_err().kind(), ErrorKind::TypeMismatch);
}

#[test]
fn get_by_position_and_key() {
    let list = ints(&[10, 20, 30]);
    assert_eq!(list.get(&Value::from(0)).unwrap(), Value::from(10));
    assert_eq!(list.get(&Value::from(-1)).unwrap(), Value::from(30));
    assert_eq!(list.get(&Value::from(3)).unwrap_err().kind(), ErrorKind::Index);
    assert_eq!(
        list.get(&Value::from("0")).unwrap_err().kind(),
        ErrorKind::TypeMismatch
    );

    let text = Value::from("héllo");
    assert_eq!(text.get(&Value::from(1)).unwrap(), Value::from("é"));

    let dict = Value::dict([(Value::from("k"), Value::from(1))]);
    assert_eq!(dict.get_ref(&Value::from("k")).unwrap(), &Value::from(1));
    assert_eq!(dict.get(&Value::from("x")).unwrap_err().kind(), ErrorKind::Key);
}

#[test]
fn map_lookup_uses_key_equality() {
    let dict = Value::dict([(Value::from(1u32), Value::from("one"))]);
    assert_eq!(dict.get(&Value::from(1.0)).unwrap(), Value::from("one"));
}

#[test]
fn contains_per_kind() {
    assert!(Value::from("hello").contains(&Value::from("ell")).unwrap());
    assert!(ints(&[1, 2]).contains(&Value::from(2u64)).unwrap());
    assert!(!ints(&[1, 2]).contains(&Value::from(3)).unwrap());
    assert!(Value::graph(2).contains(&Value::from(1)).unwrap());
    assert!(!Value::graph(2).contains(&Value::from(2)).unwrap());
    assert!(Value::from(1).contains(&Value::from(1)).is_err());
}

#[test]
fn set_item_replaces_and_inserts() {
    let mut list = ints(&[1, 2]);
    list.set_item(Value::from(-1), Value::from("last")).unwrap();
    assert_eq!(list.get(&Value::from(1)).unwrap(), Value::from("last"));

    let mut dict = Value::ordered_dict([]);
    dict.set_item(Value::from("a"), Value::from(1)).unwrap();
    dict.set_item(Value::from("a"), Value::from(2)).unwrap();
    assert_eq!(dict.len().unwrap(), 1);
    assert_eq!(dict.get(&Value::from("a")).unwrap(), Value::from(2));

    let mut graph = Value::graph(2);
    assert!(graph.get(&Value::from(0)).unwrap().is_none());
    graph.set_item(Value::from(0), Value::from("root")).unwrap();
    assert_eq!(graph.get(&Value::from(0)).unwrap(), Value::from("root"));
}

#[test]
fn append_and_insert() {
    let mut set = Value::set([Value::from(1)]);
    set.append(Value::from(1)).unwrap();
    assert_eq!(set.len().unwrap(), 1);

    let mut text = Value::from("hllo");
    text.insert_at(1, Value::from("e")).unwrap();
    assert_eq!(text, Value::from("hello"));
    assert_eq!(
        text.insert_at(0, Value::from("ab")).unwrap_err().kind(),
        ErrorKind::Value
    );

    let mut list = ints(&[1, 3]);
    list.insert_at(1, Value::from(2)).unwrap();
    list.insert_at(100, Value::from(4)).unwrap();
    assert_eq!(list, ints(&[1, 2, 3, 4]));
}

#[test]
fn remove_reports_missing_items() {
    let mut list = ints(&[1, 2, 1]);
    assert_eq!(list.remove(&Value::from(1)).unwrap(), Value::from(1));
    assert_eq!(list, ints(&[2, 1]));
    assert_eq!(list.remove(&Value::from(7)).unwrap_err().kind(), ErrorKind::Value);

    let mut dict = Value::dict([(Value::from("k"), Value::from(1))]);
    assert_eq!(dict.remove(&Value::from("k")).unwrap(), Value::from(1));
    assert_eq!(dict.remove(&Value::from("k")).unwrap_err().kind(), ErrorKind::Key);
}

#[test]
fn pop_from_end() {
    let mut text = Value::from("ab");
    assert_eq!(text.pop().unwrap(), Value::from("b"));
    assert_eq!(text, Value::from("a"));

    let mut list = ints(&[]);
    assert_eq!(list.pop().unwrap_err().kind(), ErrorKind::Index);

    let mut ordered = Value::ordered_set([Value::from(1), Value::from(2)]);
    assert_eq!(ordered.pop().unwrap(), Value::from(2));
}

#[test]
fn extend_and_clear() {
    let mut list = ints(&[1]);
    list.extend(&Value::ordered_set([Value::from(2), Value::from(3)]))
        .unwrap();
    assert_eq!(list, ints(&[1, 2, 3]));

    let mut dict = Value::dict([]);
    dict.extend(&Value::ordered_dict([(Value::from("a"), Value::from(1))]))
        .unwrap();
    assert_eq!(dict.len().unwrap(), 1);

    list.clear().unwrap();
    assert!(list.is_empty().unwrap());
    assert!(Value::from(1).clear().is_err());
}

#[test]
fn elements_of_maps_are_keys() {
    let dict = Value::ordered_dict([
        (Value::from("x"), Value::from(1)),
        (Value::from("y"), Value::from(2)),
    ]);
    assert_eq!(
        dict.elements().unwrap(),
        vec![Value::from("x"), Value::from("y")]
    );
    assert_eq!(dict.entries().unwrap()[1], (Value::from("y"), Value::from(2)));
    assert_eq!(
        Value::from("ab").elements().unwrap(),
        vec![Value::from("a"), Value::from("b")]
    );
}
