mod common;

use asset_graph::ObjectId;
use asset_ref::{ResolveError, Resolver};
use common::{aliases, scene};
use proptest::prelude::*;
use serde_json::{json, Value};

fn literal() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[a-zA-Z0-9 _.]{0,24}".prop_map(Value::from),
        prop::collection::vec(any::<i32>(), 0..4).prop_map(|items| json!(items)),
    ]
}

proptest! {
    #[test]
    fn literals_resolve_to_themselves(value in literal(), start in prop::sample::select(vec![1i64, 3, 20])) {
        let doc = scene();
        let aliases = aliases();
        let resolved = Resolver::new(&doc, &aliases).resolve_value(ObjectId(start), &value, &json!("unused")).unwrap();
        prop_assert_eq!(resolved, value);
    }

    #[test]
    fn chains_through_null_references_yield_the_default(
        tail in prop::collection::vec("m_[a-z]{1,8}", 1..5),
        default in literal(),
    ) {
        let doc = scene();
        let aliases = aliases();
        let raw = format!("{{{{{{ MonoBehaviour<Bar>::target::{} }}}}}}", tail.join("::"));
        let resolved = Resolver::new(&doc, &aliases).resolve_value(ObjectId(1), &json!(raw), &default).unwrap();
        prop_assert_eq!(resolved, default);
    }

    #[test]
    fn indexes_past_the_end_are_rejected(index in 2usize..10_000) {
        let doc = scene();
        let aliases = aliases();
        let raw = format!("{{{{{{ MonoBehaviour<Foo>::points::[{index}] }}}}}}");
        let result = Resolver::new(&doc, &aliases).resolve_value(ObjectId(1), &json!(raw), &json!(""));
        prop_assert!(
            matches!(result, Err(ResolveError::IndexOutOfRange { index: i, .. }) if i == index),
            "unexpected result {:?}",
            result
        );
    }
}
