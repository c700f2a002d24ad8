//! Condition evaluator

use crate::condition::ast::{
    number_cmp, CollectionKind, Comparable, Condition, LogicalKind, TypeRank,
};
use crate::condition::path::resolve;
use serde_json::Value;
use std::cmp::Ordering;

/// Evaluate a condition against a JSON document
pub fn check(condition: &Condition, value: &Value) -> bool {
    check_at(condition, Some(value))
}

/// Turn a condition into a reusable test function
pub fn predicate(condition: Condition) -> impl Fn(&Value) -> bool + Send + Sync {
    move |value: &Value| check(&condition, value)
}

fn check_at(condition: &Condition, value: Option<&Value>) -> bool {
    let resolved = value.and_then(|value| resolve(value, condition.path()));

    match condition {
        Condition::Always => true,
        Condition::Never => false,
        Condition::Compare(compare) => compare.kind.holds(compare_value(resolved, &compare.value)),
        Condition::IncludedIn(set) => set.values.iter().any(|member| is_member(resolved, member)),
        Condition::NoValue(_) => resolved.is_none(),
        Condition::Logical(logical) => match logical.kind {
            LogicalKind::Every => logical.items.iter().all(|item| check_at(item, resolved)),
            LogicalKind::Some => logical.items.iter().any(|item| check_at(item, resolved)),
        },
        Condition::Collection(collection) => {
            let elements: &[Value] = match resolved {
                Some(Value::Array(elements)) => elements.as_slice(),
                _ => &[],
            };
            match collection.kind {
                CollectionKind::AllOf => elements
                    .iter()
                    .all(|element| check_at(&collection.item, Some(element))),
                CollectionKind::AnyOf => elements
                    .iter()
                    .any(|element| check_at(&collection.item, Some(element))),
            }
        }
        Condition::Not(not) => !check_at(&not.item, resolved),
    }
}

fn rank_of(value: Option<&Value>) -> TypeRank {
    match value {
        None | Some(Value::Null) => TypeRank::Absent,
        Some(Value::Bool(_)) => TypeRank::Bool,
        Some(Value::Number(_)) => TypeRank::Number,
        Some(Value::String(_)) => TypeRank::String,
        Some(Value::Array(_)) => TypeRank::Array,
        Some(Value::Object(_)) => TypeRank::Object,
    }
}

/// Order a resolved value against a constant.
///
/// Shares its order with [`Comparable::total_cmp`], so every comparison
/// operator and its complement partition all inputs, absent ones included.
pub(crate) fn compare_value(value: Option<&Value>, constant: &Comparable) -> Ordering {
    match (value, constant) {
        (Some(Value::Bool(value)), Comparable::Bool(constant)) => value.cmp(constant),
        (Some(Value::Number(value)), Comparable::Number(constant)) => {
            number_cmp(value.as_f64().unwrap_or(f64::NAN), *constant)
        }
        (Some(Value::String(value)), Comparable::String(constant)) => {
            value.as_str().cmp(constant.as_str())
        }
        (value, constant) => rank_of(value).cmp(&constant.rank()),
    }
}

fn is_member(value: Option<&Value>, member: &Option<Comparable>) -> bool {
    match (value, member) {
        (None, None) => true,
        (Some(_), Some(constant)) => compare_value(value, constant) == Ordering::Equal,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_always_and_never() {
        for value in [json!(true), json!(false), json!("hello"), json!({"foo": "bar"})] {
            assert!(check(&Condition::always(), &value));
            assert!(!check(&Condition::never(), &value));
        }
    }

    #[test]
    fn test_equal_is_strict() {
        let is_one = Condition::equal(1);
        assert!(check(&is_one, &json!(1)));
        assert!(check(&is_one, &json!(1.0)));
        assert!(!check(&is_one, &json!(2)));
        assert!(!check(&is_one, &json!("1")));
    }

    #[test]
    fn test_equal_with_property_path() {
        let is_foo_one = Condition::equal(1).at(["foo"]);
        assert!(check(&is_foo_one, &json!({"foo": 1})));
        assert!(!check(&is_foo_one, &json!({"foo": 2})));
        assert!(!check(&is_foo_one, &json!({"bar": 1})));
        assert!(!check(&is_foo_one, &json!(1)));
    }

    #[test]
    fn test_neq() {
        let is_not_one = Condition::neq(1);
        assert!(!check(&is_not_one, &json!(1)));
        assert!(check(&is_not_one, &json!(2)));
        assert!(check(&is_not_one, &json!("1")));
    }

    #[test]
    fn test_ordering_operators() {
        let cases = [
            (Condition::gt(50), [false, false, true]),
            (Condition::gte(50), [false, true, true]),
            (Condition::lt(50), [true, false, false]),
            (Condition::lte(50), [true, true, false]),
        ];
        for (condition, expected) in cases {
            let actual = [40, 50, 60].map(|n| check(&condition, &json!(n)));
            assert_eq!(actual, expected, "{}", condition);
        }
    }

    #[test]
    fn test_ordering_across_types() {
        // absent < bool < number < string < array < object
        assert!(check(&Condition::lt(0), &Value::Null));
        assert!(check(&Condition::lt(0), &json!(true)));
        assert!(check(&Condition::gt(100), &json!("a")));
        assert!(check(&Condition::gt("zzz"), &json!([1])));
        assert!(check(&Condition::gt("zzz"), &json!({})));
        assert!(check(&Condition::lt(true), &json!(false)));
        assert!(check(&Condition::gt("abc"), &json!("abd")));
    }

    #[test]
    fn test_complements_partition_every_input() {
        let inputs = [
            Value::Null,
            json!(false),
            json!(3),
            json!("x"),
            json!([3]),
            json!({"a": 3}),
        ];
        for kind in crate::condition::CompareKind::ALL {
            let condition = Condition::compare(kind, 3);
            let complement = Condition::compare(kind.complement(), 3);
            for input in &inputs {
                assert_ne!(check(&condition, input), check(&complement, input));
            }
        }
    }

    #[test]
    fn test_included_in() {
        let is_in_values = Condition::included_in([Some(1), Some(2), Some(3), None]);
        assert!(!check(&is_in_values, &json!(0)));
        assert!(check(&is_in_values, &json!(1)));
        assert!(check(&is_in_values, &json!(3)));
        assert!(!check(&is_in_values, &json!(5)));
        assert!(!check(&is_in_values, &json!(false)));
        assert!(check(&is_in_values, &Value::Null));

        let missing_field = Condition::included_in([None::<i32>]).at("foo");
        assert!(check(&missing_field, &json!({})));
    }

    #[test]
    fn test_no_value() {
        let is_no_value = Condition::no_value();
        assert!(check(&is_no_value, &Value::Null));
        assert!(check(&Condition::no_value().at("missing"), &json!({})));
        for value in [json!(""), json!(false), json!(0), json!(1), json!([])] {
            assert!(!check(&is_no_value, &value));
        }
    }

    #[test]
    fn test_every() {
        let is_between = Condition::every([Condition::gt(5), Condition::lt(10)]);
        assert!(!check(&is_between, &json!(2)));
        assert!(check(&is_between, &json!(7)));
        assert!(!check(&is_between, &json!(15)));
    }

    #[test]
    fn test_every_of_different_properties() {
        let condition = Condition::every([
            Condition::equal(1).at("foo"),
            Condition::equal(2).at("bar"),
        ]);
        assert!(check(&condition, &json!({"foo": 1, "bar": 2})));
        assert!(!check(&condition, &json!({"foo": 2, "bar": 2})));
        assert!(!check(&condition, &json!({"foo": 1, "bar": 1})));
        assert!(!check(&condition, &json!({})));
    }

    #[test]
    fn test_every_with_nested_paths() {
        let condition = Condition::every([
            Condition::equal(3).at("foo"),
            Condition::gt(5).at("bar"),
        ])
        .at("baz");
        assert!(check(&condition, &json!({"baz": {"foo": 3, "bar": 10}})));
        assert!(!check(&condition, &json!({"baz": {"foo": 2, "bar": 10}})));
        assert!(!check(&condition, &json!({"foo": 2, "bar": 10})));
    }

    #[test]
    fn test_some() {
        let is_outside = Condition::some([Condition::lt(5), Condition::gt(10)]);
        assert!(check(&is_outside, &json!(2)));
        assert!(!check(&is_outside, &json!(7)));
        assert!(check(&is_outside, &json!(15)));
    }

    #[test]
    fn test_not() {
        let is_thirty_or_under = Condition::not(Condition::gt(30));
        assert!(check(&is_thirty_or_under, &json!(20)));
        assert!(check(&is_thirty_or_under, &json!(30)));
        assert!(!check(&is_thirty_or_under, &json!(40)));
    }

    #[test]
    fn test_collections() {
        let all_big = Condition::all_of(Condition::gt(2)).at("items");
        let any_big = Condition::any_of(Condition::gt(2)).at("items");

        let doc = json!({"items": [1, 3, 5]});
        assert!(!check(&all_big, &doc));
        assert!(check(&any_big, &doc));

        let doc = json!({"items": [3, 5]});
        assert!(check(&all_big, &doc));

        // non-arrays behave as empty collections
        for doc in [json!({}), json!({"items": 7}), json!({"items": []})] {
            assert!(check(&all_big, &doc));
            assert!(!check(&any_big, &doc));
        }
    }

    #[test]
    fn test_collection_of_objects() {
        let condition = Condition::any_of(Condition::equal("admin").at("role")).at("users");
        let doc = json!({"users": [{"role": "guest"}, {"role": "admin"}]});
        assert!(check(&condition, &doc));
    }

    #[test]
    fn test_predicate_closure() {
        let is_adult = predicate(Condition::gte(18).at("age"));
        assert!(is_adult(&json!({"age": 30})));
        assert!(!is_adult(&json!({"age": 12})));
    }
}
