/// Encoder contract tests: how each kind of value is lowered to JSON.
///
/// Dispatch precedence, sentinel shapes, both mapping policies, custom
/// hooks, the unregistered-type diagnostic and the structural guards.
mod common;

use chrono::NaiveDate;
use common::{Account, Celsius, Clashing, Color, Food, Tracked, User};
use serde_json::json;
use strong_json::{
    encode, AdapterSet, CodecConfig, Diagnostic, EnumValue, Mapping, ObjectRef, Registry, Set,
    StrongJson, StrongJsonError, Value,
};

fn ordered() -> StrongJson {
    StrongJson::new(CodecConfig::default(), common::registry()).unwrap()
}

fn compact() -> StrongJson {
    StrongJson::new(CodecConfig::compact(), common::registry()).unwrap()
}

// ============================================================================
// Primitives
// ============================================================================

#[test]
fn encode_primitives_unchanged() {
    assert_eq!(encode(&Value::Null).unwrap(), json!(null));
    assert_eq!(encode(&Value::from(true)).unwrap(), json!(true));
    assert_eq!(encode(&Value::from(123)).unwrap(), json!(123));
    assert_eq!(encode(&Value::from(-7_i64)).unwrap(), json!(-7));
    assert_eq!(encode(&Value::from(1.5)).unwrap(), json!(1.5));
    assert_eq!(encode(&Value::from("hello")).unwrap(), json!("hello"));
}

#[test]
fn encode_float_keeps_fraction() {
    let json = encode(&Value::from(123.0)).unwrap();
    assert!(json.is_f64());
    assert_eq!(json.as_f64(), Some(123.0));
}

#[test]
fn encode_non_finite_floats_as_sentinels() {
    assert_eq!(
        encode(&Value::from(f64::NAN)).unwrap(),
        json!({"__type__": "float", "__data__": "nan"})
    );
    assert_eq!(
        encode(&Value::from(f64::INFINITY)).unwrap(),
        json!({"__type__": "float", "__data__": "inf"})
    );
    assert_eq!(
        encode(&Value::from(f64::NEG_INFINITY)).unwrap(),
        json!({"__type__": "float", "__data__": "-inf"})
    );
}

// ============================================================================
// Sequences
// ============================================================================

#[test]
fn encode_list_as_plain_array() {
    let value = Value::list([1.into(), 2.into(), 3.into()]);
    assert_eq!(encode(&value).unwrap(), json!([1, 2, 3]));
}

#[test]
fn encode_empty_list() {
    assert_eq!(encode(&Value::List(Vec::new())).unwrap(), json!([]));
}

#[test]
fn encode_tuple_envelope() {
    assert_eq!(
        encode(&Value::from((1, 2, 3))).unwrap(),
        json!({"__type__": "tuple", "__data__": [1, 2, 3]})
    );
}

#[test]
fn encode_empty_tuple() {
    assert_eq!(
        encode(&Value::tuple([])).unwrap(),
        json!({"__type__": "tuple", "__data__": []})
    );
}

#[test]
fn encode_nested_tuple_inside_list() {
    let value = Value::list([Value::from((1, "a")), Value::from(2)]);
    assert_eq!(
        encode(&value).unwrap(),
        json!([{"__type__": "tuple", "__data__": [1, "a"]}, 2])
    );
}

#[test]
fn encode_set_sorted_by_encoded_text() {
    let set: Set = ["b", "c", "a"].into_iter().collect();
    assert_eq!(
        encode(&Value::from(set)).unwrap(),
        json!({"__type__": "set", "__data__": ["a", "b", "c"]})
    );
}

#[test]
fn encode_set_output_independent_of_insertion_order() {
    let forward: Set = [1, 2, 3].into_iter().collect();
    let backward: Set = [3, 2, 1].into_iter().collect();
    assert_eq!(
        encode(&Value::from(forward)).unwrap(),
        encode(&Value::from(backward)).unwrap()
    );
}

// ============================================================================
// Mappings
// ============================================================================

fn abcd() -> Value {
    let mut map = Mapping::new();
    map.insert("a", "b");
    map.insert("c", "d");
    Value::from(map)
}

#[test]
fn encode_mapping_as_dict_under_ordered_policy() {
    assert_eq!(
        ordered().to_json_value(&abcd()).unwrap(),
        json!({
            "__type__": "dict",
            "__data__": [{"key": "a", "value": "b"}, {"key": "c", "value": "d"}]
        })
    );
}

#[test]
fn encode_mapping_compact_under_plain_policy() {
    assert_eq!(
        compact().to_json_value(&abcd()).unwrap(),
        json!({"a": "b", "c": "d"})
    );
}

#[test]
fn encode_empty_mapping_is_empty_object_under_both_policies() {
    let empty = Value::from(Mapping::new());
    assert_eq!(ordered().to_json_value(&empty).unwrap(), json!({}));
    assert_eq!(compact().to_json_value(&empty).unwrap(), json!({}));
}

#[test]
fn encode_ordered_mapping_keeps_dict_envelope_under_plain_policy() {
    let mut map = Mapping::ordered();
    map.insert("z", 1);
    map.insert("a", 2);
    assert_eq!(
        compact().to_json_value(&Value::from(map)).unwrap(),
        json!({
            "__type__": "dict",
            "__data__": [{"key": "z", "value": 1}, {"key": "a", "value": 2}]
        })
    );
}

#[test]
fn encode_non_string_keys_use_dict_envelope_under_plain_policy() {
    let mut map = Mapping::new();
    map.insert(Value::from((1, 2)), "point");
    map.insert(3, "three");
    assert_eq!(
        compact().to_json_value(&Value::from(map)).unwrap(),
        json!({
            "__type__": "dict",
            "__data__": [
                {"key": {"__type__": "tuple", "__data__": [1, 2]}, "value": "point"},
                {"key": 3, "value": "three"}
            ]
        })
    );
}

#[test]
fn encode_mapping_with_type_key_as_key_uses_dict_envelope() {
    let mut map = Mapping::new();
    map.insert("__type__", "tuple");
    let json = compact().to_json_value(&Value::from(map)).unwrap();
    assert_eq!(json["__type__"], "dict");
}

#[test]
fn encode_mapping_values_recursively() {
    let mut map = Mapping::new();
    map.insert("when", NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
    assert_eq!(
        compact().to_json_value(&Value::from(map)).unwrap(),
        json!({"when": {"__type__": "date", "year": 2020, "month": 2, "day": 29}})
    );
}

// ============================================================================
// Dates
// ============================================================================

#[test]
fn encode_date_fields_inline() {
    let date = NaiveDate::from_ymd_opt(1990, 4, 1).unwrap();
    assert_eq!(
        encode(&Value::from(date)).unwrap(),
        json!({"__type__": "date", "year": 1990, "month": 4, "day": 1})
    );
}

#[test]
fn encode_datetime_fields_inline() {
    let dt = NaiveDate::from_ymd_opt(2021, 12, 31)
        .unwrap()
        .and_hms_nano_opt(23, 59, 58, 123_456_789)
        .unwrap();
    assert_eq!(
        encode(&Value::from(dt)).unwrap(),
        json!({
            "__type__": "datetime",
            "year": 2021, "month": 12, "day": 31,
            "hour": 23, "minute": 59, "second": 58,
            "sub_second": 123_456_789
        })
    );
}

// ============================================================================
// Enumerations
// ============================================================================

#[test]
fn encode_enum_by_symbolic_name() {
    assert_eq!(
        encode(&Value::enumeration(Color::Red)).unwrap(),
        json!({"__type__": "Color", "__data__": "RED"})
    );
    assert_eq!(
        encode(&Value::enumeration(Food::Rice)).unwrap(),
        json!({"__type__": "Food", "__data__": "RICE"})
    );
}

#[test]
fn encode_enum_member_name_case_preserved() {
    assert_eq!(
        encode(&Value::from(EnumValue::of(Color::Blue))).unwrap(),
        json!({"__type__": "Color", "__data__": "Blue"})
    );
}

// ============================================================================
// Records
// ============================================================================

#[test]
fn encode_record_by_reflection() {
    assert_eq!(
        ordered().to_json_value(&User::value("f", "l")).unwrap(),
        json!({"__type__": "User", "first_name": "f", "last_name": "l"})
    );
}

#[test]
fn encode_record_fields_recursively() {
    let account = Account {
        owner: User::new("f", "l"),
        balance: 10,
        tags: vec!["vip".to_string()],
    };
    assert_eq!(
        ordered().to_json_value(&Value::object(account)).unwrap(),
        json!({
            "__type__": "Account",
            "owner": {"__type__": "User", "first_name": "f", "last_name": "l"},
            "balance": 10,
            "tags": ["vip"]
        })
    );
}

#[test]
fn encode_custom_hook_wins_over_reflection() {
    assert_eq!(
        ordered().to_json_value(&Value::object(Celsius(21.5))).unwrap(),
        json!({"__type__": "Celsius", "__data__": "21.5C"})
    );
}

#[test]
fn encode_hook_output_follows_configured_keys() {
    let config = CodecConfig::default()
        .with_type_key("$t")
        .with_data_key("$d");
    let codec = StrongJson::new(config, common::registry()).unwrap();
    assert_eq!(
        codec.to_json_value(&Value::object(Celsius(3.0))).unwrap(),
        json!({"$t": "Celsius", "$d": "3C"})
    );
}

#[test]
fn encode_with_custom_keys() {
    let config = CodecConfig::default()
        .with_type_key("kind")
        .with_data_key("payload");
    let codec = StrongJson::new(config, Registry::empty()).unwrap();
    assert_eq!(
        codec.to_json_value(&Value::tuple([true.into()])).unwrap(),
        json!({"kind": "tuple", "payload": [true]})
    );
    assert_eq!(
        codec.to_json_value(&abcd()).unwrap(),
        json!({
            "kind": "dict",
            "payload": [{"key": "a", "value": "b"}, {"key": "c", "value": "d"}]
        })
    );
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn encode_unregistered_record_reports_diagnostic() {
    let codec = StrongJson::new(CodecConfig::default(), Registry::empty()).unwrap();
    let (json, diagnostics) = codec
        .to_json_value_with_diagnostics(&User::value("f", "l"))
        .unwrap();
    assert_eq!(json["__type__"], "User");
    assert_eq!(
        diagnostics,
        vec![Diagnostic::UnregisteredType {
            type_name: "User".to_string()
        }]
    );
}

#[test]
fn encode_unregistered_record_reported_once_per_call() {
    let codec = StrongJson::new(CodecConfig::default(), Registry::empty()).unwrap();
    let value = Value::list([User::value("a", "b"), User::value("c", "d")]);
    let (_, diagnostics) = codec.to_json_value_with_diagnostics(&value).unwrap();
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn encode_registered_record_reports_nothing() {
    let (_, diagnostics) = ordered()
        .to_json_value_with_diagnostics(&Value::object(Tracked {
            name: "t".to_string(),
            via_hook: false,
        }))
        .unwrap();
    assert!(diagnostics.is_empty());
}

// ============================================================================
// Guards
// ============================================================================

#[test]
fn encode_reserved_field_name_rejected() {
    let err = encode(&Value::object(Clashing)).unwrap_err();
    assert!(matches!(
        err,
        StrongJsonError::ReservedField { ref type_name, ref field }
            if type_name == "Clashing" && field == "__type__"
    ));
}

#[test]
fn encode_depth_limit() {
    let config = CodecConfig::default().with_max_depth(3);
    let codec = StrongJson::new(config, Registry::empty()).unwrap();

    let shallow = Value::list([Value::list([1.into()])]);
    assert!(codec.to_json_value(&shallow).is_ok());

    let deep = Value::list([Value::list([Value::list([1.into()])])]);
    assert!(matches!(
        codec.to_json_value(&deep),
        Err(StrongJsonError::DepthLimitExceeded { limit: 3 })
    ));
}

#[test]
fn encode_shared_record_twice_is_not_a_cycle() {
    let user = ObjectRef::new(User::new("f", "l"));
    let value = Value::list([Value::from(user.clone()), Value::from(user)]);
    let json = ordered().to_json_value(&value).unwrap();
    assert_eq!(json[0], json[1]);
}

#[test]
fn encode_cycle_detected() {
    let node = common::Node::new("root");
    node.link(Value::from(ObjectRef::from_arc(node.clone())));
    let err = encode(&Value::from(ObjectRef::from_arc(node.clone()))).unwrap_err();
    node.unlink();
    assert!(matches!(
        err,
        StrongJsonError::CycleDetected { ref type_name } if type_name == "Node"
    ));
}

#[test]
fn encode_ndarray_rank_bounded_by_depth_limit() {
    let array = strong_json::NdArray::new(vec![1, 1, 1, 1], vec![1.0]).unwrap();
    let codec = StrongJson::new(CodecConfig::default().with_max_depth(3), Registry::empty())
        .unwrap();
    let err = codec.to_json(&Value::object(array.clone())).unwrap_err();
    assert!(matches!(err, StrongJsonError::DepthLimitExceeded { limit: 3 }));

    let json = ordered().to_json_value(&Value::object(array)).unwrap();
    assert_eq!(json["__data__"]["values"], json!([[[[1.0]]]]));
}

#[test]
fn encode_without_adapters_falls_back_to_reflection() {
    let array = strong_json::NdArray::vector(vec![1.0, 2.0]);
    let codec =
        StrongJson::with_adapters(CodecConfig::default(), Registry::empty(), AdapterSet::empty())
            .unwrap();
    let json = codec.to_json_value(&Value::object(array)).unwrap();
    assert_eq!(json["__type__"], "ndarray");
    assert_eq!(json["shape"], json!([2]));
    assert_eq!(json["data"], json!([1.0, 2.0]));
}
