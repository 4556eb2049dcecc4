use etckit::date::{self, DateInput, Floor};
use etckit::inherit::{method, Methods};
use etckit::{
    deep_get, deep_set, ensure_array, ensure_time, inherit, namespace, ordinal, rehash, unwhite,
    Class, Grouped, RehashOptions,
};
use serde_json::{json, Map, Value};

#[test]
fn unwhite_ignores_padding() {
    for s in ["a b", "one\ttwo\nthree", "x", "  spaced   out  "] {
        let padded = format!("  {}  ", s);
        assert_eq!(unwhite(&padded), unwhite(s));
    }
    assert!(unwhite("").is_empty());
}

#[test]
fn deep_set_then_get_returns_value() {
    let paths = [
        "a",
        "a.b",
        "a[\"b\"].c",
        "a.b['c'].d[e]",
        ".a1.b2[c3][\"d4\"].e5",
    ];

    for (i, path) in paths.iter().enumerate() {
        let mut root = json!({});
        deep_set(&mut root, path, json!(i)).unwrap();
        assert_eq!(deep_get(&root, path), Some(&json!(i)), "path {}", path);
    }
}

#[test]
fn namespace_returns_same_container() {
    let mut root = json!({});
    let first: *const Map<String, Value> = namespace(&mut root, "app.models.user");
    let second: *const Map<String, Value> = namespace(&mut root, "app.models.user");
    assert_eq!(first, second);
    assert!(root["app"]["models"].is_object());
}

#[test]
fn ensure_array_coercions() {
    assert!(ensure_array(None).is_empty());
    assert_eq!(ensure_array(Some(json!([1, 2]))), vec![json!(1), json!(2)]);
    assert_eq!(ensure_array(Some(json!(5))), vec![json!(5)]);
}

#[test]
fn ensure_time_coercions() {
    let err = ensure_time(DateInput::from("not a date")).unwrap_err();
    assert_eq!(err.code.as_str(), "date.invalid");
    assert_eq!(err.details["input"], "not a date");

    assert_eq!(ensure_time(DateInput::Millis(1_700_000_000_000)).unwrap(), 1_700_000_000_000);

    let epoch = date::from_millis(0).unwrap();
    assert_eq!(ensure_time(DateInput::Date(epoch)).unwrap(), 0);
}

#[test]
fn floor_cascades() {
    let input = date::parse_date("2024-03-15T10:30:00").unwrap();

    let month = date::floor_date(Floor::Month, input);
    assert_eq!(
        month.naive_local().format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
        "2024-03-01T00:00:00.000"
    );

    let hour = date::floor_date(Floor::Hour, input);
    assert_eq!(
        hour.naive_local().format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
        "2024-03-15T10:00:00.000"
    );
}

#[test]
fn rehash_groups_in_source_order() {
    let source = json!({
        "a": {"k": "x", "id": 1},
        "b": {"k": "x", "id": 2},
        "c": {"k": "y", "id": 3}
    });
    let Value::Object(source) = source else {
        unreachable!()
    };

    let result = rehash(source, "k", RehashOptions::default());

    assert_eq!(
        result["x"],
        Grouped::Group(vec![json!({"k": "x", "id": 1}), json!({"k": "x", "id": 2})])
    );
    assert_eq!(result["y"], Grouped::Single(json!({"k": "y", "id": 3})));
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "x": [{"k": "x", "id": 1}, {"k": "x", "id": 2}],
            "y": {"k": "y", "id": 3}
        })
    );
}

#[test]
fn ordinal_examples() {
    assert_eq!(ordinal(1), "st");
    assert_eq!(ordinal(11), "th");
    assert_eq!(ordinal(22), "nd");
    assert_eq!(ordinal(-3), "rd");
}

#[test]
fn inherited_instances_share_parent_capabilities() {
    let shape = Class::new("Shape", |this, _| {
        this.set("sides", json!(0));
        Ok(())
    });
    shape.define("kind", |_, _| Ok(json!("shape")));
    shape.define("area", |_, _| Ok(json!(0)));

    let square = Class::new("Square", |this, args| {
        this.set("side", args.first().cloned().unwrap_or(json!(1)));
        Ok(())
    });
    let mut overrides = Methods::new();
    overrides.insert("kind".to_string(), method(|_, _| Ok(json!("square"))));
    inherit(&square, &shape, Some(overrides)).unwrap();

    let mut sq = square.construct(&[json!(3)]).unwrap();
    assert!(sq.is_instance_of(&shape));
    assert_eq!(sq.call("area", &[]).unwrap(), json!(0));
    assert_eq!(sq.call("kind", &[]).unwrap(), json!("square"));

    let mut plain = shape.construct(&[]).unwrap();
    assert_eq!(plain.call("kind", &[]).unwrap(), json!("shape"));
}
