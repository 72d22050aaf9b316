use std::collections::BTreeMap;

use serde_json::json;
use valuepath::{
    reflect_opaque, reflect_struct, Accessor, Complex, Reflect, Separator, Serializable, Token,
};
use yare::parameterized;

#[derive(Default)]
struct Base {
    id: u32,
}

reflect_struct!(Base { id as "ID" });

#[derive(Default)]
struct Record {
    name: String,
    scores: Vec<Option<u8>>,
    limits: BTreeMap<u8, f64>,
    parent: Option<Box<Record>>,
    base: Base,
}

reflect_struct!(Record {
    name as "Name",
    scores as "Scores",
    limits as "Limits",
    parent as "Parent",
    #[embed] base as "Base",
});

#[derive(Default)]
struct Handle;

reflect_opaque!(Handle);

fn to_json(value: &dyn Reflect) -> serde_json::Value {
    serde_json::to_value(Serializable(value)).expect("Failed to serialize")
}

#[test]
fn test_scalars() {
    assert_eq!(to_json(&true), json!(true));
    assert_eq!(to_json(&-3i8), json!(-3));
    assert_eq!(to_json(&u64::MAX), json!(u64::MAX));
    assert_eq!(to_json(&2.5f64), json!(2.5));
    assert_eq!(to_json(&String::from("text")), json!("text"));
    assert_eq!(to_json(&'c'), json!("c"));
    assert_eq!(to_json(&Complex::new(1.0f64, 2.0)), json!("(1+2i)"));
}

#[test]
fn test_struct() {
    let record = Record {
        name: "child".to_string(),
        scores: vec![Some(1), None],
        limits: BTreeMap::from([(1, 0.5)]),
        parent: Some(Box::new(Record {
            name: "parent".to_string(),
            ..Record::default()
        })),
        base: Base { id: 3 },
    };
    assert_eq!(
        to_json(&record),
        json!({
            "Name": "child",
            "Scores": [1, null],
            "Limits": { "1": 0.5 },
            "Parent": {
                "Name": "parent",
                "Scores": [],
                "Limits": {},
                "Parent": null,
                "Base": { "ID": 0 },
            },
            "Base": { "ID": 3 },
        })
    );
}

#[test]
fn test_opaque_is_an_error() {
    assert!(serde_json::to_value(Serializable(&Handle)).is_err());
    assert!(serde_json::to_value(Serializable(&vec![Handle])).is_err());
}

#[parameterized(
    invalid = { Token::Invalid, "\"Invalid\"" },
    no_more = { Token::NoMore, "\"NoMore\"" },
    keyed_name = { Token::KeyedName, "\"KeyedName\"" },
)]
fn test_token_serde(token: Token, expected: &str) {
    assert_eq!(serde_json::to_string(&token).unwrap(), expected);
    assert_eq!(serde_json::from_str::<Token>(expected).unwrap(), token);
}

#[test]
fn test_accessor_serde() {
    let accessor = Accessor::new(Separator::Custom(':'));
    let value = serde_json::to_value(accessor).unwrap();
    assert_eq!(value, json!({ "separator": { "Custom": ":" } }));
    assert_eq!(serde_json::from_value::<Accessor>(value).unwrap(), accessor);
    assert_eq!(
        serde_json::from_value::<Accessor>(json!({ "separator": "Slash" })).unwrap(),
        Accessor::new(Separator::Slash)
    );
}
