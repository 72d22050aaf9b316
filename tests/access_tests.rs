use std::collections::{BTreeMap, HashMap};

use valuepath::{
    find, find_mut, get, must_find, must_get, must_set, reflect_struct, set, to_text, Accessor,
    Error, Separator,
};
use yare::parameterized;

#[derive(Debug, Default, Clone, PartialEq)]
struct Leaf {
    string: String,
    number: i64,
}

reflect_struct!(Leaf { string as "String", number as "Number" });

#[derive(Debug, Default)]
struct Base {
    id: u32,
    name: String,
}

reflect_struct!(Base { id as "ID", name as "Name" });

#[derive(Debug, Default)]
struct Root {
    name: String,
    map: HashMap<String, Leaf>,
    slice: Vec<Leaf>,
    array: [u8; 3],
    nested: Vec<HashMap<String, Leaf>>,
    pointer: Option<Box<Leaf>>,
    maybe: Option<i32>,
    ids: BTreeMap<u32, String>,
    base: Base,
}

reflect_struct!(Root {
    name as "Name",
    map as "Map",
    slice as "Slice",
    array as "Array",
    nested as "Nested",
    pointer as "Pointer",
    maybe as "Maybe",
    ids as "IDs",
    #[embed] base as "Base",
});

fn leaf(string: &str, number: i64) -> Leaf {
    Leaf {
        string: string.to_string(),
        number,
    }
}

fn fixture() -> Root {
    Root {
        name: "root".to_string(),
        map: HashMap::from([
            ("One".to_string(), leaf("one", 1)),
            ("Three".to_string(), leaf("three", 3)),
        ]),
        slice: vec![leaf("a", 0), leaf("b", 1), leaf("c", 2), leaf("d", 3)],
        array: [1, 2, 3],
        nested: vec![
            HashMap::new(),
            HashMap::from([("Key".to_string(), leaf("deep", 42))]),
        ],
        pointer: None,
        maybe: None,
        ids: BTreeMap::from([(7, "seven".to_string())]),
        base: Base {
            id: 9,
            name: "base".to_string(),
        },
    }
}

fn same_variant(err: &Error, expected: &Error) -> bool {
    std::mem::discriminant(err) == std::mem::discriminant(expected)
}

#[parameterized(
    name = { "Name", "root" },
    map_entry_field = { "Map[Three].String", "three" },
    map_entry_number = { "Map[One].Number", "1" },
    slice_element_field = { "Slice[1].String", "b" },
    whole_slice_element = { "Slice[3]", "{String=d,Number=3}" },
    array_element = { "Array[2]", "3" },
    whole_array = { "Array", "1,2,3" },
    key_after_key = { "Nested[1][Key].String", "deep" },
    quoted_key = { "Nested[1][\"Key\"].Number", "42" },
    converted_map_key = { "IDs[7]", "seven" },
    promoted_field = { "ID", "9" },
    own_field_shadows_promoted = { "Name", "root" },
    embedded_member = { "Base.Name", "base" },
    nil_pointer_itself = { "Maybe", "" },
)]
fn test_find_ok(path: &str, expected: &str) {
    let root = fixture();
    let found = find(path, &root).expect("Failed to find value");
    assert_eq!(to_text(found).unwrap(), expected);
}

#[test]
fn test_empty_path_is_the_root() {
    let root = fixture();
    assert!(find("", &root).unwrap().is::<Root>());
}

#[parameterized(
    index_past_slice = { "Slice[9]", Error::OutOfRange { index: 9, len: 4 } },
    index_past_array = { "Array[3]", Error::OutOfRange { index: 3, len: 3 } },
    non_numeric_index = { "Slice[x]", Error::InvalidPath(String::new()) },
    negative_index = { "Slice[-1]", Error::InvalidPath(String::new()) },
    missing_map_key = { "Map[Two]", Error::KeyNotFound(String::new()) },
    unconvertible_map_key = { "IDs[seven]", Error::InvalidPath(String::new()) },
    missing_field = { "Missing", Error::InvalidPath(String::new()) },
    field_of_scalar = { "Name.Inner", Error::InvalidPath(String::new()) },
    key_of_struct = { "Base[0]", Error::InvalidPath(String::new()) },
    key_of_scalar = { "Name[0]", Error::InvalidPath(String::new()) },
    through_nil_pointer = { "Pointer.String", Error::InvalidPath(String::new()) },
    malformed = { "Slice..String", Error::InvalidPath(String::new()) },
    unterminated = { "Map[Three", Error::InvalidPath(String::new()) },
)]
fn test_find_err(path: &str, expected: Error) {
    let root = fixture();
    let err = find(path, &root).unwrap_err();
    assert!(same_variant(&err, &expected), "unexpected error: {err}");
    if let Error::OutOfRange { .. } = expected {
        assert_eq!(err, expected);
    }
}

#[test]
fn test_pointers_are_followed() {
    let mut root = fixture();
    root.pointer = Some(Box::new(leaf("boxed", 5)));
    assert_eq!(to_text(find("Pointer.String", &root).unwrap()).unwrap(), "boxed");
}

#[test]
fn test_get_downcasts() {
    let root = fixture();
    assert_eq!(
        get("Slice[0].Number", &root).unwrap().downcast_ref::<i64>(),
        Some(&0)
    );
    assert_eq!(
        get("Map[Three]", &root).unwrap().downcast_ref::<Leaf>(),
        Some(&leaf("three", 3))
    );
    assert!(get("Slice[0].Number", &root)
        .unwrap()
        .downcast_ref::<i32>()
        .is_none());
}

#[test]
fn test_set_then_get() {
    let mut root = fixture();
    set("Slice[3].String", "Foo", &mut root).unwrap();
    assert_eq!(
        get("Slice[3].String", &root).unwrap().downcast_ref::<String>(),
        Some(&"Foo".to_string())
    );
}

#[parameterized(
    name = { "Name", "renamed", "renamed" },
    map_entry = { "Map[Three].Number", "-5", "-5" },
    array_element = { "Array[0]", "200", "200" },
    promoted = { "ID", "10", "10" },
    embedded_member = { "Base.Name", "b", "b" },
    key_after_key = { "Nested[1][Key].String", "changed", "changed" },
    nil_pointer_leaf = { "Maybe", "12", "12" },
    map_value_by_converted_key = { "IDs[7]", "sieben", "sieben" },
)]
fn test_set_ok(path: &str, text: &str, expected: &str) {
    let mut root = fixture();
    set(path, text, &mut root).expect("Failed to set value");
    assert_eq!(to_text(find(path, &root).unwrap()).unwrap(), expected);
}

#[parameterized(
    whole_slice = { "Slice", "x", Error::UnsupportedValue(String::new()) },
    whole_struct = { "Map[One]", "{Number=2}", Error::UnsupportedValue(String::new()) },
    pointer_to_struct = { "Pointer", "{String=x}", Error::UnsupportedValue(String::new()) },
    through_nil_pointer = { "Pointer.String", "x", Error::InvalidPath(String::new()) },
    overflow = { "Array[0]", "256", Error::Parse { text: String::new(), target: "", reason: String::new() } },
    bad_number = { "Map[One].Number", "one", Error::Parse { text: String::new(), target: "", reason: String::new() } },
    missing_key = { "Map[Two].Number", "2", Error::KeyNotFound(String::new()) },
)]
fn test_set_err_leaves_root_unchanged(path: &str, text: &str, expected: Error) {
    let mut root = fixture();
    let err = set(path, text, &mut root).unwrap_err();
    assert!(same_variant(&err, &expected), "unexpected error: {err}");

    assert_eq!(root.array, [1, 2, 3]);
    assert_eq!(root.map["One"], leaf("one", 1));
    assert_eq!(root.map["Three"], leaf("three", 3));
    assert!(root.pointer.is_none());
    assert_eq!(root.slice.len(), 4);
}

#[test]
fn test_set_through_allocated_pointer() {
    let mut root = fixture();
    root.pointer = Some(Box::default());
    set("Pointer.Number", "77", &mut root).unwrap();
    assert_eq!(root.pointer.map(|leaf| leaf.number), Some(77));
}

#[test]
fn test_find_mut_writes_in_place() {
    let mut root = fixture();
    *find_mut("Array[1]", &mut root)
        .unwrap()
        .downcast_mut::<u8>()
        .unwrap() = 20;
    assert_eq!(root.array, [1, 20, 3]);
}

#[parameterized(
    slash = { Separator::Slash, "Map[Three]/String" },
    custom = { Separator::Custom('>'), "Map[Three]>String" },
)]
fn test_accessor_with_separator(separator: Separator, path: &str) {
    let mut root = fixture();
    let accessor = Accessor::new(separator);
    accessor.set(path, "z", &mut root).unwrap();
    assert_eq!(root.map["Three"].string, "z");
    assert_eq!(
        accessor.get(path, &root).unwrap().downcast_ref::<String>(),
        Some(&"z".to_string())
    );
    assert!(accessor.find("Map[Three].String", &root).is_err());
}

#[test]
fn test_must_functions_return_on_success() {
    let mut root = fixture();
    must_set("Maybe", "3", &mut root);
    assert_eq!(root.maybe, Some(3));
    assert_eq!(must_get("Maybe", &root).downcast_ref::<Option<i32>>(), Some(&Some(3)));
    assert_eq!(to_text(must_find("Array[0]", &root)).unwrap(), "1");
}

#[test]
#[should_panic(expected = "Key not found")]
fn test_must_get_panics() {
    let root = fixture();
    must_get("Map[Two]", &root);
}

#[test]
#[should_panic(expected = "Invalid path")]
fn test_must_find_panics() {
    let root = fixture();
    must_find("Missing", &root);
}

#[test]
#[should_panic(expected = "Cannot parse")]
fn test_must_set_panics() {
    let mut root = fixture();
    must_set("Array[0]", "-1", &mut root);
}
