//! Tests for single-object copies: clones, projections and copies into
//! existing destinations

use chrono::{NaiveDate, TimeZone, Utc};
use objkopy::codec::Bytes;
use objkopy::{copyable, copyable_enum, Copier, ErrorKind, Introspector, TypeCategory};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Bar {
    bar_id: i64,
    bar_name: String,
}

copyable!(Bar {
    fields {
        bar_id: i64;
        bar_name: String;
    }
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Foo {
    id: i64,
    name: String,
    bar: Bar,
    bars: Vec<Bar>,
    scores: HashMap<String, i32>,
}

copyable!(Foo {
    fields {
        id: i64;
        name: String;
        bar: Bar;
        bars: Vec<Bar>;
        scores: HashMap<String, i32>;
    }
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct BarDto {
    bar_id: i64,
    bar_name: String,
}

copyable!(BarDto {
    fields {
        bar_id: i64;
        bar_name: String;
    }
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct FooDto {
    id: i64,
    name: String,
    bar: BarDto,
    bars: Vec<BarDto>,
}

copyable!(FooDto {
    exclude ["id"];
    fields {
        id: i64;
        name: String;
        bar: BarDto;
        bars: Vec<BarDto>;
    }
});

fn sample_foo() -> Foo {
    Foo {
        id: 42,
        name: "foo".to_string(),
        bar: Bar {
            bar_id: 1,
            bar_name: "first".to_string(),
        },
        bars: vec![
            Bar {
                bar_id: 2,
                bar_name: "second".to_string(),
            },
            Bar {
                bar_id: 3,
                bar_name: "third".to_string(),
            },
        ],
        scores: HashMap::from([("a".to_string(), 1), ("b".to_string(), 2)]),
    }
}

#[test]
fn test_copy_is_equal_and_independent() {
    let source = sample_foo();
    let copy = Copier::new().copy(&source).expect("copy should succeed");

    assert_eq!(copy, source);
    assert_ne!(copy.name.as_ptr(), source.name.as_ptr());
    assert_ne!(copy.bar.bar_name.as_ptr(), source.bar.bar_name.as_ptr());
    assert_ne!(copy.bars.as_ptr(), source.bars.as_ptr());
    for (a, b) in copy.bars.iter().zip(&source.bars) {
        assert_ne!(a.bar_name.as_ptr(), b.bar_name.as_ptr());
    }
}

#[test]
fn test_mutating_copy_leaves_source_alone() {
    let source = sample_foo();
    let mut copy = Copier::new().copy(&source).expect("copy should succeed");

    copy.bar.bar_name.push_str(" changed");
    copy.bars.clear();
    copy.scores.insert("c".to_string(), 3);

    assert_eq!(source, sample_foo());
}

#[test]
fn test_null_source() {
    let err = Copier::new().copy(None::<&Foo>).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NullSource);
    assert!(err.is_usage_error());
}

#[test]
fn test_cross_type_projection_respects_exclusions() {
    let source = sample_foo();
    let dto: FooDto = Copier::new().copy_as(&source).expect("projection should succeed");

    assert_eq!(dto.id, 0);
    assert_eq!(dto.name, "foo");
    assert_eq!(dto.bar.bar_name, "first");
    assert_eq!(dto.bar.bar_id, 1);
    assert_eq!(dto.bars.len(), 2);
    assert_eq!(dto.bars[1].bar_name, "third");
    assert_ne!(dto.bars[0].bar_name.as_ptr(), source.bars[0].bar_name.as_ptr());
}

#[test]
fn test_unmatched_fields_are_ignored() {
    let dto = FooDto {
        id: 5,
        name: "dto".to_string(),
        ..FooDto::default()
    };
    let foo: Foo = Copier::new().copy_as(&dto).expect("projection should succeed");

    // Foo does not exclude id
    assert_eq!(foo.id, 5);
    assert_eq!(foo.name, "dto");
    assert!(foo.scores.is_empty());
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Counter {
    label: String,
    count: i64,
}

copyable!(Counter {
    fields {
        label: String;
        count: i64;
    }
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct SmallCounter {
    label: String,
    count: i32,
}

copyable!(SmallCounter {
    fields {
        label: String;
        count: i32;
    }
});

#[test]
fn test_copy_into_existing_destination() {
    let source = Counter {
        label: "hits".to_string(),
        count: 3,
    };
    let mut dest = Counter {
        label: "old".to_string(),
        count: 99,
    };

    Copier::new()
        .copy_into(&source, &mut dest)
        .expect("copy into should succeed");
    assert_eq!(dest, source);
}

#[test]
fn test_copy_into_null_destination() {
    let source = Counter::default();
    let err = Copier::new()
        .copy_into(&source, None::<&mut Counter>)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NullDestination);
}

#[test]
fn test_failed_copy_into_leaves_destination_untouched() {
    let source = SmallCounter {
        label: "new".to_string(),
        count: 1,
    };
    let mut dest = Counter {
        label: "old".to_string(),
        count: 7,
    };
    // i32 widens to i64, so this direction works
    Copier::new()
        .copy_into(&source, &mut dest)
        .expect("widening copy should succeed");
    assert_eq!(dest.count, 1);

    let source = Counter {
        label: "newer".to_string(),
        count: 2,
    };
    let mut small = SmallCounter {
        label: "old".to_string(),
        count: 7,
    };
    let err = Copier::new().copy_into(&source, &mut small).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Assignment);
    assert!(err.to_string().contains("count"));
    assert_eq!(small.label, "old");
    assert_eq!(small.count, 7);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Session {
    token: String,
}

copyable!(Session {
    construct || None;
    fields {
        token: String;
    }
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Token {
    token: String,
}

copyable!(Token {
    construct || Some(Token { token: "unset".to_string() });
    fields {
        token: String;
    }
});

#[test]
fn test_uninstantiable_destination() {
    let source = Session {
        token: "abc".to_string(),
    };
    let err = Copier::new().copy(&source).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Uninstantiable);
}

#[test]
fn test_custom_constructor() {
    let source = Session {
        token: "abc".to_string(),
    };
    let token: Token = Copier::new().copy_as(&source).expect("copy should succeed");
    assert_eq!(token.token, "abc");
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Entity {
    id: u64,
    created: Option<NaiveDate>,
}

copyable!(Entity {
    methods ["touch"];
    fields {
        id: u64;
        created: Option<NaiveDate>;
    }
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Customer {
    email: String,
    entity: Entity,
}

copyable!(Customer {
    extends entity: Entity;
    fields {
        email: String;
    }
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct FlatCustomer {
    id: u64,
    email: String,
    created: Option<NaiveDate>,
}

copyable!(FlatCustomer {
    fields {
        id: u64;
        email: String;
        created: Option<NaiveDate>;
    }
});

#[test]
fn test_inherited_fields_are_copied() {
    let customer = Customer {
        email: "a@example.com".to_string(),
        entity: Entity {
            id: 10,
            created: NaiveDate::from_ymd_opt(2024, 2, 29),
        },
    };

    let flat: FlatCustomer = Copier::new().copy_as(&customer).expect("copy should succeed");
    assert_eq!(flat.id, 10);
    assert_eq!(flat.email, "a@example.com");
    assert_eq!(flat.created, NaiveDate::from_ymd_opt(2024, 2, 29));

    let back: Customer = Copier::new().copy_as(&flat).expect("copy should succeed");
    assert_eq!(back, customer);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Versioned {
    version: u32,
}

copyable!(Versioned {
    constants {
        VERSION: u32 = 7;
    }
    fields {
        version: u32;
    }
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Pinned {
    label: String,
}

copyable!(Pinned {
    constants {
        VERSION: u32 = 1;
    }
    fields {
        label: String;
    }
});

#[test]
fn test_constants_are_never_copied() {
    let plan = Copier::new().plan::<Versioned, Versioned>();
    assert_eq!(plan.field_names(), vec!["version"]);

    let copy = Copier::new()
        .copy(&Versioned { version: 3 })
        .expect("copy should succeed");
    assert_eq!(copy.version, 3);
    assert_eq!(Versioned::VERSION, 7);

    // A destination constant never matches a source field
    let source = Versioned { version: 4 };
    let pinned: Pinned = Copier::new().copy_as(&source).expect("copy should succeed");
    assert_eq!(pinned, Pinned::default());
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Record {
    uid: Uuid,
    owner: Option<Uuid>,
    seen_at: Option<chrono::DateTime<Utc>>,
    payload: Bytes,
    note: Option<String>,
    ratio: f64,
    limit: Option<f64>,
}

copyable!(Record {
    fields {
        uid: Uuid;
        owner: Option<Uuid>;
        seen_at: Option<chrono::DateTime<Utc>>;
        payload: Bytes;
        note: Option<String>;
        ratio: f64;
        limit: Option<f64>;
    }
});

#[test]
fn test_wrapper_values_are_copied() {
    let source = Record {
        uid: Uuid::new_v4(),
        owner: Some(Uuid::new_v4()),
        seen_at: Some(Utc.with_ymd_and_hms(2023, 5, 1, 12, 30, 0).unwrap()),
        payload: Bytes::from(vec![0, 1, 2, 254, 255]),
        note: None,
        ratio: 0.1 + 0.2,
        limit: Some(1e-300),
    };

    let copy = Copier::new().copy(&source).expect("copy should succeed");
    assert_eq!(copy, source);
    assert_eq!(copy.ratio.to_bits(), source.ratio.to_bits());
    assert_ne!(copy.payload.as_ptr(), source.payload.as_ptr());
}

#[test]
fn test_non_finite_floats_are_copied() {
    let source = Record {
        ratio: f64::INFINITY,
        limit: Some(f64::NAN),
        ..Record::default()
    };

    let copy = Copier::new().copy(&source).expect("copy should succeed");
    assert_eq!(copy.ratio, f64::INFINITY);
    assert!(copy.limit.expect("limit should be set").is_nan());
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Inner {
    value: f64,
}

copyable!(Inner {
    fields {
        value: f64;
    }
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Readings {
    top: f64,
    list: Vec<f64>,
    inner: Inner,
}

copyable!(Readings {
    fields {
        top: f64;
        list: Vec<f64>;
        inner: Inner;
    }
});

#[test]
fn test_finite_floats_in_containers_and_nested_records() {
    let source = Readings {
        top: 1.5,
        list: vec![0.1, -2.0, f64::MAX],
        inner: Inner { value: 1e-310 },
    };
    let copy = Copier::new().copy(&source).expect("copy should succeed");
    assert_eq!(copy, source);
}

#[test]
fn test_non_finite_float_in_container_fails_the_copy() {
    let source = Readings {
        top: f64::NAN,
        list: vec![1.0, f64::NAN],
        ..Readings::default()
    };
    let err = Copier::new().copy(&source).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SerializationFailure);
    assert!(err.to_string().contains("'list'"));
}

#[test]
fn test_non_finite_float_in_nested_record_fails_the_copy() {
    let source = Readings {
        inner: Inner {
            value: f64::INFINITY,
        },
        ..Readings::default()
    };
    let err = Copier::new().copy(&source).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SerializationFailure);
    assert!(err.to_string().contains("'inner'"));
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
enum Priority {
    #[default]
    Normal,
    Urgent,
}

copyable_enum!(Priority { Normal, Urgent });

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Shipment {
    carrier: Option<Bar>,
    priority: Option<Priority>,
    fallback: Option<Priority>,
}

copyable!(Shipment {
    fields {
        carrier: Option<Bar>;
        priority: Option<Priority>;
        fallback: Option<Priority>;
    }
});

#[test]
fn test_optional_records_and_enums() {
    let source = Shipment {
        carrier: Some(Bar {
            bar_id: 8,
            bar_name: "carrier".to_string(),
        }),
        priority: Some(Priority::Urgent),
        fallback: None,
    };
    let copy = Copier::new().copy(&source).expect("copy should succeed");
    assert_eq!(copy, source);

    let empty = Copier::new()
        .copy(&Shipment::default())
        .expect("copy should succeed");
    assert_eq!(empty.carrier, None);
    assert_eq!(empty.priority, None);
}

#[test]
fn test_optional_fields_keep_their_category() {
    let introspector = Introspector::new();
    assert_eq!(introspector.classify::<Option<Bar>>(), TypeCategory::Object);
    assert_eq!(
        introspector.classify::<Option<Priority>>(),
        TypeCategory::Enum
    );
    assert_eq!(introspector.classify::<Option<i64>>(), TypeCategory::Boxed);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Document {
    items: Vec<serde_json::Value>,
    tags: Vec<String>,
}

copyable!(Document {
    fields {
        items: Vec<serde_json::Value>;
        tags: Vec<String>;
    }
});

#[test]
fn test_dynamic_containers() {
    let source = Document {
        items: vec![serde_json::json!({"k": 1}), serde_json::json!([1, 2])],
        tags: Vec::new(),
    };
    let copy = Copier::new().copy(&source).expect("copy should succeed");
    assert_eq!(copy, source);

    let empty = Document::default();
    let copy = Copier::new().copy(&empty).expect("copy should succeed");
    assert!(copy.items.is_empty());
    assert!(copy.tags.is_empty());
}

#[test]
fn test_plan_is_deterministic() {
    let copier = Copier::new();
    let first = copier.plan::<Foo, FooDto>();
    let second = copier.plan::<Foo, FooDto>();
    assert_eq!(first, second);
    assert_eq!(first.field_names(), vec!["name", "bar", "bars"]);
}

#[test]
fn test_copier_is_shareable_across_threads() {
    let copier = Arc::new(Copier::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let copier = Arc::clone(&copier);
            std::thread::spawn(move || {
                let mut foo = sample_foo();
                foo.id = i;
                copier.copy(&foo).expect("copy should succeed").id
            })
        })
        .collect();

    let mut ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1, 2, 3]);
}
