//! Sample records used by the demo

use serde::{Deserialize, Serialize};

/// Lifecycle of a [`Foo`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Draft,
    Active,
    Archived,
}

crate::copyable_enum!(Status { Draft, Active, Archived });

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    pub bar_id: i64,
    pub same_name_attribute: String,
    pub bar_name: String,
}

crate::copyable!(Bar {
    fields {
        bar_id: i64;
        same_name_attribute: String;
        bar_name: String;
    }
});

impl Bar {
    pub fn new(bar_id: i64, bar_name: impl Into<String>) -> Self {
        Self {
            bar_id,
            same_name_attribute: String::new(),
            bar_name: bar_name.into(),
        }
    }
}

/// Record whose identifier is never copied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Foo {
    pub foo_id: i64,
    pub foo_name: String,
    pub same_name_attribute: String,
    pub status: Status,
    pub bar: Bar,
    pub bars: Vec<Bar>,
}

crate::copyable!(Foo {
    exclude ["foo_id"];
    constants {
        SERIAL_VERSION: i64 = 4_390_538_007_183_032_023;
    }
    fields {
        foo_id: i64;
        foo_name: String;
        same_name_attribute: String;
        status: Status;
        bar: Bar;
        bars: Vec<Bar>;
    }
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BarView {
    pub bar_id: Option<i64>,
    pub bar_name: String,
}

crate::copyable!(BarView {
    fields {
        bar_id: Option<i64>;
        bar_name: String;
    }
});

/// Read-only projection of a [`Foo`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooView {
    pub foo_name: String,
    pub status: String,
    pub bar: BarView,
    pub bars: Vec<BarView>,
}

crate::copyable!(FooView {
    fields {
        foo_name: String;
        status: String;
        bar: BarView;
        bars: Vec<BarView>;
    }
});
