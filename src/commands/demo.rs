//! Demo: batch copies, clones and a projection of the sample records

use super::model::{Bar, Foo, FooView, Status};
use crate::codec::{JsonBackend, SerializationBackend};
use crate::{Config, Copier};
use anyhow::{ensure, Context};
use std::collections::HashSet;
use tracing::info;

/// One titled block of demo output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: String,
}

impl Section {
    fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Run the demo and return its output sections
pub fn run(config: &Config) -> anyhow::Result<Vec<Section>> {
    let copier = Copier::from_config(config).context("Failed to build copier")?;
    let display = if config.pretty_json {
        JsonBackend::pretty()
    } else {
        JsonBackend::new()
    };
    let mut sections = Vec::new();

    let bars = create_bars(&["First bar name", "Second bar name", "Third bar name"]);

    // Lists
    let copy_bars = copier.copy_all(&bars)?;
    ensure!(
        copy_bars.as_ptr() != bars.as_ptr(),
        "It's the same collection!"
    );
    let bar_set: HashSet<Bar> = copier.copy_all_with(&copy_bars, HashSet::new)?;
    info!("Copied {} bars into a set of {}", copy_bars.len(), bar_set.len());
    sections.push(Section::new(
        "Copied bars",
        display.serialize(&copy_bars)?,
    ));

    // Objects
    let bar = copier.copy(&bars[0])?;
    ensure_distinct_text(&bar.bar_name, &bars[0].bar_name)?;

    let foo1 = Foo {
        foo_id: 1,
        foo_name: "this is a foo name".to_string(),
        same_name_attribute: String::new(),
        status: Status::Active,
        bar,
        bars,
    };
    let mut foo2 = copier.copy(&foo1)?;
    foo2.foo_name = "this is a new Foo name. The id was not copied because Foo excludes it, \
                     and every nested value is a new instance!"
        .to_string();
    foo2.bar.bar_name = "this is a new BarName".to_string();

    ensure!(
        foo1.bars.as_ptr() != foo2.bars.as_ptr(),
        "It's the same collection!"
    );
    for (original, copy) in foo1.bars.iter().zip(&foo2.bars) {
        ensure_distinct_text(&original.bar_name, &copy.bar_name)?;
    }

    let view: FooView = copier.copy_as(&foo1)?;

    sections.push(Section::new("Original foo", display.serialize(&foo1)?));
    sections.push(Section::new("Copied foo", display.serialize(&foo2)?));
    sections.push(Section::new("Foo view", display.serialize(&view)?));

    Ok(sections)
}

fn create_bars(names: &[&str]) -> Vec<Bar> {
    names
        .iter()
        .zip(1..)
        .map(|(name, id)| Bar::new(id, *name))
        .collect()
}

fn ensure_distinct_text(a: &str, b: &str) -> anyhow::Result<()> {
    ensure!(
        a.is_empty() || a.as_ptr() != b.as_ptr(),
        "It's the same object!"
    );
    Ok(())
}
