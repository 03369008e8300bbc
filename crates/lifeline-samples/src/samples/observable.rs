#![forbid(unsafe_code)]

//! Property change notification on a user profile.
//!
//! Two holder shapes: a struct of standalone [`ObservableField`]s, and a
//! plain struct whose setters write their backing fields and notify through
//! an embedded [`ChangeNotifier`].

use lifeline::prelude::*;
use lifeline::PropertyId;
use tracing::info;

use super::SampleResult;

const NAME: PropertyId = "name";
const AGE: PropertyId = "age";
const MEMBER: PropertyId = "member";

/// Profile built from standalone observable fields.
#[derive(Clone)]
struct FieldProfile {
    name: ObservableField<String>,
    age: ObservableField<u32>,
    member: ObservableField<bool>,
}

impl FieldProfile {
    fn new(name: &str, age: u32, member: bool) -> Self {
        Self {
            name: ObservableField::new(NAME, name.to_string()),
            age: ObservableField::new(AGE, age),
            member: ObservableField::new(MEMBER, member),
        }
    }
}

/// Profile with private backing fields and an embedded notifier.
struct NotifyingProfile {
    name: String,
    age: u32,
    member: bool,
    notifier: ChangeNotifier,
}

impl NotifyingProfile {
    fn new(name: &str, age: u32, member: bool) -> Self {
        Self {
            name: name.to_string(),
            age,
            member,
            notifier: ChangeNotifier::new(),
        }
    }

    // Setters assign the backing field, then notify. Assigning through the
    // setter itself would recurse.
    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.notifier.notify_changed(NAME);
    }

    fn set_age(&mut self, age: u32) {
        self.age = age;
        self.notifier.notify_changed(AGE);
    }

    fn set_member(&mut self, member: bool) {
        self.member = member;
        self.notifier.notify_changed(MEMBER);
    }
}

/// Toggles the profile between two presets, like a click handler would.
fn on_click(profile: &mut NotifyingProfile) {
    if profile.name == "alice" {
        profile.set_name("bob");
        profile.set_age(23);
        profile.set_member(true);
    } else {
        profile.set_name("alice");
        profile.set_age(18);
        profile.set_member(false);
    }
}

pub fn run() -> SampleResult {
    info!("-- observable sample --");

    // Standalone fields: each listener re-reads the field it watches.
    let profile = FieldProfile::new("alice", 18, false);
    {
        let name = profile.name.clone();
        profile
            .name
            .add_listener(move |property| info!(property, value = %name.get(), "field changed"));
    }
    {
        let age = profile.age.clone();
        profile
            .age
            .add_listener(move |property| info!(property, value = age.get(), "field changed"));
    }
    profile.name.set("bob".to_string());
    profile.age.set(23);
    // Equal value, still notified.
    profile.age.set(23);
    profile.member.set(true);
    info!(
        name = %profile.name.get(),
        age = profile.age.get(),
        member = profile.member.get(),
        "field profile"
    );

    // Embedded notifier: one listener per property on the same holder.
    let mut holder = NotifyingProfile::new("alice", 18, false);
    for property in [NAME, AGE, MEMBER] {
        holder
            .notifier
            .add_listener(property, |property| info!(property, "property changed"));
    }
    on_click(&mut holder);
    info!(
        name = %holder.name,
        age = holder.age,
        member = holder.member,
        "after click"
    );
    on_click(&mut holder);
    info!(
        name = %holder.name,
        age = holder.age,
        member = holder.member,
        "after second click"
    );

    Ok(())
}
