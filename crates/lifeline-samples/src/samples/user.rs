#![forbid(unsafe_code)]

//! Derived name stream over a user model.
//!
//! The model wraps a whole user value in one stream and exposes derived
//! streams for individual fields. The factory carries the initial user as a
//! construction argument.

use lifeline::prelude::*;
use tracing::info;

use super::SampleResult;

#[derive(Clone, Debug, PartialEq)]
struct User {
    name: String,
    age: u32,
}

struct UserModel {
    user: StateStream<User>,
    user_name: StateStream<String>,
    user_age: StateStream<u32>,
}

impl UserModel {
    fn new(user: User) -> Self {
        let user = StateStream::with_value(user);
        let user_name = user.map(|u: &User| u.name.clone());
        let user_age = user.map(|u: &User| u.age);
        Self {
            user,
            user_name,
            user_age,
        }
    }

    fn set_name(&self, name: &str) {
        if let Some(mut user) = self.user.value() {
            user.name = name.to_string();
            self.user.set_value(user);
        }
    }

    fn set_age(&self, age: u32) {
        if let Some(mut user) = self.user.value() {
            user.age = age;
            self.user.set_value(user);
        }
    }
}

impl ViewModel for UserModel {}

pub fn run() -> SampleResult {
    info!("-- user sample --");

    let store = ViewModelStore::new();
    let owner = LifecycleRegistry::new();
    owner.handle_event(Event::Create)?;
    owner.handle_event(Event::Start)?;
    owner.handle_event(Event::Resume)?;

    // The initial user travels through the factory, not a global default.
    let initial = User {
        name: "alice".to_string(),
        age: 18,
    };
    let factory = FnFactory::new(move || Ok(UserModel::new(initial.clone())));
    let model = store.get::<UserModel, _>("user_screen", &factory)?;

    model
        .borrow()
        .user_name
        .observe(&owner, |name| info!(%name, "name view updated"))?;
    model
        .borrow()
        .user_age
        .observe(&owner, |age| info!(age, "age view updated"))?;

    // Click handler: toggle the name, bump the age.
    let current = model.borrow().user_name.value();
    let next = if current.as_deref() == Some("bob") {
        "alice"
    } else {
        "bob"
    };
    model.borrow().set_name(next);
    model.borrow().set_age(19);

    info!(user = ?model.borrow().user.value(), "final user");

    store.clear("user_screen");
    Ok(())
}
