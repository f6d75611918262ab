//! Proptest generators for property-based testing.

use proptest::prelude::*;

use dualwrite_core::{relations, types, Condition, Entry, Tuple};

/// Generate an identifier safe inside every encoded form.
pub fn id() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9_-]{0,15}".prop_map(String::from)
}

/// Generate a group resource such as `dashboard.grafana.app/dashboards`.
pub fn group_resource() -> impl Strategy<Value = String> {
    ("[a-z]{1,8}\\.[a-z]{1,8}", "[a-z]{1,10}", prop::option::of("[a-z]{1,8}")).prop_map(
        |(group, resource, sub)| match sub {
            Some(sub) => format!("{group}/{resource}/{sub}"),
            None => format!("{group}/{resource}"),
        },
    )
}

/// Generate a subject entry: a user or a team member userset.
pub fn subject() -> impl Strategy<Value = Entry> {
    prop_oneof![id().prop_map(Entry::user), id().prop_map(Entry::team_members)]
}

/// Generate an object entry.
pub fn object() -> impl Strategy<Value = Entry> {
    (
        prop_oneof![
            Just(types::FOLDER),
            Just(types::TEAM),
            Just(types::RESOURCE),
        ],
        id(),
    )
        .prop_map(|(kind, id)| Entry::new(kind, id))
}

/// Generate a relation.
pub fn relation() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(relations::GET),
        Just(relations::UPDATE),
        Just(relations::CREATE),
        Just(relations::DELETE),
        Just(relations::PARENT),
        Just(relations::TEAM_MEMBER),
    ]
    .prop_map(String::from)
}

/// Generate an unconditioned tuple.
pub fn tuple() -> impl Strategy<Value = Tuple> {
    (subject(), relation(), object())
        .prop_map(|(subject, relation, object)| Tuple::new(&subject, relation, &object))
}

/// Generate a folder-resource grant with a non-empty condition.
pub fn folder_resource_tuple() -> impl Strategy<Value = Tuple> {
    (
        subject(),
        prop_oneof![Just(relations::GET), Just(relations::UPDATE)],
        id(),
        prop::collection::vec(group_resource(), 1..4),
    )
        .prop_map(|(subject, relation, folder, group_resources)| {
            Tuple::new(
                &subject,
                relations::folder_resource(relation),
                &Entry::folder(folder),
            )
            .with_condition(Condition::subresource_filter(group_resources))
        })
}
