//! Immutable state snapshots with deep-merge updates.
//!
//! The whole client state is one JSON object. A [`Snapshot`] is a cheap,
//! shareable handle to one version of it; [`Store::merge`] never touches an
//! existing snapshot but builds the next one from a copy, so a view that
//! still holds the previous snapshot keeps seeing exactly what it rendered.
//!
//! # Merge semantics
//!
//! For every key of the patch: if both the current value and the patch value
//! are objects, merge them recursively; otherwise the patch value replaces
//! the current one. Arrays are replaced, never concatenated. Keys absent
//! from the patch are left untouched.

use std::sync::Arc;

use marsview_types::{ApodRecord, Rover, RoverRecord};
use serde_json::{Map, Value, json};

/// Top-level state keys.
pub mod keys {
    /// Picture of the day record (`{}` until loaded).
    pub const APOD: &str = "apod";
    /// Display names of the rovers shown in the navigation.
    pub const ROVERS: &str = "rovers";
    /// Unused; kept so snapshots match the historical state shape.
    pub const PHOTOS: &str = "photos";
    /// Per-rover records keyed by lower-case rover name.
    pub const ROVERS_DATA: &str = "roversData";
}

/// One immutable version of the client state.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot(Arc<Value>);

impl Snapshot {
    /// Wrap a JSON value as a snapshot.
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    /// The state every page load starts from.
    pub fn initial() -> Self {
        let rovers: Vec<&str> = Rover::ALL.iter().map(|rover| rover.display_name()).collect();
        Self::new(json!({
            "apod": {},
            "rovers": rovers,
            "photos": [],
            "roversData": {},
        }))
    }

    /// The raw JSON.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Whether two handles point at the very same version.
    pub fn same_version(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Rover names for the navigation header, in state order.
    pub fn rover_names(&self) -> Vec<String> {
        self.0
            .get(keys::ROVERS)
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(ToOwned::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The picture of the day, or `None` while nothing has loaded.
    pub fn apod(&self) -> Option<ApodRecord> {
        self.0
            .get(keys::APOD)
            .and_then(Value::as_object)
            .filter(|record| !record.is_empty())
            .and_then(|record| serde_json::from_value(Value::Object(record.clone())).ok())
    }

    /// The record of `rover`, or `None` before its first fetch or when the
    /// stored record does not have the expected shape.
    pub fn rover(&self, rover: Rover) -> Option<RoverRecord> {
        self.raw_rover(rover)
            .and_then(|record| serde_json::from_value(record.clone()).ok())
    }

    /// Whether photos of `rover` were ever requested.
    ///
    /// Read from the raw JSON: a record with a non-null `photos` key counts
    /// even when it cannot be read as a [`RoverRecord`].
    pub fn rover_requested(&self, rover: Rover) -> bool {
        self.raw_rover(rover)
            .and_then(|record| record.get("photos"))
            .is_some_and(|photos| !photos.is_null())
    }

    fn raw_rover(&self, rover: Rover) -> Option<&Value> {
        self.0
            .get(keys::ROVERS_DATA)
            .and_then(|data| data.get(rover.key()))
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::initial()
    }
}

/// Holder of the current snapshot.
///
/// Owned by the client event loop and lent to views for one render pass.
#[derive(Debug, Clone, Default)]
pub struct Store {
    current: Snapshot,
}

impl Store {
    /// Start from an arbitrary snapshot.
    pub const fn with_snapshot(snapshot: Snapshot) -> Self {
        Self { current: snapshot }
    }

    /// The current snapshot.
    pub const fn snapshot(&self) -> &Snapshot {
        &self.current
    }

    /// Deep-merge `patch` into a copy of the current state and make the
    /// copy current. Returns the new snapshot.
    pub fn merge(&mut self, patch: &Value) -> Snapshot {
        let mut next = self.current.as_value().clone();
        deep_merge(&mut next, patch);
        self.current = Snapshot::new(next);
        self.current.clone()
    }
}

/// Recursively merge `patch` into `target`.
pub fn deep_merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target_map), Value::Object(patch_map)) => merge_maps(target_map, patch_map),
        (target, patch) => *target = patch.clone(),
    }
}

fn merge_maps(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, patch_value) in patch {
        match target.get_mut(key) {
            Some(existing) => deep_merge(existing, patch_value),
            None => {
                target.insert(key.clone(), patch_value.clone());
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_shape() {
        let snapshot = Snapshot::initial();
        assert_eq!(
            snapshot.rover_names(),
            vec!["Curiosity", "Opportunity", "Spirit"]
        );
        assert!(snapshot.apod().is_none());
        assert!(snapshot.rover(Rover::Spirit).is_none());
        assert_eq!(snapshot.as_value()[keys::PHOTOS], json!([]));
    }

    #[test]
    fn keys_absent_from_patch_are_preserved() {
        let mut store = Store::default();
        store.merge(&json!({"apod": {"title": "M31"}}));
        let snapshot = store.merge(&json!({"photos": [1]}));

        assert_eq!(snapshot.as_value()["apod"]["title"], "M31");
        assert_eq!(snapshot.rover_names().len(), 3);
    }

    #[test]
    fn nested_rover_records_merge_instead_of_replacing() {
        let mut store = Store::default();
        store.merge(&json!({"roversData": {"opportunity": {"photos": [{"img_src": "a"}]}}}));
        let snapshot = store.merge(&json!({"roversData": {"curiosity": {"photos": []}}}));

        let data = &snapshot.as_value()["roversData"];
        assert_eq!(data["opportunity"]["photos"][0]["img_src"], "a");
        assert_eq!(data["curiosity"]["photos"], json!([]));
    }

    #[test]
    fn loaded_data_merges_into_placeholder() {
        let mut store = Store::default();
        store.merge(&json!({"roversData": {"spirit": {"photos": []}}}));
        let snapshot = store.merge(&json!({"roversData": {"spirit": {
            "photos": [{"img_src": "x", "earth_date": "2010-03-21"}],
            "roverData": {"name": "Spirit"}
        }}}));

        let record = snapshot.rover(Rover::Spirit).unwrap();
        assert_eq!(record.loaded_photos().map(<[_]>::len), Some(1));
        assert_eq!(record.rover_data.unwrap().name, "Spirit");
    }

    #[test]
    fn arrays_are_replaced_not_concatenated() {
        let mut target = json!({"list": [1, 2, 3]});
        deep_merge(&mut target, &json!({"list": [4]}));
        assert_eq!(target, json!({"list": [4]}));
    }

    #[test]
    fn scalar_over_object_replaces() {
        let mut target = json!({"apod": {"title": "M31"}});
        deep_merge(&mut target, &json!({"apod": ""}));
        assert_eq!(target, json!({"apod": ""}));

        let mut target = json!({"apod": ""});
        deep_merge(&mut target, &json!({"apod": {"title": "M31"}}));
        assert_eq!(target, json!({"apod": {"title": "M31"}}));
    }

    #[test]
    fn merge_never_mutates_earlier_snapshots() {
        let mut store = Store::default();
        let before = store.snapshot().clone();
        let after = store.merge(&json!({"roversData": {"spirit": {"photos": []}}}));

        assert!(before.rover(Rover::Spirit).is_none());
        assert!(after.rover(Rover::Spirit).is_some());
        assert!(!before.same_version(&after));
        assert_eq!(before, Snapshot::initial());
    }

    #[test]
    fn empty_patch_keeps_content() {
        let mut store = Store::default();
        let before = store.snapshot().clone();
        let after = store.merge(&json!({}));
        assert_eq!(before, after);
    }

    #[test]
    fn empty_apod_object_counts_as_absent() {
        let snapshot = Snapshot::new(json!({"apod": {}}));
        assert!(snapshot.apod().is_none());
        let snapshot = Snapshot::new(json!({"apod": ""}));
        assert!(snapshot.apod().is_none());
    }

    mod merge_properties {
        use std::collections::BTreeSet;

        use proptest::prelude::*;
        use proptest::test_runner::TestCaseError;

        use super::*;

        fn scalar() -> impl Strategy<Value = Value> {
            prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::from),
                any::<i32>().prop_map(Value::from),
                "[a-z]{0,6}".prop_map(Value::from),
            ]
        }

        /// Few distinct keys, so state and patch overlap often.
        fn object_of(values: impl Strategy<Value = Value>) -> impl Strategy<Value = Value> {
            prop::collection::btree_map("[a-d]", values, 0..5)
                .prop_map(|map| Value::Object(map.into_iter().collect()))
        }

        fn nested() -> impl Strategy<Value = Value> {
            scalar().prop_recursive(3, 48, 5, |inner| {
                prop_oneof![
                    prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Array),
                    object_of(inner),
                ]
            })
        }

        fn document() -> impl Strategy<Value = Value> {
            object_of(nested())
        }

        /// Check `after` against `before` merged with `patch`, level by level.
        fn assert_merged(before: &Value, patch: &Value, after: &Value) -> Result<(), TestCaseError> {
            let (Value::Object(old), Value::Object(changes)) = (before, patch) else {
                prop_assert_eq!(after, patch);
                return Ok(());
            };
            let Value::Object(merged) = after else {
                return Err(TestCaseError::fail("object merge produced a non-object"));
            };

            let expected: BTreeSet<&String> = old.keys().chain(changes.keys()).collect();
            let actual: BTreeSet<&String> = merged.keys().collect();
            prop_assert_eq!(actual, expected);

            for (key, value) in merged {
                match (old.get(key), changes.get(key)) {
                    (Some(previous), None) => prop_assert_eq!(value, previous),
                    (None, Some(patched)) => prop_assert_eq!(value, patched),
                    (Some(previous), Some(patched)) => assert_merged(previous, patched, value)?,
                    (None, None) => return Err(TestCaseError::fail(format!("stray key {key}"))),
                }
            }
            Ok(())
        }

        proptest! {
            #[test]
            fn merge_keeps_untouched_keys_and_unions_objects(
                state in document(),
                patch in document(),
            ) {
                let mut store = Store::with_snapshot(Snapshot::new(state.clone()));
                let before = store.snapshot().clone();
                let after = store.merge(&patch);

                assert_merged(&state, &patch, after.as_value())?;
                prop_assert_eq!(before.as_value(), &state);
            }

            #[test]
            fn merging_a_document_into_itself_changes_nothing(state in document()) {
                let mut merged = state.clone();
                deep_merge(&mut merged, &state);
                prop_assert_eq!(merged, state);
            }
        }
    }
}
