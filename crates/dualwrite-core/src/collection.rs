//! Two-level tuple collections.
//!
//! Every collector returns a [`TupleCollection`]: object → [`ObjectTuples`],
//! where [`ObjectTuples`] maps a canonical key to its tuple. The outer level
//! lets callers reconcile one object at a time; the inner level is where
//! duplicates collapse and folder-resource grants merge.

use std::collections::hash_map::{self, HashMap};

use crate::tuple::Tuple;

/// Canonical key → tuple, for a single object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectTuples {
    tuples: HashMap<String, Tuple>,
}

impl ObjectTuples {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tuple under its full canonical key.
    ///
    /// An identical tuple already present is replaced by itself.
    pub fn insert(&mut self, tuple: Tuple) {
        self.tuples.insert(tuple.key(), tuple);
    }

    /// Insert a tuple, merging folder-resource grants.
    ///
    /// Folder-resource tuples are keyed without their condition; when a tuple
    /// already sits under that key the new grant's group resources are unioned
    /// into it. Everything else goes through [`insert`](Self::insert).
    pub fn insert_merged(&mut self, tuple: Tuple) {
        if !tuple.is_folder_resource() {
            self.insert(tuple);
            return;
        }

        match self.tuples.entry(tuple.key_without_condition()) {
            hash_map::Entry::Occupied(mut existing) => existing.get_mut().merge_condition(&tuple),
            hash_map::Entry::Vacant(slot) => {
                slot.insert(tuple);
            }
        }
    }

    /// Insert a tuple under its merge key, replacing whatever was there.
    ///
    /// Used when mirroring stored tuples, where each folder-resource key is
    /// expected to appear once and the latest read wins.
    pub fn insert_replacing(&mut self, tuple: Tuple) {
        self.tuples.insert(tuple.merge_key(), tuple);
    }

    pub fn get(&self, key: &str) -> Option<&Tuple> {
        self.tuples.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.tuples.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tuples.keys().map(String::as_str)
    }

    pub fn tuples(&self) -> impl Iterator<Item = &Tuple> {
        self.tuples.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tuple)> {
        self.tuples.iter().map(|(k, t)| (k.as_str(), t))
    }

    /// Content digest over the canonical keys of the stored tuples.
    ///
    /// Order independent: two maps holding the same tuples hash equal no
    /// matter how they were built.
    pub fn digest(&self) -> String {
        let mut keys: Vec<String> = self.tuples.values().map(Tuple::key).collect();
        keys.sort_unstable();

        let mut hasher = blake3::Hasher::new();
        for key in &keys {
            hasher.update(key.as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize().as_bytes())
    }

    pub fn into_inner(self) -> HashMap<String, Tuple> {
        self.tuples
    }
}

impl IntoIterator for ObjectTuples {
    type Item = (String, Tuple);
    type IntoIter = hash_map::IntoIter<String, Tuple>;

    fn into_iter(self) -> Self::IntoIter {
        self.tuples.into_iter()
    }
}

/// Object → [`ObjectTuples`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TupleCollection {
    objects: HashMap<String, ObjectTuples>,
}

impl TupleCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under the tuple's object and full canonical key.
    pub fn insert(&mut self, tuple: Tuple) {
        self.objects
            .entry(tuple.object.clone())
            .or_default()
            .insert(tuple);
    }

    /// Insert under the tuple's object, merging folder-resource grants.
    pub fn insert_merged(&mut self, tuple: Tuple) {
        self.objects
            .entry(tuple.object.clone())
            .or_default()
            .insert_merged(tuple);
    }

    pub fn get(&self, object: &str) -> Option<&ObjectTuples> {
        self.objects.get(object)
    }

    pub fn objects(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObjectTuples)> {
        self.objects.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of tuples across all objects.
    pub fn tuple_count(&self) -> usize {
        self.objects.values().map(ObjectTuples::len).sum()
    }

    pub fn into_inner(self) -> HashMap<String, ObjectTuples> {
        self.objects
    }
}

impl IntoIterator for TupleCollection {
    type Item = (String, ObjectTuples);
    type IntoIter = hash_map::IntoIter<String, ObjectTuples>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.into_iter()
    }
}
