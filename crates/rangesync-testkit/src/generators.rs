//! Proptest generators for property-based testing.

use std::collections::BTreeMap;

use proptest::prelude::*;

use rangesync_core::{Component, Digest, KeyRange};

/// Generate a Component.
pub fn component() -> impl Strategy<Value = Component> {
    proptest::sample::select(Component::ALL.to_vec())
}

/// Generate a random Digest.
pub fn digest() -> impl Strategy<Value = Digest> {
    any::<[u8; 20]>().prop_map(Digest::from_bytes)
}

/// Generate a short key from a small alphabet so ranges overlap often.
pub fn key() -> impl Strategy<Value = String> {
    "[a-f]{1,4}".prop_map(String::from)
}

/// Generate a row checksum, occasionally missing.
pub fn row_checksum() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        9 => digest().prop_map(|d| Some(d.to_hex())),
        1 => Just(None),
    ]
}

/// Generate a key range; either bound may be open.
pub fn key_range() -> impl Strategy<Value = KeyRange> {
    (prop_oneof![Just(String::new()), key()], prop_oneof![Just(String::new()), key()])
        .prop_map(|(begin, end)| KeyRange::new(begin, end))
}

/// Generate a set of rows keyed uniquely.
pub fn rows(max: usize) -> impl Strategy<Value = BTreeMap<String, Option<String>>> {
    prop::collection::btree_map(key(), row_checksum(), 0..=max)
}

/// Parameters for one range check against a seeded store.
#[derive(Debug, Clone)]
pub struct CheckParams {
    pub component: Component,
    pub rows: BTreeMap<String, Option<String>>,
    pub range: KeyRange,
    pub id: i64,
}

impl Arbitrary for CheckParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (component(), rows(32), key_range(), 1i64..=1_700_000_000_000i64)
            .prop_map(|(component, rows, range, id)| CheckParams {
                component,
                rows,
                range,
                id,
            })
            .boxed()
    }
}

impl CheckParams {
    /// Rows of `self.rows` inside `self.range`, in key order.
    pub fn rows_in_range(&self) -> impl Iterator<Item = (&String, &Option<String>)> {
        self.rows.iter().filter(|(key, _)| self.range.contains(key))
    }

    /// JSON payload for a range check claiming `checksum`.
    pub fn payload(&self, checksum: &str) -> String {
        range_payload(&self.range, checksum, self.id, None)
    }
}

/// Render a range check payload.
pub fn range_payload(range: &KeyRange, checksum: &str, id: i64, tail: Option<&str>) -> String {
    let tail = tail.map(|t| format!(r#","tail":"{}""#, t)).unwrap_or_default();
    format!(
        r#"{{"begin":"{}","end":"{}","checksum":"{}","id":{}{}}}"#,
        range.begin, range.end, checksum, id, tail
    )
}
