//! Serialization as plain sequences. Loading replays inserts, so a
//! stream with repeated set elements or map keys still yields a valid
//! container (the last map value wins).

use crate::ordered_map::OrderedMap;
use crate::ordered_set::OrderedSet;
use crate::vector::Vector;
use core::fmt;
use core::marker::PhantomData;
use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};

const MAX_PREALLOCATE: usize = 4096;

fn serialize_items<'a, S, T, I>(serializer: S, len: usize, items: I) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seq = serializer.serialize_seq(Some(len))?;
    for item in items {
        seq.serialize_element(item)?;
    }
    seq.end()
}

impl<T: Serialize> Serialize for Vector<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let items = self.as_slice();
        serialize_items(serializer, items.len(), items.iter())
    }
}

impl<T: Serialize> Serialize for OrderedSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let items = self.as_slice();
        serialize_items(serializer, items.len(), items.iter())
    }
}

impl<K: Serialize, V: Serialize> Serialize for OrderedMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let items = self.as_slice();
        serialize_items(serializer, items.len(), items.iter())
    }
}

/// Collects a sequence of `E` and hands it to `build`.
struct ReplayVisitor<E, C> {
    expecting: &'static str,
    build: fn(Vec<E>) -> C,
    marker: PhantomData<fn() -> E>,
}

impl<E, C> ReplayVisitor<E, C> {
    const fn new(expecting: &'static str, build: fn(Vec<E>) -> C) -> Self {
        Self {
            expecting,
            build,
            marker: PhantomData,
        }
    }
}

impl<'de, E, C> Visitor<'de> for ReplayVisitor<E, C>
where
    E: Deserialize<'de>,
{
    type Value = C;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(self.expecting)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let capacity = seq.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
        let mut elements = Vec::with_capacity(capacity);
        while let Some(element) = seq.next_element()? {
            elements.push(element);
        }
        Ok((self.build)(elements))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Vector<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(ReplayVisitor::new(
            "a sequence",
            Vector::<T>::from_state::<Vec<T>>,
        ))
    }
}

impl<'de, T: Deserialize<'de> + Ord> Deserialize<'de> for OrderedSet<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(ReplayVisitor::new(
            "a sequence of set elements",
            OrderedSet::<T>::from_state::<Vec<T>>,
        ))
    }
}

impl<'de, K, V> Deserialize<'de> for OrderedMap<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(ReplayVisitor::new(
            "a sequence of (key, value) pairs",
            OrderedMap::<K, V>::from_state::<Vec<(K, V)>>,
        ))
    }
}
