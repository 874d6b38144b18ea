//! Serde support: the map is written as a plain key/value map in entry
//! order, and read back by `set`ting each pair.

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::marker::PhantomData;

use crate::chained_hash_map::ChainedHashMap;
use crate::hash::BucketHasher;

impl<K, V, S> Serialize for ChainedHashMap<K, V, S>
where
    K: AsRef<[u8]> + Serialize,
    V: Serialize,
    S: BucketHasher,
{
    fn serialize<Ser>(&self, ser: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        let mut s = ser.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            s.serialize_entry(k, v)?;
        }
        s.end()
    }
}

struct MapVisitor<K, V, S> {
    _pd: PhantomData<fn() -> ChainedHashMap<K, V, S>>,
}

impl<'de, K, V, S> Visitor<'de> for MapVisitor<K, V, S>
where
    K: AsRef<[u8]> + Deserialize<'de>,
    V: Deserialize<'de>,
    S: BucketHasher,
{
    type Value = ChainedHashMap<K, V, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<Access>(self, mut access: Access) -> Result<Self::Value, Access::Error>
    where
        Access: MapAccess<'de>,
    {
        let mut m = ChainedHashMap::with_hasher(S::default());
        while let Some((k, v)) = access.next_entry()? {
            m.set(k, v);
        }
        Ok(m)
    }
}

impl<'de, K, V, S> Deserialize<'de> for ChainedHashMap<K, V, S>
where
    K: AsRef<[u8]> + Deserialize<'de>,
    V: Deserialize<'de>,
    S: BucketHasher,
{
    fn deserialize<D>(des: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        des.deserialize_map(MapVisitor { _pd: PhantomData })
    }
}
