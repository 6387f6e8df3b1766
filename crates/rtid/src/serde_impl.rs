use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::Rtid;

impl Serialize for Rtid {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for Rtid {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct RtidVisitor;

		impl Visitor<'_> for RtidVisitor {
			type Value = Rtid;

			fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
				f.write_str("an RTID literal such as `RTID(alias@Namespace)`")
			}

			fn visit_str<E: de::Error>(self, v: &str) -> Result<Rtid, E> {
				Rtid::parse(v).map_err(|e| E::custom(format!("invalid RTID {v:?}: {e}")))
			}
		}

		deserializer.deserialize_str(RtidVisitor)
	}
}
