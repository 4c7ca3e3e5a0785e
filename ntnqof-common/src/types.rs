//! Core identifiers: S-NSSAI, slice id, TEID, DSCP, 5QI.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Satellite-domain slice identifier.
pub type SliceId = u8;

/// GTP-U Tunnel Endpoint Identifier.
pub type Teid = u32;

/// DSCP (Differentiated Services Code Point) value.
pub type Dscp = u8;

/// 5G QoS Identifier.
pub type FiveQi = u16;

/// Single Network Slice Selection Assistance Information.
///
/// Serialized the way the core SBI models carry it: `{"sst": 1, "sd": "010203"}`,
/// with the SD omitted when absent.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SNssai {
    /// Slice/Service Type (8-bit)
    pub sst: u8,
    /// Slice Differentiator (optional 24-bit value)
    #[serde(default, with = "sd_hex", skip_serializing_if = "Option::is_none")]
    pub sd: Option<[u8; 3]>,
}

impl SNssai {
    /// Creates a new S-NSSAI with only SST (no SD).
    pub const fn new(sst: u8) -> Self {
        Self { sst, sd: None }
    }

    /// Creates a new S-NSSAI with SST and SD.
    pub const fn with_sd(sst: u8, sd: [u8; 3]) -> Self {
        Self { sst, sd: Some(sd) }
    }

    /// Creates a new S-NSSAI with SST and SD from a u32 value.
    ///
    /// Only the lower 24 bits of `sd` are used.
    pub const fn with_sd_u32(sst: u8, sd: u32) -> Self {
        Self {
            sst,
            sd: Some([
                ((sd >> 16) & 0xFF) as u8,
                ((sd >> 8) & 0xFF) as u8,
                (sd & 0xFF) as u8,
            ]),
        }
    }

    /// Returns the SD as a u32 value, or None if SD is not set.
    pub fn sd_as_u32(&self) -> Option<u32> {
        self.sd
            .map(|sd| ((sd[0] as u32) << 16) | ((sd[1] as u32) << 8) | (sd[2] as u32))
    }

    /// Slice-selector match: both SST and SD must agree, an absent SD only
    /// matches an absent SD.
    pub fn matches(&self, other: &SNssai) -> bool {
        self.sst == other.sst && self.sd == other.sd
    }
}

impl fmt::Debug for SNssai {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sd_as_u32() {
            Some(sd) => write!(f, "SNssai(sst={}, sd={:06X})", self.sst, sd),
            None => write!(f, "SNssai(sst={})", self.sst),
        }
    }
}

impl fmt::Display for SNssai {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sd_as_u32() {
            Some(sd) => write!(f, "{}-{:06X}", self.sst, sd),
            None => write!(f, "{}", self.sst),
        }
    }
}

mod sd_hex {
    use super::*;

    pub fn serialize<S: Serializer>(sd: &Option<[u8; 3]>, s: S) -> Result<S::Ok, S::Error> {
        match sd {
            Some(sd) => s.serialize_str(&format!("{:02x}{:02x}{:02x}", sd[0], sd[1], sd[2])),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<[u8; 3]>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        if raw.len() != 6 {
            return Err(de::Error::custom(format!(
                "slice differentiator must be 6 hex digits, got {raw:?}"
            )));
        }
        let value = u32::from_str_radix(raw, 16).map_err(|_| {
            de::Error::custom(format!("slice differentiator is not hex: {raw:?}"))
        })?;
        Ok(Some([(value >> 16) as u8, (value >> 8) as u8, value as u8]))
    }
}

/// Serde helpers for a slice id that travels as a decimal string
/// (`"id": "1"`) but is also accepted as a plain number.
pub mod slice_id_str {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Str(String),
    }

    pub fn serialize<S: Serializer>(id: &SliceId, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<SliceId, D::Error> {
        let value = match Raw::deserialize(d)? {
            Raw::Num(n) => n,
            Raw::Str(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| de::Error::custom(format!("slice id is not a number: {s:?}")))?,
        };
        SliceId::try_from(value)
            .map_err(|_| de::Error::custom(format!("slice id {value} exceeds 255")))
    }
}
