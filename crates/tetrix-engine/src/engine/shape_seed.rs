use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ParseSeedError;

/// Seed for deterministic shape generation.
///
/// A 128-bit seed for the [`Pcg32`] generator a [`Session`](super::Session)
/// draws its shapes from. The same seed yields the same shape sequence, which
/// makes sessions reproducible for tests and for the headless driver.
///
/// Seeds are written as 32 hex digits, both by [`fmt::Display`] and by serde.
///
/// # Example
///
/// ```
/// use rand::Rng as _;
/// use tetrix_engine::ShapeSeed;
///
/// let seed: ShapeSeed = rand::rng().random();
/// let parsed: ShapeSeed = seed.to_string().parse().unwrap();
/// assert_eq!(parsed, seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeSeed([u8; 16]);

impl ShapeSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Builds the shape generator for this seed.
    #[must_use]
    pub fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl fmt::Display for ShapeSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for ShapeSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::Length(s.len()));
        }
        // `from_str_radix` alone would also take a leading sign.
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseSeedError::Digits(s.to_owned()));
        }
        let num = u128::from_str_radix(s, 16)
            .map_err(|e| ParseSeedError::Digits(format!("{s} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for ShapeSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShapeSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random seeds with `rng.random()`.
impl Distribution<ShapeSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ShapeSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use crate::Shape;

    use super::*;

    const SEQUENTIAL: ShapeSeed = ShapeSeed([
        0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54, 0x32,
        0x10,
    ]);

    #[test]
    fn test_display_is_big_endian_hex() {
        assert_eq!(SEQUENTIAL.to_string(), "0123456789abcdeffedcba9876543210");
        assert_eq!(ShapeSeed([0; 16]).to_string(), "00000000000000000000000000000000");
    }

    #[test]
    fn test_parse_accepts_uppercase() {
        let seed: ShapeSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
        assert_eq!(seed, SEQUENTIAL);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("0123".parse::<ShapeSeed>(), Err(ParseSeedError::Length(4)));
        assert!(matches!(
            "ghijklmnopqrstuvwxyzghijklmnopqr".parse::<ShapeSeed>(),
            Err(ParseSeedError::Digits(_))
        ));
        assert_eq!("".parse::<ShapeSeed>(), Err(ParseSeedError::Length(0)));
    }

    #[test]
    fn test_parse_rejects_signs() {
        let plus = format!("+{}", "f".repeat(31));
        assert_eq!(plus.len(), 32);
        assert_eq!(plus.parse::<ShapeSeed>(), Err(ParseSeedError::Digits(plus)));
        assert!(format!("-{}", "0".repeat(31)).parse::<ShapeSeed>().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let serialized = serde_json::to_string(&SEQUENTIAL).unwrap();
        assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
        let deserialized: ShapeSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, SEQUENTIAL);
    }

    #[test]
    fn test_deserialize_error_mentions_hex() {
        let err = serde_json::from_str::<ShapeSeed>("\"0123456789abcdef0123456789abcdef0\"")
            .unwrap_err();
        assert!(err.to_string().contains("invalid hex"));
    }

    #[test]
    fn test_same_seed_same_shapes() {
        let mut rng1 = SEQUENTIAL.rng();
        let mut rng2 = SEQUENTIAL.rng();
        for _ in 0..50 {
            let a: Shape = rng1.random();
            let b: Shape = rng2.random();
            assert_eq!(a, b);
        }
    }
}
