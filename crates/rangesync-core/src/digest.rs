//! SHA-1 digests over ordered byte fields.
//!
//! Fields are fed into one hash context back to back, with no separators.
//! Two splits that concatenate to the same bytes therefore hash alike:
//! `["ab", "c"]` and `["a", "bc"]` share a digest. Peers only ever compare
//! digests built from the same row layout, so this is accepted.

use serde::{Deserialize, Serialize};
use sha1::{Digest as _, Sha1};
use std::fmt;

use crate::error::CoreError;

/// A 20-byte SHA-1 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(pub [u8; 20]);

impl Digest {
    /// Digest of the empty input, used as the "no data" sentinel.
    pub const EMPTY: Self = Self([
        0xda, 0x39, 0xa3, 0xee, 0x5e, 0x6b, 0x4b, 0x0d, 0x32, 0x55, 0xbf, 0xef, 0x95, 0x60, 0x18,
        0x90, 0xaf, 0xd8, 0x07, 0x09,
    ]);

    /// Length of the hex rendering.
    pub const HEX_LEN: usize = 40;

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Convert to lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 40-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        if s.len() != Self::HEX_LEN {
            return Err(CoreError::InvalidDigest(s.to_string()));
        }
        let mut arr = [0u8; 20];
        hex::decode_to_slice(s, &mut arr).map_err(|_| CoreError::InvalidDigest(s.to_string()))?;
        Ok(Self(arr))
    }

    /// Compare against a digest claimed by a peer.
    ///
    /// The claim is untrusted text and is compared verbatim against the
    /// lowercase rendering; anything that is not exactly that rendering
    /// does not match.
    pub fn matches(&self, claimed: &str) -> bool {
        claimed.len() == Self::HEX_LEN && self.to_hex() == claimed
    }

    /// Whether this is the empty-input digest.
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl Default for Digest {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 20]> for Digest {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl std::str::FromStr for Digest {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Streaming digest accumulator.
///
/// Lives for one computation: fields go in, [`finalize`](Self::finalize)
/// consumes it.
#[derive(Clone, Default)]
pub struct DigestContext {
    hasher: Sha1,
    fields: usize,
}

impl DigestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one field.
    pub fn update(&mut self, field: impl AsRef<[u8]>) {
        self.hasher.update(field.as_ref());
        self.fields += 1;
    }

    /// Builder form of [`update`](Self::update).
    pub fn field(mut self, field: impl AsRef<[u8]>) -> Self {
        self.update(field);
        self
    }

    /// Number of fields fed so far.
    pub fn fields(&self) -> usize {
        self.fields
    }

    pub fn finalize(self) -> Digest {
        let out = self.hasher.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&out);
        Digest(bytes)
    }
}

impl fmt::Debug for DigestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestContext")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Digest an ordered sequence of fields.
///
/// Zero fields yields [`Digest::EMPTY`].
pub fn digest<I, T>(fields: I) -> Digest
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut ctx = DigestContext::new();
    for field in fields {
        ctx.update(field);
    }
    ctx.finalize()
}

/// Digest a variadic list of fields.
///
/// ```rust
/// use rangesync_core::{digest, digest_fields};
///
/// assert_eq!(digest_fields!("a", "b"), digest(["a", "b"]));
/// ```
#[macro_export]
macro_rules! digest_fields {
    ($($field:expr),* $(,)?) => {
        $crate::DigestContext::new()$(.field($field))*.finalize()
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WORDS: [&str; 5] = ["FirstWord", "SecondWord", "Word number 3", "", " "];
    const WORDS_DIGEST: &str = "159a9a6e19ff891a8560376df65a078e064bd0ce";

    #[test]
    fn test_empty_sequence_is_sentinel() {
        let none: [&str; 0] = [];
        assert_eq!(digest(none), Digest::EMPTY);
        assert_eq!(DigestContext::new().finalize(), Digest::EMPTY);
        assert_eq!(
            Digest::EMPTY.to_hex(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn test_words_from_sequence() {
        assert_eq!(digest(WORDS).to_hex(), WORDS_DIGEST);
    }

    #[test]
    fn test_words_field_by_field() {
        let mut ctx = DigestContext::new();
        for word in WORDS {
            ctx.update(word);
        }
        assert_eq!(ctx.fields(), 5);
        assert_eq!(ctx.finalize().to_hex(), WORDS_DIGEST);

        let via_macro =
            crate::digest_fields!("FirstWord", "SecondWord", "Word number 3", "", " ");
        assert_eq!(via_macro.to_hex(), WORDS_DIGEST);
    }

    #[test]
    fn test_field_split_is_not_distinguished() {
        assert_eq!(digest(["ab", "c"]), digest(["a", "bc"]));
    }

    #[test]
    fn test_hex_roundtrip_and_rejects() {
        let d = digest(["abc"]);
        assert_eq!(d.to_hex(), "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(Digest::from_hex(&d.to_hex()).unwrap(), d);
        assert!(Digest::from_hex("abc").is_err());
        assert!(Digest::from_hex(&"zz".repeat(20)).is_err());
    }

    #[test]
    fn test_matches_is_exact() {
        let d = Digest::EMPTY;
        assert!(d.matches("da39a3ee5e6b4b0d3255bfef95601890afd80709"));
        assert!(!d.matches("DA39A3EE5E6B4B0D3255BFEF95601890AFD80709"));
        assert!(!d.matches("something"));
        assert!(!d.matches(""));
    }

    proptest! {
        #[test]
        fn sequence_and_incremental_agree(fields in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 0..16)) {
            let whole = digest(&fields);
            let incremental = fields
                .iter()
                .fold(DigestContext::new(), |ctx, f| ctx.field(f))
                .finalize();
            prop_assert_eq!(whole, incremental);
        }
    }
}
