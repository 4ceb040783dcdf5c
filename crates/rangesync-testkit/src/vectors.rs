//! Golden test vectors for deterministic verification.
//!
//! Every peer must fold the same field sequence into the same digest, or
//! two in-sync stores would never classify as `Match`.

use rangesync_core::{digest, Digest};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Fields folded in order.
    pub fields: &'static [&'static str],
    /// Expected digest (hex).
    pub expected: &'static str,
}

impl GoldenVector {
    /// Decode the expected digest.
    pub fn expected_digest(&self) -> Digest {
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(self.expected, &mut bytes).unwrap_or_else(|e| {
            panic!("vector '{}' has a malformed digest: {}", self.name, e)
        });
        Digest::from_bytes(bytes)
    }

    /// Compute the digest of this vector's fields.
    pub fn compute(&self) -> Digest {
        digest(self.fields.iter().copied())
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "no fields",
            fields: &[],
            expected: "da39a3ee5e6b4b0d3255bfef95601890afd80709",
        },
        GoldenVector {
            name: "single empty field",
            fields: &[""],
            expected: "da39a3ee5e6b4b0d3255bfef95601890afd80709",
        },
        GoldenVector {
            name: "abc",
            fields: &["abc"],
            expected: "a9993e364706816aba3e25717850c26c9cd0d89d",
        },
        GoldenVector {
            name: "abc split across fields",
            fields: &["a", "bc"],
            expected: "a9993e364706816aba3e25717850c26c9cd0d89d",
        },
        GoldenVector {
            name: "five words with blanks",
            fields: &["FirstWord", "SecondWord", "Word number 3", "", " "],
            expected: "159a9a6e19ff891a8560376df65a078e064bd0ce",
        },
        GoldenVector {
            name: "pangram",
            fields: &["The quick brown fox ", "jumps over the lazy dog"],
            expected: "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12",
        },
    ]
}

/// Check every golden vector against the digest implementation.
///
/// Returns `(name, matches, computed hex)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let computed = v.compute();
            (v.name.to_string(), computed == v.expected_digest(), computed.to_hex())
        })
        .collect()
}
