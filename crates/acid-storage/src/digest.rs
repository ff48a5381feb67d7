//! Project identifier derivation
//!
//! Project records are addressed by `acid-<digest>`, where the digest is a
//! truncated SHA-256 of the human-readable project name. Callers may pass
//! either form; [`derive_store_key`] accepts both.

use sha2::{Digest, Sha256};

/// Reserved prefix marking an already-derived store key
pub const PROJECT_KEY_PREFIX: &str = "acid-";

/// Number of hex characters kept from the SHA-256 digest
///
/// Existing records were stored under this length; changing it orphans them.
pub const SHORT_SHA_LEN: usize = 54;

/// Short lowercase-hex SHA-256 digest of `input`
///
/// Returns the first [`SHORT_SHA_LEN`] characters of the hex encoding.
///
/// # Example
/// ```
/// use acid_storage::short_sha;
///
/// assert_eq!(
///     short_sha("hello"),
///     "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e730433"
/// );
/// ```
#[inline]
#[must_use]
pub fn short_sha(input: &str) -> String {
    let mut digest = String::with_capacity(SHORT_SHA_LEN);
    push_short_sha(&mut digest, input);
    digest
}

/// Store key for a project name or an already-derived key
///
/// Keys carrying [`PROJECT_KEY_PREFIX`] are returned unchanged, so applying
/// this twice yields the same key.
#[must_use]
pub fn derive_store_key(id: &str) -> String {
    if is_store_key(id) {
        return id.to_string();
    }
    let mut key = String::with_capacity(PROJECT_KEY_PREFIX.len() + SHORT_SHA_LEN);
    key.push_str(PROJECT_KEY_PREFIX);
    push_short_sha(&mut key, id);
    key
}

fn push_short_sha(out: &mut String, input: &str) {
    let mut buf = [0u8; 64];
    // A 32-byte digest fills the buffer exactly, so encoding cannot fail
    if hex::encode_to_slice(Sha256::digest(input.as_bytes()), &mut buf).is_ok() {
        out.extend(buf[..SHORT_SHA_LEN].iter().map(|&b| char::from(b)));
    }
}

/// Check whether `id` is already namespaced
#[inline]
#[must_use]
pub fn is_store_key(id: &str) -> bool {
    id.starts_with(PROJECT_KEY_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_sha_known_vectors() {
        assert_eq!(
            short_sha("hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e730433"
        );
        assert_eq!(
            short_sha("myproj"),
            "14a10ceb48d968cf9a1514ab1d1c15554fc9f7ba356d9bb8248a16"
        );
        // Empty input is still hashed
        assert_eq!(
            short_sha(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca49599"
        );
    }

    #[test]
    fn short_sha_is_prefix_of_full_digest() {
        let full = hex::encode(Sha256::digest(b"deis/acid"));
        assert!(full.starts_with(&short_sha("deis/acid")));
        assert_eq!(full.len(), 64);
    }

    #[test]
    fn derive_store_key_prefixes_names() {
        assert_eq!(
            derive_store_key("hello"),
            "acid-2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e730433"
        );
    }

    #[test]
    fn derive_store_key_fills_exact_capacity() {
        let key = derive_store_key("deis/acid");
        assert_eq!(key.len(), PROJECT_KEY_PREFIX.len() + SHORT_SHA_LEN);
        assert_eq!(key.capacity(), key.len());
        assert_eq!(short_sha("deis/acid").capacity(), SHORT_SHA_LEN);
    }

    #[test]
    fn derive_store_key_keeps_namespaced_ids() {
        assert_eq!(derive_store_key("acid-anything"), "acid-anything");
        assert_eq!(derive_store_key("acid-"), "acid-");
    }

    #[test]
    fn derive_store_key_prefix_is_case_sensitive() {
        let key = derive_store_key("ACID-project");
        assert_eq!(key, format!("acid-{}", short_sha("ACID-project")));
    }

    proptest! {
        #[test]
        fn prop_short_sha_is_lowercase_hex(input in ".*") {
            let digest = short_sha(&input);
            prop_assert_eq!(digest.len(), SHORT_SHA_LEN);
            prop_assert!(digest.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
            prop_assert_eq!(digest, short_sha(&input));
        }

        #[test]
        fn prop_derive_store_key_is_idempotent(input in ".*") {
            let once = derive_store_key(&input);
            prop_assert_eq!(derive_store_key(&once), once.clone());
            prop_assert!(is_store_key(&once));
        }

        #[test]
        fn prop_plain_names_are_hashed(input in "[a-z0-9/_.]{1,40}") {
            prop_assume!(!input.starts_with(PROJECT_KEY_PREFIX));
            prop_assert_eq!(
                derive_store_key(&input),
                format!("{PROJECT_KEY_PREFIX}{}", short_sha(&input))
            );
        }
    }
}
