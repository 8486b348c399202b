use std::fmt::Display;

use md5::Digest;
use md5::Md5;

/// The key used to address a subscriber in `/lists/{list_id}/members/{id}`:
/// the lowercase hex MD5 digest of the lowercased email address.
///
/// The remote service derives the same value on its side, so this must never
/// change; a mismatch silently creates a duplicate member instead of updating
/// the existing one. Never stored, always recomputed from the email.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberId(String);

impl MemberId {
    pub fn derive(email: &str) -> Self {
        let digest = Md5::digest(email.to_lowercase().as_bytes());
        Self(hex::encode(digest))
    }
}

impl AsRef<str> for MemberId {
    fn as_ref(&self) -> &str { &self.0 }
}

impl Display for MemberId {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
