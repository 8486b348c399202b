use std::fmt::Display;

use serde::Serialize;
use validator::ValidateEmail;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
/// A syntactically valid email address. Casing is preserved as supplied; the
/// remote service treats addresses case-insensitively, but echoes back
/// whatever it was sent.
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: String) -> Result<Self, String> {
        ValidateEmail::validate_email(&email)
            // https://stackoverflow.com/a/65012849
            .then_some(Self(email.clone()))
            .ok_or(format!("Invalid email: {email:?}"))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str { &self.0 }
}

impl Display for SubscriberEmail {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for SubscriberEmail {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> { Self::parse(value) }
}
