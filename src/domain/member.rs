use std::collections::BTreeMap;
use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use super::MemberId;
use super::SubscriberEmail;

/// Custom attributes attached to a subscriber record, keyed by merge tag (e.g.
/// `FNAME`).
pub type MergeFields = BTreeMap<String, Value>;

/// Subscription status of a list member. Statuses the service adds later are
/// carried verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MemberStatus {
    Subscribed,
    Pending,
    Unsubscribed,
    Cleaned,
    Transactional,
    Archived,
    Other(String),
}

impl MemberStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Subscribed => "subscribed",
            Self::Pending => "pending",
            Self::Unsubscribed => "unsubscribed",
            Self::Cleaned => "cleaned",
            Self::Transactional => "transactional",
            Self::Archived => "archived",
            Self::Other(s) => s,
        }
    }

    /// Double opt-in sends a confirmation email first; until the subscriber
    /// clicks through, they are `pending`.
    pub fn for_confirmation(confirm: bool) -> Self {
        match confirm {
            true => Self::Pending,
            false => Self::Subscribed,
        }
    }
}

impl From<String> for MemberStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "subscribed" => Self::Subscribed,
            "pending" => Self::Pending,
            "unsubscribed" => Self::Unsubscribed,
            "cleaned" => Self::Cleaned,
            "transactional" => Self::Transactional,
            "archived" => Self::Archived,
            _ => Self::Other(value),
        }
    }
}

impl From<MemberStatus> for String {
    fn from(value: MemberStatus) -> Self { value.as_str().to_owned() }
}

impl Display for MemberStatus {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailType {
    Html,
    Text,
}

/// A subscriber, as sent to `PUT /lists/{list_id}/members/{id}`.
///
/// Serializes to the request body directly: the status is used for both
/// `status_if_new` and `status`, and every optional attribute (including an
/// empty set of merge fields) is left out of the payload rather than sent
/// empty, since the api treats an empty collection differently from an absent
/// one.
#[derive(Debug, Clone, Serialize)]
pub struct Member {
    email_address: SubscriberEmail,
    status_if_new: MemberStatus,
    status: MemberStatus,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    merge_fields: MergeFields,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    interests: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_type: Option<EmailType>,
}

impl Member {
    /// A new member defaults to `subscribed`, with no further attributes.
    pub fn new(email: SubscriberEmail) -> Self {
        Self {
            email_address: email,
            status_if_new: MemberStatus::Subscribed,
            status: MemberStatus::Subscribed,
            merge_fields: MergeFields::new(),
            interests: BTreeMap::new(),
            language: None,
            vip: None,
            email_type: None,
        }
    }

    pub fn status(
        mut self,
        status: MemberStatus,
    ) -> Self {
        self.status_if_new = status.clone();
        self.status = status;
        self
    }

    /// Shorthand for `pending` (double opt-in) vs `subscribed`
    pub fn confirm(
        self,
        confirm: bool,
    ) -> Self {
        self.status(MemberStatus::for_confirmation(confirm))
    }

    pub fn merge_field(
        mut self,
        tag: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.merge_fields.insert(tag.into(), value.into());
        self
    }

    pub fn merge_fields(
        mut self,
        fields: MergeFields,
    ) -> Self {
        self.merge_fields.extend(fields);
        self
    }

    pub fn interest(
        mut self,
        interest_id: impl Into<String>,
        subscribed: bool,
    ) -> Self {
        self.interests.insert(interest_id.into(), subscribed);
        self
    }

    pub fn language(
        mut self,
        language: impl Into<String>,
    ) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn vip(
        mut self,
        vip: bool,
    ) -> Self {
        self.vip = Some(vip);
        self
    }

    pub fn email_type(
        mut self,
        email_type: EmailType,
    ) -> Self {
        self.email_type = Some(email_type);
        self
    }

    pub fn email(&self) -> &SubscriberEmail { &self.email_address }

    pub fn current_status(&self) -> &MemberStatus { &self.status }

    /// Recomputed on every call; see `MemberId`
    pub fn hash(&self) -> MemberId { MemberId::derive(self.email_address.as_ref()) }
}
