//! Request bodies for the member endpoints.
//!
//! The shapes are fixed by the remote api; in particular, empty collections
//! must be left out entirely rather than sent as `{}`.

use anyhow::Context;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::domain::Member;
use crate::domain::MemberId;
use crate::domain::MemberStatus;
use crate::domain::MergeFields;
use crate::error::MailchimpError;

/// Parameters of a single call: a query string for `GET`/`DELETE`, a json
/// body otherwise.
pub type Params = Map<String, Value>;

/// The two ways of adding (or updating) a member. They derive their fields
/// differently, and are deliberately not merged into one code path:
///
/// - `Fields`: the status follows the `confirm` flag (`pending` for double
///   opt-in, `subscribed` otherwise), and the email is sent lowercased
/// - `Member`: everything, status included, comes from the `Member` itself
pub enum AddUpdate<'a> {
    Fields {
        email: &'a str,
        merge_fields: &'a MergeFields,
        confirm: bool,
    },
    Member(&'a Member),
}

#[derive(Serialize)]
struct FieldsBody<'a> {
    email_address: String,
    status_if_new: MemberStatus,
    status: MemberStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    merge_fields: Option<&'a MergeFields>,
}

impl AddUpdate<'_> {
    pub fn member_id(&self) -> MemberId {
        match self {
            Self::Fields { email, .. } => MemberId::derive(email),
            Self::Member(member) => member.hash(),
        }
    }

    pub fn params(&self) -> Result<Params, MailchimpError> {
        match self {
            Self::Fields {
                email,
                merge_fields,
                confirm,
            } => {
                let status = MemberStatus::for_confirmation(*confirm);
                to_params(&FieldsBody {
                    email_address: email.to_lowercase(),
                    status_if_new: status.clone(),
                    status,
                    merge_fields: (!merge_fields.is_empty()).then_some(*merge_fields),
                })
            }
            Self::Member(member) => to_params(member),
        }
    }
}

/// `PUT`, with the email as given (not lowercased)
pub fn unsubscribe(email: &str) -> Params {
    let mut params = Params::new();
    params.insert("email_address".to_string(), email.into());
    params.insert(
        "status_if_new".to_string(),
        MemberStatus::Unsubscribed.as_str().into(),
    );
    params.insert(
        "status".to_string(),
        MemberStatus::Unsubscribed.as_str().into(),
    );
    params
}

/// Sent with a `DELETE` on the member endpoint. Only the email address.
pub fn archive(email: &str) -> Params {
    let mut params = Params::new();
    params.insert("email_address".to_string(), email.into());
    params
}

/// Serialize anything that maps to a json object into call parameters.
pub fn to_params<T: Serialize + ?Sized>(value: &T) -> Result<Params, MailchimpError> {
    match serde_json::to_value(value).context("Failed to serialize request parameters")? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Params::new()),
        other => Err(anyhow::anyhow!("Request parameters must be a json object, got {other}").into()),
    }
}
