use serde_json::Value;

use crate::domain::Member;
use crate::domain::MemberId;
use crate::domain::MergeFields;
use crate::error::MailchimpError;
use crate::mailchimp_client::ApiResponse;
use crate::mailchimp_client::MailchimpClient;
use crate::payload;
use crate::payload::AddUpdate;
use crate::payload::Params;

/// `/lists/{list_id}/members/{member_id}`
pub fn member_endpoint(
    list_id: &str,
    member_id: &str,
) -> String {
    format!("/lists/{list_id}/members/{member_id}")
}

// emails are taken as `impl AsRef<str>`, so both raw strings and parsed
// `SubscriberEmail`s can be passed; the service does its own validation
impl MailchimpClient {
    /// `GET /lists/{list_id}/members/{member_id}`. `member_id` is either the
    /// hash (see `MemberId`) or the service-issued id.
    #[tracing::instrument(name = "Getting list member", skip(self))]
    pub async fn get_member(
        &self,
        list_id: &str,
        member_id: &str,
    ) -> Result<Value, MailchimpError> {
        let resp = self
            .call("get", &member_endpoint(list_id, member_id), &Params::new())
            .await?;
        Ok(resp.into_json())
    }

    /// Add `email` to the list, or update it if already present. With
    /// `confirm`, the member is left `pending` until they confirm via the
    /// email the service sends; otherwise they are `subscribed` immediately.
    #[tracing::instrument(
        name = "Adding or updating list member",
        skip(self, email, merge_fields),
        fields(email = %email.as_ref())
    )]
    pub async fn add_update(
        &self,
        list_id: &str,
        email: impl AsRef<str>,
        merge_fields: &MergeFields,
        confirm: bool,
    ) -> Result<ApiResponse, MailchimpError> {
        self.put_member(
            list_id,
            AddUpdate::Fields {
                email: email.as_ref(),
                merge_fields,
                confirm,
            },
        )
        .await
    }

    /// Same as `add_update`, but every field (status included) comes from
    /// `member`
    #[tracing::instrument(
        name = "Adding or updating list member",
        skip(self, member),
        fields(email = %member.email())
    )]
    pub async fn add_update_member(
        &self,
        list_id: &str,
        member: &Member,
    ) -> Result<ApiResponse, MailchimpError> {
        self.put_member(list_id, AddUpdate::Member(member)).await
    }

    async fn put_member(
        &self,
        list_id: &str,
        add: AddUpdate<'_>,
    ) -> Result<ApiResponse, MailchimpError> {
        let params = add.params()?;
        let endpoint = member_endpoint(list_id, add.member_id().as_ref());
        self.call("put", &endpoint, &params).await
    }

    /// Also creates the member (as `unsubscribed`) if they don't exist yet
    #[tracing::instrument(
        name = "Unsubscribing list member",
        skip(self, email),
        fields(email = %email.as_ref())
    )]
    pub async fn unsubscribe(
        &self,
        list_id: &str,
        email: impl AsRef<str>,
    ) -> Result<ApiResponse, MailchimpError> {
        let email = email.as_ref();
        let endpoint = member_endpoint(list_id, MemberId::derive(email).as_ref());
        self.call("put", &endpoint, &payload::unsubscribe(email))
            .await
    }

    /// Archive (soft-delete) the member. The service keeps their data, and
    /// they can be re-added later.
    #[tracing::instrument(
        name = "Archiving list member",
        skip(self, email),
        fields(email = %email.as_ref())
    )]
    pub async fn archive(
        &self,
        list_id: &str,
        email: impl AsRef<str>,
    ) -> Result<ApiResponse, MailchimpError> {
        let email = email.as_ref();
        let endpoint = member_endpoint(list_id, MemberId::derive(email).as_ref());
        self.call("delete", &endpoint, &payload::archive(email))
            .await
    }

    /// Permanently erase the member and all their data. The same address
    /// cannot be re-imported afterwards, only re-subscribed by the person
    /// themselves.
    // the api does this with a POST to an action path, not with DELETE
    #[tracing::instrument(
        name = "Permanently deleting list member",
        skip(self, email),
        fields(email = %email.as_ref())
    )]
    pub async fn delete(
        &self,
        list_id: &str,
        email: impl AsRef<str>,
    ) -> Result<ApiResponse, MailchimpError> {
        let member_id = MemberId::derive(email.as_ref());
        let endpoint = format!(
            "{}/actions/delete-permanent",
            member_endpoint(list_id, member_id.as_ref())
        );
        self.call("post", &endpoint, &Params::new()).await
    }
}
