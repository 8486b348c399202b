use serde_json::Value;

use crate::error::MailchimpError;
use crate::mailchimp_client::MailchimpClient;
use crate::payload::Params;

impl MailchimpClient {
    /// `GET /lists`. `params` are passed through as query parameters (e.g.
    /// `count`, `offset`, `fields`).
    #[tracing::instrument(name = "Getting lists", skip(self))]
    pub async fn get_lists(
        &self,
        params: &Params,
    ) -> Result<Value, MailchimpError> {
        let resp = self.call("get", "/lists", params).await?;
        Ok(resp.into_json())
    }

    /// `GET /lists/{list_id}`
    #[tracing::instrument(name = "Getting list", skip(self))]
    pub async fn get_list(
        &self,
        list_id: &str,
    ) -> Result<Value, MailchimpError> {
        let resp = self
            .call("get", &format!("/lists/{list_id}"), &Params::new())
            .await?;
        Ok(resp.into_json())
    }
}
