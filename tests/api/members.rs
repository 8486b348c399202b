use claims::assert_err;
use claims::assert_ok;
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use mailchimp_client::domain::Member;
use mailchimp_client::domain::MemberId;
use mailchimp_client::domain::MemberStatus;
use mailchimp_client::domain::MergeFields;
use mailchimp_client::domain::SubscriberEmail;
use mailchimp_client::members::member_endpoint;
use mailchimp_client::MailchimpError;
use serde_json::json;
use wiremock::matchers::any;
use wiremock::matchers::basic_auth;
use wiremock::matchers::body_json;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::ResponseTemplate;

use crate::helpers::spawn_app;
use crate::helpers::API_KEY;
use crate::helpers::LIST_ID;

// md5("user@example.com")
const USER_HASH: &str = "b58996c504c5638798eb6b511e6f49af";

#[tokio::test]
async fn unsubscribe() {
    let app = spawn_app().await;

    Mock::given(path(format!("/lists/{LIST_ID}/members/{USER_HASH}")))
        .and(method("PUT"))
        .and(basic_auth("mcuser", API_KEY))
        .and(body_json(json!({
            "email_address": "User@Example.com",
            "status_if_new": "unsubscribed",
            "status": "unsubscribed",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "unsubscribed"})))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    let resp = assert_ok!(app.client.unsubscribe(LIST_ID, "User@Example.com").await);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json["status"], "unsubscribed");
}

#[tokio::test]
async fn add_update_without_merge_fields() {
    let app = spawn_app().await;

    Mock::given(path(format!("/lists/{LIST_ID}/members/{USER_HASH}")))
        .and(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    assert_ok!(
        app.client
            .add_update(LIST_ID, "User@Example.com", &MergeFields::new(), false)
            .await
    );

    // an empty `merge_fields` is not the same as none at all, as far as the
    // api is concerned
    assert_eq!(
        app.single_request_body().await,
        json!({
            "email_address": "user@example.com",
            "status_if_new": "subscribed",
            "status": "subscribed",
        })
    );
}

#[tokio::test]
async fn add_update_with_confirmation() {
    let app = spawn_app().await;

    let merge = MergeFields::from([("FNAME".to_string(), json!("Jo"))]);

    Mock::given(path(format!("/lists/{LIST_ID}/members/{USER_HASH}")))
        .and(method("PUT"))
        .and(body_json(json!({
            "email_address": "user@example.com",
            "status_if_new": "pending",
            "status": "pending",
            "merge_fields": {"FNAME": "Jo"},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    assert_ok!(
        app.client
            .add_update(LIST_ID, "user@example.com", &merge, true)
            .await
    );
}

#[tokio::test]
async fn add_update_member() {
    let app = spawn_app().await;

    let email: String = SafeEmail().fake();
    let member = Member::new(SubscriberEmail::parse(email.clone()).unwrap())
        .status(MemberStatus::Subscribed)
        .merge_field("LNAME", "Smith")
        .vip(true);

    Mock::given(path(member_endpoint(LIST_ID, member.hash().as_ref())))
        .and(method("PUT"))
        .and(body_json(json!({
            "email_address": email,
            "status_if_new": "subscribed",
            "status": "subscribed",
            "merge_fields": {"LNAME": "Smith"},
            "vip": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    assert_ok!(app.client.add_update_member(LIST_ID, &member).await);
}

#[tokio::test]
async fn add_update_rejected() {
    let app = spawn_app().await;

    let text = r#"{"title":"Invalid Resource","status":400,"errors":[{"field":"email_address","message":"This value should be a valid email."}]}"#;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(400).set_body_string(text))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    let e = assert_err!(
        app.client
            .add_update(LIST_ID, "not-an-email", &MergeFields::new(), false)
            .await
    );
    assert!(matches!(e, MailchimpError::BadRequest { status: 400, .. }));
    // the per-field breakdown is only available in the raw body
    let body: serde_json::Value = serde_json::from_str(e.raw_body().unwrap()).unwrap();
    assert_eq!(body["errors"][0]["field"], "email_address");
}

#[tokio::test]
async fn get_member() {
    let app = spawn_app().await;

    Mock::given(path(format!("/lists/{LIST_ID}/members/{USER_HASH}")))
        .and(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"email_address": "user@example.com", "status": "pending"})),
        )
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    let member_id = MemberId::derive("USER@example.com");
    let member = assert_ok!(app.client.get_member(LIST_ID, member_id.as_ref()).await);
    assert_eq!(member["status"], "pending");
}

#[tokio::test]
async fn get_missing_member() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"status": 404})))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    let e = assert_err!(app.client.get_member(LIST_ID, USER_HASH).await);
    assert!(e.is_not_found());
}

#[tokio::test]
async fn archive_uses_delete() {
    let app = spawn_app().await;

    Mock::given(path(format!("/lists/{LIST_ID}/members/{USER_HASH}")))
        .and(method("DELETE"))
        .and(basic_auth("mcuser", API_KEY))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    let resp = assert_ok!(app.client.archive(LIST_ID, "User@Example.com").await);
    assert_eq!(resp.status, 204);
    assert_eq!(resp.json, serde_json::Value::Null);

    // DELETE carries its parameters in the query string
    let reqs = app.mailchimp_server.received_requests().await.unwrap();
    assert_eq!(
        reqs[0].url.query(),
        Some("email_address=User%40Example.com")
    );
}

#[tokio::test]
async fn delete_permanent_uses_post_without_body() {
    let app = spawn_app().await;

    Mock::given(path(format!(
        "/lists/{LIST_ID}/members/{USER_HASH}/actions/delete-permanent"
    )))
    .and(method("POST"))
    .and(basic_auth("mcuser", API_KEY))
    .respond_with(ResponseTemplate::new(204))
    .expect(1)
    .mount(&app.mailchimp_server)
    .await;

    let resp = assert_ok!(app.client.delete(LIST_ID, "user@EXAMPLE.com").await);
    assert_eq!(resp.status, 204);

    let reqs = app.mailchimp_server.received_requests().await.unwrap();
    assert!(reqs[0].body.is_empty());
    assert_eq!(reqs[0].url.query(), None);
}

#[tokio::test]
async fn concurrent_calls_keep_their_own_status() {
    let app = spawn_app().await;

    Mock::given(path(format!("/lists/{LIST_ID}/members/{USER_HASH}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&app.mailchimp_server)
        .await;
    Mock::given(path(format!("/lists/{LIST_ID}/members/nobody")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&app.mailchimp_server)
        .await;

    let (found, missing) = tokio::join!(
        app.client.get_member(LIST_ID, USER_HASH),
        app.client.get_member(LIST_ID, "nobody"),
    );
    assert_ok!(found);
    assert!(assert_err!(missing).is_not_found());
}
