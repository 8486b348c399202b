mod api_key;
mod member;
mod member_id;
mod subscriber_email;
// allow external `use` statements to skip `member_id` etc
pub use api_key::resolve_base_url;
pub use api_key::ApiKey;
pub use member::EmailType;
pub use member::Member;
pub use member::MemberStatus;
pub use member::MergeFields;
pub use member_id::MemberId;
pub use subscriber_email::SubscriberEmail;
