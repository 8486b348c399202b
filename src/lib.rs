pub mod configuration;
pub mod domain;
pub mod error;
pub mod lists;
pub mod mailchimp_client;
pub mod members;
pub mod payload;
pub mod telemetry;
pub mod utils;

pub use error::MailchimpError;
pub use mailchimp_client::ApiResponse;
pub use mailchimp_client::MailchimpClient;
