use secrecy::ExposeSecret;
use secrecy::Secret;

const BASE_URL_TEMPLATE: &str = "https://<dc>.api.mailchimp.com/3.0";

/// Build the regional base url from the datacenter ("routing token") that is
/// embedded after the last `-` of an api key, e.g. `abc123-us6` ->
/// `https://us6.api.mailchimp.com/3.0`.
///
/// No validation is done: a key without any `-` is used whole as the
/// datacenter, giving a url that is syntactically valid but will not resolve.
/// Use `ApiKey::parse` to reject such keys up front.
pub fn resolve_base_url(api_key: &str) -> String {
    BASE_URL_TEMPLATE.replace("<dc>", datacenter(api_key))
}

fn datacenter(api_key: &str) -> &str {
    // `rsplit` always yields at least one item
    api_key.rsplit('-').next().unwrap_or(api_key)
}

/// An api key, used both as the basic auth password and to pick the regional
/// host. The key itself is kept secret; it is never printed by `Debug`.
///
/// Must be instantiated with `ApiKey::parse`.
#[derive(Debug, Clone)]
pub struct ApiKey(Secret<String>);

impl ApiKey {
    pub fn parse(key: String) -> Result<Self, String> {
        let well_formed = match key.rsplit_once('-') {
            Some((prefix, dc)) => !prefix.is_empty() && !dc.is_empty(),
            None => false,
        };
        let whitespace = key.chars().any(char::is_whitespace);
        match well_formed && !whitespace {
            true => Ok(Self(Secret::new(key))),
            // don't echo the key back
            false => Err("Invalid api key: expected <key>-<datacenter>".to_string()),
        }
    }

    pub fn datacenter(&self) -> &str { datacenter(self.0.expose_secret()) }

    pub fn base_url(&self) -> String { resolve_base_url(self.0.expose_secret()) }
}

impl ExposeSecret<String> for ApiKey {
    fn expose_secret(&self) -> &String { self.0.expose_secret() }
}

impl TryFrom<Secret<String>> for ApiKey {
    type Error = String;
    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        Self::parse(value.expose_secret().to_owned())
    }
}
