use serde_json::{Map, Value, json};

use crate::api::Page;
use crate::client::{ApiResponse, RedlinkClient, RedlinkError};
use crate::domain::constraint::{validate_non_empty, validate_pagination};
use crate::domain::{Method, remove_null_values};

/// Email and domain blacklists kept per SMTP account.
pub struct Blacklists<'a> {
    client: &'a RedlinkClient,
}

impl<'a> Blacklists<'a> {
    pub(crate) fn new(client: &'a RedlinkClient) -> Self {
        Self { client }
    }

    /// List blacklisted domains of an SMTP account.
    pub async fn list_domains(&self, smtp: &str) -> Result<ApiResponse, RedlinkError> {
        let params = [("smtp", smtp.to_owned())];
        self.client
            .request(
                Method::Get,
                "email/domain/blacklist/{smtp}",
                &params,
                &[],
                None,
            )
            .await
    }

    /// Blacklist a single domain.
    pub async fn add_domain(&self, smtp: &str, domain: &str) -> Result<ApiResponse, RedlinkError> {
        let params = [("smtp", smtp.to_owned())];
        self.client
            .request(
                Method::Post,
                "email/domain/blacklist/{smtp}",
                &params,
                &[],
                Some(json!({ "domain": domain })),
            )
            .await
    }

    /// Blacklist multiple domains at once.
    pub async fn batch_add_domains(
        &self,
        smtp: &str,
        domains: &[String],
    ) -> Result<ApiResponse, RedlinkError> {
        validate_non_empty("domains", domains)?;

        let params = [("smtp", smtp.to_owned())];
        self.client
            .request(
                Method::Post,
                "email/domain/blacklist/{smtp}",
                &params,
                &[],
                Some(json!(domains)),
            )
            .await
    }

    /// Remove a single domain from the blacklist.
    pub async fn remove_domain(
        &self,
        smtp: &str,
        domain: &str,
    ) -> Result<ApiResponse, RedlinkError> {
        let params = [("smtp", smtp.to_owned())];
        self.client
            .request(
                Method::Delete,
                "email/domain/blacklist/{smtp}",
                &params,
                &[],
                Some(json!({ "id": [domain] })),
            )
            .await
    }

    /// Remove multiple domains from the blacklist at once.
    pub async fn batch_remove_domains(
        &self,
        smtp: &str,
        domains: &[String],
    ) -> Result<ApiResponse, RedlinkError> {
        validate_non_empty("domains", domains)?;

        let params = [("smtp", smtp.to_owned())];
        self.client
            .request(
                Method::Delete,
                "email/domain/blacklist/{smtp}",
                &params,
                &[],
                Some(json!({ "id": domains })),
            )
            .await
    }

    /// List the predefined blacklisting reasons.
    pub async fn list_reasons(&self) -> Result<ApiResponse, RedlinkError> {
        self.client
            .request(Method::Options, "email/blacklist/reason", &[], &[], None)
            .await
    }

    /// List blacklisted addresses of an SMTP account.
    pub async fn list_emails(&self, smtp: &str, page: Page) -> Result<ApiResponse, RedlinkError> {
        validate_pagination(Some(page.limit), Some(page.offset), None)?;

        let query = [
            ("limit", page.limit.to_string()),
            ("offset", page.offset.to_string()),
            ("smtpAccount", smtp.to_owned()),
        ];
        self.client
            .request(Method::Get, "email/blacklist", &[], &query, None)
            .await
    }

    /// Blacklist an address; reason and comment are pruned when absent.
    pub async fn add_email(
        &self,
        email: &str,
        smtp: &str,
        reason: Option<&str>,
        comment: Option<&str>,
    ) -> Result<ApiResponse, RedlinkError> {
        let mut body = Map::new();
        body.insert("email".to_owned(), Value::String(email.to_owned()));
        body.insert("smtpAccount".to_owned(), Value::String(smtp.to_owned()));
        body.insert(
            "reason".to_owned(),
            reason.map_or(Value::Null, |r| Value::String(r.to_owned())),
        );
        body.insert(
            "comment".to_owned(),
            comment.map_or(Value::Null, |c| Value::String(c.to_owned())),
        );

        self.client
            .request(
                Method::Post,
                "email/blacklist",
                &[],
                &[],
                Some(Value::Object(remove_null_values(&body))),
            )
            .await
    }

    /// Remove a single address from the blacklist.
    pub async fn remove_email(&self, smtp: &str, email: &str) -> Result<ApiResponse, RedlinkError> {
        let params = [("smtp", smtp.to_owned())];
        self.client
            .request(
                Method::Delete,
                "email/blacklist/{smtp}",
                &params,
                &[],
                Some(json!({ "id": [email] })),
            )
            .await
    }

    /// Remove multiple addresses from the blacklist at once.
    pub async fn batch_remove_emails(
        &self,
        smtp: &str,
        emails: &[String],
    ) -> Result<ApiResponse, RedlinkError> {
        validate_non_empty("emails", emails)?;

        let params = [("smtp", smtp.to_owned())];
        self.client
            .request(
                Method::Delete,
                "email/blacklist/{smtp}",
                &params,
                &[],
                Some(json!({ "id": emails })),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::testing::{EMPTY_ENVELOPE, FakeTransport, client_with};
    use crate::domain::ValidationError;

    use super::*;

    fn setup() -> (FakeTransport, RedlinkClient) {
        let transport = FakeTransport::new(200, EMPTY_ENVELOPE);
        let client = client_with(transport.clone());
        (transport, client)
    }

    #[tokio::test]
    async fn list_reasons_uses_the_options_verb() {
        let (transport, client) = setup();

        client.blacklists().list_reasons().await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::Options);
        assert_eq!(
            request.uri,
            "https://example.invalid/v2.1/email/blacklist/reason"
        );
    }

    #[tokio::test]
    async fn domain_paths_resolve_the_smtp_placeholder() {
        let (transport, client) = setup();

        client
            .blacklists()
            .add_domain("1.smtp", "spam.example")
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::Post);
        assert_eq!(
            request.uri,
            "https://example.invalid/v2.1/email/domain/blacklist/1.smtp"
        );
        assert_eq!(request.body.as_deref(), Some(r#"{"domain":"spam.example"}"#));
    }

    #[tokio::test]
    async fn batch_add_domains_sends_the_bare_array() {
        let (transport, client) = setup();

        let domains = vec!["a.example".to_owned(), "b.example".to_owned()];
        client
            .blacklists()
            .batch_add_domains("1.smtp", &domains)
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(
            request.body.as_deref(),
            Some(r#"["a.example","b.example"]"#)
        );
    }

    #[tokio::test]
    async fn batch_operations_reject_empty_collections() {
        let (transport, client) = setup();

        let err = client
            .blacklists()
            .batch_remove_emails("1.smtp", &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RedlinkError::Validation(ValidationError::Empty { field: "emails" })
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn add_email_prunes_absent_reason_and_comment() {
        let (transport, client) = setup();

        client
            .blacklists()
            .add_email("user@example.com", "1.smtp", None, None)
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(
            request.body.as_deref(),
            Some(r#"{"email":"user@example.com","smtpAccount":"1.smtp"}"#)
        );
    }

    #[tokio::test]
    async fn add_email_keeps_reason_and_comment_when_given() {
        let (transport, client) = setup();

        client
            .blacklists()
            .add_email("user@example.com", "1.smtp", Some("bounce"), Some("hard"))
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(
            request.body.as_deref(),
            Some(
                r#"{"comment":"hard","email":"user@example.com","reason":"bounce","smtpAccount":"1.smtp"}"#
            )
        );
    }

    #[tokio::test]
    async fn remove_email_wraps_the_address_in_a_list() {
        let (transport, client) = setup();

        client
            .blacklists()
            .remove_email("1.smtp", "user@example.com")
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::Delete);
        assert_eq!(
            request.uri,
            "https://example.invalid/v2.1/email/blacklist/1.smtp"
        );
        assert_eq!(request.body.as_deref(), Some(r#"{"id":["user@example.com"]}"#));
    }

    #[tokio::test]
    async fn list_emails_filters_by_smtp_account() {
        let (transport, client) = setup();

        client
            .blacklists()
            .list_emails("1.smtp", Page::new(50, 10))
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(
            request.uri,
            "https://example.invalid/v2.1/email/blacklist?limit=50&offset=10&smtpAccount=1.smtp"
        );
    }
}
