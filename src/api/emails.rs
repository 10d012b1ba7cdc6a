use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::api::{Page, format_date};
use crate::client::{ApiResponse, RedlinkClient, RedlinkError};
use crate::domain::constraint::{validate_date_range, validate_pagination};
use crate::domain::{Field, Method, Schema, ValueRule, ValueType};

static SEND_EMAIL_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let address = |name: &'static str| {
        Schema::new(name)
            .field(Field::optional("email", &[ValueType::String]).rule(ValueRule::email()))
            .field(Field::optional("name", &[ValueType::String]))
    };
    let recipient = Schema::new("email recipient")
        .field(Field::required("email", &[ValueType::String]).rule(ValueRule::email()))
        .field(Field::optional("name", &[ValueType::String]))
        .field(Field::required("messageId", &[ValueType::String]))
        .field(Field::optional("vars", &[ValueType::Object]));
    let content = Schema::new("email content")
        .field(Field::optional("html", &[ValueType::String]))
        .field(Field::optional("text", &[ValueType::String]))
        .field(Field::optional("templateId", &[ValueType::String]));

    Schema::new("email")
        .field(Field::required("subject", &[ValueType::String]))
        .field(Field::required("smtpAccount", &[ValueType::String]))
        .field(Field::optional("tags", &[ValueType::Array]))
        .field(Field::required("content", &[ValueType::Object]).rule(ValueRule::Nested(content)))
        .field(Field::optional("bcc", &[ValueType::Array]))
        .field(Field::optional("cc", &[ValueType::Array]))
        .field(Field::required("from", &[ValueType::Object]).rule(ValueRule::Nested(address("email sender"))))
        .field(
            Field::optional("replyTo", &[ValueType::Object])
                .rule(ValueRule::Nested(address("email reply-to"))),
        )
        .field(Field::optional("headers", &[ValueType::Object]))
        .field(Field::required("to", &[ValueType::Array]).rule(ValueRule::Each(recipient)))
        .field(Field::optional("attachments", &[]))
});

/// Transactional email sending, templates, and delivery reports.
pub struct Emails<'a> {
    client: &'a RedlinkClient,
}

impl<'a> Emails<'a> {
    pub(crate) fn new(client: &'a RedlinkClient) -> Self {
        Self { client }
    }

    /// List templates of an SMTP account.
    pub async fn list_templates(
        &self,
        smtp: &str,
        external_id: Option<&str>,
        page: Page,
    ) -> Result<ApiResponse, RedlinkError> {
        validate_pagination(Some(page.limit), Some(page.offset), None)?;

        let mut query = vec![
            ("limit", page.limit.to_string()),
            ("offset", page.offset.to_string()),
        ];
        if let Some(external_id) = external_id {
            query.push(("externalId", external_id.to_owned()));
        }
        query.push(("smtpAccount", smtp.to_owned()));

        self.client
            .request(Method::Get, "email/template", &[], &query, None)
            .await
    }

    /// Register a template under an SMTP account.
    pub async fn add_template(
        &self,
        html: &str,
        text: &str,
        name: &str,
        external_id: &str,
        smtp_account: &str,
    ) -> Result<ApiResponse, RedlinkError> {
        let body = json!({
            "html": html,
            "text": text,
            "name": name,
            "externalId": external_id,
            "smtpAccount": smtp_account,
        });
        self.client
            .request(Method::Post, "email/template", &[], &[], Some(body))
            .await
    }

    /// Remove a template by external id.
    pub async fn remove_template(&self, external_id: &str) -> Result<ApiResponse, RedlinkError> {
        self.client
            .request(
                Method::Delete,
                "email/template",
                &[],
                &[],
                Some(json!({ "externalId": [external_id] })),
            )
            .await
    }

    /// List available SMTP accounts.
    pub async fn list_smtp(&self) -> Result<ApiResponse, RedlinkError> {
        self.client
            .request(Method::Options, "email/smtpAccount", &[], &[], None)
            .await
    }

    /// List link clicks recorded for an SMTP account.
    pub async fn list_clicks(
        &self,
        smtp: &str,
        message_id: Option<&str>,
        page: Page,
        date_from: Option<&DateTime<Utc>>,
        date_to: Option<&DateTime<Utc>>,
    ) -> Result<ApiResponse, RedlinkError> {
        self.report(
            "email/click",
            smtp,
            message_id,
            page,
            date_from,
            date_to,
        )
        .await
    }

    /// List message opens recorded for an SMTP account.
    pub async fn list_opens(
        &self,
        smtp: &str,
        message_id: Option<&str>,
        page: Page,
        date_from: Option<&DateTime<Utc>>,
        date_to: Option<&DateTime<Utc>>,
    ) -> Result<ApiResponse, RedlinkError> {
        self.report("email/open", smtp, message_id, page, date_from, date_to)
            .await
    }

    async fn report(
        &self,
        template: &str,
        smtp: &str,
        message_id: Option<&str>,
        page: Page,
        date_from: Option<&DateTime<Utc>>,
        date_to: Option<&DateTime<Utc>>,
    ) -> Result<ApiResponse, RedlinkError> {
        validate_pagination(Some(page.limit), Some(page.offset), None)?;
        validate_date_range(date_from.copied(), date_to.copied())?;

        let mut query = vec![
            ("limit", page.limit.to_string()),
            ("offset", page.offset.to_string()),
        ];
        if let Some(message_id) = message_id {
            query.push(("messageId", message_id.to_owned()));
        }
        query.push(("smtpAccount", smtp.to_owned()));
        if let Some(from) = date_from {
            query.push(("dateFrom", format_date(from)));
        }
        if let Some(to) = date_to {
            query.push(("dateTo", format_date(to)));
        }

        self.client
            .request(Method::Get, template, &[], &query, None)
            .await
    }

    /// List delivery statuses of sent messages.
    pub async fn list_statuses(
        &self,
        smtp: &str,
        to: Option<&str>,
        message_id: Option<&str>,
        page: Page,
    ) -> Result<ApiResponse, RedlinkError> {
        validate_pagination(Some(page.limit), Some(page.offset), None)?;

        let mut query = vec![
            ("limit", page.limit.to_string()),
            ("offset", page.offset.to_string()),
        ];
        if let Some(message_id) = message_id {
            query.push(("messageId", message_id.to_owned()));
        }
        query.push(("smtpAccount", smtp.to_owned()));
        if let Some(to) = to {
            query.push(("to", to.to_owned()));
        }

        self.client
            .request(Method::Get, "email", &[], &query, None)
            .await
    }

    /// Send an email described by a schema-validated payload.
    pub async fn send(&self, email: Value) -> Result<ApiResponse, RedlinkError> {
        SEND_EMAIL_SCHEMA.validate(&email)?;
        self.client
            .request(Method::Post, "email", &[], &[], Some(email))
            .await
    }
}
