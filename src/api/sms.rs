use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::api::{Page, Sorting, format_date};
use crate::client::{ApiResponse, RedlinkClient, RedlinkError};
use crate::domain::constraint::{validate_date_range, validate_pagination};
use crate::domain::{Field, Method, Schema, ValueRule, ValueType};

/// `type` value of an ordinary SMS.
pub const REGULAR_SMS: i64 = 0;
/// `type` value of a flash SMS, shown immediately and not stored.
pub const FLASH_SMS: i64 = 1;

static SEND_SMS_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("sms")
        .field(Field::required("sender", &[ValueType::String]))
        .field(Field::required("message", &[ValueType::String]))
        .field(Field::required("phoneNumbers", &[ValueType::Array]))
        .field(
            Field::optional("validity", &[ValueType::Integer])
                .rule(ValueRule::IntRange { min: 0, max: 4320 }),
        )
        .field(Field::optional("scheduleTime", &[ValueType::Integer]))
        .field(
            Field::optional("type", &[ValueType::Integer])
                .rule(ValueRule::OneOfInt(&[REGULAR_SMS, FLASH_SMS])),
        )
        .field(Field::optional("shortLink", &[ValueType::Boolean]))
        .field(Field::optional("webhookUrl", &[ValueType::String]))
        .field(Field::optional("externalId", &[ValueType::String]))
});

#[derive(Debug, Clone, Default)]
/// Optional filters for [`Sms::list`].
pub struct SmsFilter {
    pub sender: Option<String>,
    pub phone_number: Option<String>,
    pub status: Option<i64>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

/// SMS sending, listing, and HLR number verification.
pub struct Sms<'a> {
    client: &'a RedlinkClient,
}

impl<'a> Sms<'a> {
    pub(crate) fn new(client: &'a RedlinkClient) -> Self {
        Self { client }
    }

    /// List delivery statuses, optionally narrowed to a date window and a
    /// set of senders.
    pub async fn list_statuses(
        &self,
        page: Page,
        date_from: Option<&DateTime<Utc>>,
        date_to: Option<&DateTime<Utc>>,
        senders: Option<&[String]>,
    ) -> Result<ApiResponse, RedlinkError> {
        validate_pagination(Some(page.limit), Some(page.offset), None)?;
        validate_date_range(date_from.copied(), date_to.copied())?;

        let mut query = vec![
            ("limit", page.limit.to_string()),
            ("offset", page.offset.to_string()),
        ];
        if let Some(from) = date_from {
            query.push(("dateFrom", format_date(from)));
        }
        if let Some(to) = date_to {
            query.push(("dateTo", format_date(to)));
        }
        if let Some(senders) = senders {
            query.push(("sender", senders.join(",")));
        }

        self.client
            .request(Method::Get, "sms/statuses", &[], &query, None)
            .await
    }

    /// List sender names assigned to the API key.
    pub async fn list_senders(&self) -> Result<ApiResponse, RedlinkError> {
        self.client
            .request(Method::Options, "sms/senders", &[], &[], None)
            .await
    }

    /// List sent messages using pagination, sorting, and optional filters.
    pub async fn list(
        &self,
        filter: &SmsFilter,
        page: Page,
        sorting: Sorting,
    ) -> Result<ApiResponse, RedlinkError> {
        validate_pagination(
            Some(page.limit),
            Some(page.offset),
            Some(&sorting.order_direction),
        )?;
        validate_date_range(filter.date_from, filter.date_to)?;

        let mut query = vec![
            ("limit", page.limit.to_string()),
            ("offset", page.offset.to_string()),
            ("orderBy", sorting.order_by),
            ("orderDirection", sorting.order_direction),
        ];
        if let Some(status) = filter.status {
            query.push(("status", status.to_string()));
        }
        if let Some(sender) = &filter.sender {
            query.push(("sender", sender.clone()));
        }
        if let Some(phone_number) = &filter.phone_number {
            query.push(("phoneNumber", phone_number.clone()));
        }
        if let Some(from) = &filter.date_from {
            query.push(("dateFrom", format_date(from)));
        }
        if let Some(to) = &filter.date_to {
            query.push(("dateTo", format_date(to)));
        }

        self.client
            .request(Method::Get, "sms", &[], &query, None)
            .await
    }

    /// Query HLR information (IMSI, network, ported state) for a number.
    pub async fn verify_number(&self, phone_number: &str) -> Result<ApiResponse, RedlinkError> {
        self.client
            .request(
                Method::Post,
                "sms/hlr",
                &[],
                &[],
                Some(json!({ "phone": phone_number })),
            )
            .await
    }

    /// Send an SMS described by a schema-validated payload.
    pub async fn send(&self, sms: Value) -> Result<ApiResponse, RedlinkError> {
        SEND_SMS_SCHEMA.validate(&sms)?;
        self.client
            .request(Method::Post, "sms", &[], &[], Some(sms))
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::client::testing::{EMPTY_ENVELOPE, FakeTransport, client_with};
    use crate::domain::ValidationError;

    use super::*;

    fn setup() -> (FakeTransport, RedlinkClient) {
        let transport = FakeTransport::new(200, EMPTY_ENVELOPE);
        let client = client_with(transport.clone());
        (transport, client)
    }

    fn valid_sms() -> Value {
        json!({
            "sender": "INFO",
            "message": "hello",
            "phoneNumbers": ["+48123123123"]
        })
    }

    #[tokio::test]
    async fn list_senders_uses_the_options_verb() {
        let (transport, client) = setup();

        client.sms().list_senders().await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::Options);
        assert_eq!(request.uri, "https://example.invalid/v2.1/sms/senders");
    }

    #[tokio::test]
    async fn list_statuses_joins_senders_with_commas() {
        let (transport, client) = setup();

        let senders = vec!["INFO".to_owned(), "PROMO".to_owned()];
        client
            .sms()
            .list_statuses(Page::default(), None, None, Some(&senders))
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(
            request.uri,
            "https://example.invalid/v2.1/sms/statuses?limit=100&offset=0&sender=INFO%2CPROMO"
        );
    }

    #[tokio::test]
    async fn list_applies_filters_and_sorting() {
        let (transport, client) = setup();

        let filter = SmsFilter {
            sender: Some("INFO".to_owned()),
            phone_number: Some("+48123123123".to_owned()),
            status: Some(3),
            date_from: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            date_to: Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()),
        };
        client
            .sms()
            .list(&filter, Page::new(10, 0), Sorting::default())
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(
            request.uri,
            "https://example.invalid/v2.1/sms?limit=10&offset=0&orderBy=id&orderDirection=DESC\
             &status=3&sender=INFO&phoneNumber=%2B48123123123\
             &dateFrom=2024-01-01+00%3A00%3A00&dateTo=2024-01-02+00%3A00%3A00"
        );
    }

    #[tokio::test]
    async fn list_rejects_nonpositive_limit() {
        let (transport, client) = setup();

        let err = client
            .sms()
            .list(&SmsFilter::default(), Page::new(0, 0), Sorting::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RedlinkError::Validation(ValidationError::LimitNotPositive { actual: 0 })
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn verify_number_posts_the_phone() {
        let (transport, client) = setup();

        client.sms().verify_number("+48123123123").await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.uri, "https://example.invalid/v2.1/sms/hlr");
        assert_eq!(request.body.as_deref(), Some(r#"{"phone":"+48123123123"}"#));
    }

    #[tokio::test]
    async fn send_posts_a_valid_payload() {
        let (transport, client) = setup();

        client.sms().send(valid_sms()).await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.uri, "https://example.invalid/v2.1/sms");
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, valid_sms());
    }

    #[tokio::test]
    async fn send_bounds_validity_and_type() {
        let (transport, client) = setup();

        let mut sms = valid_sms();
        sms["validity"] = json!(5000);
        let err = client.sms().send(sms).await.unwrap_err();
        assert!(matches!(
            err,
            RedlinkError::Validation(ValidationError::InvalidValue {
                schema: "sms",
                field: "validity",
                ..
            })
        ));

        let mut sms = valid_sms();
        sms["type"] = json!(2);
        assert!(client.sms().send(sms).await.is_err());
        assert_eq!(transport.calls(), 0);

        let mut sms = valid_sms();
        sms["type"] = json!(FLASH_SMS);
        client.sms().send(sms).await.unwrap();
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn send_requires_phone_numbers() {
        let (transport, client) = setup();

        let mut sms = valid_sms();
        sms.as_object_mut().unwrap().remove("phoneNumbers");
        let err = client.sms().send(sms).await.unwrap_err();
        assert!(matches!(
            err,
            RedlinkError::Validation(ValidationError::MissingField {
                schema: "sms",
                field: "phoneNumbers"
            })
        ));
        assert_eq!(transport.calls(), 0);
    }
}
