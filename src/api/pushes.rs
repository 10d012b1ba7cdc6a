use std::sync::LazyLock;

use serde_json::Value;

use crate::client::{ApiResponse, RedlinkClient, RedlinkError};
use crate::domain::{Field, Method, Schema, ValueRule, ValueType};

/// `to[].type`: the receiver is a device token.
pub const DEVICE_RECEIVER: i64 = 1;
/// `to[].type`: the receiver is an email address.
pub const EMAIL_RECEIVER: i64 = 2;
/// `to[].type`: the receiver is a phone number.
pub const NUMBER_RECEIVER: i64 = 3;

pub const LOCKSCREEN_VISIBILITY_PUBLIC: i64 = 1;
pub const LOCKSCREEN_VISIBILITY_PRIVATE: i64 = 2;
pub const LOCKSCREEN_VISIBILITY_SECRET: i64 = 3;

pub const ACTION_NONE: i64 = 1;
pub const ACTION_BROWSER: i64 = 2;
pub const ACTION_WEBVIEW: i64 = 3;
pub const ACTION_DEEPLINK: i64 = 4;

/// Predefined action button labels.
pub const BUTTONS: &[i64] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];

fn action_schema() -> Schema {
    Schema::new("push action")
        .field(Field::optional("url", &[ValueType::String]))
        .field(Field::optional("type", &[ValueType::Integer]).rule(ValueRule::OneOfInt(&[
            ACTION_NONE,
            ACTION_BROWSER,
            ACTION_WEBVIEW,
            ACTION_DEEPLINK,
        ])))
}

static SEND_PUSH_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let recipient = Schema::new("push recipient")
        .field(Field::required("receiver", &[ValueType::String]))
        .field(Field::required("externalId", &[ValueType::String]))
        .field(Field::required("type", &[ValueType::Integer]).rule(ValueRule::OneOfInt(&[
            DEVICE_RECEIVER,
            EMAIL_RECEIVER,
            NUMBER_RECEIVER,
        ])));
    let advanced = Schema::new("push advanced")
        .field(Field::optional("subtitle", &[ValueType::String]))
        .field(
            Field::optional("lockscreenVisibility", &[ValueType::Integer]).rule(
                ValueRule::OneOfInt(&[
                    LOCKSCREEN_VISIBILITY_PUBLIC,
                    LOCKSCREEN_VISIBILITY_PRIVATE,
                    LOCKSCREEN_VISIBILITY_SECRET,
                ]),
            ),
        )
        .field(Field::optional("icon", &[ValueType::Object]));
    let button = Schema::new("push action button")
        .field(
            Field::required("button", &[ValueType::Integer]).rule(ValueRule::OneOfInt(BUTTONS)),
        )
        .field(Field::optional("icon", &[ValueType::String]))
        .field(
            Field::required("action", &[ValueType::Object])
                .rule(ValueRule::Nested(action_schema())),
        );

    Schema::new("push")
        .field(Field::required("applications", &[ValueType::Array]))
        .field(Field::required("to", &[ValueType::Array]).rule(ValueRule::Each(recipient)))
        .field(Field::required("title", &[ValueType::Object]))
        .field(Field::required("body", &[ValueType::Object]))
        .field(Field::required("defaultLanguage", &[ValueType::String]))
        .field(Field::optional("image", &[ValueType::String]))
        .field(Field::optional("silent", &[ValueType::Boolean]))
        .field(Field::optional("sound", &[ValueType::String]))
        .field(Field::optional("scheduleTime", &[ValueType::String]))
        .field(Field::optional("ttl", &[ValueType::Integer]))
        .field(Field::optional("externalData", &[ValueType::Object]))
        .field(
            Field::optional("advanced", &[ValueType::Object])
                .rule(ValueRule::Nested(advanced)),
        )
        .field(
            Field::required("action", &[ValueType::Object])
                .rule(ValueRule::Nested(action_schema())),
        )
        .field(Field::optional("actionButtons", &[ValueType::Array]).rule(ValueRule::Each(button)))
});

/// Mobile push sending.
pub struct Pushes<'a> {
    client: &'a RedlinkClient,
}

impl<'a> Pushes<'a> {
    pub(crate) fn new(client: &'a RedlinkClient) -> Self {
        Self { client }
    }

    /// Send a push message described by a schema-validated payload.
    pub async fn send(&self, push: Value) -> Result<ApiResponse, RedlinkError> {
        SEND_PUSH_SCHEMA.validate(&push)?;
        self.client
            .request(Method::Post, "push", &[], &[], Some(push))
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::client::testing::{EMPTY_ENVELOPE, FakeTransport, client_with};
    use crate::domain::ValidationError;

    use super::*;

    fn setup() -> (FakeTransport, RedlinkClient) {
        let transport = FakeTransport::new(200, EMPTY_ENVELOPE);
        let client = client_with(transport.clone());
        (transport, client)
    }

    fn valid_push() -> Value {
        json!({
            "applications": ["app-1"],
            "to": [{"receiver": "token", "externalId": "e-1", "type": DEVICE_RECEIVER}],
            "title": {"pl": "Czesc"},
            "body": {"pl": "Tresc"},
            "defaultLanguage": "pl",
            "action": {"type": ACTION_NONE}
        })
    }

    #[tokio::test]
    async fn send_posts_a_valid_payload() {
        let (transport, client) = setup();

        client.pushes().send(valid_push()).await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.uri, "https://example.invalid/v2.1/push");
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, valid_push());
    }

    #[tokio::test]
    async fn recipients_must_carry_a_known_type() {
        let (transport, client) = setup();

        let mut push = valid_push();
        push["to"][0]["type"] = json!(7);
        let err = client.pushes().send(push).await.unwrap_err();
        assert!(matches!(
            err,
            RedlinkError::Validation(ValidationError::InvalidValue {
                schema: "push recipient",
                field: "type",
                ..
            })
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn action_is_required() {
        let (transport, client) = setup();

        let mut push = valid_push();
        push.as_object_mut().unwrap().remove("action");
        let err = client.pushes().send(push).await.unwrap_err();
        assert!(matches!(
            err,
            RedlinkError::Validation(ValidationError::MissingField {
                schema: "push",
                field: "action"
            })
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn action_buttons_are_validated_recursively() {
        let (transport, client) = setup();

        let mut push = valid_push();
        push["actionButtons"] = json!([{"button": 99, "action": {"type": ACTION_NONE}}]);
        let err = client.pushes().send(push).await.unwrap_err();
        assert!(matches!(
            err,
            RedlinkError::Validation(ValidationError::InvalidValue {
                schema: "push action button",
                field: "button",
                ..
            })
        ));

        let mut push = valid_push();
        push["actionButtons"] =
            json!([{"button": 9, "icon": "open.png", "action": {"type": ACTION_BROWSER, "url": "https://example.com"}}]);
        client.pushes().send(push).await.unwrap();
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn advanced_lockscreen_visibility_is_bounded() {
        let (transport, client) = setup();

        let mut push = valid_push();
        push["advanced"] = json!({"lockscreenVisibility": 4});
        let err = client.pushes().send(push).await.unwrap_err();
        assert!(matches!(
            err,
            RedlinkError::Validation(ValidationError::InvalidValue {
                schema: "push advanced",
                field: "lockscreenVisibility",
                ..
            })
        ));
        assert_eq!(transport.calls(), 0);
    }
}
