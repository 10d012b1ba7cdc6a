use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};

use crate::api::{Page, format_date};
use crate::client::{ApiResponse, RedlinkClient, RedlinkError};
use crate::domain::constraint::{
    validate_date_range, validate_non_empty, validate_pagination, validate_positive_id,
};
use crate::domain::{Field, Method, Schema, ValidationError, ValueRule, ValueType};

/// Payload constraints shared by contact create, update, and batch update.
static CONTACT_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("contact")
        .field(Field::optional("email", &[ValueType::String]).rule(ValueRule::email()))
        .field(
            Field::optional("externalId", &[ValueType::String]).rule(ValueRule::MaxLength(150)),
        )
        .field(Field::optional("firstName", &[ValueType::String]).rule(ValueRule::MaxLength(150)))
        .field(Field::optional("lastName", &[ValueType::String]).rule(ValueRule::MaxLength(150)))
        .field(Field::optional("phoneNumber", &[ValueType::String]).rule(ValueRule::phone_number()))
        .field(
            Field::optional("companyName", &[ValueType::String]).rule(ValueRule::MaxLength(150)),
        )
        .field(Field::optional("createdAt", &[ValueType::String]).rule(ValueRule::date_time()))
        .field(Field::optional("addToGroup", &[ValueType::Array]))
        .field(Field::optional("externalData", &[ValueType::Object]))
});

/// Shape of a single batch-update entry: a key plus the contact payload.
static BATCH_UPDATE_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("contact update")
        .field(Field::optional("id", &[ValueType::String, ValueType::Integer]))
        .field(Field::optional("externalId", &[ValueType::String]))
        .field(Field::optional("data", &[ValueType::Object]))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which key field identifies the contact in [`Contacts::update`].
pub enum UpdateKey {
    ById,
    ByExternalId,
}

impl UpdateKey {
    fn field(self) -> &'static str {
        match self {
            Self::ById => "id",
            Self::ByExternalId => "externalId",
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Optional filters for [`Contacts::list`].
pub struct ContactFilter {
    pub group_id: Option<i64>,
    pub contact_id: Option<i64>,
    pub external_id: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub in_archive: Option<bool>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

/// Contacts management.
pub struct Contacts<'a> {
    client: &'a RedlinkClient,
}

impl<'a> Contacts<'a> {
    pub(crate) fn new(client: &'a RedlinkClient) -> Self {
        Self { client }
    }

    /// List contacts using pagination and optional filters.
    pub async fn list(
        &self,
        filter: ContactFilter,
        page: Page,
    ) -> Result<ApiResponse, RedlinkError> {
        validate_pagination(Some(page.limit), Some(page.offset), None)?;
        validate_date_range(filter.date_from, filter.date_to)?;

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(group_id) = filter.group_id {
            query.push(("groupId", group_id.to_string()));
        }
        if let Some(contact_id) = filter.contact_id {
            query.push(("contactId", contact_id.to_string()));
        }
        if let Some(external_id) = &filter.external_id {
            query.push(("externalId", external_id.clone()));
        }
        if let Some(phone_number) = &filter.phone_number {
            query.push(("phoneNumber", phone_number.clone()));
        }
        if let Some(email) = &filter.email {
            query.push(("email", email.clone()));
        }
        if let Some(in_archive) = filter.in_archive {
            query.push(("inArchive", if in_archive { "1" } else { "0" }.to_owned()));
        }
        if let Some(date_from) = &filter.date_from {
            query.push(("dateFrom", format_date(date_from)));
        }
        if let Some(date_to) = &filter.date_to {
            query.push(("dateTo", format_date(date_to)));
        }
        query.push(("limit", page.limit.to_string()));
        query.push(("offset", page.offset.to_string()));

        self.client
            .request(Method::Get, "contact", &[], &query, None)
            .await
    }

    /// List additional contact fields using pagination.
    pub async fn list_additional_fields(&self, page: Page) -> Result<ApiResponse, RedlinkError> {
        validate_pagination(Some(page.limit), Some(page.offset), None)?;

        let query = [
            ("limit", page.limit.to_string()),
            ("offset", page.offset.to_string()),
        ];
        self.client
            .request(Method::Get, "contact/field", &[], &query, None)
            .await
    }

    /// List segments using pagination.
    pub async fn list_segments(&self, page: Page) -> Result<ApiResponse, RedlinkError> {
        validate_pagination(Some(page.limit), Some(page.offset), None)?;

        let query = [
            ("limit", page.limit.to_string()),
            ("offset", page.offset.to_string()),
        ];
        self.client
            .request(Method::Get, "contact/segment", &[], &query, None)
            .await
    }

    /// Get a single segment.
    pub async fn get_segment(&self, segment_id: i64) -> Result<ApiResponse, RedlinkError> {
        validate_positive_id("segmentId", segment_id)?;

        let params = [("id", segment_id.to_string())];
        self.client
            .request(Method::Get, "contact/segment/{id}", &params, &[], None)
            .await
    }

    /// Show the groups a contact belongs to.
    pub async fn list_groups(&self, contact_id: i64) -> Result<ApiResponse, RedlinkError> {
        validate_positive_id("contactId", contact_id)?;

        let params = [("id", contact_id.to_string())];
        self.client
            .request(Method::Get, "contact/{id}/group", &params, &[], None)
            .await
    }

    /// Remove one assigned group from a contact.
    pub async fn remove_group(
        &self,
        contact_id: i64,
        group_id: i64,
    ) -> Result<ApiResponse, RedlinkError> {
        validate_positive_id("contactId", contact_id)?;
        validate_positive_id("groupId", group_id)?;
        self.batch_remove_group(contact_id, &[group_id]).await
    }

    /// Remove assigned groups from a contact.
    pub async fn batch_remove_group(
        &self,
        contact_id: i64,
        group_ids: &[i64],
    ) -> Result<ApiResponse, RedlinkError> {
        validate_positive_id("contactId", contact_id)?;
        validate_non_empty("groupIds", group_ids)?;

        let params = [("id", contact_id.to_string())];
        self.client
            .request(
                Method::Delete,
                "contact/{id}/group",
                &params,
                &[],
                Some(json!({ "id": group_ids })),
            )
            .await
    }

    /// Assign one group to a contact.
    pub async fn add_group(
        &self,
        contact_id: i64,
        group_id: i64,
    ) -> Result<ApiResponse, RedlinkError> {
        validate_positive_id("contactId", contact_id)?;
        validate_positive_id("groupId", group_id)?;
        self.batch_add_group(contact_id, &[group_id]).await
    }

    /// Assign groups to a contact.
    pub async fn batch_add_group(
        &self,
        contact_id: i64,
        group_ids: &[i64],
    ) -> Result<ApiResponse, RedlinkError> {
        validate_positive_id("contactId", contact_id)?;
        validate_non_empty("groupIds", group_ids)?;

        let params = [("id", contact_id.to_string())];
        self.client
            .request(
                Method::Post,
                "contact/{id}/group",
                &params,
                &[],
                Some(json!({ "id": group_ids })),
            )
            .await
    }

    /// Remove a single contact.
    pub async fn remove(&self, contact_id: i64) -> Result<ApiResponse, RedlinkError> {
        validate_positive_id("contactId", contact_id)?;

        self.client
            .request(
                Method::Delete,
                "contact",
                &[],
                &[],
                Some(json!({ "id": [contact_id] })),
            )
            .await
    }

    /// Remove multiple contacts at once.
    pub async fn batch_remove(&self, contact_ids: &[i64]) -> Result<ApiResponse, RedlinkError> {
        validate_non_empty("contactIds", contact_ids)?;

        self.client
            .request(
                Method::Delete,
                "contact",
                &[],
                &[],
                Some(json!({ "id": contact_ids })),
            )
            .await
    }

    /// Unsubscribe multiple contacts at once.
    pub async fn unsubscribe(&self, contact_ids: &[i64]) -> Result<ApiResponse, RedlinkError> {
        validate_non_empty("contactIds", contact_ids)?;

        self.client
            .request(
                Method::Post,
                "contact/unsubscribe",
                &[],
                &[],
                Some(json!({ "id": contact_ids })),
            )
            .await
    }

    /// Resubscribe multiple contacts at once.
    pub async fn resubscribe(&self, contact_ids: &[i64]) -> Result<ApiResponse, RedlinkError> {
        validate_non_empty("contactIds", contact_ids)?;

        self.client
            .request(
                Method::Post,
                "contact/resubscribe",
                &[],
                &[],
                Some(json!({ "id": contact_ids })),
            )
            .await
    }

    /// Create a single contact. The payload is schema-validated and sent
    /// wrapped in a one-element array, matching the batch endpoint.
    pub async fn create(&self, contact: Value) -> Result<ApiResponse, RedlinkError> {
        CONTACT_SCHEMA.validate(&contact)?;

        self.client
            .request(Method::Post, "contact", &[], &[], Some(json!([contact])))
            .await
    }

    /// Create multiple contacts at once. Each record is schema-validated;
    /// the array is sent as-is, never map-pruned.
    pub async fn batch_create(&self, contacts: Vec<Value>) -> Result<ApiResponse, RedlinkError> {
        validate_non_empty("contacts", &contacts)?;
        CONTACT_SCHEMA.validate_each(&contacts)?;

        self.client
            .request(Method::Post, "contact", &[], &[], Some(Value::Array(contacts)))
            .await
    }

    /// Update a single contact, addressed by id or external id.
    pub async fn update(
        &self,
        key: UpdateKey,
        id_or_external_id: &str,
        contact: Value,
    ) -> Result<ApiResponse, RedlinkError> {
        CONTACT_SCHEMA.validate(&contact)?;

        let mut entry = Map::new();
        entry.insert(
            key.field().to_owned(),
            Value::String(id_or_external_id.to_owned()),
        );
        entry.insert("data".to_owned(), contact);

        self.client
            .request(
                Method::Put,
                "contact",
                &[],
                &[],
                Some(Value::Array(vec![Value::Object(entry)])),
            )
            .await
    }

    /// Update multiple contacts in a single request. Every entry must carry
    /// exactly one of `id`/`externalId` plus an optional `data` payload
    /// validated against the contact schema.
    pub async fn batch_update(&self, entries: Vec<Value>) -> Result<ApiResponse, RedlinkError> {
        validate_non_empty("contacts", &entries)?;
        for entry in &entries {
            BATCH_UPDATE_SCHEMA.validate(entry)?;

            let has_id = entry.get("id").is_some();
            let has_external_id = entry.get("externalId").is_some();
            if has_id == has_external_id {
                return Err(RedlinkError::Validation(ValidationError::InvalidValue {
                    schema: "contact update",
                    field: "id",
                    constraint: "provide exactly one of 'id' or 'externalId'".to_owned(),
                }));
            }

            if let Some(data) = entry.get("data") {
                CONTACT_SCHEMA.validate(data)?;
            }
        }

        self.client
            .request(Method::Put, "contact", &[], &[], Some(Value::Array(entries)))
            .await
    }
}
