use std::sync::LazyLock;

use serde_json::{Map, Value, json};

use crate::api::{Page, Sorting};
use crate::client::{ApiResponse, RedlinkClient, RedlinkError};
use crate::domain::constraint::{
    validate_non_empty, validate_pagination, validate_positive_id,
};
use crate::domain::{Field, Method, Schema, ValueType, remove_null_values};

static GROUP_CREATE_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("group")
        .field(Field::required("name", &[ValueType::String]))
        .field(Field::required("externalId", &[ValueType::String]))
        .field(Field::optional("description", &[ValueType::String]))
});

static GROUP_UPDATE_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new("group update")
        .field(Field::optional("id", &[ValueType::Integer, ValueType::String]))
        .field(Field::optional("name", &[ValueType::String]))
        .field(Field::optional("description", &[ValueType::String]))
});

/// Length in random bytes of auto-generated group external ids.
const GENERATED_EXTERNAL_ID_BYTES: usize = 16;

/// Groups management.
pub struct Groups<'a> {
    client: &'a RedlinkClient,
}

impl<'a> Groups<'a> {
    pub(crate) fn new(client: &'a RedlinkClient) -> Self {
        Self { client }
    }

    /// List all groups using pagination.
    pub async fn list(&self, page: Page, sorting: Sorting) -> Result<ApiResponse, RedlinkError> {
        validate_pagination(
            Some(page.limit),
            Some(page.offset),
            Some(&sorting.order_direction),
        )?;

        let query = [
            ("limit", page.limit.to_string()),
            ("offset", page.offset.to_string()),
            ("orderBy", sorting.order_by),
            ("orderDirection", sorting.order_direction),
        ];
        self.client
            .request(Method::Get, "group", &[], &query, None)
            .await
    }

    /// List contacts in a group using pagination.
    pub async fn list_contacts(
        &self,
        group_id: i64,
        page: Page,
        sorting: Sorting,
    ) -> Result<ApiResponse, RedlinkError> {
        validate_positive_id("groupId", group_id)?;
        validate_pagination(
            Some(page.limit),
            Some(page.offset),
            Some(&sorting.order_direction),
        )?;

        let params = [("groupId", group_id.to_string())];
        let query = [
            ("limit", page.limit.to_string()),
            ("offset", page.offset.to_string()),
            ("orderBy", sorting.order_by),
            ("orderDirection", sorting.order_direction),
        ];
        self.client
            .request(Method::Get, "group/{groupId}/contact", &params, &query, None)
            .await
    }

    /// Get the number of contacts in a group. Asynchronous on the API side.
    pub async fn count_contacts(&self, group_id: i64) -> Result<ApiResponse, RedlinkError> {
        validate_positive_id("groupId", group_id)?;

        let params = [("groupId", group_id.to_string())];
        self.client
            .request(Method::Get, "group/{groupId}/contact", &params, &[], None)
            .await
    }

    /// Add contact ids to a group.
    pub async fn add_contacts(
        &self,
        group_id: i64,
        contact_ids: &[i64],
    ) -> Result<ApiResponse, RedlinkError> {
        validate_positive_id("groupId", group_id)?;
        validate_non_empty("contactIds", contact_ids)?;

        let params = [("groupId", group_id.to_string())];
        self.client
            .request(
                Method::Post,
                "group/{groupId}/contact",
                &params,
                &[],
                Some(json!({ "id": contact_ids })),
            )
            .await
    }

    /// Remove contact ids from a group.
    pub async fn remove_contacts(
        &self,
        group_id: i64,
        contact_ids: &[i64],
    ) -> Result<ApiResponse, RedlinkError> {
        validate_positive_id("groupId", group_id)?;
        validate_non_empty("contactIds", contact_ids)?;

        let params = [("groupId", group_id.to_string())];
        self.client
            .request(
                Method::Delete,
                "group/{groupId}/contact",
                &params,
                &[],
                Some(json!({ "id": contact_ids })),
            )
            .await
    }

    /// Create a single group. When no external id is supplied one is drawn
    /// from the client's injected generator.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        external_id: Option<&str>,
    ) -> Result<ApiResponse, RedlinkError> {
        let external_id = match external_id {
            Some(id) => id.to_owned(),
            None => self
                .client
                .external_id_generator()
                .generate(GENERATED_EXTERNAL_ID_BYTES),
        };

        let mut body = Map::new();
        body.insert("name".to_owned(), Value::String(name.to_owned()));
        body.insert(
            "description".to_owned(),
            description.map_or(Value::Null, |d| Value::String(d.to_owned())),
        );
        body.insert("externalId".to_owned(), Value::String(external_id));

        self.client
            .request(
                Method::Post,
                "group",
                &[],
                &[],
                Some(Value::Object(remove_null_values(&body))),
            )
            .await
    }

    /// Create multiple groups at once. Each record is schema-validated and
    /// the array is sent as-is.
    pub async fn batch_create(&self, groups: Vec<Value>) -> Result<ApiResponse, RedlinkError> {
        validate_non_empty("groups", &groups)?;
        GROUP_CREATE_SCHEMA.validate_each(&groups)?;

        self.client
            .request(Method::Post, "group", &[], &[], Some(Value::Array(groups)))
            .await
    }

    /// Update a single group; absent optional fields are pruned from the
    /// body before sending.
    pub async fn update(
        &self,
        group_id: i64,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<ApiResponse, RedlinkError> {
        validate_positive_id("groupId", group_id)?;

        let mut body = Map::new();
        body.insert("id".to_owned(), json!(group_id));
        body.insert(
            "name".to_owned(),
            name.map_or(Value::Null, |n| Value::String(n.to_owned())),
        );
        body.insert(
            "description".to_owned(),
            description.map_or(Value::Null, |d| Value::String(d.to_owned())),
        );

        self.client
            .request(
                Method::Put,
                "group",
                &[],
                &[],
                Some(Value::Object(remove_null_values(&body))),
            )
            .await
    }

    /// Update multiple groups at once.
    pub async fn batch_update(&self, groups: Vec<Value>) -> Result<ApiResponse, RedlinkError> {
        validate_non_empty("groups", &groups)?;
        GROUP_UPDATE_SCHEMA.validate_each(&groups)?;

        self.client
            .request(Method::Put, "group", &[], &[], Some(Value::Array(groups)))
            .await
    }

    /// Remove a single group.
    pub async fn remove(&self, group_id: i64) -> Result<ApiResponse, RedlinkError> {
        validate_positive_id("groupId", group_id)?;

        self.client
            .request(
                Method::Delete,
                "group",
                &[],
                &[],
                Some(json!({ "id": [group_id] })),
            )
            .await
    }

    /// Remove multiple groups at once.
    pub async fn batch_remove(&self, group_ids: &[i64]) -> Result<ApiResponse, RedlinkError> {
        validate_non_empty("groupIds", group_ids)?;

        self.client
            .request(
                Method::Delete,
                "group",
                &[],
                &[],
                Some(json!({ "id": group_ids })),
            )
            .await
    }
}
