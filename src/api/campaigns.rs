use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};

use crate::api::{Page, format_date};
use crate::client::{ApiResponse, RedlinkClient, RedlinkError};
use crate::domain::constraint::{validate_date_range, validate_pagination};
use crate::domain::{Method, ValidationError, remove_null_values};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Target state of an email campaign.
pub enum CampaignState {
    Sendable,
    Canceled,
}

impl CampaignState {
    pub fn as_str(self) -> &'static str {
        match self {
            CampaignState::Sendable => "sendable",
            CampaignState::Canceled => "canceled",
        }
    }
}

/// Email, SMS, and push campaign reporting.
pub struct Campaigns<'a> {
    client: &'a RedlinkClient,
}

fn report_query(
    page: Page,
    date_from: Option<&DateTime<Utc>>,
    date_to: Option<&DateTime<Utc>>,
) -> Vec<(&'static str, String)> {
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
    query
}

impl<'a> Campaigns<'a> {
    pub(crate) fn new(client: &'a RedlinkClient) -> Self {
        Self { client }
    }

    fn check_window(
        page: Page,
        date_from: Option<&DateTime<Utc>>,
        date_to: Option<&DateTime<Utc>>,
    ) -> Result<(), ValidationError> {
        validate_pagination(Some(page.limit), Some(page.offset), None)?;
        validate_date_range(date_from.copied(), date_to.copied())
    }

    /// Download a single email campaign.
    pub async fn get_single_email(&self, campaign_id: &str) -> Result<ApiResponse, RedlinkError> {
        if campaign_id.is_empty() {
            return Err(ValidationError::Empty { field: "campaignId" }.into());
        }
        let params = [("id", campaign_id.to_owned())];
        self.client
            .request(Method::Get, "campaign/email/{id}", &params, &[], None)
            .await
    }

    /// Download a single SMS campaign.
    pub async fn get_single_sms(&self, campaign_id: &str) -> Result<ApiResponse, RedlinkError> {
        if campaign_id.is_empty() {
            return Err(ValidationError::Empty { field: "campaignId" }.into());
        }
        let params = [("id", campaign_id.to_owned())];
        self.client
            .request(Method::Get, "campaign/sms/{id}", &params, &[], None)
            .await
    }

    /// List email campaigns inside an optional date window.
    pub async fn list_email(
        &self,
        page: Page,
        date_from: Option<&DateTime<Utc>>,
        date_to: Option<&DateTime<Utc>>,
    ) -> Result<ApiResponse, RedlinkError> {
        Self::check_window(page, date_from, date_to)?;
        let query = report_query(page, date_from, date_to);
        self.client
            .request(Method::Get, "campaign/email", &[], &query, None)
            .await
    }

    /// List SMS campaigns inside an optional date window.
    pub async fn list_sms(
        &self,
        page: Page,
        date_from: Option<&DateTime<Utc>>,
        date_to: Option<&DateTime<Utc>>,
    ) -> Result<ApiResponse, RedlinkError> {
        Self::check_window(page, date_from, date_to)?;
        let query = report_query(page, date_from, date_to);
        self.client
            .request(Method::Get, "campaign/sms", &[], &query, None)
            .await
    }

    /// List push campaigns inside an optional date window.
    pub async fn list_push(
        &self,
        page: Page,
        date_from: Option<&DateTime<Utc>>,
        date_to: Option<&DateTime<Utc>>,
    ) -> Result<ApiResponse, RedlinkError> {
        Self::check_window(page, date_from, date_to)?;
        let query = report_query(page, date_from, date_to);
        self.client
            .request(Method::Get, "campaign/push", &[], &query, None)
            .await
    }

    /// List clicks recorded for an SMS campaign.
    pub async fn list_sms_clicks(
        &self,
        campaign_id: &str,
        page: Page,
        date_from: Option<&DateTime<Utc>>,
        date_to: Option<&DateTime<Utc>>,
    ) -> Result<ApiResponse, RedlinkError> {
        if campaign_id.is_empty() {
            return Err(ValidationError::Empty { field: "campaignId" }.into());
        }
        Self::check_window(page, date_from, date_to)?;

        let params = [("campaignId", campaign_id.to_owned())];
        let query = report_query(page, date_from, date_to);
        self.client
            .request(
                Method::Get,
                "campaign/sms/{campaignId}/report/click",
                &params,
                &query,
                None,
            )
            .await
    }

    /// List clicks recorded for an email campaign.
    pub async fn list_email_clicks(
        &self,
        campaign_id: &str,
        page: Page,
        date_from: Option<&DateTime<Utc>>,
        date_to: Option<&DateTime<Utc>>,
    ) -> Result<ApiResponse, RedlinkError> {
        if campaign_id.is_empty() {
            return Err(ValidationError::Empty { field: "campaignId" }.into());
        }
        Self::check_window(page, date_from, date_to)?;

        let params = [("campaignId", campaign_id.to_owned())];
        let query = report_query(page, date_from, date_to);
        self.client
            .request(
                Method::Get,
                "campaign/email/{campaignId}/report/click",
                &params,
                &query,
                None,
            )
            .await
    }

    /// List opens recorded for an email campaign.
    pub async fn list_email_opens(
        &self,
        campaign_id: &str,
        page: Page,
        date_from: Option<&DateTime<Utc>>,
        date_to: Option<&DateTime<Utc>>,
    ) -> Result<ApiResponse, RedlinkError> {
        if campaign_id.is_empty() {
            return Err(ValidationError::Empty { field: "campaignId" }.into());
        }
        Self::check_window(page, date_from, date_to)?;

        let params = [("campaignId", campaign_id.to_owned())];
        let query = report_query(page, date_from, date_to);
        self.client
            .request(
                Method::Get,
                "campaign/email/{campaignId}/report/open",
                &params,
                &query,
                None,
            )
            .await
    }

    /// List recipients of an email campaign, optionally bounces only.
    pub async fn list_email_recipients(
        &self,
        campaign_id: Option<&str>,
        page: Page,
        date_from: Option<&DateTime<Utc>>,
        date_to: Option<&DateTime<Utc>>,
        bounces_only: Option<bool>,
    ) -> Result<ApiResponse, RedlinkError> {
        Self::check_window(page, date_from, date_to)?;

        let mut query = report_query(page, date_from, date_to);
        if let Some(id) = campaign_id {
            query.push(("campaignId", id.to_owned()));
        }
        if let Some(bounces_only) = bounces_only {
            query.push(("bouncesOnly", bounces_only.to_string()));
        }
        self.client
            .request(
                Method::Get,
                "campaign/email/report/recipient",
                &[],
                &query,
                None,
            )
            .await
    }

    /// List recipients of an SMS campaign.
    pub async fn list_sms_recipients(
        &self,
        campaign_id: &str,
        page: Page,
    ) -> Result<ApiResponse, RedlinkError> {
        if campaign_id.is_empty() {
            return Err(ValidationError::Empty { field: "campaignId" }.into());
        }
        validate_pagination(Some(page.limit), Some(page.offset), None)?;

        let params = [("campaignId", campaign_id.to_owned())];
        let query = [
            ("limit", page.limit.to_string()),
            ("offset", page.offset.to_string()),
        ];
        self.client
            .request(
                Method::Get,
                "campaign/sms/{campaignId}/report/recipient",
                &params,
                &query,
                None,
            )
            .await
    }

    /// List recipients of a push campaign, addressed by external id.
    pub async fn list_push_recipients(
        &self,
        external_id: &str,
        page: Page,
    ) -> Result<ApiResponse, RedlinkError> {
        if external_id.is_empty() {
            return Err(ValidationError::Empty { field: "externalId" }.into());
        }
        validate_pagination(Some(page.limit), Some(page.offset), None)?;

        let params = [("externalId", external_id.to_owned())];
        let query = [
            ("limit", page.limit.to_string()),
            ("offset", page.offset.to_string()),
        ];
        self.client
            .request(
                Method::Get,
                "campaign/push/{externalId}/report/recipient",
                &params,
                &query,
                None,
            )
            .await
    }

    /// Change the state of an email campaign, optionally rescheduling it or
    /// directing it at test addresses.
    ///
    /// The upstream endpoint flips the state from the schedule payload; the
    /// `state` argument is checked here but not transmitted.
    pub async fn update_email_state(
        &self,
        campaign_id: &str,
        state: CampaignState,
        schedule_time: Option<&DateTime<Utc>>,
        test_addresses: Option<&[String]>,
    ) -> Result<ApiResponse, RedlinkError> {
        if campaign_id.is_empty() {
            return Err(ValidationError::Empty { field: "campaignId" }.into());
        }
        let _ = state;

        let mut body = Map::new();
        body.insert(
            "scheduleTime".to_owned(),
            schedule_time.map_or(Value::Null, |t| Value::String(format_date(t))),
        );
        body.insert(
            "testAddresses".to_owned(),
            test_addresses.map_or(Value::Null, |addresses| json!(addresses)),
        );

        let params = [("campaignId", campaign_id.to_owned())];
        self.client
            .request(
                Method::Patch,
                "campaign/mail/{campaignId}",
                &params,
                &[],
                Some(Value::Object(remove_null_values(&body))),
            )
            .await
    }
}
