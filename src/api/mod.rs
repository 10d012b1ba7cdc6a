//! Resource modules, one per Redlink resource family.
//!
//! Every method follows the same shape: validate arguments and payloads
//! locally, sanitize single-object bodies, build one request, execute it
//! through the client's transport, and hand back the raw [`ApiResponse`]
//! for the caller to deserialize.
//!
//! [`ApiResponse`]: crate::client::ApiResponse

mod blacklists;
mod campaigns;
mod contacts;
mod emails;
mod groups;
mod pushes;
mod sms;

use chrono::{DateTime, Utc};

pub use blacklists::Blacklists;
pub use campaigns::{CampaignState, Campaigns};
pub use contacts::{ContactFilter, Contacts, UpdateKey};
pub use emails::Emails;
pub use groups::Groups;
pub use pushes::{
    ACTION_BROWSER, ACTION_DEEPLINK, ACTION_NONE, ACTION_WEBVIEW, BUTTONS, DEVICE_RECEIVER,
    EMAIL_RECEIVER, LOCKSCREEN_VISIBILITY_PRIVATE, LOCKSCREEN_VISIBILITY_PUBLIC,
    LOCKSCREEN_VISIBILITY_SECRET, NUMBER_RECEIVER, Pushes,
};
pub use sms::{FLASH_SMS, REGULAR_SMS, Sms, SmsFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Pagination window shared by every listing endpoint.
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Sort order for listings that support it.
///
/// `order_direction` is validated against `ASC`/`DESC` before any request
/// is built.
pub struct Sorting {
    pub order_by: String,
    pub order_direction: String,
}

impl Default for Sorting {
    fn default() -> Self {
        Self {
            order_by: "id".to_owned(),
            order_direction: "DESC".to_owned(),
        }
    }
}

/// Date format expected by Redlink query parameters.
pub(crate) fn format_date(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn page_defaults_match_the_api() {
        let page = Page::default();
        assert_eq!(page.limit, 100);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn sorting_defaults_to_id_desc() {
        let sorting = Sorting::default();
        assert_eq!(sorting.order_by, "id");
        assert_eq!(sorting.order_direction, "DESC");
    }

    #[test]
    fn dates_are_formatted_without_timezone() {
        let date = Utc.with_ymd_and_hms(2024, 1, 31, 8, 30, 59).unwrap();
        assert_eq!(format_date(&date), "2024-01-31 08:30:59");
    }
}
