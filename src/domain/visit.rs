use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One check-in as returned by `Checkin/GetCustomerVisits`.
///
/// Only `CheckInDate` is required. `ClubName` is used for the sensor name and
/// every other field is carried through untouched so it can be exposed as an
/// attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    #[serde(rename = "CheckInDate")]
    pub check_in_date: String,
    #[serde(rename = "ClubName", default, skip_serializing_if = "Option::is_none")]
    pub club_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub fn parse_visit_history(body: &[u8]) -> Result<Vec<VisitRecord>, serde_json::Error> {
    serde_json::from_slice(body)
}

/// Stable ascending sort on the raw `CheckInDate` string.
pub fn sort_by_check_in(visits: &mut [VisitRecord]) {
    visits.sort_by(|left, right| left.check_in_date.cmp(&right.check_in_date));
}

/// Most recent visit of the history, `None` when the history is empty.
pub fn latest_visit(mut visits: Vec<VisitRecord>) -> Option<VisitRecord> {
    sort_by_check_in(&mut visits);
    visits.pop()
}
