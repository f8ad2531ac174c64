use chrono::{DateTime, Datelike, Local, TimeZone, Utc};

/// Timestamp layout expected by `GetCustomerVisits`. Milliseconds are always sent as `000`.
pub const VISIT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000Z";

pub trait Clock {
    type Zone: TimeZone;

    fn now(&self) -> DateTime<Self::Zone>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Zone = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Date range of the visit history query: local new year through now, both in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl VisitWindow {
    pub fn year_to_date<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let end = now.with_timezone(&Utc);
        let year = now.year();

        let start = now
            .timezone()
            .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .earliest()
            .map(|new_year| new_year.with_timezone(&Utc))
            .or_else(|| Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single())
            .unwrap_or(end);

        Self { start, end }
    }

    pub fn start_date(&self) -> String {
        self.start.format(VISIT_TIMESTAMP_FORMAT).to_string()
    }

    pub fn end_date(&self) -> String {
        self.end.format(VISIT_TIMESTAMP_FORMAT).to_string()
    }

    pub fn form_fields(&self) -> [(&'static str, String); 2] {
        [("startDate", self.start_date()), ("endDate", self.end_date())]
    }
}
