use serde::Serialize;
use time::OffsetDateTime;

/// Degree programs offered on the form. The last entry is the free-text sentinel.
pub const DEGREE_OPTIONS: [&str; 8] = [
    "Chemical Engineering",
    "Civil Engineering",
    "Environmental Engineering",
    "Environmental Science",
    "Geology",
    "Mechanical Engineering",
    "Mining Engineering",
    OTHER_DEGREE,
];

pub const OTHER_DEGREE: &str = "Other";

/// Header written once at the top of the local signup file.
pub const ROW_HEADER: [&str; 5] = ["Name", "Student Number", "Facebook", "Degree", "Timestamp"];

/// `YYYY-MM-DD HH:MM:SS` in the offset the time carries.
pub fn format_timestamp(t: OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        t.year(),
        u8::from(t.month()),
        t.day(),
        t.hour(),
        t.minute(),
        t.second()
    )
}

/// A fully validated signup. Only built by `services::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupRecord {
    full_name: String,
    student_number: String,
    social_handle: String,
    degree: String,
    submitted_at: String,
}

impl SignupRecord {
    pub(super) fn new(
        full_name: String,
        student_number: String,
        social_handle: String,
        degree: String,
        submitted_at: OffsetDateTime,
    ) -> Self {
        Self {
            full_name,
            student_number,
            social_handle,
            degree,
            submitted_at: format_timestamp(submitted_at),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn student_number(&self) -> &str {
        &self.student_number
    }

    pub fn social_handle(&self) -> &str {
        &self.social_handle
    }

    pub fn degree(&self) -> &str {
        &self.degree
    }

    pub fn submitted_at(&self) -> &str {
        &self.submitted_at
    }

    /// Column order: name, student number, handle, degree, timestamp.
    pub fn to_row(&self) -> [&str; 5] {
        [
            &self.full_name,
            &self.student_number,
            &self.social_handle,
            &self.degree,
            &self.submitted_at,
        ]
    }
}

pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn row_is_in_fixed_column_order() {
        let rec = SignupRecord::new(
            "Jane Doe".into(),
            "87654321".into(),
            "jane.doe".into(),
            "Geology".into(),
            datetime!(2025-02-24 09:05:07 UTC),
        );
        assert_eq!(
            rec.to_row(),
            ["Jane Doe", "87654321", "jane.doe", "Geology", "2025-02-24 09:05:07"]
        );
    }

    #[test]
    fn timestamp_is_zero_padded() {
        assert_eq!(format_timestamp(datetime!(2025-01-02 03:04:05 UTC)), "2025-01-02 03:04:05");
        assert_eq!(format_timestamp(datetime!(2025-12-31 23:59:59.999 +08:00)), "2025-12-31 23:59:59");
    }

    #[test]
    fn other_is_last_option() {
        assert_eq!(DEGREE_OPTIONS.last(), Some(&OTHER_DEGREE));
    }
}
