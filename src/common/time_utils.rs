use chrono::{Datelike, Local, NaiveDate};

/// Current local year and month as `YYYYMM`
pub fn current_yyyymm() -> String {
    format_yyyymm(Local::now().date_naive())
}

pub fn format_yyyymm(date: NaiveDate) -> String {
    format!("{:04}{:02}", date.year(), date.month())
}

/// True for six digits naming a real month, e.g. `202501`
pub fn is_valid_yyyymm(value: &str) -> bool {
    value.len() == 6
        && value.bytes().all(|b| b.is_ascii_digit())
        && NaiveDate::parse_from_str(&format!("{}01", value), "%Y%m%d").is_ok()
}
