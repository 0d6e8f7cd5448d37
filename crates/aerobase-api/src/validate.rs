//! Request shape validation. Every failure maps to a 400 naming the field.

use chrono::{DateTime, Utc};

use crate::error::ApiError;

pub fn non_empty(field: &str, value: &str) -> Result<(), ApiError> {
  if value.trim().is_empty() {
    return Err(ApiError::Validation(format!("{field} must not be empty")));
  }
  Ok(())
}

/// `end` strictly after `start` — scheduling windows.
pub fn window(
  start_field: &str,
  start: DateTime<Utc>,
  end_field: &str,
  end: DateTime<Utc>,
) -> Result<(), ApiError> {
  if end <= start {
    return Err(ApiError::Validation(format!(
      "{end_field} must be after {start_field}"
    )));
  }
  Ok(())
}

/// `landing_at` may equal `takeoff_at` (a zero-length flight is a scrubbed
/// takeoff), but never precede it.
pub fn flight_times(
  takeoff_at: DateTime<Utc>,
  landing_at: DateTime<Utc>,
) -> Result<(), ApiError> {
  if landing_at < takeoff_at {
    return Err(ApiError::Validation(
      "landing_at must not precede takeoff_at".into(),
    ));
  }
  Ok(())
}

/// Shallow shape check only; deliverability is not our problem.
pub fn email(value: &str) -> Result<(), ApiError> {
  let valid = value
    .split_once('@')
    .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
  if !valid {
    return Err(ApiError::Validation("email is not a valid address".into()));
  }
  Ok(())
}

/// KPI reporting periods are `YYYY-MM`.
pub fn period(value: &str) -> Result<(), ApiError> {
  let bytes = value.as_bytes();
  let shaped = bytes.len() == 7
    && bytes[..4].iter().all(u8::is_ascii_digit)
    && bytes[4] == b'-'
    && bytes[5..].iter().all(u8::is_ascii_digit);
  let month_ok = shaped
    && matches!(value[5..].parse::<u8>(), Ok(m) if (1..=12).contains(&m));
  if !month_ok {
    return Err(ApiError::Validation("period must be YYYY-MM".into()));
  }
  Ok(())
}

pub fn positive_size(size_bytes: u64) -> Result<(), ApiError> {
  if size_bytes == 0 {
    return Err(ApiError::Validation(
      "size_bytes must be greater than zero".into(),
    ));
  }
  Ok(())
}

/// File names become the last segment of a storage key, so path characters
/// are rejected outright.
pub fn file_name(value: &str) -> Result<(), ApiError> {
  non_empty("file_name", value)?;
  if value.contains('/') || value.contains('\\') || value.contains("..") {
    return Err(ApiError::Validation(
      "file_name must not contain path separators".into(),
    ));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, Utc};

  use super::*;

  #[test]
  fn non_empty_rejects_whitespace() {
    assert!(non_empty("name", "  ").is_err());
    assert!(non_empty("name", "Roof survey").is_ok());
  }

  #[test]
  fn window_requires_strict_order() {
    let now = Utc::now();
    assert!(window("start", now, "end", now).is_err());
    assert!(window("start", now, "end", now + Duration::hours(1)).is_ok());
    assert!(window("start", now, "end", now - Duration::hours(1)).is_err());
  }

  #[test]
  fn flight_times_allow_equal() {
    let now = Utc::now();
    assert!(flight_times(now, now).is_ok());
    assert!(flight_times(now, now - Duration::minutes(1)).is_err());
  }

  #[test]
  fn email_shape() {
    assert!(email("pilot@example.com").is_ok());
    assert!(email("pilot").is_err());
    assert!(email("@example.com").is_err());
    assert!(email("pilot@").is_err());
  }

  #[test]
  fn period_shape() {
    assert!(period("2026-08").is_ok());
    assert!(period("2026-13").is_err());
    assert!(period("2026-00").is_err());
    assert!(period("2026-8").is_err());
    assert!(period("26-08").is_err());
  }

  #[test]
  fn file_name_rejects_paths() {
    assert!(file_name("manual.pdf").is_ok());
    assert!(file_name("a/b.pdf").is_err());
    assert!(file_name("..secret").is_err());
    assert!(file_name("").is_err());
  }
}
