use llkv_result::{Error, Result};
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

fn epoch_julian_day() -> i32 {
    // 1970-01-01.
    2_440_588
}

fn invalid(kind: &str, text: &str) -> Error {
    Error::InvalidArgumentError(format!("invalid {kind} literal '{text}'"))
}

fn parse_calendar_date(text: &str, kind: &str) -> Result<Date> {
    let mut parts = text.split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid(kind, text));
    };
    let year = year.parse::<i32>().map_err(|_| invalid(kind, text))?;
    let month = month
        .parse::<u8>()
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| invalid(kind, text))?;
    let day = day.parse::<u8>().map_err(|_| invalid(kind, text))?;
    Date::from_calendar_date(year, month, day).map_err(|err| {
        Error::InvalidArgumentError(format!("invalid {kind} literal '{text}': {err}"))
    })
}

/// Parse `YYYY-MM-DD` into a `Date` day count since 1970-01-01.
pub fn parse_date_text(text: &str) -> Result<u16> {
    let date = parse_calendar_date(text.trim(), "Date")?;
    let days = date.to_julian_day() - epoch_julian_day();
    u16::try_from(days).map_err(|_| {
        Error::InvalidArgumentError(format!(
            "Date literal '{text}' is outside 1970-01-01..2149-06-06"
        ))
    })
}

/// Format a `Date` day count as `YYYY-MM-DD`.
pub fn format_date_text(days: u16) -> Result<String> {
    let date = Date::from_julian_day(epoch_julian_day() + i32::from(days)).map_err(|err| {
        Error::InvalidArgumentError(format!("invalid Date value {days}: {err}"))
    })?;
    let (year, month, day) = date.to_calendar_date();
    Ok(format!("{:04}-{:02}-{:02}", year, month as u8, day))
}

/// Parse `YYYY-MM-DD hh:mm:ss` (UTC) into seconds since the Unix epoch.
pub fn parse_datetime_text(text: &str) -> Result<u32> {
    let trimmed = text.trim();
    let (date_part, time_part) = trimmed
        .split_once(' ')
        .ok_or_else(|| invalid("DateTime", text))?;
    let date = parse_calendar_date(date_part, "DateTime")?;

    let mut hms = time_part.split(':').map(|p| p.parse::<u8>());
    let (Some(Ok(h)), Some(Ok(m)), Some(Ok(s)), None) =
        (hms.next(), hms.next(), hms.next(), hms.next())
    else {
        return Err(invalid("DateTime", text));
    };
    let time = Time::from_hms(h, m, s).map_err(|err| {
        Error::InvalidArgumentError(format!("invalid DateTime literal '{text}': {err}"))
    })?;

    let secs = PrimitiveDateTime::new(date, time).assume_utc().unix_timestamp();
    u32::try_from(secs).map_err(|_| {
        Error::InvalidArgumentError(format!(
            "DateTime literal '{text}' does not fit 32-bit seconds"
        ))
    })
}

/// Format seconds since the Unix epoch as `YYYY-MM-DD hh:mm:ss` (UTC).
pub fn format_datetime_text(secs: u32) -> Result<String> {
    let dt = OffsetDateTime::from_unix_timestamp(i64::from(secs)).map_err(|err| {
        Error::InvalidArgumentError(format!("invalid DateTime value {secs}: {err}"))
    })?;
    let (year, month, day) = dt.date().to_calendar_date();
    Ok(format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        year,
        month as u8,
        day,
        dt.hour(),
        dt.minute(),
        dt.second()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_text_roundtrip() {
        assert_eq!(parse_date_text("1970-01-01").unwrap(), 0);
        assert_eq!(parse_date_text("1970-02-01").unwrap(), 31);
        assert_eq!(format_date_text(31).unwrap(), "1970-02-01");
        assert_eq!(format_date_text(u16::MAX).unwrap(), "2149-06-06");
    }

    #[test]
    fn date_before_epoch_is_rejected() {
        assert!(matches!(
            parse_date_text("1969-12-31"),
            Err(Error::InvalidArgumentError(_))
        ));
        assert!(parse_date_text("2020-13-01").is_err());
        assert!(parse_date_text("2020-01").is_err());
    }

    #[test]
    fn datetime_text_roundtrip() {
        assert_eq!(parse_datetime_text("1970-01-01 00:01:05").unwrap(), 65);
        let secs = parse_datetime_text("2021-03-04 05:06:07").unwrap();
        assert_eq!(format_datetime_text(secs).unwrap(), "2021-03-04 05:06:07");
        assert!(parse_datetime_text("2021-03-04").is_err());
        assert!(parse_datetime_text("2021-03-04 25:00:00").is_err());
    }
}
