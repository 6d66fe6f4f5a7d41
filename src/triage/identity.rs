use chrono::{Datelike, NaiveDate};

/// Raised when an identity code does not start with a readable ddmmyy date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identity code '{code}' does not start with a valid ddmmyy date")]
pub struct InvalidIdentityCode {
    pub code: String,
}

impl InvalidIdentityCode {
    fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
        }
    }
}

/// Age of a person on `as_of`, derived from the date-of-birth digits of their
/// identity code, assuming they are between 0 and 99 years old.
///
/// The two-digit year is first read as 2000+yy; if that places the birth in
/// the future, it is read as 1900+yy instead. No further rollback is
/// attempted.
pub fn age_on(identity_code: &str, as_of: NaiveDate) -> Result<i32, InvalidIdentityCode> {
    let digits = identity_code
        .get(..6)
        .ok_or_else(|| InvalidIdentityCode::new(identity_code))?;
    if !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(InvalidIdentityCode::new(identity_code));
    }

    let day: u32 = digits[..2]
        .parse()
        .map_err(|_| InvalidIdentityCode::new(identity_code))?;
    let month: u32 = digits[2..4]
        .parse()
        .map_err(|_| InvalidIdentityCode::new(identity_code))?;
    let year_suffix: i32 = digits[4..6]
        .parse()
        .map_err(|_| InvalidIdentityCode::new(identity_code))?;

    let candidate = NaiveDate::from_ymd_opt(2000 + year_suffix, month, day)
        .ok_or_else(|| InvalidIdentityCode::new(identity_code))?;
    let birthdate = if candidate > as_of {
        NaiveDate::from_ymd_opt(1900 + year_suffix, month, day)
            .ok_or_else(|| InvalidIdentityCode::new(identity_code))?
    } else {
        candidate
    };

    let not_yet_celebrated = (as_of.month(), as_of.day()) < (birthdate.month(), birthdate.day());
    Ok(as_of.year() - birthdate.year() - i32::from(not_yet_celebrated))
}
