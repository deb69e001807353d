//! Shorthand notation for ad hoc recurrence intervals.
//!
//! `<integer><unit letter>`, e.g. `3n` = every 3 days, `6h` = every 6
//! months. The unit letters come from the service's original UI and are
//! kept for compatibility: `p` minute, `g` hour, `n` day, `t` week,
//! `h` month. Parsing happens before submission; a malformed code aborts
//! the operation locally.

use crate::error::ClientError;
use crate::types::RecurrencePattern;

const FORMAT_HINT: &str = "invalid repeat format, expected e.g. 1p, 2g, 3n, 1t, 6h";

/// Parse a shorthand recurrence code into a structured pattern.
pub fn parse_shorthand(input: &str) -> Result<RecurrencePattern, ClientError> {
    let code = input.trim();
    if code.len() < 2 || !code.is_ascii() {
        return Err(ClientError::validation(FORMAT_HINT));
    }

    let (digits, unit) = code.split_at(code.len() - 1);
    let interval: u32 = digits
        .parse()
        .map_err(|_| ClientError::validation(FORMAT_HINT))?;
    if interval == 0 {
        return Err(ClientError::validation(FORMAT_HINT));
    }

    match unit.to_ascii_lowercase().as_str() {
        "p" => Ok(RecurrencePattern::Minute { interval }),
        "g" => Ok(RecurrencePattern::Hour { interval }),
        "n" => Ok(RecurrencePattern::Day { interval }),
        "t" => Ok(RecurrencePattern::Week {
            interval,
            day_of_week: None,
        }),
        "h" => Ok(RecurrencePattern::Month {
            interval,
            day_of_month: None,
        }),
        _ => Err(ClientError::validation(FORMAT_HINT)),
    }
}
