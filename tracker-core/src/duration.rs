use crate::error::DurationError;

/// Parses `MM:SS` or `H:MM:SS` into whole seconds.
///
/// The leading field is unbounded (a two hour video may be written
/// `120:00`), every following field must be below 60.
pub fn parse_duration(input: &str) -> Result<u32, DurationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationError::Empty);
    }
    let parts: Vec<&str> = trimmed.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(DurationError::Shape(input.to_string()));
    }
    let mut fields = Vec::with_capacity(parts.len());
    for part in &parts {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DurationError::NotANumber { input: input.to_string(), part: part.to_string() });
        }
        let value: u32 = part
            .parse()
            .map_err(|_| DurationError::NotANumber { input: input.to_string(), part: part.to_string() })?;
        fields.push(value);
    }
    if fields[1..].iter().any(|v| *v >= 60) {
        return Err(DurationError::OutOfRange(input.to_string()));
    }
    let total = fields.iter().fold(0u64, |acc, v| acc * 60 + u64::from(*v));
    u32::try_from(total).map_err(|_| DurationError::OutOfRange(input.to_string()))
}

pub fn format_clock(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_shapes() {
        assert_eq!(parse_duration("10:00"), Ok(600));
        assert_eq!(parse_duration("5:00"), Ok(300));
        assert_eq!(parse_duration("1:05:00"), Ok(3900));
        assert_eq!(parse_duration("1:00:00"), Ok(3600));
        assert_eq!(parse_duration("0:07"), Ok(7));
        assert_eq!(parse_duration("125:30"), Ok(7530));
    }

    #[test]
    fn malformed_input_is_an_error_not_zero() {
        assert_eq!(parse_duration(""), Err(DurationError::Empty));
        assert!(matches!(parse_duration("90"), Err(DurationError::Shape(_))));
        assert!(matches!(parse_duration("1:2:3:4"), Err(DurationError::Shape(_))));
        assert!(matches!(parse_duration("ab:cd"), Err(DurationError::NotANumber { .. })));
        assert!(matches!(parse_duration("1:-5"), Err(DurationError::NotANumber { .. })));
        assert!(matches!(parse_duration("4:"), Err(DurationError::NotANumber { .. })));
        assert!(matches!(parse_duration("1:75"), Err(DurationError::OutOfRange(_))));
        assert!(matches!(parse_duration("1:60:00"), Err(DurationError::OutOfRange(_))));
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(7), "0:07");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(3900), "1:05:00");
    }
}
