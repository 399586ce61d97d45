/// A parsed, still-unvalidated-against-calendar five-field cron expression
/// (§4.4 step 1): minute, hour, day-of-month, month, day-of-week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronFields {
    pub minute: String,
    pub hour: String,
    pub day_of_month: String,
    pub month: String,
    pub day_of_week: String,
}

/// Parse a five-field cron expression. Each field must match
/// `[0-9*,/-]+` and every literal number it contains must fall within
/// that field's valid range (minute 0-59, hour 0-23, day-of-month 1-31,
/// month 1-12, day-of-week 0-7); the token count must be exactly 5.
pub fn parse(expr: &str) -> Option<CronFields> {
    let tokens: Vec<&str> = expr.split_whitespace().collect();
    if tokens.len() != 5 {
        return None;
    }
    let bounds = [(0, 59), (0, 23), (1, 31), (1, 12), (0, 7)];
    if !tokens
        .iter()
        .zip(bounds)
        .all(|(t, (lo, hi))| is_valid_field(t, lo, hi))
    {
        return None;
    }
    Some(CronFields {
        minute: tokens[0].to_string(),
        hour: tokens[1].to_string(),
        day_of_month: tokens[2].to_string(),
        month: tokens[3].to_string(),
        day_of_week: tokens[4].to_string(),
    })
}

fn is_valid_field(field: &str, lo: u32, hi: u32) -> bool {
    if field.is_empty() || !field.chars().all(|c| c.is_ascii_digit() || matches!(c, '*' | ',' | '/' | '-')) {
        return false;
    }
    let (base, step) = match field.split_once('/') {
        Some((base, step)) => (base, Some(step)),
        None => (field, None),
    };
    if let Some(step) = step {
        if step.is_empty() || !step.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
    }
    if base == "*" {
        return true;
    }
    base.split(',').all(|item| is_valid_item(item, lo, hi))
}

fn is_valid_item(item: &str, lo: u32, hi: u32) -> bool {
    match item.split_once('-') {
        Some((start, end)) => match (start.parse::<u32>(), end.parse::<u32>()) {
            (Ok(s), Ok(e)) => s >= lo && e <= hi && s <= e,
            _ => false,
        },
        None => item.parse::<u32>().is_ok_and(|v| v >= lo && v <= hi),
    }
}

/// Translate one cron field into its systemd calendar-spec equivalent
/// (§4.4 step 2, §8 property 5): step notation `a/b` is preserved as-is;
/// a leading `*/b` becomes `0/b`; pure `*` stays `*`.
fn translate_field(field: &str) -> String {
    if field == "*" {
        return "*".to_string();
    }
    if let Some(step) = field.strip_prefix("*/") {
        return format!("0/{step}");
    }
    field.to_string()
}

/// Translate parsed fields into a systemd `OnCalendar=` specification
/// (§4.4 step 2). When day-of-week is the wildcard `*`, its prefix is
/// omitted entirely (§8 property 5c).
pub fn translate(fields: &CronFields) -> String {
    let month = translate_field(&fields.month);
    let dom = translate_field(&fields.day_of_month);
    let hour = translate_field(&fields.hour);
    let minute = translate_field(&fields.minute);
    let date_time = format!("*-{month}-{dom} {hour}:{minute}:00");

    if fields.day_of_week == "*" {
        date_time
    } else {
        let dow = translate_field(&fields.day_of_week);
        format!("{dow} {date_time}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_wrong_token_count() {
        assert!(parse("0 7 * *").is_none());
        assert!(parse("0 7 * * * *").is_none());
    }

    #[test]
    fn parse_rejects_invalid_characters() {
        assert!(parse("0 7 * * mon").is_none());
    }

    #[test]
    fn parse_rejects_out_of_range_hour() {
        assert!(parse("0 25 * * *").is_none());
    }

    #[test]
    fn parse_rejects_out_of_range_list_member() {
        assert!(parse("0 7,26 * * *").is_none());
    }

    #[test]
    fn parse_accepts_range_and_list_within_bounds() {
        assert!(parse("0,30 9-17 * * 1-5").is_some());
    }

    #[test]
    fn parse_accepts_valid_five_field_expression() {
        let f = parse("0 7 * * *").unwrap();
        assert_eq!(f.minute, "0");
        assert_eq!(f.hour, "7");
        assert_eq!(f.day_of_month, "*");
        assert_eq!(f.month, "*");
        assert_eq!(f.day_of_week, "*");
    }

    #[test]
    fn translate_omits_dow_prefix_when_wildcard() {
        let f = parse("0 7 * * *").unwrap();
        assert_eq!(translate(&f), "*-*-* 7:0:00");
    }

    #[test]
    fn translate_includes_dow_prefix_when_specific() {
        let f = parse("0 9 * * 1").unwrap();
        assert_eq!(translate(&f), "1 *-*-* 9:0:00");
    }

    #[test]
    fn translate_step_wildcard_maps_to_zero_slash_k() {
        let f = parse("*/15 * * * *").unwrap();
        assert_eq!(translate(&f), "*-*-* *:0/15:00");
    }

    #[test]
    fn translate_preserves_non_wildcard_step_notation() {
        let f = parse("5/15 * * * *").unwrap();
        assert_eq!(translate(&f), "*-*-* *:5/15:00");
    }

    #[test]
    fn translate_pure_wildcard_stays_wildcard() {
        let f = parse("* * * * *").unwrap();
        assert_eq!(translate(&f), "*-*-* *:*:00");
    }
}
