/// Map a resolved agent temperature to a thinking tier (§4.2 threshold
/// table). Boundaries are inclusive on the lower band.
pub fn thinking_from_temp(temp: f64) -> &'static str {
    if temp <= 0.15 {
        "minimal"
    } else if temp <= 0.35 {
        "low"
    } else if temp <= 0.60 {
        "medium"
    } else {
        "high"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_match_spec_table() {
        assert_eq!(thinking_from_temp(0.0), "minimal");
        assert_eq!(thinking_from_temp(0.15), "minimal");
        assert_eq!(thinking_from_temp(0.16), "low");
        assert_eq!(thinking_from_temp(0.35), "low");
        assert_eq!(thinking_from_temp(0.36), "medium");
        assert_eq!(thinking_from_temp(0.60), "medium");
        assert_eq!(thinking_from_temp(0.61), "high");
        assert_eq!(thinking_from_temp(1.0), "high");
    }

    #[test]
    fn planner_default_temperature_maps_to_low() {
        assert_eq!(thinking_from_temp(0.25), "low");
    }
}
