/// Numeric value of a spec cell such as `21 mpg` or `17.1 gal.`.
///
/// Unit tokens are removed wherever they appear, as are thousands
/// separators. Empty cells, the literal `nan` and anything that still fails
/// to parse count as missing.
pub fn parse_measure(raw: &str, units: &[String]) -> Option<f64> {
    let mut text = raw.trim().to_lowercase();
    if text.is_empty() || text == "nan" {
        return None;
    }
    for unit in units {
        let unit = unit.trim().to_lowercase();
        if !unit.is_empty() {
            text = text.replace(&unit, "");
        }
    }
    text.retain(|c| c != ',');
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::parse_measure;

    fn units() -> Vec<String> {
        ["mpg", "gal.", "cu.ft."].map(String::from).to_vec()
    }

    #[test]
    fn strips_known_units() {
        assert_eq!(parse_measure("21 mpg", &units()), Some(21.0));
        assert_eq!(parse_measure(" 17.1 gal.", &units()), Some(17.1));
        assert_eq!(parse_measure("58.7 cu.ft.", &units()), Some(58.7));
        assert_eq!(parse_measure("4,015", &units()), Some(4015.0));
    }

    #[test]
    fn holes_are_missing() {
        assert_eq!(parse_measure("", &units()), None);
        assert_eq!(parse_measure("NaN", &units()), None);
        assert_eq!(parse_measure("n/a", &units()), None);
        assert_eq!(parse_measure("inf", &units()), None);
        assert_eq!(parse_measure("21 mpg", &[]), None);
    }
}
