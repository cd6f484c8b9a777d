/// Shortest plain rendering: integers without a fraction, otherwise at most six decimals.
pub fn format_f64(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if (value.fract()).abs() < f64::EPSILON {
        format!("{}", value as i64)
    } else {
        let mut text = format!("{value:.6}");
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
        text
    }
}

pub fn format_number_with_commas(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

pub fn format_currency(value: f64) -> String {
    format!("{} ₸", format_number_with_commas(value, 0))
}

pub fn format_share(part: f64, total: f64) -> String {
    if total.abs() < f64::EPSILON {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part / total * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_f64_trims_trailing_zeros() {
        assert_eq!(format_f64(1500.0), "1500");
        assert_eq!(format_f64(12.5), "12.5");
        assert_eq!(format_f64(f64::NAN), "");
    }

    #[test]
    fn format_number_with_commas_handles_decimals() {
        assert_eq!(format_number_with_commas(12345.678, 0), "12,346");
        assert_eq!(format_number_with_commas(12345.678, 2), "12,345.68");
        assert_eq!(format_number_with_commas(-1234.5, 2), "-1,234.50");
        assert_eq!(format_number_with_commas(999.0, 0), "999");
        assert_eq!(format_number_with_commas(-0.001, 2), "0.00");
    }

    #[test]
    fn format_share_guards_zero_total() {
        assert_eq!(format_share(1.0, 0.0), "0.0%");
        assert_eq!(format_share(1.0, 4.0), "25.0%");
    }
}
