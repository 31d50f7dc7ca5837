/// Groups the integer digits of `digits` in threes: `"1234567"` -> `"1,234,567"`.
pub fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats an amount in millions as `$1,234M`, rounded to whole millions.
pub fn format_millions(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let sign = if value < 0.0 && rounded != "0" { "-" } else { "" };
    format!("{}${}M", sign, group_thousands(&rounded))
}

/// Formats a growth percentage with two decimals: `20.00%`.
pub fn format_pct(value: f64) -> String {
    format!("{:.2}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("394328"), "394,328");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }

    #[test]
    fn test_format_millions() {
        assert_eq!(format_millions(120.0), "$120M");
        assert_eq!(format_millions(394_328.0), "$394,328M");
        assert_eq!(format_millions(96_995.4), "$96,995M");
        assert_eq!(format_millions(-1_500.0), "-$1,500M");
        assert_eq!(format_millions(-0.2), "$0M");
    }

    #[test]
    fn test_format_pct() {
        assert_eq!(format_pct(20.0), "20.00%");
        assert_eq!(format_pct(-2.8012), "-2.80%");
    }
}
