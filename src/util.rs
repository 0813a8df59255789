// Parsing and small numeric helpers shared by the loader, engine and
// presentation code.
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

/// Parse a trimmed, non-empty cell as `f64`. Exponents such as `5e-05` are
/// accepted; `inf`/`nan` and misplaced commas are rejected.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let v = strip_thousands(s)?.parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

/// Parse a currency amount. Integral floats such as `12000000.0` are accepted
/// because spreadsheet exports commonly write them that way.
pub fn parse_u64_safe(s: Option<&str>) -> Option<u64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = strip_thousands(s)?;
    if let Ok(v) = s.parse::<u64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    // `u64::MAX as f64` rounds up to 2^64, which is already out of range.
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

/// Removes `,` thousands separators from the integer part. A comma anywhere
/// else, or one that does not split off groups of three digits (`8,25`),
/// makes the value unparsable.
fn strip_thousands(s: &str) -> Option<String> {
    if !s.contains(',') {
        return Some(s.to_string());
    }
    let (int_part, rest) = match s.find('.') {
        Some(i) => s.split_at(i),
        None => (s, ""),
    };
    if rest.contains(',') {
        return None;
    }
    let digits = int_part.trim_start_matches(['+', '-']);
    let sign = &int_part[..int_part.len() - digits.len()];
    let mut groups = digits.split(',');
    let first = groups.next()?;
    if first.is_empty() || first.len() > 3 || !first.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let mut out = format!("{}{}", sign, first);
    for g in groups {
        if g.len() != 3 || !g.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        out.push_str(g);
    }
    out.push_str(rest);
    Some(out)
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    // `YYYY-MM-DD`, optionally followed by a time that we drop.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .ok()
}

/// First day of the month containing `d`.
pub fn month_start(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

/// Last day of the given month.
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()
}

/// Arithmetic mean accumulated in slice order. Returns `None` for an empty
/// slice so callers never divide by zero.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with `,` thousands separators, e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: u64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    // Rounding may have produced "-0.0"; print it unsigned.
    if neg && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
