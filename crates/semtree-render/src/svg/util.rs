use std::fmt::Write as _;

/// Formats a number for an SVG attribute: no `-0`, no float noise, integers without `.0`.
pub(super) fn fmt_into(out: &mut String, v: f64) {
    if !v.is_finite() {
        out.push('0');
        return;
    }
    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    if v == 0.0 {
        v = 0.0;
    }
    let _ = write!(out, "{v}");
}

pub(super) fn fmt(v: f64) -> String {
    let mut out = String::new();
    fmt_into(&mut out, v);
    out
}

/// Path coordinates are rounded half-up to three decimals with trailing zeros trimmed.
pub(super) fn fmt_path_into(out: &mut String, v: f64) {
    if !v.is_finite() {
        out.push('0');
        return;
    }
    let k = (v * 1000.0 + 0.5).floor() as i64;
    if k == 0 {
        out.push('0');
        return;
    }
    if k < 0 {
        out.push('-');
    }
    let abs = k.unsigned_abs();
    let _ = write!(out, "{}", abs / 1000);
    let frac = abs % 1000;
    if frac != 0 {
        let digits = format!("{frac:03}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
}

pub(super) fn escape_xml_into(out: &mut String, text: &str) {
    let mut start = 0usize;
    for (i, b) in text.bytes().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        out.push_str(&text[start..i]);
        out.push_str(esc);
        start = i + 1;
    }
    out.push_str(&text[start..]);
}

pub(super) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_into(&mut out, text);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(v: f64) -> String {
        let mut s = String::new();
        fmt_path_into(&mut s, v);
        s
    }

    #[test]
    fn attribute_numbers_drop_noise() {
        assert_eq!(fmt(f64::NAN), "0");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(620.0), "620");
        assert_eq!(fmt(1.0000004), "1");
        assert_eq!(fmt(4.5), "4.5");
    }

    #[test]
    fn path_numbers_use_three_decimals() {
        assert_eq!(path(0.0004), "0");
        assert_eq!(path(12.3456), "12.346");
        assert_eq!(path(-12.3456), "-12.346");
        assert_eq!(path(350.0), "350");
        assert_eq!(path(0.5), "0.5");
        assert_eq!(path(-0.25), "-0.25");
    }

    #[test]
    fn markup_is_escaped() {
        assert_eq!(escape_xml("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
        assert_eq!(escape_xml("\u{221A}"), "\u{221A}");
    }
}
