// Field extraction helpers shared by the grammar variants
// Plain string scanning; every helper returns None instead of failing

use super::state::RttSummary;

/// Number at the start of `s` (after whitespace); `,` accepted as decimal point
pub fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == ','))
        .map_or(s.len(), |(i, _)| i);
    let digits = s[..end].trim_end_matches(['.', ',']);
    if digits.is_empty() {
        return None;
    }
    digits.replace(',', ".").parse().ok()
}

/// First unsigned integer anywhere in `s`
pub fn first_integer(s: &str) -> Option<u32> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    rest[..end].parse().ok()
}

/// Number right after the first occurrence of `key`
pub fn number_after(line: &str, key: &str) -> Option<f64> {
    let idx = line.find(key)?;
    leading_number(&line[idx + key.len()..])
}

/// Text between the first `open` and the next `close`
pub fn between(line: &str, open: char, close: char) -> Option<&str> {
    let start = line.find(open)? + open.len_utf8();
    let len = line[start..].find(close)?;
    let inner = line[start..start + len].trim();
    (!inner.is_empty()).then_some(inner)
}

/// Innermost parenthesised text ending at the first `)`
///
/// iputils prints `PING host(addr (addr))` for IPv6 names, so the outer
/// span is unbalanced and only the inner one holds a bare address.
pub fn innermost_parens(line: &str) -> Option<&str> {
    let close = line.find(')')?;
    let open = line[..close].rfind('(')? + 1;
    let inner = line[open..close].trim();
    (!inner.is_empty()).then_some(inner)
}

/// Number immediately preceding the first `%`
pub fn percentage(line: &str) -> Option<f64> {
    let idx = line.find('%')?;
    let head = &line[..idx];
    let start = head
        .char_indices()
        .rev()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == ','))
        .map_or(0, |(i, c)| i + c.len_utf8());
    leading_number(&head[start..])
}

/// `N packets transmitted, M [packets ]received, ... X% packet loss`
pub fn transmit_summary(line: &str) -> Option<(u32, u32, Option<f64>)> {
    if !line.contains("transmitted") {
        return None;
    }
    let mut segments = line.split(',');
    let sent = first_integer(segments.next()?)?;
    let received = first_integer(segments.next()?)?;
    Some((sent, received, percentage(line)))
}

/// `<prefix> min/avg/max[/mdev|/stddev] = a/b/c[/d] ms`
///
/// Maps values by the names printed on the left, so three-field and
/// four-field variants both work.
pub fn slash_statistics(line: &str) -> Option<RttSummary> {
    let (left, right) = line.split_once('=')?;
    let names = left.split_whitespace().last()?;
    let values = right.trim().trim_end_matches("ms").trim();

    let mut summary = RttSummary::default();
    let mut matched = false;
    for (name, value) in names.split('/').zip(values.split('/')) {
        let value = leading_number(value);
        match name {
            "min" => summary.min = value,
            "avg" => summary.avg = value,
            "max" => summary.max = value,
            "mdev" | "stddev" | "std-dev" => summary.stddev = value,
            _ => continue,
        }
        matched = true;
    }
    matched.then_some(summary)
}

/// A value introduced by `=`, with whether `ms` follows it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqualsValue {
    pub value: f64,
    pub millis: bool,
}

/// Every `= N` / `=N` value on the line, in order
pub fn equals_values(line: &str) -> Vec<EqualsValue> {
    line.match_indices('=')
        .filter_map(|(idx, _)| {
            let rest = line[idx + 1..].trim_start();
            let value = leading_number(rest)?;
            Some(EqualsValue {
                value,
                millis: number_unit_is_ms(rest),
            })
        })
        .collect()
}

/// RTT carried as `label=Nms`, `label<Nms` or `label=N ms`
///
/// The label may be localized; only the shape matters. The number must
/// follow the marker immediately, which keeps `Minimum = 9ms` summary
/// fields from matching.
pub fn marked_millis(line: &str) -> Option<f64> {
    line.match_indices(['=', '<']).find_map(|(idx, _)| {
        let rest = &line[idx + 1..];
        if !rest.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        let value = leading_number(rest)?;
        number_unit_is_ms(rest).then_some(value)
    })
}

/// Whether the number at the start of `s` is followed by `ms`
fn number_unit_is_ms(s: &str) -> bool {
    let unit = s
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ',')
        .trim_start();
    unit.starts_with("ms")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("10.625 ms"), Some(10.625));
        assert_eq!(leading_number(" 3,5ms"), Some(3.5));
        assert_eq!(leading_number("12."), Some(12.0));
        assert_eq!(leading_number("ms"), None);
    }

    #[test]
    fn test_number_after() {
        let line = "64 bytes from 1.1.1.1: icmp_seq=1 ttl=57 time=11.2 ms";
        assert_eq!(number_after(line, "time="), Some(11.2));
        assert_eq!(number_after(line, "rtt="), None);
    }

    #[test]
    fn test_between() {
        assert_eq!(between("PING a (1.2.3.4) 56(84)", '(', ')'), Some("1.2.3.4"));
        assert_eq!(between("Pinging a [::1] with", '[', ']'), Some("::1"));
        assert_eq!(between("no brackets", '[', ']'), None);
    }

    #[test]
    fn test_innermost_parens() {
        assert_eq!(innermost_parens("PING a (1.2.3.4) 56(84)"), Some("1.2.3.4"));
        assert_eq!(
            innermost_parens("PING a.example(2001:db8::1 (2001:db8::1)) 56 data bytes"),
            Some("2001:db8::1")
        );
        assert_eq!(innermost_parens("PING ::1(::1) 56 data bytes"), Some("::1"));
        assert_eq!(innermost_parens("PING a: 56 data bytes"), None);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage("4 received, 0% packet loss"), Some(0.0));
        assert_eq!(percentage("2 packets received, 33.3% packet loss"), Some(33.3));
        assert_eq!(percentage("(perte 25%),"), Some(25.0));
        assert_eq!(percentage("no percent"), None);
    }

    #[test]
    fn test_transmit_summary() {
        assert_eq!(
            transmit_summary("4 packets transmitted, 3 received, 25% packet loss, time 3004ms"),
            Some((4, 3, Some(25.0)))
        );
        assert_eq!(
            transmit_summary("4 packets transmitted, 0 received, +4 errors, 100% packet loss"),
            Some((4, 0, Some(100.0)))
        );
        assert_eq!(transmit_summary("64 bytes from 1.2.3.4"), None);
    }

    #[test]
    fn test_slash_statistics_three_and_four_fields() {
        let four = slash_statistics("rtt min/avg/max/mdev = 9.500/10.625/12.000/0.960 ms").unwrap();
        assert_eq!(four.avg, Some(10.625));
        assert_eq!(four.stddev, Some(0.96));

        let three = slash_statistics("round-trip min/avg/max = 1.0/2.0/3.0 ms").unwrap();
        assert_eq!(three.max, Some(3.0));
        assert_eq!(three.stddev, None);
    }

    #[test]
    fn test_marked_millis() {
        assert_eq!(marked_millis("Reply from 1.2.3.4: bytes=32 time=14ms TTL=57"), Some(14.0));
        assert_eq!(marked_millis("Reply from ::1: time<1ms"), Some(1.0));
        assert_eq!(marked_millis("Réponse de 1.2.3.4 : octets=32 temps=7 ms TTL=57"), Some(7.0));
        assert_eq!(marked_millis("    Minimum = 9ms, Maximum = 12ms, Average = 10ms"), None);
        assert_eq!(marked_millis("Request timed out."), None);
    }

    #[test]
    fn test_equals_values() {
        let values = equals_values("    Minimum = 9ms, Maximum = 12ms, Average = 10ms");
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|v| v.millis));

        let counts = equals_values("    Packets: Sent = 4, Received = 3, Lost = 1 (25% loss),");
        let numbers: Vec<f64> = counts.iter().map(|v| v.value).collect();
        assert_eq!(numbers, vec![4.0, 3.0, 1.0]);
        assert!(counts.iter().all(|v| !v.millis));
    }
}
