//! Decoding of categorical CSV payloads.
//!
//! The heatmap endpoint answers with a header row naming `group`,
//! `variable` and `value` columns (in any order), followed by one row per
//! cell. Fields may be double-quoted; a doubled quote inside a quoted field
//! is a literal quote.

use crib_common::error::{CribError, Result};
use crib_common::types::Sample;

const COLUMNS: [&str; 3] = ["group", "variable", "value"];

/// Parses a CSV body into samples, preserving row order.
///
/// Blank lines are skipped. A row with a non-numeric value yields a sample
/// without a value rather than an error.
///
/// # Errors
///
/// Returns [`CribError::NotFound`] if the body has no header or the header
/// lacks one of the required columns.
pub fn parse_samples(body: &str) -> Result<Vec<Sample>> {
    let mut lines = body.lines().filter(|line| !line.trim().is_empty());
    let header = lines.next().ok_or(CribError::NotFound {
        kind: "csv header",
        id: COLUMNS.join(","),
    })?;
    let header = split_fields(header);

    let mut index = [0_usize; 3];
    for (slot, name) in index.iter_mut().zip(COLUMNS) {
        *slot = header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or(CribError::NotFound {
                kind: "csv column",
                id: name.to_string(),
            })?;
    }
    let [group, variable, value] = index;

    let samples = lines
        .enumerate()
        .map(|(row, line)| {
            let fields = split_fields(line);
            let field = |i: usize| fields.get(i).map_or("", String::as_str);
            Sample::parse(row, field(group), field(variable), field(value))
        })
        .collect();
    Ok(samples)
}

/// Splits one CSV line into fields, honouring double quotes.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                let _ = chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_in_order() {
        let body = "group,variable,value\nA,v1,1\nA,v2,2\nB,v1,3\n";
        let samples = parse_samples(body).expect("parse");
        assert_eq!(
            samples,
            vec![
                Sample::new("A", "v1", 1.0),
                Sample::new("A", "v2", 2.0),
                Sample::new("B", "v1", 3.0),
            ]
        );
    }

    #[test]
    fn columns_may_be_reordered() {
        let body = "value,group,variable\n4.5,12:00:00,0%\n";
        let samples = parse_samples(body).expect("parse");
        assert_eq!(samples, vec![Sample::new("12:00:00", "0%", 4.5)]);
    }

    #[test]
    fn quoted_fields_keep_commas_and_quotes() {
        let body = "group,variable,value\r\n\"a,b\",\"say \"\"hi\"\"\",7\r\n";
        let samples = parse_samples(body).expect("parse");
        assert_eq!(samples[0].group, "a,b");
        assert_eq!(samples[0].variable, "say \"hi\"");
        assert_eq!(samples[0].value, Some(7.0));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let body = "\ngroup,variable,value\n\nA,v1,1\n\n";
        assert_eq!(parse_samples(body).expect("parse").len(), 1);
    }

    #[test]
    fn malformed_and_missing_values_have_no_value() {
        let body = "group,variable,value\nA,v1,abc\nA,v2\n";
        let samples = parse_samples(body).expect("parse");
        assert_eq!(samples[0].value, None);
        assert_eq!(samples[1].value, None);
    }

    #[test]
    fn header_only_is_empty_dataset() {
        let samples = parse_samples("group,variable,value\n").expect("parse");
        assert!(samples.is_empty());
    }

    #[test]
    fn missing_column_is_an_error() {
        let err = parse_samples("group,value\nA,1\n").unwrap_err();
        assert!(err.to_string().contains("variable"));
    }

    #[test]
    fn empty_body_is_an_error() {
        assert!(parse_samples("").is_err());
    }
}
