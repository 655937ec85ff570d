use std::collections::HashMap;

pub type CsvRow = HashMap<String, String>;

/// Parses roster CSV text into header-keyed rows.
///
/// The header line is split on bare commas. Data lines honour double quotes
/// (`""` inside a quoted cell is a literal quote). Blank lines are skipped and
/// missing trailing cells come back as empty strings.
pub fn parse_csv(text: &str) -> Vec<CsvRow> {
    let mut lines = text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));
    let header: Vec<&str> = match lines.next() {
        Some(line) => line.split(',').collect(),
        None => return Vec::new(),
    };

    let mut out = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let cells = split_line(line);
        let row = header
            .iter()
            .enumerate()
            .map(|(idx, key)| {
                let value = cells.get(idx).cloned().unwrap_or_default();
                (key.to_string(), value)
            })
            .collect::<CsvRow>();
        out.push(row);
    }
    out
}

fn split_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if quoted && chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    quoted = !quoted;
                }
            }
            ',' if !quoted => cells.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    cells.push(current);
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unterminated_quote_swallows_rest_of_line() {
        let rows = parse_csv("a,b\n\"x,y,z\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["a"], "x,y,z");
        assert_eq!(rows[0]["b"], "");
    }

    #[test]
    fn header_only_yields_no_rows() {
        assert!(parse_csv("full_name,position").is_empty());
        assert!(parse_csv("").is_empty());
    }
}
