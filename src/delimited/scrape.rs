// ABOUTME: Extracts values from text captured from the database client
// ABOUTME: Used to read counts and max values out of the scratch output file

/// Last line of `text` that is an integer on its own (surrounding blanks allowed)
///
/// The command line processor prints a header, a dashed rule, the value and a
/// record count footer. Unnamed expressions get the header `1`, so when a rule
/// is present only the lines below it are considered; a NULL value (`-`)
/// then yields `None` instead of the header.
///
/// # Examples
///
/// ```
/// # use db2_table_copier::delimited::last_integer_in_text;
/// let output = "\n1\n-----------\n         42\n\n  1 record(s) selected.\n";
/// assert_eq!(last_integer_in_text(output), Some(42));
/// let null = "\n1\n-----------\n          -\n\n  1 record(s) selected.\n";
/// assert_eq!(last_integer_in_text(null), None);
/// assert_eq!(last_integer_in_text("no numbers here"), None);
/// ```
pub fn last_integer_in_text(text: &str) -> Option<i64> {
    let lines: Vec<&str> = text.lines().collect();
    let body = match lines.iter().rposition(|line| is_rule(line)) {
        Some(rule) => &lines[rule + 1..],
        None => &lines[..],
    };

    body.iter()
        .filter_map(|line| line.trim().parse::<i64>().ok())
        .last()
}

/// Dashed line under the column headers; a lone `-` is a NULL value, not a rule
fn is_rule(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 2 && line.chars().all(|c| c == '-')
}

/// Last line of `text` that has something other than whitespace on it
pub fn last_non_blank_line(text: &str) -> Option<&str> {
    text.lines().rev().find(|line| !line.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_integer_picks_last() {
        let text = "1\n2\nabc\n 17 \n";
        assert_eq!(last_integer_in_text(text), Some(17));
    }

    #[test]
    fn test_last_integer_signed() {
        assert_eq!(last_integer_in_text("-5\n"), Some(-5));
        assert_eq!(last_integer_in_text("+8\n"), Some(8));
    }

    #[test]
    fn test_null_value_ignores_generated_header() {
        // max() over an empty table prints '-' under the generated column header "1"
        let output = "\n1\n-----------\n          -\n\n  1 record(s) selected.\n\n";
        assert_eq!(last_integer_in_text(output), None);

        let output = "\nMAXID\n-----------\n          -\n\n  1 record(s) selected.\n";
        assert_eq!(last_integer_in_text(output), None);
    }

    #[test]
    fn test_value_below_rule_wins_over_header() {
        let output = "\n1\n-----------\n        250\n\n  1 record(s) selected.\n";
        assert_eq!(last_integer_in_text(output), Some(250));
        assert!(is_rule("-----------"));
        assert!(!is_rule("          -"));
    }

    #[test]
    fn test_last_non_blank_line() {
        assert_eq!(last_non_blank_line("a\nSQL0204N  not found.\n\n  \n"), Some("SQL0204N  not found."));
        assert_eq!(last_non_blank_line(" \n\n"), None);
    }
}
