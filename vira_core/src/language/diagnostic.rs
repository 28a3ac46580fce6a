use std::fmt::Write;
use crate::language::error::Error;

/// Renders `error` rustc-style: a header, the `file:line:column` locator,
/// the offending source line and a caret under the column. Errors without a
/// position render as the header alone.
pub fn render(error: &Error, file_name: &str, source: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "error: {}", error.message);

    let Some(line) = error.line else {
        return out;
    };
    let column = error.column.unwrap_or(1).max(1);

    let src_line = source.lines().nth(line.saturating_sub(1)).unwrap_or("");
    let gutter = line.to_string().len();

    let _ = writeln!(out, "{:gutter$}--> {}:{}:{}", "", file_name, line, column, gutter = gutter);
    let _ = writeln!(out, "{:gutter$} |", "", gutter = gutter);
    let _ = writeln!(out, "{} | {}", line, src_line);

    // Columns count characters; tabs are kept so the caret lines up.
    let padding: String = src_line
        .chars()
        .take(column - 1)
        .map(|ch| if ch == '\t' { '\t' } else { ' ' })
        .collect();
    let _ = writeln!(out, "{:gutter$} | {}^", "", padding, gutter = gutter);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::parser::parse;

    #[test]
    fn points_at_the_offending_token() {
        let source = "let x = 1;\nlet y = ;\n";
        let parsed = parse(source).unwrap();
        let rendered = render(&parsed.errors[0], "main.vira", source);
        let expected = "\
error: Unexpected token ';'
 --> main.vira:2:9
  |
2 | let y = ;
  |         ^
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn positionless_errors_render_header_only() {
        let error = Error::new(crate::language::error::ErrorKind::Semantic, "Undefined identifier 'q'", None, None);
        assert_eq!(render(&error, "a.vira", "write q;"), "error: Undefined identifier 'q'\n");
    }
}
