//! Aligned text table for [`Schema`].
use crate::analysis::Schema;
use std::fmt;

const HEADERS: [&str; 3] = ["names", "native", "scitypes"];

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<[String; 3]> = self
            .columns()
            .iter()
            .map(|c| [c.name.clone(), c.native.to_string(), c.tag.to_string()])
            .collect();

        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let rule = |f: &mut fmt::Formatter<'_>, left: &str, mid: &str, right: &str| -> fmt::Result {
            let bars: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
            writeln!(f, "{}{}{}", left, bars.join(mid), right)
        };

        rule(f, "+", "+", "+")?;
        writeln!(
            f,
            "| {:<w0$} | {:<w1$} | {:<w2$} |",
            HEADERS[0],
            HEADERS[1],
            HEADERS[2],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        )?;
        rule(f, "+", "+", "+")?;
        for [name, native, tag] in &rows {
            writeln!(
                f,
                "| {:<w0$} | {:<w1$} | {:<w2$} |",
                name,
                native,
                tag,
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2]
            )?;
        }
        rule(f, "+", "+", "+")?;
        write!(f, "_.nrows = {}", self.nrows())
    }
}

#[cfg(test)]
mod tests {
    use crate::analysis::build_schema;
    use crate::convention::ConventionRegistry;
    use crate::store::{Column, ColumnTable, Value};

    #[test]
    fn test_schema_table() {
        let t = ColumnTable::new(vec![
            ("x".into(), Column::new(vec![Value::Float(1.0), Value::Missing])),
            ("label".into(), Column::new(vec![Value::from("a"), Value::from("b")])),
        ])
        .unwrap();
        let text = build_schema(&t, &ConventionRegistry::new()).unwrap().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[1].starts_with("| names | native      | scitypes"));
        assert!(lines[3].contains("| Option<f64> | Union{Missing, Continuous} |"));
        assert_eq!(lines[6], "_.nrows = 2");
        // Every table line has the same width.
        assert!(lines[..6].iter().all(|l| l.chars().count() == lines[0].chars().count()));
    }
}
