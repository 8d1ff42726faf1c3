/// Render rows as a psql-style boxed table
///
/// Columns whose cells are all numeric are right-aligned, header included.
/// A table without rows still renders its header.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let numeric: Vec<bool> = (0..headers.len())
        .map(|i| {
            !rows.is_empty()
                && rows
                    .iter()
                    .all(|row| row.get(i).is_some_and(|cell| cell.parse::<f64>().is_ok()))
        })
        .collect();

    let rule = |corner: char, joint: char| {
        let inner: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        format!("{corner}{}{corner}", inner.join(&joint.to_string()))
    };

    let line = |cells: &[String]| {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &width)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                if numeric[i] {
                    format!(" {cell:>width$} ")
                } else {
                    format!(" {cell:<width$} ")
                }
            })
            .collect();
        format!("|{}|", padded.join("|"))
    };

    let mut out = Vec::with_capacity(rows.len() + 4);
    out.push(rule('+', '+'));
    out.push(line(headers));
    out.push(rule('|', '+'));
    out.extend(rows.iter().map(|row| line(row)));
    out.push(rule('+', '+'));
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn renders_boxed_table() {
        let headers = strings(&["Policy Name", "Path", "Total Exclusions"]);
        let rows = vec![strings(&["Audit", "3", "3"]), strings(&["Servers", "12", "14"])];

        let expected = "\
+-------------+------+------------------+
| Policy Name | Path | Total Exclusions |
|-------------+------+------------------|
| Audit       |    3 |                3 |
| Servers     |   12 |               14 |
+-------------+------+------------------+";
        assert_eq!(render_table(&headers, &rows), expected);
    }

    #[test]
    fn renders_header_only_when_empty() {
        let headers = strings(&["Policy Name", "FS"]);
        let expected = "\
+-------------+----+
| Policy Name | FS |
|-------------+----|
+-------------+----+";
        assert_eq!(render_table(&headers, &[]), expected);
    }
}
