/// Lay out rows of cells as a left-aligned text grid.
///
/// Each column is padded to its widest cell and columns are joined with
/// `separator`. Trailing padding is trimmed from every line.
pub fn format_table<S: AsRef<str>>(rows: &[Vec<S>], separator: &str) -> String {
    let n_columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut widths = vec![0; n_columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.as_ref().chars().count());
        }
    }

    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, cell)| format!("{:width$}", cell.as_ref(), width = widths[i]))
                .collect::<Vec<_>>()
                .join(separator)
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
