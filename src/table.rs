use std::fmt::Write as _;

/// Left-aligned plain-text table; missing cells render empty.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(single_line(cell).chars().count());
        }
    }

    let mut output = String::new();
    push_line(&mut output, headers.iter().copied(), &widths);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut output, separator.iter().map(String::as_str), &widths);
    for row in rows {
        let cells = (0..widths.len()).map(|idx| row.get(idx).map_or("", String::as_str));
        push_line(&mut output, cells, &widths);
    }
    output
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn push_line<'a>(output: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::new();
    for (idx, (cell, &width)) in cells.zip(widths).enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        let _ = write!(line, "{:<width$}", single_line(cell));
    }
    let _ = writeln!(output, "{}", line.trim_end());
}

fn single_line(cell: &str) -> String {
    cell.replace(['\n', '\r', '\t'], " ")
}
