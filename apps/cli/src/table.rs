use console::{Alignment, measure_text_width, pad_str, truncate_str};

/// Plain-text column table for terminal listings.
#[derive(Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

struct Column {
    header: &'static str,
    max_width: Option<usize>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column; cells wider than `max_width` are truncated with `…`.
    pub fn column(mut self, header: &'static str, max_width: Option<usize>) -> Self {
        self.columns.push(Column { header, max_width });
        self
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let widest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| measure_text_width(cell))
                    .chain(std::iter::once(measure_text_width(col.header)))
                    .max()
                    .unwrap_or(0);
                col.max_width.map_or(widest, |max| widest.min(max))
            })
            .collect();

        let headers: Vec<String> = self.columns.iter().map(|c| c.header.to_string()).collect();
        let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();

        let mut lines = vec![self.line(&headers, &widths), self.line(&rule, &widths)];
        lines.extend(self.rows.iter().map(|row| self.line(row, &widths)));
        lines.join("\n")
    }

    fn line(&self, cells: &[String], widths: &[usize]) -> String {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                let cell = truncate_str(cell, *width, "…");
                pad_str(&cell, *width, Alignment::Left, None).into_owned()
            })
            .collect();
        padded.join("  ").trim_end().to_string()
    }
}
