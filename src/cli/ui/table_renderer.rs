const COLUMN_GAP: &str = "  ";
const ELLIPSIS: char = '…';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub alignment: Alignment,
    /// Cells wider than this are cut and end with an ellipsis.
    pub max_width: Option<usize>,
}

impl TableColumn {
    pub fn new(header: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            header: header.into(),
            alignment,
            max_width: None,
        }
    }

    pub fn with_max_width(mut self, max_width: usize) -> Self {
        self.max_width = Some(max_width);
        self
    }

    fn fit(&self, natural: usize) -> usize {
        self.max_width.map_or(natural, |max| natural.min(max))
    }
}

/// Plain-text table: a header line, a dashed rule, then one line per row.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let widest_cell = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| visible_width(cell))
                    .max()
                    .unwrap_or(0);
                column.fit(widest_cell.max(visible_width(&column.header)))
            })
            .collect()
    }

    pub fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        let cells: Vec<String> = self
            .columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (column, width))| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                pad(text, *width, column.alignment)
            })
            .collect();
        cells.join(COLUMN_GAP).trim_end().to_string()
    }

    pub fn render_header(&self, widths: &[usize]) -> String {
        let headers: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        self.render_row(&headers, widths)
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut lines = vec![self.render_header(&widths), rule(&widths)];
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines.join("\n")
    }
}

/// Dashes spanning every column and the gaps between them.
pub fn rule(widths: &[usize]) -> String {
    let gaps = COLUMN_GAP.len() * widths.len().saturating_sub(1);
    "-".repeat(widths.iter().sum::<usize>() + gaps)
}

/// Printable character count; ANSI CSI sequences such as colors count as zero.
pub fn visible_width(text: &str) -> usize {
    let mut chars = text.chars().peekable();
    let mut width = 0;
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' && chars.peek() == Some(&'[') {
            chars.next();
            for terminator in chars.by_ref() {
                if ('\u{40}'..='\u{7e}').contains(&terminator) {
                    break;
                }
            }
            continue;
        }
        width += 1;
    }
    width
}

pub fn pad(text: &str, width: usize, alignment: Alignment) -> String {
    let fitted = if visible_width(text) > width {
        match width {
            0 => String::new(),
            _ => text
                .chars()
                .take(width - 1)
                .chain(std::iter::once(ELLIPSIS))
                .collect(),
        }
    } else {
        text.to_string()
    };
    let fill = " ".repeat(width.saturating_sub(visible_width(&fitted)));
    match alignment {
        Alignment::Left => format!("{fitted}{fill}"),
        Alignment::Right => format!("{fill}{fitted}"),
    }
}
