use std::{borrow::Cow, fmt};

const COLUMN_GAP: &str = "  ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug)]
pub struct Column<'a> {
    pub title: &'a str,
    pub align: Align,
}

impl<'a> Column<'a> {
    pub const fn left(title: &'a str) -> Self {
        Self {
            title,
            align: Align::Left,
        }
    }

    pub const fn right(title: &'a str) -> Self {
        Self {
            title,
            align: Align::Right,
        }
    }
}

/// Monospace table: a title line, a dashed rule, then one line per row.
///
/// Column widths count characters, not bytes. Trailing padding is trimmed.
pub struct TextTable<'a> {
    columns: &'a [Column<'a>],
    rows: Vec<Vec<Cow<'a, str>>>,
}

impl<'a> TextTable<'a> {
    pub fn new(columns: &'a [Column<'a>]) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Cells beyond the column count are dropped; missing cells render blank.
    pub fn push_row(&mut self, cells: impl IntoIterator<Item = Cow<'a, str>>) {
        self.rows
            .push(cells.into_iter().take(self.columns.len()).collect());
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .fold(column.title.chars().count(), usize::max)
            })
            .collect()
    }

    fn write_line<'c>(
        &self,
        f: &mut fmt::Formatter<'_>,
        widths: &[usize],
        cells: impl Iterator<Item = &'c str>,
    ) -> fmt::Result {
        let mut line = String::new();
        let mut cells = cells.fuse();
        for (idx, (column, &width)) in self.columns.iter().zip(widths).enumerate() {
            if idx > 0 {
                line.push_str(COLUMN_GAP);
            }
            let cell = cells.next().unwrap_or_default();
            let padded = match column.align {
                Align::Left => format!("{cell:<width$}"),
                Align::Right => format!("{cell:>width$}"),
            };
            line.push_str(&padded);
        }
        writeln!(f, "{}", line.trim_end())
    }
}

impl fmt::Display for TextTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() {
            return Ok(());
        }

        let widths = self.widths();
        self.write_line(f, &widths, self.columns.iter().map(|column| column.title))?;

        let rule_len = widths.iter().sum::<usize>() + COLUMN_GAP.len() * (widths.len() - 1);
        writeln!(f, "{}", "-".repeat(rule_len))?;

        for row in &self.rows {
            self.write_line(f, &widths, row.iter().map(|cell| &**cell))?;
        }
        Ok(())
    }
}
