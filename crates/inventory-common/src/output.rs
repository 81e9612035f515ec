//! Console output: one-line notices and fixed-width tables.

use std::io::{self, Write};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    /// Non-fatal; the action went on
    Warning,
    /// The action was aborted
    Error,
}

/// A single user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, text)
    }

    /// Text as printed, with the level prefix.
    pub fn render(&self) -> String {
        match self.level {
            NoticeLevel::Success | NoticeLevel::Info => self.text.clone(),
            NoticeLevel::Warning => format!("Warning: {}", self.text),
            NoticeLevel::Error => format!("Error: {}", self.text),
        }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.render())
    }
}

/// Left-aligned table with fixed minimum column widths.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<(String, usize)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, title: impl Into<String>, width: usize) -> Self {
        self.columns.push((title.into(), width));
        self
    }

    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.rows
            .push(cells.into_iter().map(|c| c.to_string()).collect());
    }

    fn line<'a>(&self, cells: impl Iterator<Item = &'a str>) -> String {
        let padded: Vec<String> = cells
            .zip(self.columns.iter())
            .map(|(cell, (_, width))| format!("{:<width$}", cell, width = *width))
            .collect();
        padded.join(" ").trim_end().to_string()
    }

    /// Header, separator, then one line per row.
    pub fn render(&self) -> String {
        let rule_len = self.columns.iter().map(|(_, w)| w).sum::<usize>()
            + self.columns.len().saturating_sub(1);

        let mut lines = vec![
            self.line(self.columns.iter().map(|(title, _)| title.as_str())),
            "-".repeat(rule_len),
        ];
        for row in &self.rows {
            lines.push(self.line(row.iter().map(String::as_str)));
        }

        let mut rendered = lines.join("\n");
        rendered.push('\n');
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_prefixes() {
        assert_eq!(Notice::success("Item added.").render(), "Item added.");
        assert_eq!(Notice::warning("bad row").render(), "Warning: bad row");
        assert_eq!(Notice::error("no item").render(), "Error: no item");
    }

    #[test]
    fn test_notice_write() {
        let mut out = Vec::new();
        Notice::info("Goodbye!").write_to(&mut out).unwrap();
        assert_eq!(out, b"Goodbye!\n");
    }

    #[test]
    fn test_table_render() {
        let mut table = Table::new()
            .column("Name", 20)
            .column("Quantity", 10)
            .column("Price", 10);
        table.row(["Widget", "10", "2.50"]);
        table.row(["Gadget, large", "0", "19.99"]);

        insta::assert_snapshot!(table.render(), @r"
        Name                 Quantity   Price
        ------------------------------------------
        Widget               10         2.50
        Gadget, large        0          19.99
        ");
    }

    #[test]
    fn test_long_cells_are_not_truncated() {
        let mut table = Table::new().column("Name", 4).column("Qty", 3);
        table.row(["Extremely long name", "1"]);

        let rendered = table.render();
        assert!(rendered.contains("Extremely long name 1"));
        assert!(rendered.contains("--------\n"));
    }
}
