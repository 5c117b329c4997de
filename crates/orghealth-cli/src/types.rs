use std::path::PathBuf;

#[derive(Debug)]
pub struct ExportResult {
    pub output: PathBuf,
    pub sheets: Vec<SheetSummary>,
    pub has_bad_rows: bool,
}

impl ExportResult {
    pub fn new(output: PathBuf, sheets: Vec<SheetSummary>) -> Self {
        let has_bad_rows = sheets.iter().any(|sheet| sheet.bad > 0);
        Self {
            output,
            sheets,
            has_bad_rows,
        }
    }
}

#[derive(Debug)]
pub struct SheetSummary {
    pub title: String,
    pub sheet_name: String,
    pub rows: usize,
    pub exported: usize,
    pub bad: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(bad: usize) -> SheetSummary {
        SheetSummary {
            title: "Fields".to_string(),
            sheet_name: "Fields (2)".to_string(),
            rows: 2,
            exported: 2,
            bad,
        }
    }

    #[test]
    fn bad_rows_are_flagged_from_sheet_summaries() {
        assert!(ExportResult::new("out.xlsx".into(), vec![summary(0), summary(1)]).has_bad_rows);
        assert!(!ExportResult::new("out.xlsx".into(), vec![summary(0)]).has_bad_rows);
    }
}
