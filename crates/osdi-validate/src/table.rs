//! Whitespace-delimited result table loader.
//!
//! ngspice `wrdata` output is one header row of column names followed
//! by numeric rows, fields separated by runs of spaces or tabs. AC
//! tables repeat a column name for the imaginary part; repeated names
//! are disambiguated with a `.1`, `.2`, ... suffix so every column
//! stays addressable (`i(vsense)` and `i(vsense).1`).

use std::path::Path;

use crate::error::{Error, Result};

/// A column-addressable numeric table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    names: Vec<String>,
    /// Column-major data; every column has the same length.
    columns: Vec<Vec<f64>>,
}

impl Table {
    /// Load and parse a table file. A missing file is reported as a
    /// table-read error carrying the path: this is how a failed
    /// simulation most clearly surfaces.
    pub fn load(path: &Path) -> Result<Table> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::TableRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|e| match e {
            Error::TableParse { line, reason, .. } => Error::TableParse {
                path: Some(path.to_path_buf()),
                line,
                reason,
            },
            other => other,
        })
    }

    /// Parse table text. The first non-empty line is the header;
    /// every subsequent non-empty line must carry exactly one numeric
    /// field per column.
    pub fn parse(text: &str) -> Result<Table> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty());

        let (_, header) = lines.next().ok_or_else(|| Error::TableParse {
            path: None,
            line: 0,
            reason: "empty table: no header row".to_string(),
        })?;

        let names = mangle_duplicates(header.split_whitespace());
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

        for (lineno, line) in lines {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != names.len() {
                return Err(Error::TableParse {
                    path: None,
                    line: lineno + 1,
                    reason: format!(
                        "expected {} fields to match header, found {}",
                        names.len(),
                        fields.len()
                    ),
                });
            }
            for (col, field) in columns.iter_mut().zip(&fields) {
                let value: f64 = field.parse().map_err(|_| Error::TableParse {
                    path: None,
                    line: lineno + 1,
                    reason: format!("not a number: {field:?}"),
                })?;
                col.push(value);
            }
        }

        Ok(Table { names, columns })
    }

    /// Column values by name.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
            .ok_or_else(|| Error::ColumnNotFound {
                name: name.to_string(),
                available: self.names.join(", "),
            })
    }

    /// Column names, in file order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Number of data rows.
    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }
}

/// Make repeated header names unique by suffixing occurrences after
/// the first with `.1`, `.2`, ... The suffix is bumped past any name
/// already emitted, so a header that itself contains `a.1` next to a
/// repeated `a` still comes out unique.
fn mangle_duplicates<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in raw {
        let mut seen = names.iter().filter(|n| dedup_base(n) == name).count();
        let mut candidate = if seen == 0 {
            name.to_string()
        } else {
            format!("{name}.{seen}")
        };
        while names.contains(&candidate) {
            seen += 1;
            candidate = format!("{name}.{seen}");
        }
        names.push(candidate);
    }
    names
}

fn dedup_base(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((base, suffix)) if suffix.chars().all(|c| c.is_ascii_digit()) => base,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn round_trip_header_and_rows() {
        let text = "v(d)  i(vsense)\tv(t)\n\
                    0.0 1.0e-12 0.0\n\
                    5.0e-2   2.5e-11 1.0e-4\n\
                    \n\
                    1.0e-1 6.1e-10 2.0e-3\n";
        let table = Table::parse(text).unwrap();
        assert_eq!(table.column_names(), &["v(d)", "i(vsense)", "v(t)"]);
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.column("i(vsense)").unwrap()[1], 2.5e-11);
        assert_eq!(table.column("v(t)").unwrap(), &[0.0, 1.0e-4, 2.0e-3]);
    }

    #[test]
    fn field_count_mismatch_is_a_hard_failure() {
        let text = "v(d) i(vsense)\n0.0 1e-12\n0.05\n";
        let err = Table::parse(text).unwrap_err();
        match err {
            Error::TableParse { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("expected 2 fields"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_field_is_a_hard_failure() {
        let text = "v(d) i(vsense)\n0.0 oops\n";
        assert!(matches!(
            Table::parse(text),
            Err(Error::TableParse { line: 2, .. })
        ));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            Table::parse("\n  \n"),
            Err(Error::TableParse { .. })
        ));
    }

    #[test]
    fn duplicate_headers_are_mangled_like_ac_tables() {
        // AC output repeats the column name for the imaginary part.
        let text = "frequency i(vsense) i(vsense)\n1.0e3 1.0e-3 -2.0e-6\n";
        let table = Table::parse(text).unwrap();
        assert_eq!(
            table.column_names(),
            &["frequency", "i(vsense)", "i(vsense).1"]
        );
        assert_eq!(table.column("i(vsense).1").unwrap(), &[-2.0e-6]);
    }

    #[test]
    fn mangling_avoids_collision_with_literal_suffixed_names() {
        // A header already containing `a.1` next to a repeated `a`
        // must still produce unique column names.
        let text = "a a a.1\n1 2 3\n";
        let table = Table::parse(text).unwrap();
        assert_eq!(table.column_names(), &["a", "a.1", "a.1.1"]);
        assert_eq!(table.column("a.1").unwrap(), &[2.0]);
        assert_eq!(table.column("a.1.1").unwrap(), &[3.0]);

        let mut sorted = table.column_names().to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
    }

    #[test]
    fn missing_column_lists_available_names() {
        let table = Table::parse("a b\n1 2\n").unwrap();
        let err = table.column("c").unwrap_err();
        match err {
            Error::ColumnNotFound { name, available } => {
                assert_eq!(name, "c");
                assert_eq!(available, "a, b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_reports_missing_file_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dc_sim.ngspice");
        let err = Table::load(&path).unwrap_err();
        assert!(matches!(err, Error::TableRead { .. }));
    }

    #[test]
    fn load_parses_a_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dc_sim.ngspice");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "time i(vsense)").unwrap();
        writeln!(f, "0.0 1.0e-3").unwrap();
        writeln!(f, "1.0e-9 2.0e-3").unwrap();
        drop(f);

        let table = Table::load(&path).unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column("time").unwrap()[1], 1.0e-9);
    }
}
