use ndarray::{s, Array2, ArrayView1};
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Errors raised while loading or slicing a field matrix.
#[derive(thiserror::Error, Debug)]
pub enum FieldError {
    #[error("failed to read field file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("field text contains no data rows")]
    Empty,

    #[error("line {line}, column {column}: cannot parse '{token}' as a number")]
    Parse {
        line: usize,
        column: usize,
        token: String,
    },

    #[error("line {line} has {found} values, expected {expected} like the first row")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("empty column range {start}..{end}")]
    EmptyRange { start: usize, end: usize },

    #[error("column range {start}..{end} is out of bounds for a field with {available} columns")]
    ColumnsOutOfRange {
        start: usize,
        end: usize,
        available: usize,
    },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

/// A field sampled over space and time: rows are time steps, columns are
/// spatial samples. Immutable once built; cropping returns a new matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldMatrix {
    data: Array2<f64>,
}

/// Basic statistics over the finite values of a field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSummary {
    pub rows: usize,
    pub columns: usize,
    pub min: f64,
    pub max: f64,
    pub max_abs: f64,
}

impl FieldMatrix {
    pub fn from_array(data: Array2<f64>) -> Self {
        Self { data }
    }

    /// Read a whitespace-delimited matrix from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FieldError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| FieldError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let field = Self::parse(&text)?;
        log::info!(
            "Loaded field {:?}: {} rows x {} columns",
            path,
            field.rows(),
            field.columns()
        );
        Ok(field)
    }

    /// Parse one row per line. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Result<Self, FieldError> {
        let lines: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .filter_map(|(idx, raw)| {
                let content = raw.split('#').next().unwrap_or("").trim();
                (!content.is_empty()).then_some((idx + 1, content))
            })
            .collect();

        if lines.is_empty() {
            return Err(FieldError::Empty);
        }

        // Parse in parallel, then report the earliest bad line.
        let parsed: Vec<Result<Vec<f64>, FieldError>> = lines
            .par_iter()
            .map(|&(line, content)| parse_row(line, content))
            .collect();
        let rows = parsed.into_iter().collect::<Result<Vec<_>, _>>()?;

        let expected = rows[0].len();
        for (&(line, _), row) in lines.iter().zip(&rows) {
            if row.len() != expected {
                return Err(FieldError::Ragged {
                    line,
                    expected,
                    found: row.len(),
                });
            }
        }

        let n_rows = rows.len();
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let data = Array2::from_shape_vec((n_rows, expected), flat)?;
        Ok(Self { data })
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn columns(&self) -> usize {
        self.data.ncols()
    }

    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.rows()).then(|| self.data.row(index))
    }

    /// Rows in time order.
    pub fn rows_iter(&self) -> impl ExactSizeIterator<Item = ArrayView1<'_, f64>> {
        self.data.outer_iter()
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    /// Copy out the columns in `range`, keeping every row.
    ///
    /// The range must lie fully inside the field; nothing is clamped.
    pub fn crop(&self, range: Range<usize>) -> Result<Self, FieldError> {
        let Range { start, end } = range;
        if start >= end {
            return Err(FieldError::EmptyRange { start, end });
        }
        if end > self.columns() {
            return Err(FieldError::ColumnsOutOfRange {
                start,
                end,
                available: self.columns(),
            });
        }

        let data = self.data.slice(s![.., start..end]).to_owned();
        log::debug!(
            "Cropped columns {}..{}: {} x {} -> {} x {}",
            start,
            end,
            self.rows(),
            self.columns(),
            data.nrows(),
            data.ncols()
        );
        Ok(Self { data })
    }

    pub fn summary(&self) -> FieldSummary {
        let (min, max) = self
            .data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let (min, max) = if min > max { (0.0, 0.0) } else { (min, max) };

        FieldSummary {
            rows: self.rows(),
            columns: self.columns(),
            min,
            max,
            max_abs: min.abs().max(max.abs()),
        }
    }
}

fn parse_row(line: usize, content: &str) -> Result<Vec<f64>, FieldError> {
    content
        .split_whitespace()
        .enumerate()
        .map(|(idx, token)| {
            token.parse::<f64>().map_err(|_| FieldError::Parse {
                line,
                column: idx + 1,
                token: token.to_string(),
            })
        })
        .collect()
}

impl FromStr for FieldMatrix {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows x {} columns, values in [{}, {}] (max |v| = {})",
            self.rows, self.columns, self.min, self.max, self.max_abs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn parses_whitespace_rows() {
        let field: FieldMatrix = "1 2 3\n4\t5   6\n".parse().unwrap();
        assert_eq!(field.as_array(), &array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    }

    #[test]
    fn skips_blank_lines_and_comments() {
        let text = "# Ex field\n\n1.5e-3 -2 # trailing\n  \n3 nan\n";
        let field = FieldMatrix::parse(text).unwrap();
        assert_eq!(field.rows(), 2);
        assert_eq!(field.columns(), 2);
        assert_eq!(field.as_array()[[0, 0]], 1.5e-3);
        assert!(field.as_array()[[1, 1]].is_nan());
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = FieldMatrix::parse("1 2 3\n\n4 5\n").unwrap_err();
        assert!(matches!(
            err,
            FieldError::Ragged {
                line: 3,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn reports_bad_token_position() {
        let err = FieldMatrix::parse("1 2\n3 x4\n").unwrap_err();
        match err {
            FieldError::Parse {
                line,
                column,
                token,
            } => {
                assert_eq!((line, column), (2, 2));
                assert_eq!(token, "x4");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reports_the_first_bad_line() {
        let mut text = String::new();
        for i in 0..200 {
            text.push_str(if i % 3 == 2 { "1 bad\n" } else { "1 2\n" });
        }
        for _ in 0..10 {
            match FieldMatrix::parse(&text) {
                Err(FieldError::Parse { line, .. }) => assert_eq!(line, 3),
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn empty_text_is_an_error() {
        assert!(matches!(
            FieldMatrix::parse("\n# only a comment\n"),
            Err(FieldError::Empty)
        ));
    }

    #[test]
    fn crop_keeps_rows_and_selected_columns() {
        let data = Array2::from_shape_fn((3, 10), |(r, c)| (r * 10 + c) as f64);
        let field = FieldMatrix::from_array(data);
        let cropped = field.crop(2..6).unwrap();
        assert_eq!(cropped.rows(), 3);
        assert_eq!(cropped.columns(), 4);
        assert_eq!(cropped.row(1).unwrap().to_vec(), vec![12.0, 13.0, 14.0, 15.0]);
        // Source is untouched.
        assert_eq!(field.columns(), 10);
    }

    #[test]
    fn crop_past_the_last_column_fails() {
        let field = FieldMatrix::from_array(Array2::zeros((2, 5)));
        assert!(matches!(
            field.crop(2..6),
            Err(FieldError::ColumnsOutOfRange {
                start: 2,
                end: 6,
                available: 5
            })
        ));
        assert!(matches!(
            field.crop(3..3),
            Err(FieldError::EmptyRange { start: 3, end: 3 })
        ));
    }

    #[test]
    fn summary_ignores_non_finite_values() {
        let field = FieldMatrix::from_array(array![[0.5, f64::NAN], [-2.0, 1.0]]);
        let summary = field.summary();
        assert_eq!(summary.min, -2.0);
        assert_eq!(summary.max, 1.0);
        assert_eq!(summary.max_abs, 2.0);
    }

    #[test]
    fn row_lookup_is_bounded() {
        let field = FieldMatrix::from_array(Array2::zeros((2, 3)));
        assert!(field.row(1).is_some());
        assert!(field.row(2).is_none());
        assert_eq!(field.rows_iter().len(), 2);
    }
}
