//! Standard magnitude table
//!
//! Synthetic magnitudes of a grid of stellar atmosphere templates across every
//! filter the engine knows about, together with per-filter auxiliary values:
//!
//! | aux row | meaning                                   |
//! |---------|-------------------------------------------|
//! | 0       | pivot wavelength (microns)                |
//! | 1       | zero-magnitude flux density (W/m^2/micron)|
//! | 2       | zero-magnitude flux density (Jy)          |
//! | 3       | extinction relative to A_V                |
//!
//! # File format
//!
//! ```text
//! # Johnson V # 0.5470 3.63e-08 3631.0 1.000
//! # Johnson J # 1.2200 3.13e-09 1594.0 0.282
//! ...
//! 14.512 13.210 ... # bosz_t5750_g4.5_m0.0
//! ```
//!
//! Comment lines with exactly two `#` separators carry the auxiliary values of
//! one filter, in column order. Every other line is one template row followed
//! by its label. Filter labels are not read from the file: the file's names
//! differ from the ones used for matching, so the column labels are supplied
//! separately (see [`STANDARD_FILTER_LABELS`]).

use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use ndarray::{Array2, ArrayView1, Axis};
use once_cell::sync::OnceCell;

use crate::error::TableError;

/// Environment variable naming the reference data directory.
pub const DATA_DIR_ENV: &str = "SIMCAT_DATA";

/// File name of the table inside [`DATA_DIR_ENV`].
pub const STANDARD_MAGNITUDE_FILE: &str = "standard_magnitudes.txt";

const AUX_ROWS: usize = 4;

/// Column labels of the standard table, in file column order.
///
/// Labels are matched by substring. The trailing space in `"GAIA g "` keeps a
/// request for the G band from also matching `"GAIA gbp"` / `"GAIA grp"`.
pub const STANDARD_FILTER_LABELS: [&str; 58] = [
    "Johnson V",
    "Johnson J",
    "Johnson H",
    "Johnson K",
    "2MASS J",
    "2MASS H",
    "2MASS Ks",
    "Johnson L",
    "WISE W1",
    "WISE W2",
    "WISE W3",
    "WISE W4",
    "GAIA g ",
    "GAIA gbp",
    "GAIA grp",
    "niriss_f090w_magnitude",
    "niriss_f115w_magnitude",
    "niriss_f140w_magnitude",
    "niriss_f150w_magnitude",
    "niriss_f158w_magnitude",
    "niriss_f200w_magnitude",
    "niriss_f277w_magnitude",
    "niriss_f356w_magnitude",
    "niriss_f380w_magnitude",
    "niriss_f430w_magnitude",
    "niriss_f444w_magnitude",
    "niriss_f480w_magnitude",
    "guider1_magnitude",
    "guider2_magnitude",
    "nircam_f070w_magnitude",
    "nircam_f090w_magnitude",
    "nircam_f115w_magnitude",
    "nircam_f140w_magnitude",
    "nircam_f150w_magnitude",
    "nircam_f150w2_magnitude",
    "nircam_f162w_magnitude",
    "nircam_f164w_magnitude",
    "nircam_f182w_magnitude",
    "nircam_f187w_magnitude",
    "nircam_f200w_magnitude",
    "nircam_f210w_magnitude",
    "nircam_f212w_magnitude",
    "nircam_f250w_magnitude",
    "nircam_f277w_magnitude",
    "nircam_f300w_magnitude",
    "nircam_f322w2_magnitude",
    "nircam_f323w_magnitude",
    "nircam_f335w_magnitude",
    "nircam_f356w_magnitude",
    "nircam_f360w_magnitude",
    "nircam_f405w_magnitude",
    "nircam_f410w_magnitude",
    "nircam_f430w_magnitude",
    "nircam_f444w_magnitude",
    "nircam_f460w_magnitude",
    "nircam_f466w_magnitude",
    "nircam_f470w_magnitude",
    "nircam_f480w_magnitude",
];

/// Immutable template magnitude grid with per-filter auxiliary values.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMagnitudeTable {
    /// `[template, filter]`
    magnitudes: Array2<f64>,
    /// `[aux row, filter]`
    aux: Array2<f64>,
    filters: Vec<String>,
    templates: Vec<String>,
}

impl StandardMagnitudeTable {
    /// Assemble a table, checking that every dimension agrees.
    pub fn new(
        magnitudes: Array2<f64>,
        aux: Array2<f64>,
        filters: Vec<String>,
        templates: Vec<String>,
    ) -> Result<Self, TableError> {
        let (n_templates, n_filters) = magnitudes.dim();
        if aux.dim() != (AUX_ROWS, n_filters) {
            return Err(TableError::Shape(format!(
                "aux is {:?}, expected ({AUX_ROWS}, {n_filters})",
                aux.dim()
            )));
        }
        if filters.len() != n_filters {
            return Err(TableError::Shape(format!(
                "{} filter labels for {n_filters} columns",
                filters.len()
            )));
        }
        if templates.len() != n_templates {
            return Err(TableError::Shape(format!(
                "{} template labels for {n_templates} rows",
                templates.len()
            )));
        }
        if let Some(((t, f), m)) = magnitudes.indexed_iter().find(|(_, m)| !m.is_finite()) {
            return Err(TableError::Shape(format!(
                "non-finite magnitude {m} for template {t} in filter {f}"
            )));
        }
        Ok(Self {
            magnitudes,
            aux,
            filters,
            templates,
        })
    }

    /// Parse a table using [`STANDARD_FILTER_LABELS`] for the columns.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, TableError> {
        let labels = STANDARD_FILTER_LABELS.iter().map(|s| s.to_string()).collect();
        Self::parse_with_labels(reader, labels)
    }

    /// Parse a table whose columns carry `filters` as labels.
    pub fn parse_with_labels<R: BufRead>(reader: R, filters: Vec<String>) -> Result<Self, TableError> {
        let mut aux_columns: Vec<[f64; AUX_ROWS]> = Vec::new();
        let mut rows: Vec<f64> = Vec::new();
        let mut templates = Vec::new();
        let mut width: Option<usize> = None;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let parse_err = |message: String| TableError::Parse {
                line: line_no,
                message,
            };

            if line.trim().is_empty() {
                continue;
            }

            let parts: Vec<&str> = line.split('#').collect();
            if line.starts_with('#') {
                if parts.len() != 3 {
                    continue;
                }
                let values: Vec<f64> = parts[2]
                    .split_whitespace()
                    .take(AUX_ROWS)
                    .map(|v| v.parse::<f64>().map_err(|e| parse_err(format!("aux value '{v}': {e}"))))
                    .collect::<Result<_, _>>()?;
                let column: [f64; AUX_ROWS] = values
                    .try_into()
                    .map_err(|_| parse_err(format!("expected {AUX_ROWS} auxiliary values")))?;
                aux_columns.push(column);
                continue;
            }

            let values: Vec<f64> = parts[0]
                .split_whitespace()
                .map(|v| v.parse::<f64>().map_err(|e| parse_err(format!("magnitude '{v}': {e}"))))
                .collect::<Result<_, _>>()?;
            match width {
                None => width = Some(values.len()),
                Some(w) if w != values.len() => {
                    return Err(parse_err(format!("{} values, expected {w}", values.len())));
                }
                Some(_) => {}
            }
            rows.extend(values);
            templates.push(parts.last().map(|s| s.trim()).unwrap_or_default().to_string());
        }

        let n_filters = width.unwrap_or(filters.len());
        if aux_columns.len() != n_filters {
            return Err(TableError::Shape(format!(
                "{} auxiliary header lines for {n_filters} columns",
                aux_columns.len()
            )));
        }

        let magnitudes = Array2::from_shape_vec((templates.len(), n_filters), rows)
            .map_err(|e| TableError::Shape(e.to_string()))?;
        let aux = Array2::from_shape_fn((AUX_ROWS, n_filters), |(r, c)| aux_columns[c][r]);

        Self::new(magnitudes, aux, filters, templates)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TableError::NotFound(path.to_path_buf()));
        }
        let table = Self::parse(BufReader::new(File::open(path)?))?;
        log::info!(
            "Loaded {} templates x {} filters from {}",
            table.n_templates(),
            table.n_filters(),
            path.display()
        );
        Ok(table)
    }

    /// The full `[template, filter]` grid.
    pub fn magnitudes(&self) -> &Array2<f64> {
        &self.magnitudes
    }

    pub fn template(&self, index: usize) -> ArrayView1<'_, f64> {
        self.magnitudes.index_axis(Axis(0), index)
    }

    pub fn pivot_wavelengths(&self) -> ArrayView1<'_, f64> {
        self.aux.row(0)
    }

    /// Zero-magnitude flux density in W/m^2/micron
    pub fn zero_point_wm2um(&self) -> ArrayView1<'_, f64> {
        self.aux.row(1)
    }

    /// Zero-magnitude flux density in Jy
    pub fn zero_point_jy(&self) -> ArrayView1<'_, f64> {
        self.aux.row(2)
    }

    /// Extinction in each filter per magnitude of A_V
    pub fn relative_extinction(&self) -> ArrayView1<'_, f64> {
        self.aux.row(3)
    }

    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    pub fn n_templates(&self) -> usize {
        self.magnitudes.nrows()
    }

    pub fn n_filters(&self) -> usize {
        self.magnitudes.ncols()
    }
}

/// Default location of the table: `$SIMCAT_DATA/standard_magnitudes.txt`.
pub fn default_table_path() -> Result<PathBuf, TableError> {
    let dir = env::var_os(DATA_DIR_ENV).ok_or(TableError::MissingDataDir(DATA_DIR_ENV))?;
    Ok(PathBuf::from(dir).join(STANDARD_MAGNITUDE_FILE))
}

static STANDARD_TABLE: OnceCell<StandardMagnitudeTable> = OnceCell::new();

/// Process-wide standard magnitude table, loaded on first use.
///
/// `path` is only consulted by the call that performs the load; later calls
/// return the cached table. With no path the default location is used.
pub fn standard_magnitudes(path: Option<&Path>) -> Result<&'static StandardMagnitudeTable, TableError> {
    STANDARD_TABLE.get_or_try_init(|| match path {
        Some(p) => StandardMagnitudeTable::from_path(p),
        None => StandardMagnitudeTable::from_path(default_table_path()?),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use ndarray::array;

    /// Five-filter table: two optical bands, two near-IR bands and one
    /// instrument band, with three templates.
    pub fn small_table() -> StandardMagnitudeTable {
        let magnitudes = array![
            [10.0, 9.5, 9.0, 8.8, 9.1],
            [11.0, 10.0, 9.0, 8.5, 8.9],
            [12.0, 10.5, 9.0, 8.0, 8.6],
        ];
        let aux = array![
            [0.51, 0.78, 1.24, 2.16, 2.0],
            [1.0e-8, 1.0e-9, 3.1e-10, 4.0e-11, 5.0e-11],
            [3500.0, 2500.0, 1594.0, 666.7, 700.0],
            [1.2, 0.8, 0.28, 0.11, 0.12],
        ];
        let filters = ["GAIA gbp", "GAIA grp", "2MASS J", "2MASS Ks", "nircam_f200w_magnitude"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let templates = vec!["hot".to_string(), "warm".to_string(), "cool".to_string()];
        StandardMagnitudeTable::new(magnitudes, aux, filters, templates).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TABLE_TEXT: &str = "\
# BOSZ synthetic magnitudes
# band A # 0.50 1.0e-8 3600.0 1.20
# band B # 1.20 3.0e-9 1600.0 0.30
# band C # 2.20 4.0e-10 670.0 0.10

10.0 9.0 8.5 # template_1
11.0 9.5 9.0 # template_2
";

    fn labels() -> Vec<String> {
        vec!["band A".into(), "band B".into(), "band C".into()]
    }

    #[test]
    fn test_default_labels_are_unique() {
        let unique: HashSet<&str> = STANDARD_FILTER_LABELS.iter().copied().collect();
        assert_eq!(unique.len(), STANDARD_FILTER_LABELS.len());
        assert!(STANDARD_FILTER_LABELS.contains(&"Johnson J"));
    }

    #[test]
    fn test_parse_table() {
        let table = StandardMagnitudeTable::parse_with_labels(TABLE_TEXT.as_bytes(), labels()).unwrap();

        assert_eq!(table.n_templates(), 2);
        assert_eq!(table.n_filters(), 3);
        assert_eq!(table.templates(), &["template_1".to_string(), "template_2".to_string()]);
        assert_eq!(table.template(1).to_vec(), vec![11.0, 9.5, 9.0]);
        assert_eq!(table.pivot_wavelengths().to_vec(), vec![0.50, 1.20, 2.20]);
        assert_eq!(table.relative_extinction()[2], 0.10);
        assert_eq!(table.zero_point_jy()[0], 3600.0);
        assert_eq!(table.zero_point_wm2um()[1], 3.0e-9);
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        let text = "# a # 1 1 1 1\n# b # 2 2 2 2\n1.0 2.0 # t1\n1.0 # t2\n";
        let labels = vec!["a".to_string(), "b".to_string()];
        let err = StandardMagnitudeTable::parse_with_labels(text.as_bytes(), labels).unwrap_err();
        assert!(matches!(err, TableError::Parse { line: 4, .. }));
    }

    #[test]
    fn test_parse_rejects_label_count_mismatch() {
        let err = StandardMagnitudeTable::parse_with_labels(TABLE_TEXT.as_bytes(), vec!["only".into()])
            .unwrap_err();
        assert!(matches!(err, TableError::Shape(_)));
    }

    #[test]
    fn test_parse_rejects_nan_magnitudes() {
        let text = "# a # 1 1 1 1\n# b # 2 2 2 2\nnan 2.0 # t1\n1.0 2.0 # t2\n";
        let labels = vec!["a".to_string(), "b".to_string()];
        let err = StandardMagnitudeTable::parse_with_labels(text.as_bytes(), labels).unwrap_err();
        assert!(matches!(err, TableError::Shape(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        let mut text = String::new();
        for label in STANDARD_FILTER_LABELS {
            text.push_str(&format!("# {label} # 1.0 1.0 1.0 0.5\n"));
        }
        let row: Vec<String> = (0..58).map(|i| format!("{}", 10.0 + i as f64 * 0.01)).collect();
        text.push_str(&format!("{} # only_template\n", row.join(" ")));
        file.write_all(text.as_bytes()).unwrap();

        let table = StandardMagnitudeTable::from_path(file.path()).unwrap();
        assert_eq!(table.n_filters(), 58);
        assert_eq!(table.filters()[12], "GAIA g ");
    }

    #[test]
    fn test_missing_file() {
        let err = StandardMagnitudeTable::from_path("/nonexistent/standard_magnitudes.txt").unwrap_err();
        assert!(matches!(err, TableError::NotFound(_)));
    }
}
