//! Appends matrices to the on-disk inverse-matrix container one whole
//! matrix at a time, so a write failure never leaves a partial matrix
//! behind.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::Array2;

use esi_common::{EsiError, Result};

use crate::container::{
    default_electrode_name, default_solution_point_name, fixed_width_name, FixedHeader,
    ELECTRODE_NAME_LEN, REGULARIZATION_NAME_LEN, SOLUTION_POINT_NAME_LEN,
};

/// Names supplied by the caller; `None` entries fall back to `"e<i+1>"`
/// / `"sp<i+1>"` per the naming policy.
pub struct NameTables<'a> {
    pub electrode_names: &'a [Option<String>],
    pub solution_point_names: &'a [Option<String>],
}

/// Writes the fixed + variable header once, then one matrix per
/// `write_matrix` call. `invscal` and the solution-point/electrode
/// counts are fixed at construction; every matrix written must match
/// `header.rows_per_matrix() x header.numel`.
pub struct InverseFileWriter {
    out: BufWriter<File>,
    header: FixedHeader,
    matrices_written: usize,
}

impl InverseFileWriter {
    pub fn create(
        path: impl AsRef<Path>,
        numel: usize,
        numsolp: usize,
        regularizations: &[(f64, String)],
        invscal: bool,
        names: NameTables<'_>,
    ) -> Result<Self> {
        if numel == 0 || numsolp == 0 {
            return Err(EsiError::InputInvalid(
                "inverse file requires at least one electrode and one solution point".into(),
            ));
        }

        let header = FixedHeader {
            magic: crate::container::INVERSE_FILE_MAGIC,
            numel: numel as i32,
            numsolp: numsolp as i32,
            numreg: regularizations.len() as i32,
            invscal: invscal as u8,
        };

        let file = File::create(path.as_ref())?;
        let mut out = BufWriter::new(file);

        out.write_all(&header.to_bytes())?;

        for i in 0..numel {
            let name = names
                .electrode_names
                .get(i)
                .and_then(|n| n.clone())
                .unwrap_or_else(|| default_electrode_name(i));
            out.write_all(&fixed_width_name(&name, ELECTRODE_NAME_LEN))?;
        }

        for i in 0..numsolp {
            let name = names
                .solution_point_names
                .get(i)
                .and_then(|n| n.clone())
                .unwrap_or_else(|| default_solution_point_name(i));
            out.write_all(&fixed_width_name(&name, SOLUTION_POINT_NAME_LEN))?;
        }

        for (value, _) in regularizations {
            out.write_all(&value.to_le_bytes())?;
        }
        for (_, name) in regularizations {
            out.write_all(&fixed_width_name(name, REGULARIZATION_NAME_LEN))?;
        }

        Ok(Self {
            out,
            header,
            matrices_written: 0,
        })
    }

    /// Appends one matrix, cast to `f32`, row-major. `rejected_rows`
    /// lists solution-point indices whose rows must be written as zero
    /// regardless of `matrix`'s content.
    pub fn write_matrix(&mut self, matrix: &Array2<f64>, rejected_rows: &[usize]) -> Result<()> {
        let expected_rows = self.header.rows_per_matrix();
        let expected_cols = self.header.numel as usize;
        if matrix.nrows() != expected_rows || matrix.ncols() != expected_cols {
            return Err(EsiError::InputInvalid(format!(
                "matrix shape {}x{} does not match header {}x{}",
                matrix.nrows(),
                matrix.ncols(),
                expected_rows,
                expected_cols
            )));
        }

        let dimsp = if self.header.invscal == 1 { 1 } else { 3 };
        let rejected: std::collections::HashSet<usize> = rejected_rows.iter().copied().collect();

        for row_idx in 0..expected_rows {
            let source_point = row_idx / dimsp;
            if rejected.contains(&source_point) {
                for _ in 0..expected_cols {
                    self.out.write_all(&0f32.to_le_bytes())?;
                }
            } else {
                for col_idx in 0..expected_cols {
                    let v = matrix[[row_idx, col_idx]] as f32;
                    self.out.write_all(&v.to_le_bytes())?;
                }
            }
        }

        self.matrices_written += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.out.flush()?;
        if self.matrices_written != self.header.matrix_count() {
            tracing::warn!(
                written = self.matrices_written,
                expected = self.header.matrix_count(),
                "inverse file closed with a different matrix count than its header declared"
            );
        }
        Ok(())
    }
}
