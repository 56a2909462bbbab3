//! Reads the on-disk inverse-matrix container back: header, name and
//! regularization tables, and individual matrices by index.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use ndarray::Array2;

use esi_common::{EsiError, Result};

use crate::container::{
    FixedHeader, ELECTRODE_NAME_LEN, REGULARIZATION_NAME_LEN, SOLUTION_POINT_NAME_LEN,
};

fn decode_fixed_name(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

pub struct InverseFileReader {
    file: File,
    pub header: FixedHeader,
    pub electrode_names: Vec<String>,
    pub solution_point_names: Vec<String>,
    pub regularization_values: Vec<f64>,
    pub regularization_names: Vec<String>,
    body_offset: u64,
}

impl InverseFileReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut file = File::open(path.as_ref())?;

        let mut fixed = [0u8; FixedHeader::ENCODED_LEN];
        file.read_exact(&mut fixed)?;
        let header = FixedHeader::from_bytes(&fixed);
        if header.magic != crate::container::INVERSE_FILE_MAGIC {
            return Err(EsiError::InputInvalid(
                "inverse file magic number mismatch".into(),
            ));
        }

        let mut electrode_names = Vec::with_capacity(header.numel as usize);
        let mut name_buf = [0u8; ELECTRODE_NAME_LEN];
        for _ in 0..header.numel {
            file.read_exact(&mut name_buf)?;
            electrode_names.push(decode_fixed_name(&name_buf));
        }

        let mut solution_point_names = Vec::with_capacity(header.numsolp as usize);
        let mut sp_buf = [0u8; SOLUTION_POINT_NAME_LEN];
        for _ in 0..header.numsolp {
            file.read_exact(&mut sp_buf)?;
            solution_point_names.push(decode_fixed_name(&sp_buf));
        }

        let numreg = header.matrix_count();
        let mut regularization_values = Vec::with_capacity(numreg);
        let mut reg_value_buf = [0u8; 8];
        for _ in 0..header.numreg.max(0) {
            file.read_exact(&mut reg_value_buf)?;
            regularization_values.push(f64::from_le_bytes(reg_value_buf));
        }

        let mut regularization_names = Vec::with_capacity(numreg);
        let mut reg_name_buf = [0u8; REGULARIZATION_NAME_LEN];
        for _ in 0..header.numreg.max(0) {
            file.read_exact(&mut reg_name_buf)?;
            regularization_names.push(decode_fixed_name(&reg_name_buf));
        }

        let body_offset = file.stream_position()?;

        Ok(Self {
            file,
            header,
            electrode_names,
            solution_point_names,
            regularization_values,
            regularization_names,
            body_offset,
        })
    }

    fn matrix_byte_len(&self) -> usize {
        self.header.rows_per_matrix() * self.header.numel as usize * 4
    }

    /// Reads the `index`-th matrix (0-based) back as `f64`.
    pub fn read_matrix(&mut self, index: usize) -> Result<Array2<f64>> {
        if index >= self.header.matrix_count() {
            return Err(EsiError::InputInvalid(format!(
                "matrix index {index} out of range ({} matrices)",
                self.header.matrix_count()
            )));
        }

        let rows = self.header.rows_per_matrix();
        let cols = self.header.numel as usize;
        let stride = self.matrix_byte_len() as u64;
        self.file
            .seek(SeekFrom::Start(self.body_offset + index as u64 * stride))?;

        let mut buf = vec![0u8; stride as usize];
        self.file.read_exact(&mut buf)?;

        let mut out = Array2::<f64>::zeros((rows, cols));
        for (i, chunk) in buf.chunks_exact(4).enumerate() {
            let v = f32::from_le_bytes(chunk.try_into().unwrap());
            out[[i / cols, i % cols]] = v as f64;
        }
        Ok(out)
    }
}
