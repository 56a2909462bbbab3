//! Binary layout of the on-disk inverse-matrix container: fixed 17-byte
//! header, variable-length name/regularization tables, then the matrix
//! bodies. Little-endian, tightly packed, no padding.

/// Identifies a "stack of float matrices" container. The original
/// source's magic constant isn't present in the retrieved files; this
/// value ("ISB1" as bytes) is a from-scratch choice, recorded in
/// DESIGN.md.
pub const INVERSE_FILE_MAGIC: u32 = 0x4953_4231;

pub const ELECTRODE_NAME_LEN: usize = 32;
pub const SOLUTION_POINT_NAME_LEN: usize = 16;
pub const REGULARIZATION_NAME_LEN: usize = 32;

/// The fixed 17-byte prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedHeader {
    pub magic: u32,
    pub numel: i32,
    pub numsolp: i32,
    pub numreg: i32,
    /// 1 = one row per solution point, 0 = three rows per solution point.
    pub invscal: u8,
}

impl FixedHeader {
    pub const ENCODED_LEN: usize = 4 + 4 + 4 + 4 + 1;

    pub fn to_bytes(self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0..4].copy_from_slice(&self.magic.to_le_bytes());
        out[4..8].copy_from_slice(&self.numel.to_le_bytes());
        out[8..12].copy_from_slice(&self.numsolp.to_le_bytes());
        out[12..16].copy_from_slice(&self.numreg.to_le_bytes());
        out[16] = self.invscal;
        out
    }

    pub fn from_bytes(buf: &[u8; Self::ENCODED_LEN]) -> Self {
        Self {
            magic: u32::from_le_bytes(buf[0..4].try_into().unwrap()),
            numel: i32::from_le_bytes(buf[4..8].try_into().unwrap()),
            numsolp: i32::from_le_bytes(buf[8..12].try_into().unwrap()),
            numreg: i32::from_le_bytes(buf[12..16].try_into().unwrap()),
            invscal: buf[16],
        }
    }

    /// Row count of each serialized matrix: `numsolp` if `invscal`,
    /// else `3 * numsolp`.
    pub fn rows_per_matrix(&self) -> usize {
        let dimsp = if self.invscal == 1 { 1 } else { 3 };
        self.numsolp as usize * dimsp
    }

    pub fn matrix_count(&self) -> usize {
        self.numreg.max(1) as usize
    }
}

pub(crate) fn fixed_width_name(name: &str, width: usize) -> Vec<u8> {
    let mut bytes = name.as_bytes().to_vec();
    bytes.truncate(width);
    bytes.resize(width, 0);
    bytes
}

pub(crate) fn default_electrode_name(index: usize) -> String {
    format!("e{}", index + 1)
}

pub(crate) fn default_solution_point_name(index: usize) -> String {
    format!("sp{}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_header_round_trips() {
        let header = FixedHeader {
            magic: INVERSE_FILE_MAGIC,
            numel: 26,
            numsolp: 125,
            numreg: 4,
            invscal: 0,
        };
        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), 17);
        let back = FixedHeader::from_bytes(&bytes);
        assert_eq!(header, back);
    }

    #[test]
    fn rows_per_matrix_accounts_for_invscal() {
        let header = FixedHeader {
            magic: INVERSE_FILE_MAGIC,
            numel: 10,
            numsolp: 50,
            numreg: 1,
            invscal: 0,
        };
        assert_eq!(header.rows_per_matrix(), 150);

        let scalar_header = FixedHeader {
            invscal: 1,
            ..header
        };
        assert_eq!(scalar_header.rows_per_matrix(), 50);
    }

    #[test]
    fn fixed_width_name_truncates_and_pads() {
        let short = fixed_width_name("Fz", 32);
        assert_eq!(short.len(), 32);
        assert_eq!(&short[0..2], b"Fz");
        assert!(short[2..].iter().all(|&b| b == 0));

        let long = fixed_width_name(&"x".repeat(40), 16);
        assert_eq!(long.len(), 16);
    }
}
