use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use saferoute_core::CellKind;
use saferoute_grid::OccupancyGrid;
use saferoute_protocol::RawCell;

const CODE_DOMAIN: &str = "grid";
const CODE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded grid payload.
pub(crate) const CODE_HEADER: &str = "grid:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';
/// Number of cells packed into a single payload byte.
const CELLS_PER_BYTE: usize = 4;
const BITS_PER_CELL: usize = 2;
const CELL_MASK: u8 = 0b11;

/// Grid captured in a form that fits on a single line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GridSnapshot {
    columns: u32,
    rows: u32,
    cells: Vec<CellKind>,
}

impl GridSnapshot {
    /// Captures a normalized grid.
    pub(crate) fn from_grid(grid: &OccupancyGrid) -> Result<Self, GridTransferError> {
        let dimensions = || format!("{}x{}", grid.columns(), grid.rows());
        let columns = u32::try_from(grid.columns())
            .map_err(|_| GridTransferError::InvalidDimensions(dimensions()))?;
        let rows = u32::try_from(grid.rows())
            .map_err(|_| GridTransferError::InvalidDimensions(dimensions()))?;

        Ok(Self {
            columns,
            rows,
            cells: grid.cells().to_vec(),
        })
    }

    /// Encodes the grid into a share code.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let mut payload = vec![0_u8; self.cells.len().div_ceil(CELLS_PER_BYTE)];
        for (index, kind) in self.cells.iter().enumerate() {
            let shift = (index % CELLS_PER_BYTE) * BITS_PER_CELL;
            if let Some(byte) = payload.get_mut(index / CELLS_PER_BYTE) {
                *byte |= (packed_code(*kind) & CELL_MASK) << shift;
            }
        }

        let encoded = STANDARD_NO_PAD.encode(payload);
        format!("{CODE_HEADER}:{}x{}:{encoded}", self.columns, self.rows)
    }

    /// Decodes a share code produced by [`GridSnapshot::encode`].
    pub(crate) fn decode(value: &str) -> Result<Self, GridTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(GridTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(GridTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(GridTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(GridTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(GridTransferError::MissingPayload)?;

        if domain != CODE_DOMAIN {
            return Err(GridTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != CODE_VERSION {
            return Err(GridTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let cell_count = usize::try_from(columns)
            .ok()
            .zip(usize::try_from(rows).ok())
            .and_then(|(columns, rows)| columns.checked_mul(rows))
            .ok_or_else(|| GridTransferError::InvalidDimensions(dimensions.to_owned()))?;

        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(GridTransferError::InvalidEncoding)?;
        let expected = cell_count.div_ceil(CELLS_PER_BYTE);
        if bytes.len() != expected {
            return Err(GridTransferError::PayloadLength {
                expected,
                found: bytes.len(),
            });
        }

        let cells = (0..cell_count)
            .map(|index| {
                let byte = bytes[index / CELLS_PER_BYTE];
                let code = (byte >> ((index % CELLS_PER_BYTE) * BITS_PER_CELL)) & CELL_MASK;
                unpacked_kind(code).ok_or(GridTransferError::InvalidCell { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            columns,
            rows,
            cells,
        })
    }

    /// Rows of wire cells, ready to stand in for a request's grid.
    #[must_use]
    pub(crate) fn into_rows(self) -> Vec<Vec<RawCell>> {
        self.cells
            .chunks(self.columns.max(1) as usize)
            .map(|row| row.iter().copied().map(RawCell::from).collect())
            .collect()
    }
}

fn packed_code(kind: CellKind) -> u8 {
    match kind {
        CellKind::Free => 0,
        CellKind::Wall => 1,
        CellKind::Hazard => 2,
    }
}

fn unpacked_kind(code: u8) -> Option<CellKind> {
    match code {
        0 => Some(CellKind::Free),
        1 => Some(CellKind::Wall),
        2 => Some(CellKind::Hazard),
        _ => None,
    }
}

/// Errors that can occur while decoding grid share codes.
#[derive(Debug)]
pub(crate) enum GridTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the share code.
    MissingPrefix,
    /// The share code did not contain a version segment.
    MissingVersion,
    /// The share code did not include grid dimensions.
    MissingDimensions,
    /// The share code did not include the payload segment.
    MissingPayload,
    /// The share code used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The share code used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed or represented.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload did not hold exactly one slot per cell.
    PayloadLength {
        /// Byte count implied by the dimensions.
        expected: usize,
        /// Byte count actually decoded.
        found: usize,
    },
    /// A payload slot held a code outside the cell vocabulary.
    InvalidCell {
        /// Row-major index of the offending cell.
        index: usize,
    },
}

impl fmt::Display for GridTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "grid code was empty"),
            Self::MissingPrefix => write!(f, "grid code is missing the prefix"),
            Self::MissingVersion => write!(f, "grid code is missing the version"),
            Self::MissingDimensions => write!(f, "grid code is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "grid code is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "grid code prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "grid code version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode grid payload: {error}")
            }
            Self::PayloadLength { expected, found } => {
                write!(f, "grid payload holds {found} bytes but the dimensions need {expected}")
            }
            Self::InvalidCell { index } => {
                write!(f, "grid payload holds an unknown code for cell {index}")
            }
        }
    }
}

impl Error for GridTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), GridTransferError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| GridTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| GridTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| GridTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if columns == 0 || rows == 0 {
        return Err(GridTransferError::InvalidDimensions(dimensions.to_owned()));
    }

    Ok((columns, rows))
}
