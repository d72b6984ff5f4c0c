//! Error types for device construction.

use crate::ids::TileId;

/// Errors raised while building a device model.
///
/// Every one of these is a problem with the device data or a misuse of the
/// builder; once a [`Device`](crate::Device) exists, lookups are total.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// A wire table was requested with more slots than the store supports.
    #[error("invalid wire table capacity {requested} (maximum {max})")]
    InvalidCapacity {
        /// The requested capacity.
        requested: usize,
        /// The largest supported capacity.
        max: usize,
    },

    /// A tile position lies outside the device grid.
    #[error("tile ({row}, {col}) is outside the {rows}x{cols} grid")]
    TileOutOfGrid {
        /// Requested row.
        row: u32,
        /// Requested column.
        col: u32,
        /// Grid row count.
        rows: u32,
        /// Grid column count.
        cols: u32,
    },

    /// Two tiles were placed at the same grid position.
    #[error("tile ({row}, {col}) defined twice")]
    DuplicateTile {
        /// Row of the duplicate.
        row: u32,
        /// Column of the duplicate.
        col: u32,
    },

    /// A tile id does not name a tile added to the builder.
    #[error("unknown tile {0}")]
    UnknownTile(TileId),

    /// A tile placement references a tile kind that was never described.
    #[error("unknown tile kind '{0}'")]
    UnknownTileKind(String),

    /// A connection or site pin names a wire that was never declared.
    #[error("unknown wire '{0}'")]
    UnknownWire(String),

    /// Two sites share a name.
    #[error("site '{0}' defined twice")]
    DuplicateSite(String),

    /// A tile placement lists a different number of site names than its kind
    /// has site templates.
    #[error("tile '{tile}' names {given} sites but its kind defines {expected}")]
    SiteCountMismatch {
        /// The tile name.
        tile: String,
        /// Number of site names given.
        given: usize,
        /// Number of site templates on the tile kind.
        expected: usize,
    },

    /// The device description could not be parsed.
    #[error("device description parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_capacity() {
        let err = DeviceError::InvalidCapacity {
            requested: 1 << 30,
            max: 1 << 26,
        };
        assert_eq!(
            format!("{err}"),
            "invalid wire table capacity 1073741824 (maximum 67108864)"
        );
    }

    #[test]
    fn display_out_of_grid() {
        let err = DeviceError::TileOutOfGrid {
            row: 5,
            col: 1,
            rows: 2,
            cols: 2,
        };
        assert_eq!(format!("{err}"), "tile (5, 1) is outside the 2x2 grid");
    }

    #[test]
    fn display_unknown_kind() {
        let err = DeviceError::UnknownTileKind("CLBLM_R".into());
        assert_eq!(format!("{err}"), "unknown tile kind 'CLBLM_R'");
    }
}
