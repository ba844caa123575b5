//! Static board data: tiles, color groups and the catalog.
//!
//! Nothing in this module changes during a match.

pub mod catalog;
pub mod group;
pub mod tile;

pub use catalog::{classic_tiles, Board, BoardError, GroupMembers, BOARD_SIZE};
pub use group::PropertyGroup;
pub use tile::{PropertyTile, RailwayTile, SpecialKind, SpecialTile, Tile, TileId, UtilityTile};
