#![warn(missing_docs)]

//! Room-geometry parser, world placement and pan/zoom viewer for tile-based
//! game maps, rendered with Macroquad.

mod config;
mod error;
mod ir_room;
/// Text sources, room/table parsers and the bulk map format.
pub mod loader {
    pub mod bulk;
    pub mod room_parser;
    pub mod source;
    pub mod tables;
}
mod map;
/// Room rasterisation, culling and drawing.
pub mod render {
    pub mod cull;
    pub mod painter;
    pub mod room_image;
}
mod spatial {
    pub mod index;
    pub use index::*;
}
mod view;

pub use config::ViewerConfig;
pub use error::MapError;
pub use ir_room::{LocalPosition, RegionPosition, RoomKey, RoomRecord, TileKind};
pub use loader::room_parser::parse_room;
pub use loader::source::{FsSource, MacroquadSource, MapSource};
pub use map::{MapData, MapLoader, RegionRooms};
pub use render::painter::MapPainter;
pub use spatial::{PlacedRoom, Placement, RoomIndex, CHUNK_SIZE, TILE_SIZE};
pub use view::{ViewController, ViewLimits, ViewRect};
