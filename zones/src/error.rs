use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ZoneError {
    #[error("invalid UTM zone {0}, expected 1..=60")]
    InvalidZone(i32),

    #[error("invalid geographic coordinate lat {lat}, lon {lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("invalid planar coordinate x {x}, y {y}")]
    InvalidPlanar { x: f64, y: f64 },
}
