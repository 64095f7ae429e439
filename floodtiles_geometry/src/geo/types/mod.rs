mod coordinates;
mod polygon;
mod ring;

pub use coordinates::*;
pub use polygon::*;
pub use ring::*;
