pub mod bits;
pub mod crc;
pub mod io;
pub mod limits;
