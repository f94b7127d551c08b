pub mod cycles;
pub mod fuse;
pub mod partition;
