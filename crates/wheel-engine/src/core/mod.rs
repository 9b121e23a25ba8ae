pub mod color;
pub mod palette;
pub mod section;
pub mod time;
