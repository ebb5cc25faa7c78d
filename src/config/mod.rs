pub mod fv;
pub mod studies;
