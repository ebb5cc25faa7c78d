pub mod blend;
pub mod fv_to_toml;
