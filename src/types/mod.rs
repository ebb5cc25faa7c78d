pub mod dataset_path;
pub mod record;
