pub mod prepare_dss;
