pub mod passthrough;
pub mod sample_data;
