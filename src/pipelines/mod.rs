pub mod engine;
pub mod neoantigen;
