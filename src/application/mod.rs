// Application layer - Use cases and the ports they depend on
pub mod growth_analyzer;
pub mod sensor_data_service;
pub mod sensor_repository;
