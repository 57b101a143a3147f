pub mod reference_repository;
pub mod user_registration_repository;
