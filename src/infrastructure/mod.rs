pub mod entity;
pub mod nats_event_publisher;
pub mod reference_repository;
pub mod user_registration_repository;
