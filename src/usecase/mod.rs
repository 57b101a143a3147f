pub mod reference_resolver;
pub mod register_user_usecase;
