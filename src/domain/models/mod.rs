pub mod event;
pub mod reference;
pub mod user;
