pub mod home;
pub mod investigation;
pub mod not_found;
