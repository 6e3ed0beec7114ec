pub mod reduce;
pub mod verify;
