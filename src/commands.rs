pub mod classify;
pub mod convert;
pub mod verify;
