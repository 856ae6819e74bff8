pub mod cooldown;
pub mod delivery;
pub mod janitor;
pub mod session_store;
pub mod signal_service;
