pub mod health;
pub mod keys;
pub mod session;
pub mod token;
