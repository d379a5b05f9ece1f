pub mod autocommit;
pub mod hook;
pub mod skill;
pub mod sync;
