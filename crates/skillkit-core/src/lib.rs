pub mod error;
pub mod git;
pub mod hook;
pub mod io;
pub mod link;
pub mod marker;
pub mod paths;
pub mod phrases;
pub mod submodule;

pub use error::{Result, SkillkitError};
