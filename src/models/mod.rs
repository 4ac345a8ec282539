pub mod auth;
pub mod common;
pub mod draw;
pub mod history;
pub mod participant;
pub mod prize;

pub use auth::*;
pub use common::*;
pub use draw::*;
pub use history::*;
pub use participant::*;
pub use prize::*;
