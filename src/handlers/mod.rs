pub mod auth;
pub mod draw;
pub mod history;
pub mod participant;
pub mod prize;
pub mod reset;

pub use auth::auth_config;
pub use draw::draw_config;
pub use history::history_config;
pub use participant::participant_config;
pub use prize::prize_config;
pub use reset::reset_config;
