pub mod auth_service;
pub mod draw_service;
pub mod draw_session;
pub mod eligibility_service;
pub mod history_service;
pub mod participant_service;
pub mod prize_service;
pub mod reset_service;
pub mod round_committer;

pub use auth_service::*;
pub use draw_service::*;
pub use draw_session::{DrawSession, SettledRound};
pub use eligibility_service::*;
pub use history_service::HistoryService;
pub use participant_service::*;
pub use prize_service::*;
pub use reset_service::*;
pub use round_committer::*;
