pub mod draw_rounds;
pub mod participants;
pub mod prizes;
pub mod winner_links;

pub use draw_rounds as draw_round_entity;
pub use participants as participant_entity;
pub use prizes as prize_entity;
pub use winner_links as winner_link_entity;
