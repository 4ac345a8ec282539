pub mod avatar;
pub mod jwt;
pub mod password;
pub mod sampling;

pub use avatar::default_avatar_url;
pub use jwt::*;
pub use password::*;
pub use sampling::sample_without_replacement;
