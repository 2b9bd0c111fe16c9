/// User storage boundary for identity service
pub mod users;

pub use users::{InMemoryUserStore, UserStore};
