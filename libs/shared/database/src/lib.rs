pub mod pool;
pub mod schema;
pub mod state;

pub use pool::{begin_write, connect, connect_in_memory, DatabaseError};
pub use state::AppState;
