pub mod model;
pub mod store;

pub use model::{Role, User};
pub use store::{PgUserStore, UserStore};
