pub mod record;
pub mod user;

pub use record::{ActivityKind, DayRecord, NewDayRecord};
pub use user::ActiveUser;
