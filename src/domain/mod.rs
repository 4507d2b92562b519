pub mod history;
pub mod interval;
pub mod lenient;
pub mod person;
pub mod team;
pub mod timestamp;
pub mod user;

pub use history::*;
pub use interval::*;
pub use person::*;
pub use team::*;
pub use user::*;

pub type TeamId = String;
pub type UserId = String;
