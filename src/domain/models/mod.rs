pub mod lesson;
pub mod user;

pub use lesson::{Lesson, LessonFilter};
pub use user::{User, UserFilter, UserType};
