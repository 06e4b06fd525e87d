mod trajectory;

pub use trajectory::TrajectorySave;
