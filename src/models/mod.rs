pub mod todo;
pub mod user;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use todo::{Todo, TodoInput, TodoList, TodoPatch, TodoQuery, TodoState};
pub use user::{User, UserList, UserPublic, UserSchema};

pub const DEFAULT_LIMIT: i64 = 100;

/// Offset/limit pagination shared by the list endpoints.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct Page {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Page {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}
