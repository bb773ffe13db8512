use super::Page;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use validator::Validate;

/// Lifecycle state of a todo.
/// Corresponds to the `todo_state` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "todo_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TodoState {
    /// Written down, not yet committed to.
    Draft,
    /// Planned.
    Todo,
    /// Being worked on.
    Doing,
    /// Finished.
    Done,
    /// Abandoned.
    Trash,
}

/// Input structure for creating a todo.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TodoInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters.
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,

    pub state: TodoState,
}

/// Partial update of a todo. Absent fields keep their stored value.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TodoPatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub state: Option<TodoState>,
}

/// A todo as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub state: TodoState,
    /// Owner of the todo.
    pub user_id: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
}

/// Query parameters for listing todos. Listing is always scoped to the authenticated user.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TodoQuery {
    /// Case-insensitive substring match on the title.
    pub title: Option<String>,
    /// Case-insensitive substring match on the description.
    pub description: Option<String>,
    pub state: Option<TodoState>,
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl TodoQuery {
    pub fn page(&self) -> Page {
        Page {
            offset: self.offset,
            limit: self.limit,
        }
    }
}

const TODO_COLUMNS: &str = "id, title, description, state, user_id";

impl Todo {
    pub async fn insert<'e, E>(executor: E, input: &TodoInput, user_id: i32) -> Result<Todo, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (title, description, state, user_id) VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.state)
        .bind(user_id)
        .fetch_one(executor)
        .await
    }

    /// Lists the todos owned by `user_id`, filtered by `query` and ordered by id.
    pub async fn list_for_owner<'e, E>(
        executor: E,
        user_id: i32,
        query: &TodoQuery,
    ) -> Result<Vec<Todo>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        // Filters are appended as numbered placeholders; binds below follow the same order.
        let mut sql = format!("SELECT {} FROM todos WHERE user_id = $1", TODO_COLUMNS);
        let mut param_count = 2;

        if query.title.is_some() {
            sql.push_str(&format!(" AND title ILIKE ${}", param_count));
            param_count += 1;
        }
        if query.description.is_some() {
            sql.push_str(&format!(" AND description ILIKE ${}", param_count));
            param_count += 1;
        }
        if query.state.is_some() {
            sql.push_str(&format!(" AND state = ${}", param_count));
            param_count += 1;
        }
        sql.push_str(&format!(
            " ORDER BY id OFFSET ${} LIMIT ${}",
            param_count,
            param_count + 1
        ));

        let mut query_builder = sqlx::query_as::<_, Todo>(&sql).bind(user_id);
        if let Some(title) = &query.title {
            query_builder = query_builder.bind(contains_pattern(title));
        }
        if let Some(description) = &query.description {
            query_builder = query_builder.bind(contains_pattern(description));
        }
        if let Some(state) = query.state {
            query_builder = query_builder.bind(state);
        }
        let page = query.page();

        query_builder
            .bind(page.offset())
            .bind(page.limit())
            .fetch_all(executor)
            .await
    }

    /// Applies `patch` to a todo owned by `user_id`.
    ///
    /// Returns `None` when the todo does not exist or belongs to someone else.
    pub async fn update_owned<'e, E>(
        executor: E,
        id: i32,
        user_id: i32,
        patch: &TodoPatch,
    ) -> Result<Option<Todo>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todos SET title = COALESCE($1, title), \
             description = COALESCE($2, description), state = COALESCE($3, state) \
             WHERE id = $4 AND user_id = $5 RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.state)
        .bind(id)
        .bind(user_id)
        .fetch_optional(executor)
        .await
    }

    pub async fn delete_owned<'e, E>(executor: E, id: i32, user_id: i32) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Wraps `term` for a substring `ILIKE`, escaping the pattern metacharacters.
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_input_validation() {
        let valid = TodoInput {
            title: "Test Todo".to_string(),
            description: "Test Desc".to_string(),
            state: TodoState::Draft,
        };
        assert!(valid.validate().is_ok());

        let empty_title = TodoInput {
            title: "".to_string(),
            description: "Test Desc".to_string(),
            state: TodoState::Draft,
        };
        assert!(empty_title.validate().is_err());

        let long_description = TodoInput {
            title: "Valid".to_string(),
            description: "b".repeat(1001),
            state: TodoState::Todo,
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("milk"), "%milk%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\tmp"), "%c:\\\\tmp%");
    }

    #[test]
    fn test_todo_patch_validation() {
        assert!(TodoPatch::default().validate().is_ok());

        let patch = TodoPatch {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_state_wire_names() {
        let states: Vec<TodoState> =
            serde_json::from_str(r#"["draft","todo","doing","done","trash"]"#).unwrap();
        assert_eq!(
            states,
            vec![
                TodoState::Draft,
                TodoState::Todo,
                TodoState::Doing,
                TodoState::Done,
                TodoState::Trash
            ]
        );
        assert!(serde_json::from_str::<TodoState>(r#""cancelled""#).is_err());
    }
}
