//! SQL statements issued by the API.
//!
//! Kept in one place so the in-memory backend recognizes exactly what the
//! routes send.

/// Connectivity probe.
pub const HEALTH_CHECK: &str = "SELECT 1";

/// All todos in id order.
pub const SELECT_TODOS: &str = "SELECT * FROM todos ORDER BY id ASC";

/// `$1` = task.
pub const INSERT_TODO: &str = "INSERT INTO todos (task) VALUES ($1) RETURNING *";

/// `$1` = task, `$2` = id.
pub const UPDATE_TODO_TASK: &str = "UPDATE todos SET task = $1 WHERE id = $2 RETURNING *";

/// `$1` = id.
pub const DELETE_TODO: &str = "DELETE FROM todos WHERE id = $1 RETURNING *";

/// `$1` = id.
pub const TOGGLE_TODO: &str =
    "UPDATE todos SET completed = NOT COALESCE(completed, false) WHERE id = $1 RETURNING *";

/// Total number of todos.
pub const COUNT_TODOS: &str = "SELECT COUNT(*) as count FROM todos";

/// Number of completed todos.
pub const COUNT_COMPLETED_TODOS: &str = "SELECT COUNT(*) as count FROM todos WHERE completed = true";

/// Number of open todos, treating `NULL` as open.
pub const COUNT_PENDING_TODOS: &str =
    "SELECT COUNT(*) as count FROM todos WHERE completed = false OR completed IS NULL";
