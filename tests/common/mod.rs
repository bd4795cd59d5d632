use todo_backend::db::memory_pool;
use todo_backend::service::TodoService;

pub fn service() -> TodoService {
    TodoService::new(memory_pool().unwrap())
}
