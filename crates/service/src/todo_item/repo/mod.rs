pub mod memory;
pub mod seaorm;

pub use memory::InMemoryTodoStore;
pub use seaorm::SeaOrmTodoStore;
