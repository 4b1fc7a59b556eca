mod commands;
mod handlers;

pub use commands::{
    CategoriesAction, Cli, Commands, QuestionsAction, QuestionsCommand, ServeApp,
};
pub use handlers::{
    handle_categories, handle_categories_add, handle_init, handle_questions_add, handle_questions_delete,
    handle_questions_list, handle_quiz, handle_search, handle_serve, load_config,
};
