use clap::Parser;
use showquiz::cli::{
    handle_categories, handle_categories_add, handle_init, handle_questions_add,
    handle_questions_delete, handle_questions_list, handle_quiz, handle_search, handle_serve,
    load_config, CategoriesAction, Cli, Commands, QuestionsAction,
};
use showquiz::logging;

fn main() {
    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref(), cli.db).and_then(|config| {
        logging::init(&config.log_level);

        match cli.command {
            Commands::Init => handle_init(&config),
            Commands::Categories { action, json } => match action {
                None => handle_categories(&config, json),
                Some(CategoriesAction::Add { name, json }) => {
                    handle_categories_add(&config, &name, json)
                }
            },
            Commands::Questions(questions) => match questions.action {
                QuestionsAction::List { page, json } => {
                    handle_questions_list(&config, page, json)
                }
                QuestionsAction::Add {
                    question,
                    answer,
                    category,
                    difficulty,
                    json,
                } => handle_questions_add(&config, question, answer, category, difficulty, json),
                QuestionsAction::Delete { id, force } => {
                    handle_questions_delete(&config, id, force)
                }
            },
            Commands::Search { term, json } => handle_search(&config, term, json),
            Commands::Quiz {
                category,
                previous,
                json,
            } => handle_quiz(&config, category, previous, json),
            Commands::Serve { app, host, port } => handle_serve(&config, app, host, port),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
