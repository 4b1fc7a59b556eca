use std::collections::HashSet;
use std::env;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::api::{self, AppState};
use crate::config::Config;
use crate::entity::QuestionDraft;
use crate::error::{Result, ShowquizError};
use crate::selector::{self, QuizPick};
use crate::storage::Database;

use super::ServeApp;

/// Load the config file and apply the `--db` override
pub fn load_config(explicit: Option<&Path>, db: Option<PathBuf>) -> Result<Config> {
    let cwd = env::current_dir()?;
    let mut config = Config::load(explicit, &cwd)?;
    if let Some(db) = db {
        config.database = db;
    }
    Ok(config)
}

fn open_existing(config: &Config) -> Result<Database> {
    if !config.database.exists() {
        return Err(ShowquizError::NotInitialized(
            config.database.display().to_string(),
        ));
    }
    Database::open(&config.database)
}

pub fn handle_init(config: &Config) -> Result<()> {
    let db = Database::open(&config.database)?;
    let seeded = db.seed_default_categories()?;

    println!(
        "Initialized showquiz database at {}",
        config.database.display()
    );
    if seeded > 0 {
        println!("  seeded {} categories", seeded);
    }

    Ok(())
}

pub fn handle_categories(config: &Config, json: bool) -> Result<()> {
    let db = open_existing(config)?;
    let categories = db.list_categories()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
    } else if categories.is_empty() {
        println!("No categories found.");
    } else {
        println!("Categories:\n");
        for c in categories {
            println!("  {:03} {}", c.id, c.kind);
        }
    }

    Ok(())
}

pub fn handle_categories_add(config: &Config, name: &str, json: bool) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ShowquizError::validation("Category name is required."));
    }

    let db = open_existing(config)?;
    let category = db.insert_category(name)?;
    info!(id = category.id, "category created");

    if json {
        println!("{}", serde_json::to_string_pretty(&category)?);
    } else {
        println!("Created category {:03} - {}", category.id, category.kind);
    }

    Ok(())
}

pub fn handle_questions_list(config: &Config, page: usize, json: bool) -> Result<()> {
    if page == 0 {
        return Err(ShowquizError::validation("Page numbers start at 1."));
    }

    let db = open_existing(config)?;
    let all = db.list_questions()?;
    let result = selector::paginate(&all, page, config.questions_per_page);

    if json {
        #[derive(serde::Serialize)]
        struct PageJson<'a> {
            page: usize,
            questions: &'a [crate::entity::Question],
            total_questions: usize,
            current_category: Option<i64>,
        }

        let body = PageJson {
            page,
            questions: result.questions,
            total_questions: result.total,
            current_category: result.current_category(),
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else if result.is_empty() {
        println!("No questions on page {} ({} total).", page, result.total);
    } else {
        println!("Questions (page {}, {} total):\n", page, result.total);
        for q in result.questions {
            println!(
                "  {:03} [cat {}|diff {}] {}",
                q.id, q.category, q.difficulty, q.question
            );
        }
    }

    Ok(())
}

pub fn handle_questions_add(
    config: &Config,
    question: String,
    answer: String,
    category: i64,
    difficulty: i64,
    json: bool,
) -> Result<()> {
    let new = QuestionDraft {
        question: Some(question),
        answer: Some(answer),
        category: Some(category),
        difficulty: Some(difficulty),
    }
    .validate()?;

    let db = open_existing(config)?;
    let stored = db.insert_question(&new)?;
    info!(id = stored.id, "question created");

    if json {
        println!("{}", serde_json::to_string_pretty(&stored)?);
    } else {
        println!("Created question {:03} - {}", stored.id, stored.question);
    }

    Ok(())
}

pub fn handle_questions_delete(config: &Config, id: i64, force: bool) -> Result<()> {
    let db = open_existing(config)?;

    let question = db
        .get_question(id)?
        .ok_or_else(|| ShowquizError::not_found(format!("question {}", id)))?;

    if !force {
        eprintln!("Delete question {:03} - {}? [y/N] ", question.id, question.question);

        if atty::is(atty::Stream::Stdin) {
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        } else {
            return Err(ShowquizError::validation(
                "Use --force to delete in non-interactive mode",
            ));
        }
    }

    let deleted = db.delete_question(id)?;
    info!(id, "question deleted");
    println!("Deleted question {:03} - {}", deleted.id, deleted.question);

    Ok(())
}

pub fn handle_search(config: &Config, term: String, json: bool) -> Result<()> {
    if term.trim().is_empty() {
        return Err(ShowquizError::validation("Empty search query."));
    }

    let db = open_existing(config)?;
    let all = db.list_questions()?;
    let found = selector::search(&all, &term);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "questions": found,
                "total_questions": found.len(),
            }))?
        );
    } else if found.is_empty() {
        println!("No results found for '{}'.", term);
    } else {
        println!("Search results for '{}':\n", term);
        for q in found {
            println!("  {:03} [cat {}] {}", q.id, q.category, q.question);
        }
    }

    Ok(())
}

pub fn handle_quiz(config: &Config, category: i64, previous: Vec<i64>, json: bool) -> Result<()> {
    if category < selector::ANY_CATEGORY {
        return Err(ShowquizError::validation("Category ID cannot be negative."));
    }

    let db = open_existing(config)?;
    let all = db.list_questions()?;
    let previous: HashSet<i64> = previous.into_iter().collect();

    match selector::pick_quiz_question(&all, category, &previous, &mut rand::thread_rng()) {
        QuizPick::Question(q) => {
            if json {
                println!("{}", serde_json::to_string_pretty(q)?);
            } else {
                println!("{:03} {}", q.id, q.question);
                println!("  answer: {}", q.answer);
            }
        }
        QuizPick::Exhausted => {
            if json {
                println!("null");
            } else {
                println!("No more questions.");
            }
        }
    }

    Ok(())
}

pub fn handle_serve(
    config: &Config,
    app: ServeApp,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let db = Database::open(&config.database)?;
    let state = AppState::new(db).with_questions_per_page(config.questions_per_page);

    let (mut server, router) = match app {
        ServeApp::Trivia => (config.trivia.clone(), api::trivia_router(state)),
        ServeApp::Booking => (config.booking.clone(), api::booking_router(state)),
    };
    if let Some(host) = host {
        server.host = host;
    }
    if let Some(port) = port {
        server.port = port;
    }

    info!(app = ?app, database = %config.database.display(), "starting server");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(api::serve(router, &server.addr()))
}
