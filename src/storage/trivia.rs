use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::Database;
use crate::entity::{Category, NewQuestion, Question};
use crate::error::{Result, ShowquizError};

/// Categories seeded by `init` into an empty database
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Science",
    "Art",
    "Geography",
    "History",
    "Entertainment",
    "Sports",
];

const QUESTION_COLUMNS: &str = "id, question, answer, category, difficulty";

fn question_from_row(row: &Row<'_>) -> rusqlite::Result<Question> {
    Ok(Question {
        id: row.get(0)?,
        question: row.get(1)?,
        answer: row.get(2)?,
        category: row.get(3)?,
        difficulty: row.get(4)?,
    })
}

impl Database {
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, type FROM categories ORDER BY id")?;

        let categories = stmt
            .query_map([], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    kind: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    pub fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let category = self
            .conn
            .query_row("SELECT id, type FROM categories WHERE id = ?1", [id], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    kind: row.get(1)?,
                })
            })
            .optional()?;
        Ok(category)
    }

    pub fn insert_category(&self, kind: &str) -> Result<Category> {
        self.conn
            .execute("INSERT INTO categories (type) VALUES (?1)", [kind])?;
        Ok(Category {
            id: self.conn.last_insert_rowid(),
            kind: kind.to_string(),
        })
    }

    /// Seed [`DEFAULT_CATEGORIES`] if the table is empty. Returns how many were added.
    pub fn seed_default_categories(&self) -> Result<usize> {
        let existing: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(0);
        }

        let tx = self.conn.unchecked_transaction()?;
        for kind in DEFAULT_CATEGORIES {
            tx.execute("INSERT INTO categories (type) VALUES (?1)", [kind])?;
        }
        tx.commit()?;

        info!(count = DEFAULT_CATEGORIES.len(), "seeded default categories");
        Ok(DEFAULT_CATEGORIES.len())
    }

    /// All questions ordered by id
    pub fn list_questions(&self) -> Result<Vec<Question>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM questions ORDER BY id",
            QUESTION_COLUMNS
        ))?;

        let questions = stmt
            .query_map([], question_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(questions)
    }

    pub fn get_question(&self, id: i64) -> Result<Option<Question>> {
        let question = self
            .conn
            .query_row(
                &format!("SELECT {} FROM questions WHERE id = ?1", QUESTION_COLUMNS),
                [id],
                question_from_row,
            )
            .optional()?;
        Ok(question)
    }

    /// Store a question. Fails with NotFound if its category does not exist.
    pub fn insert_question(&self, new: &NewQuestion) -> Result<Question> {
        let tx = self.conn.unchecked_transaction()?;

        let category_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)",
            [new.category],
            |row| row.get(0),
        )?;
        if !category_exists {
            return Err(ShowquizError::not_found(format!("category {}", new.category)));
        }

        tx.execute(
            "INSERT INTO questions (question, answer, category, difficulty)
             VALUES (?1, ?2, ?3, ?4)",
            params![new.question, new.answer, new.category, new.difficulty],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Question {
            id,
            question: new.question.clone(),
            answer: new.answer.clone(),
            category: new.category,
            difficulty: new.difficulty,
        })
    }

    /// Delete a question and return it. Fails with NotFound if no row matched.
    pub fn delete_question(&self, id: i64) -> Result<Question> {
        let tx = self.conn.unchecked_transaction()?;

        let question = tx
            .query_row(
                &format!("SELECT {} FROM questions WHERE id = ?1", QUESTION_COLUMNS),
                [id],
                question_from_row,
            )
            .optional()?
            .ok_or_else(|| ShowquizError::not_found(format!("question {}", id)))?;

        tx.execute("DELETE FROM questions WHERE id = ?1", [id])?;
        tx.commit()?;

        Ok(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.seed_default_categories().unwrap();
        db
    }

    fn new_question(text: &str, category: i64) -> NewQuestion {
        NewQuestion {
            question: text.to_string(),
            answer: "42".to_string(),
            category,
            difficulty: 2,
        }
    }

    #[test]
    fn test_seed_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.seed_default_categories().unwrap(), 6);
        assert_eq!(db.seed_default_categories().unwrap(), 0);

        let categories = db.list_categories().unwrap();
        assert_eq!(categories.len(), 6);
        assert_eq!(categories[0].kind, "Science");
        assert_eq!(db.get_category(4).unwrap().unwrap().kind, "History");
        assert!(db.get_category(99).unwrap().is_none());
    }

    #[test]
    fn test_insert_category_assigns_next_id() {
        let db = seeded();

        let music = db.insert_category("Music").unwrap();
        assert_eq!(music.id, DEFAULT_CATEGORIES.len() as i64 + 1);
        assert_eq!(music.kind, "Music");
        assert_eq!(db.get_category(music.id).unwrap(), Some(music));
        assert_eq!(db.seed_default_categories().unwrap(), 0);
    }

    #[test]
    fn test_insert_and_list_questions() {
        let db = seeded();
        let first = db.insert_question(&new_question("First?", 1)).unwrap();
        let second = db.insert_question(&new_question("Second?", 3)).unwrap();
        assert!(second.id > first.id);

        let questions = db.list_questions().unwrap();
        assert_eq!(questions, vec![first.clone(), second]);
        assert_eq!(db.get_question(first.id).unwrap(), Some(first));
    }

    #[test]
    fn test_insert_with_unknown_category_persists_nothing() {
        let db = seeded();
        let err = db.insert_question(&new_question("Orphan?", 77)).unwrap_err();
        assert!(matches!(err, ShowquizError::NotFound(_)));
        assert!(db.list_questions().unwrap().is_empty());
    }

    #[test]
    fn test_delete_question() {
        let db = seeded();
        let q = db.insert_question(&new_question("Gone soon?", 2)).unwrap();

        let deleted = db.delete_question(q.id).unwrap();
        assert_eq!(deleted, q);
        assert!(db.get_question(q.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_missing_question_is_not_found() {
        let db = seeded();
        let err = db.delete_question(10_000).unwrap_err();
        assert!(matches!(err, ShowquizError::NotFound(_)));
    }
}
