//! Question selection: pagination, category filtering, substring search and
//! the random quiz pick.
//!
//! Every function here is pure over the slice it is given. Callers load the
//! current store snapshot and pass it in.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entity::Question;

/// Default number of questions per page.
pub const QUESTIONS_PER_PAGE: usize = 10;

/// Category id meaning "any category" in a quiz request.
pub const ANY_CATEGORY: i64 = 0;

/// One page of questions plus the size of the full set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPage<'a> {
    pub questions: &'a [Question],
    pub total: usize,
}

impl QuestionPage<'_> {
    /// Category of the first question on the page, if the page has any.
    pub fn current_category(&self) -> Option<i64> {
        self.questions.first().map(|q| q.category)
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Slice `records[(page-1)*per_page .. page*per_page]`, clamped to the
/// available records. Page 0 is treated as page 1.
pub fn paginate(records: &[Question], page: usize, per_page: usize) -> QuestionPage<'_> {
    let offset = page.saturating_sub(1).saturating_mul(per_page);
    let start = offset.min(records.len());
    let end = offset.saturating_add(per_page).min(records.len());

    QuestionPage {
        questions: &records[start..end],
        total: records.len(),
    }
}

/// Questions belonging to one category, in input order.
pub fn in_category(records: &[Question], category: i64) -> Vec<&Question> {
    records.iter().filter(|q| q.category == category).collect()
}

/// Case-insensitive substring match on the question text.
///
/// An empty term matches every question.
pub fn search<'a>(records: &'a [Question], term: &str) -> Vec<&'a Question> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|q| q.question.to_lowercase().contains(&needle))
        .collect()
}

/// Outcome of a quiz pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPick<'a> {
    Question(&'a Question),
    /// Every candidate has already been asked.
    Exhausted,
}

/// Pick a random question from `category` (or any category for
/// [`ANY_CATEGORY`]) that is not in `previous`.
pub fn pick_quiz_question<'a, R: Rng + ?Sized>(
    records: &'a [Question],
    category: i64,
    previous: &HashSet<i64>,
    rng: &mut R,
) -> QuizPick<'a> {
    let candidates: Vec<&Question> = records
        .iter()
        .filter(|q| category == ANY_CATEGORY || q.category == category)
        .filter(|q| !previous.contains(&q.id))
        .collect();

    match candidates.choose(rng) {
        Some(question) => QuizPick::Question(*question),
        None => QuizPick::Exhausted,
    }
}
