//! Quiz grading.
//!
//! The quiz prompt tells the model to answer exactly `Правильно!` when the
//! user is right. Grading is a byte-for-byte comparison with that sentinel,
//! so any extra text from the model counts as a wrong answer.

/// Reply that marks a correct answer.
pub const CORRECT_ANSWER: &str = "Правильно!";

#[must_use]
pub fn is_correct(reply: &str) -> bool {
    reply == CORRECT_ANSWER
}

/// User turn that asks for one more question without resetting the quiz.
#[must_use]
pub fn more_question_request(topic: &str) -> String {
    format!("Задай ещё один вопрос на тему {topic}")
}

#[must_use]
pub fn score_text(correct_answers: u32) -> String {
    format!("Правильных ответов: {correct_answers}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_names_the_topic() {
        assert!(more_question_request("quiz_math").ends_with("quiz_math"));
    }

    #[test]
    fn score_text_shows_count() {
        assert_eq!(score_text(1), "Правильных ответов: 1");
    }
}
