use crate::codec;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// A single multiple-choice question. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub encoded_answer: String,
    pub difficulty: u8,
    pub prize: u64,
    pub answered: bool,
}

impl Question {
    /// Decode the stored answer token into an option index.
    pub fn correct_answer(&self) -> Result<usize> {
        let index = codec::decode(&self.encoded_answer)?;
        if index >= self.options.len() {
            return Err(CoreError::decode(format!(
                "decoded answer {} outside option range for question '{}'",
                index, self.id
            )));
        }
        Ok(index)
    }
}

/// Ordered, read-only sequence of questions. The catalog is fixed at load
/// time and never mutated during play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Load the built-in question set.
    ///
    /// In a deployed system this would come from the contract; here it is a
    /// static fixture, prizes non-decreasing across catalog order.
    pub fn load() -> Self {
        let questions = vec![
            Question {
                id: "q1".to_string(),
                prompt: "What is the capital of France?".to_string(),
                options: vec![
                    "London".to_string(),
                    "Berlin".to_string(),
                    "Paris".to_string(),
                    "Madrid".to_string(),
                ],
                encoded_answer: codec::encode(2),
                difficulty: 1,
                prize: 100,
                answered: false,
            },
            Question {
                id: "q2".to_string(),
                prompt: "Which planet is known as the Red Planet?".to_string(),
                options: vec![
                    "Venus".to_string(),
                    "Mars".to_string(),
                    "Jupiter".to_string(),
                    "Saturn".to_string(),
                ],
                encoded_answer: codec::encode(1),
                difficulty: 1,
                prize: 200,
                answered: false,
            },
            Question {
                id: "q3".to_string(),
                prompt: "What is the largest mammal?".to_string(),
                options: vec![
                    "Elephant".to_string(),
                    "Blue Whale".to_string(),
                    "Giraffe".to_string(),
                    "Hippopotamus".to_string(),
                ],
                encoded_answer: codec::encode(1),
                difficulty: 2,
                prize: 300,
                answered: false,
            },
            Question {
                id: "q4".to_string(),
                prompt: "Which element has the chemical symbol 'O'?".to_string(),
                options: vec![
                    "Gold".to_string(),
                    "Oxygen".to_string(),
                    "Osmium".to_string(),
                    "Oganesson".to_string(),
                ],
                encoded_answer: codec::encode(1),
                difficulty: 2,
                prize: 500,
                answered: false,
            },
            Question {
                id: "q5".to_string(),
                prompt: "Who painted the Mona Lisa?".to_string(),
                options: vec![
                    "Vincent van Gogh".to_string(),
                    "Pablo Picasso".to_string(),
                    "Leonardo da Vinci".to_string(),
                    "Michelangelo".to_string(),
                ],
                encoded_answer: codec::encode(2),
                difficulty: 3,
                prize: 1000,
                answered: false,
            },
        ];

        Self { questions }
    }

    pub fn get(&self, index: usize) -> Result<&Question> {
        self.questions.get(index).ok_or(CoreError::IndexOutOfRange {
            index,
            len: self.questions.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    /// Prize values in catalog order, for the progress ladder display.
    pub fn prize_ladder(&self) -> Vec<u64> {
        self.questions.iter().map(|q| q.prize).collect()
    }
}
