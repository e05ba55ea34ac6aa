//! Five-question investor risk-profile quiz

use serde::{Deserialize, Serialize};
use std::fmt;

pub const INVALID_ANSWER: &str = "❗ 1~3 숫자만 입력 가능합니다.";

const QUESTIONS: [(&str, [&str; 3]); 5] = [
    (
        "주식 투자 경험은 어느 정도인가요?",
        ["1) 거의 없다", "2) 1~3년 정도 있다", "3) 3년 이상 꾸준히 해왔다"],
    ),
    (
        "투자한 돈을 얼마나 오래 묻어둘 수 있나요?",
        ["1) 1년 미만", "2) 1~3년", "3) 3년 이상"],
    ),
    (
        "원금 손실을 어디까지 견딜 수 있나요?",
        ["1) 손실은 절대 안 된다", "2) 10% 이내라면 괜찮다", "3) 20% 이상도 감수할 수 있다"],
    ),
    (
        "투자의 가장 큰 목적은 무엇인가요?",
        ["1) 자산을 지키는 것", "2) 예금보다 조금 높은 수익", "3) 높은 수익"],
    ),
    (
        "보유 주식이 한 달 만에 20% 떨어진다면?",
        ["1) 바로 전부 판다", "2) 일단 지켜본다", "3) 오히려 더 산다"],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestorProfile {
    Stable,
    Neutral,
    Aggressive,
}

impl InvestorProfile {
    /// Total score of five answers, 5..=15
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=7 => Self::Stable,
            8..=11 => Self::Neutral,
            _ => Self::Aggressive,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Stable => "안정형",
            Self::Neutral => "중립형",
            Self::Aggressive => "공격투자형",
        }
    }
}

impl fmt::Display for InvestorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one answer
#[derive(Debug, Clone, PartialEq)]
pub enum QuizStep {
    /// Accepted; the next question follows
    Next(String),
    /// Not 1, 2 or 3; the same question stays open
    Invalid(&'static str),
    Completed {
        profile: InvestorProfile,
        message: String,
    },
    /// The quiz already ended; call `reset` to take it again
    AlreadyFinished,
}

#[derive(Debug, Clone, Default)]
pub struct InvestorQuiz {
    answers: Vec<u8>,
}

impl InvestorQuiz {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1-based number of the open question, `None` once finished
    pub fn question_number(&self) -> Option<usize> {
        (!self.is_finished()).then(|| self.answers.len() + 1)
    }

    pub fn is_finished(&self) -> bool {
        self.answers.len() >= QUESTIONS.len()
    }

    pub fn answers(&self) -> &[u8] {
        &self.answers
    }

    pub fn current_prompt(&self) -> Option<String> {
        let n = self.question_number()?;
        let (question, choices) = QUESTIONS.get(n - 1)?;
        Some(format!("Q{n}. {question}\n\n{}", choices.join("\n")))
    }

    pub fn answer(&mut self, input: &str) -> QuizStep {
        if self.is_finished() {
            return QuizStep::AlreadyFinished;
        }

        let choice = match input.trim() {
            "1" => 1,
            "2" => 2,
            "3" => 3,
            _ => return QuizStep::Invalid(INVALID_ANSWER),
        };
        self.answers.push(choice);

        match (self.current_prompt(), self.profile()) {
            (Some(next), _) => QuizStep::Next(next),
            (None, Some(profile)) => QuizStep::Completed {
                profile,
                message: format!("✅ 테스트 완료! 당신은 '{profile}'입니다."),
            },
            (None, None) => QuizStep::AlreadyFinished,
        }
    }

    /// Result once every question is answered
    pub fn profile(&self) -> Option<InvestorProfile> {
        if !self.is_finished() {
            return None;
        }
        let score: u32 = self.answers.iter().map(|&a| u32::from(a)).sum();
        Some(InvestorProfile::from_score(score))
    }

    pub fn reset(&mut self) {
        self.answers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(quiz: &mut InvestorQuiz, answers: [&str; 5]) -> QuizStep {
        let mut last = QuizStep::AlreadyFinished;
        for a in answers {
            last = quiz.answer(a);
        }
        last
    }

    #[test]
    fn test_first_prompt() {
        let quiz = InvestorQuiz::new();
        let prompt = quiz.current_prompt().unwrap();
        assert!(prompt.starts_with("Q1. 주식 투자 경험은"));
        assert!(prompt.contains("\n\n1) 거의 없다\n2) "));
        assert_eq!(quiz.question_number(), Some(1));
    }

    #[test]
    fn test_invalid_answer_does_not_advance() {
        let mut quiz = InvestorQuiz::new();
        for bad in ["", "0", "4", "a", "1 2", "１"] {
            assert_eq!(quiz.answer(bad), QuizStep::Invalid(INVALID_ANSWER));
        }
        assert_eq!(quiz.question_number(), Some(1));

        match quiz.answer(" 2 ") {
            QuizStep::Next(prompt) => assert!(prompt.starts_with("Q2. ")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_profiles_by_score() {
        assert_eq!(InvestorProfile::from_score(5), InvestorProfile::Stable);
        assert_eq!(InvestorProfile::from_score(7), InvestorProfile::Stable);
        assert_eq!(InvestorProfile::from_score(8), InvestorProfile::Neutral);
        assert_eq!(InvestorProfile::from_score(11), InvestorProfile::Neutral);
        assert_eq!(InvestorProfile::from_score(12), InvestorProfile::Aggressive);
        assert_eq!(InvestorProfile::from_score(15), InvestorProfile::Aggressive);
    }

    #[test]
    fn test_completion_and_reset() {
        let mut quiz = InvestorQuiz::new();
        let step = complete(&mut quiz, ["3", "3", "2", "3", "3"]);
        assert_eq!(
            step,
            QuizStep::Completed {
                profile: InvestorProfile::Aggressive,
                message: "✅ 테스트 완료! 당신은 '공격투자형'입니다.".to_string(),
            }
        );
        assert!(quiz.is_finished());
        assert_eq!(quiz.current_prompt(), None);
        assert_eq!(quiz.answer("1"), QuizStep::AlreadyFinished);
        assert_eq!(quiz.answers().len(), 5);

        quiz.reset();
        assert_eq!(quiz.question_number(), Some(1));
        assert_eq!(quiz.profile(), None);

        let step = complete(&mut quiz, ["1", "1", "1", "2", "2"]);
        assert!(matches!(
            step,
            QuizStep::Completed {
                profile: InvestorProfile::Stable,
                ..
            }
        ));
    }
}
