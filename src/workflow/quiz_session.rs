//! 测验会话状态机 - 流程层
//!
//! 状态流转：
//! `NoQuiz → AwaitingAnswer → ShowingFeedback → AwaitingAnswer → … → Finished`
//!
//! 会话本身不做任何 I/O，只由宿主程序的事件驱动。
//! 失败的操作不会修改任何状态。

use crate::error::SessionError;
use crate::models::{Question, Quiz, QuizSummary};

/// 作答反馈
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    pub selected: String,
    pub correct_answer: String,
    pub explanation: Option<String>,
}

/// 会话状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    NoQuiz,
    AwaitingAnswer,
    ShowingFeedback(Feedback),
    Finished,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::NoQuiz => "NoQuiz",
            SessionState::AwaitingAnswer => "AwaitingAnswer",
            SessionState::ShowingFeedback(_) => "ShowingFeedback",
            SessionState::Finished => "Finished",
        }
    }
}

/// 测验会话
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    quiz: Option<Quiz>,
    current_index: usize,
    score: u32,
    state: SessionState,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加载新测验，任何状态下都可以调用
    pub fn load_quiz(&mut self, quiz: Quiz) -> &SessionState {
        self.state = if quiz.questions.is_empty() {
            SessionState::Finished
        } else {
            SessionState::AwaitingAnswer
        };
        self.quiz = Some(quiz);
        self.current_index = 0;
        self.score = 0;
        &self.state
    }

    /// 提交答案
    ///
    /// 与正确答案做精确字符串比较；这是唯一修改分数的地方
    pub fn submit_answer(&mut self, selected: Option<&str>) -> Result<Feedback, SessionError> {
        if self.state != SessionState::AwaitingAnswer {
            return Err(self.invalid("submit_answer"));
        }
        let selected = selected.ok_or(SessionError::NoSelection)?;
        let question = self
            .current_question()
            .ok_or_else(|| self.invalid("submit_answer"))?;

        let feedback = Feedback {
            correct: selected == question.correct_answer,
            selected: selected.to_string(),
            correct_answer: question.correct_answer.clone(),
            explanation: question.explanation.clone(),
        };

        if feedback.correct {
            self.score += 1;
        }
        self.state = SessionState::ShowingFeedback(feedback.clone());
        Ok(feedback)
    }

    /// 确认反馈，进入下一题或结束
    pub fn acknowledge_feedback(&mut self) -> Result<&SessionState, SessionError> {
        if !self.awaiting_feedback_ack() {
            return Err(self.invalid("acknowledge_feedback"));
        }

        self.current_index += 1;
        self.state = if self.current_index >= self.question_total() {
            SessionState::Finished
        } else {
            SessionState::AwaitingAnswer
        };
        Ok(&self.state)
    }

    /// 最终成绩，分母是测验声明的 `question_count`
    pub fn summary(&self) -> Result<QuizSummary, SessionError> {
        match (&self.state, &self.quiz) {
            (SessionState::Finished, Some(quiz)) => Ok(QuizSummary {
                title: quiz.title.clone(),
                score: self.score,
                total_questions: quiz.question_count,
            }),
            _ => Err(self.invalid("summary")),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn awaiting_feedback_ack(&self) -> bool {
        matches!(self.state, SessionState::ShowingFeedback(_))
    }

    /// 当前题目（已结束时为 `None`）
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz
            .as_ref()
            .and_then(|quiz| quiz.questions.get(self.current_index))
    }

    /// (第几题，共几题)，从 1 开始
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.current_question()
            .map(|_| (self.current_index + 1, self.question_total()))
    }

    fn question_total(&self) -> usize {
        self.quiz.as_ref().map_or(0, |quiz| quiz.questions.len())
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            operation,
            state: self.state.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_plus_two() -> Quiz {
        Quiz::new("Arithmetic", 1, vec![Question::new("2+2?", &["3", "4"], "4")])
    }

    fn three_questions(declared: u32) -> Quiz {
        Quiz::new(
            "Capitals",
            declared,
            vec![
                Question::new("France?", &["Paris", "Lyon"], "Paris")
                    .with_explanation("Paris has been the capital since 987."),
                Question::new("Japan?", &["Osaka", "Tokyo"], "Tokyo"),
                Question::new("Peru?", &["Lima", "Cusco"], "Lima"),
            ],
        )
    }

    #[test]
    fn test_two_plus_two_scenario() {
        let mut session = QuizSession::new();
        assert_eq!(session.load_quiz(two_plus_two()), &SessionState::AwaitingAnswer);

        let feedback = session.submit_answer(Some("4")).unwrap();
        assert!(feedback.correct);
        assert_eq!(session.score(), 1);
        assert!(session.awaiting_feedback_ack());

        assert_eq!(session.acknowledge_feedback().unwrap(), &SessionState::Finished);

        let summary = session.summary().unwrap();
        assert_eq!(summary.score, 1);
        assert_eq!(summary.total_questions, 1);
    }

    #[test]
    fn test_exactly_one_cycle_per_question() {
        let mut session = QuizSession::new();
        session.load_quiz(three_questions(3));

        let mut cycles = 0;
        while session.state() == &SessionState::AwaitingAnswer {
            session.submit_answer(Some("Paris")).unwrap();
            session.acknowledge_feedback().unwrap();
            cycles += 1;
        }

        assert_eq!(cycles, 3);
        assert_eq!(session.state(), &SessionState::Finished);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_scoring_uses_exact_match() {
        let mut session = QuizSession::new();
        session.load_quiz(three_questions(3));

        // 大小写和空白不同都算错
        let feedback = session.submit_answer(Some("paris ")).unwrap();
        assert!(!feedback.correct);
        assert_eq!(feedback.correct_answer, "Paris");
        assert_eq!(
            feedback.explanation.as_deref(),
            Some("Paris has been the capital since 987.")
        );
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_no_selection() {
        let mut session = QuizSession::new();
        session.load_quiz(two_plus_two());

        assert_eq!(session.submit_answer(None), Err(SessionError::NoSelection));
        assert_eq!(session.state(), &SessionState::AwaitingAnswer);
    }

    #[test]
    fn test_submit_while_showing_feedback_changes_nothing() {
        let mut session = QuizSession::new();
        session.load_quiz(three_questions(3));
        session.submit_answer(Some("Paris")).unwrap();

        let err = session.submit_answer(Some("Paris")).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                operation: "submit_answer",
                state: "ShowingFeedback",
            }
        );
        assert_eq!(session.score(), 1);
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_submit_after_finished_changes_nothing() {
        let mut session = QuizSession::new();
        session.load_quiz(two_plus_two());
        session.submit_answer(Some("4")).unwrap();
        session.acknowledge_feedback().unwrap();

        assert!(matches!(
            session.submit_answer(Some("4")),
            Err(SessionError::InvalidTransition { state: "Finished", .. })
        ));
        assert_eq!(session.score(), 1);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_invalid_calls_without_quiz() {
        let mut session = QuizSession::new();
        assert!(session.submit_answer(Some("x")).is_err());
        assert!(session.acknowledge_feedback().is_err());
        assert!(session.summary().is_err());
        assert_eq!(session.state(), &SessionState::NoQuiz);
    }

    #[test]
    fn test_acknowledge_requires_feedback() {
        let mut session = QuizSession::new();
        session.load_quiz(two_plus_two());
        assert!(matches!(
            session.acknowledge_feedback(),
            Err(SessionError::InvalidTransition { state: "AwaitingAnswer", .. })
        ));
    }

    #[test]
    fn test_summary_before_finish_is_invalid() {
        let mut session = QuizSession::new();
        session.load_quiz(two_plus_two());
        assert!(session.summary().is_err());
    }

    #[test]
    fn test_summary_reports_declared_count() {
        let mut session = QuizSession::new();
        session.load_quiz(three_questions(10));
        for answer in ["Paris", "Tokyo", "Lima"] {
            session.submit_answer(Some(answer)).unwrap();
            session.acknowledge_feedback().unwrap();
        }

        let summary = session.summary().unwrap();
        assert_eq!(summary.score, 3);
        assert_eq!(summary.total_questions, 10);
    }

    #[test]
    fn test_empty_quiz_finishes_immediately() {
        let mut session = QuizSession::new();
        assert_eq!(
            session.load_quiz(Quiz::new("Empty", 5, vec![])),
            &SessionState::Finished
        );
        assert_eq!(session.summary().unwrap().total_questions, 5);
    }

    #[test]
    fn test_load_quiz_resets_progress() {
        let mut session = QuizSession::new();
        session.load_quiz(three_questions(3));
        session.submit_answer(Some("Paris")).unwrap();

        session.load_quiz(two_plus_two());
        assert_eq!(session.score(), 0);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.state(), &SessionState::AwaitingAnswer);
        assert_eq!(session.progress(), Some((1, 1)));
    }
}
