pub mod observable;
pub mod pagination;
pub mod quiz_session;

pub use observable::Observable;
pub use pagination::{PageRequest, PaginationController, RenderCompletion, RenderTicket};
pub use quiz_session::{Feedback, QuizSession, SessionState};
