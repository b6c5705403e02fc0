//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod answer_repo;
pub mod dashboard_repo;
pub mod form_repo;
pub mod question_repo;
pub mod respondent_repo;
pub mod response_repo;
pub mod role_repo;
pub mod session_repo;
pub mod user_repo;

pub use answer_repo::AnswerRepo;
pub use dashboard_repo::DashboardRepo;
pub use form_repo::FormRepo;
pub use question_repo::QuestionRepo;
pub use respondent_repo::RespondentRepo;
pub use response_repo::ResponseRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
