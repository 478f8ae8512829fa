pub mod profile_repository;
pub mod question_catalog;
pub mod response_repository;

pub use profile_repository::{MongoProfileRepository, ProfileRepository};
pub use question_catalog::{MongoQuestionCatalog, QuestionCatalog};
pub use response_repository::{MongoResponseRepository, ResponseRepository};
