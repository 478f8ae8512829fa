use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoProfileRepository, MongoQuestionCatalog, MongoResponseRepository},
    services::{
        generation_client::OllamaClient, synthesis_service::SynthesisService,
        traversal_service::TraversalService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub traversal_service: Arc<TraversalService>,
    pub synthesis_service: Arc<SynthesisService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let response_repository = Arc::new(MongoResponseRepository::new(&db));
        response_repository.ensure_indexes().await?;

        let profile_repository = Arc::new(MongoProfileRepository::new(&db));
        profile_repository.ensure_indexes().await?;

        let question_catalog = Arc::new(MongoQuestionCatalog::new(&db));
        let generator = Arc::new(OllamaClient::new(&config)?);

        let traversal_service = Arc::new(TraversalService::new(
            question_catalog.clone(),
            response_repository.clone(),
        ));
        let synthesis_service = Arc::new(SynthesisService::new(
            response_repository,
            question_catalog,
            profile_repository,
            generator,
        ));

        Ok(Self {
            traversal_service,
            synthesis_service,
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
