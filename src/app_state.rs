use std::sync::Arc;

use crate::config::Config;
use crate::modules::feed::invalidation::FeedInvalidator;
use crate::modules::post::{post_service::PostServiceImpl, repository::PostRepositoryImpl};
use crate::modules::store::file_store::FileStore;
use crate::modules::upload::uploader::LocalImageUploader;

pub struct AppState {
    pub config: Config,
    pub posts: PostServiceImpl,
}

impl AppState {
    pub fn init(config: Config) -> Self {
        let store = Arc::new(FileStore::new(config.data_file.clone()));
        let repository = PostRepositoryImpl::new(store).with_latency(config.simulated_latency);
        let uploader = Arc::new(LocalImageUploader::new(
            config.upload_dir.clone(),
            config.upload_base_url.clone(),
        ));
        let posts = PostServiceImpl::new(repository, uploader, FeedInvalidator::new());
        AppState { config, posts }
    }
}
