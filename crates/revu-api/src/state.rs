//! Shared state handed to every handler.

use std::sync::Arc;

use revu_auth::TokenRegistry;
use revu_config::PaginationConfig;
use revu_core::hashid::HashidCodec;
use revu_db::service::RevuService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RevuService>,
    pub hashids: HashidCodec,
    pub tokens: TokenRegistry,
    pub pagination: PaginationConfig,
}

impl AppState {
    #[must_use]
    pub fn new(
        service: RevuService,
        hashids: HashidCodec,
        tokens: TokenRegistry,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            service: Arc::new(service),
            hashids,
            tokens,
            pagination,
        }
    }

    #[must_use]
    pub fn service(&self) -> &RevuService {
        &self.service
    }
}
