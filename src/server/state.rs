use std::sync::Arc;

use crate::query::QueryFacade;

#[derive(Clone)]
pub struct AppState {
    pub facade: Arc<QueryFacade>,
}

impl AppState {
    pub fn new(facade: Arc<QueryFacade>) -> Self {
        Self { facade }
    }
}
