pub mod api;

use crate::router::AssistantRouter;
use std::error::Error;
use std::sync::Arc;

pub struct Server {
    addr: String,
    router: Arc<AssistantRouter>,
}

impl Server {
    pub fn new(addr: String, router: Arc<AssistantRouter>) -> Self {
        Self { addr, router }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(&self.addr, Arc::clone(&self.router)).await
    }
}
