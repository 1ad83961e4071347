pub mod actions;
pub mod apply;
pub mod create;
pub mod list;

use std::sync::Arc;
use anyhow::Result;

use records_service::RecordsService;

use crate::config::Config;
use crate::store::StoreGateway;

/// A logged-in service over the local JSON store, with the queue already loaded.
pub struct Desk {
    pub service: RecordsService,
}

impl Desk {
    pub async fn open(config: Config) -> Result<Self> {
        let session = config.session();
        let gateway = StoreGateway::open(&config.store_path)?;
        gateway.register_session(&session);

        let service = RecordsService::new(Arc::new(gateway));
        service.login(session);
        service.refresh().await?;

        Ok(Self { service })
    }

    /// Ends the session. Every accepted change is already on disk.
    pub fn close(self) {
        self.service.logout();
    }
}
