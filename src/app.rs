//! Application bootstrap: builds the process-wide services from configuration.

use std::sync::Arc;

use crate::config::{AppConfig, MenuSourceConfig};
use crate::error::MenuError;
use crate::menu::{FixtureMenuSource, MenuSource, MenuStore, RemoteMenuSource};
use crate::routes::{RouteFilter, RouteTable};

/// Shared services handed to the HTTP layer and the CLI.
///
/// Cloning is cheap; every clone refers to the same store.
#[derive(Debug, Clone)]
pub struct App {
    pub menus: Arc<MenuStore>,
    pub routes: Arc<RouteTable>,
    pub route_filter: Arc<dyn RouteFilter>,
}

impl App {
    pub fn bootstrap(config: &AppConfig) -> Self {
        let source: Arc<dyn MenuSource> = match &config.menu_source {
            MenuSourceConfig::Fixture => Arc::new(FixtureMenuSource::new()),
            MenuSourceConfig::Remote { url, retries } => {
                Arc::new(RemoteMenuSource::new(url.clone(), *retries))
            }
        };

        tracing::info!(
            "Bootstrapping with menu source {} and route filter {}",
            source.describe(),
            config.route_filter
        );

        Self::new(
            MenuStore::with_timeout(source, config.load_timeout()),
            RouteTable::default(),
            config.route_filter.build(),
        )
    }

    pub fn new(menus: MenuStore, routes: RouteTable, route_filter: Arc<dyn RouteFilter>) -> Self {
        Self {
            menus: Arc::new(menus),
            routes: Arc::new(routes),
            route_filter,
        }
    }

    /// Start a menu load in the background. Failures are logged; the store
    /// stays empty until a later load succeeds. A load overtaken by a newer
    /// write is expected and only logged at debug level.
    pub fn spawn_initial_load(&self) -> tokio::task::JoinHandle<Result<(), MenuError>> {
        let menus = self.menus.clone();
        tokio::spawn(async move {
            match menus.load_menus().await {
                Ok(_) => Ok(()),
                Err(MenuError::Superseded) => {
                    tracing::debug!("Initial menu load superseded by a newer write");
                    Err(MenuError::Superseded)
                }
                Err(e) => {
                    tracing::error!("Initial menu load failed: {}", e);
                    Err(e)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuState;
    use crate::models::MenuEntry;
    use crate::routes::RouteFilterKind;
    use std::time::Duration;

    #[tokio::test]
    async fn initial_load_populates_store() {
        let app = App::bootstrap(&AppConfig::default());
        assert_eq!(app.menus.status().state, MenuState::Empty);

        app.spawn_initial_load().await.unwrap().unwrap();
        assert_eq!(app.menus.status().state, MenuState::Loaded);
        assert_eq!(app.menus.status().entries, 6);
    }

    #[tokio::test]
    async fn initial_load_yields_to_manual_write() {
        let app = App::new(
            MenuStore::new(Arc::new(FixtureMenuSource::with_delay(Duration::from_millis(200)))),
            RouteTable::default(),
            RouteFilterKind::PassThrough.build(),
        );

        let load = app.spawn_initial_load();
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        let manual = vec![MenuEntry::new("MANUAL", "Manual")];
        app.menus.set_menus(manual.clone());

        assert!(matches!(load.await.unwrap(), Err(MenuError::Superseded)));
        assert_eq!(*app.menus.state(), manual);
    }

    #[test]
    fn bootstrap_selects_configured_filter() {
        let config = AppConfig {
            route_filter: RouteFilterKind::Permission,
            ..AppConfig::default()
        };
        assert_eq!(App::bootstrap(&config).route_filter.kind(), RouteFilterKind::Permission);
    }
}
