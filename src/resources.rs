// ABOUTME: Shared server state handed to every route handler
// ABOUTME: Bundles the database, token verification, and configuration behind one Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::middleware::AuthMiddleware;
use std::sync::Arc;

/// Resources created once at startup and shared by all requests
#[derive(Clone)]
pub struct ServerResources {
    /// Database handle
    pub database: Arc<Database>,
    /// Token verification
    pub auth_manager: AuthManager,
    /// Header-level authentication
    pub auth_middleware: AuthMiddleware,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Build shared resources from an open database and the configuration
    #[must_use]
    pub fn new(database: Database, config: ServerConfig) -> Self {
        let auth_manager = AuthManager::new(&config.auth);
        Self {
            database: Arc::new(database),
            auth_middleware: AuthMiddleware::new(auth_manager.clone()),
            auth_manager,
            config: Arc::new(config),
        }
    }
}
