use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;

use backend_lib::{
    auth::hash_password,
    config::Settings,
    models::User,
    router,
    storage::{CredentialStore, MemoryStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize configuration first so the log level applies from the start
    let settings = Settings::load()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_level.clone().into()),
        )
        .init();

    // Create the credential store and seed the bootstrap admin if the
    // store is empty; without one nobody can mint the first invite.
    let store = MemoryStore::new();
    if let Some(admin) = &settings.bootstrap {
        if store.count_users().await? == 0 {
            let mut user = User::new(
                admin.email.clone(),
                admin.username.clone(),
                admin.name.clone(),
                hash_password(&admin.password)?,
            );
            user.is_admin = true;
            store.insert_user(user).await?;
            info!(email = %admin.email, "bootstrap admin created");
        }
    }

    // Create application state
    let state = Arc::new(AppState::new(store, settings.clone()));

    // Sweep elapsed rate-limit windows so the attempt map stays bounded
    let auth = state.auth.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60 * 60));
        loop {
            interval.tick().await;
            auth.limiter().cleanup();
        }
    });

    // Create the router
    let app = router::create_router(state);

    // Start the server
    let listener = TcpListener::bind(&settings.bind_addr).await?;
    info!("listening on {}", settings.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
