//! One-time startup tasks: seeding the initial admin account and starting
//! the background blacklist-token janitor (§4.J, §5).

use std::time::Duration;

use anyhow::Context;
use uuid::Uuid;
use webmacs_data::model::NewUser;
use webmacs_data::query::{BlacklistTokenRepository, UserRepository};
use webmacs_data::PgClient;
use webmacs_server::auth::PasswordHasher;
use webmacs_server::config::ServerConfig;

const TRACING_TARGET: &str = "webmacs_cli::bootstrap";

/// Creates the initial `admin` user from `initial_admin_email`/
/// `initial_admin_password`, but only when the user table is still empty
/// (§4.J: "seeded only when the user table is empty"). A missing
/// credential pair with an empty table is not an error — it just means no
/// account is created until one is provisioned out of band.
pub async fn seed_initial_admin(pg: &PgClient, config: &ServerConfig) -> anyhow::Result<()> {
    let mut conn = pg.get_connection().await.context("acquiring connection for admin seed")?;

    if UserRepository::any_exist(&mut conn).await.context("checking for existing users")? {
        return Ok(());
    }

    let (Some(email), Some(password)) =
        (config.initial_admin_email.as_deref(), config.initial_admin_password.as_deref())
    else {
        tracing::warn!(
            target: TRACING_TARGET,
            "user table is empty and no initial admin credentials were configured"
        );
        return Ok(());
    };

    let hasher = PasswordHasher::new();
    let password_hash = hasher.hash_password(password).context("hashing initial admin password")?;

    UserRepository::create(
        &mut conn,
        NewUser {
            public_id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash,
            role: "admin".to_string(),
        },
    )
    .await
    .context("creating initial admin user")?;

    tracing::info!(target: TRACING_TARGET, email, "seeded initial admin account");
    Ok(())
}

/// Spawns the fixed-cadence expired-`BlacklistToken` cleaner (§5). Runs
/// until the process exits; the returned handle is owned by the lifecycle
/// supervisor's `JoinSet` so shutdown can await it.
pub fn spawn_blacklist_janitor(
    pg: PgClient,
    retention_window: jiff::SignedDuration,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;

            let mut conn = match pg.get_connection().await {
                Ok(conn) => conn,
                Err(err) => {
                    tracing::error!(target: TRACING_TARGET, error = %err, "janitor failed to acquire connection");
                    continue;
                }
            };

            let now = jiff_diesel::Timestamp::from(jiff::Timestamp::now());
            match BlacklistTokenRepository::delete_expired(&mut conn, now, retention_window).await {
                Ok(deleted) if deleted > 0 => {
                    tracing::info!(target: TRACING_TARGET, deleted, "pruned expired blacklist tokens");
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::error!(target: TRACING_TARGET, error = %err, "blacklist token cleanup failed");
                }
            }
        }
    })
}
