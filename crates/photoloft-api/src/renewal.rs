//! Single-flight session renewal.
//!
//! When several concurrent requests fail with an expired session, exactly one
//! of them performs the renewal; the others wait and then reuse its outcome,
//! success or failure alike. Every failed request gets exactly one retry,
//! marked so a second expiry surfaces instead of looping.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use photoloft_core::domain::{Credentials, Session};
use photoloft_core::errors::{shorten_id, ApiError};

use crate::chain::{Interceptor, Next};
use crate::request::{ApiRequest, ApiResponse, SESSION_RENEWAL_RETRY_HEADER};

/// Supplies the stored credentials when a renewal is needed.
pub type CredentialsProvider = Arc<dyn Fn() -> anyhow::Result<Credentials> + Send + Sync>;

/// Invoked with every successfully renewed session, before any retry is sent.
pub type OnSessionRenewed = Arc<dyn Fn(&Session) + Send + Sync>;

/// Creates a fresh session from credentials.
#[async_trait]
pub trait SessionCreator: Send + Sync {
    async fn create_session(&self, credentials: &Credentials) -> Result<Session, ApiError>;
}

/// Serializes renewal attempts: one winner renews, everyone else waits for
/// its result.
///
/// The `renewing` flag decides the winner with a compare-exchange; the slot
/// mutex makes followers block until the winner has published its outcome.
/// The winner clears the slot before renewing and drops the flag only while
/// still holding the lock, so a follower can never observe a stale outcome.
struct RenewalCoordinator {
    renewing: AtomicBool,
    slot: Mutex<Option<Result<Session, ApiError>>>,
}

impl RenewalCoordinator {
    fn new() -> Self {
        Self {
            renewing: AtomicBool::new(false),
            slot: Mutex::new(None),
        }
    }

    async fn renew(
        &self,
        creator: &dyn SessionCreator,
        credentials_provider: &CredentialsProvider,
        on_renewed: &Option<OnSessionRenewed>,
    ) -> Result<Session, ApiError> {
        let is_winner = self
            .renewing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();

        if is_winner {
            let mut slot = self.slot.lock().await;
            *slot = None;

            let outcome = match (credentials_provider)() {
                Ok(credentials) => {
                    info!("renewing expired session");
                    let result = creator.create_session(&credentials).await;
                    if let Ok(session) = &result {
                        info!(session_id = %shorten_id(&session.id), "session renewed");
                        if let Some(callback) = on_renewed {
                            callback(session);
                        }
                    }
                    result
                }
                Err(e) => Err(ApiError::invariant(format!(
                    "failed to load credentials for session renewal: {e}"
                ))),
            };

            *slot = Some(outcome.clone());
            // Release the flag before the lock so followers that lost the
            // race but have not locked yet still find the outcome.
            self.renewing.store(false, Ordering::Release);
            outcome
        } else {
            debug!("renewal already in flight, waiting for its outcome");
            let slot = self.slot.lock().await;
            match slot.as_ref() {
                Some(outcome) => outcome.clone(),
                None => Err(ApiError::invariant(
                    "renewal finished with neither a session nor an error",
                )),
            }
        }
    }
}

/// The renewal interceptor: catches [`ApiError::SessionExpired`] from the
/// inner chain, renews through the coordinator and retries the original
/// request exactly once.
pub struct SessionRenewalInterceptor {
    coordinator: RenewalCoordinator,
    session_creator: Arc<dyn SessionCreator>,
    credentials_provider: CredentialsProvider,
    on_session_renewed: Option<OnSessionRenewed>,
}

impl SessionRenewalInterceptor {
    pub fn new(
        session_creator: Arc<dyn SessionCreator>,
        credentials_provider: CredentialsProvider,
        on_session_renewed: Option<OnSessionRenewed>,
    ) -> Self {
        Self {
            coordinator: RenewalCoordinator::new(),
            session_creator,
            credentials_provider,
            on_session_renewed,
        }
    }
}

#[async_trait]
impl Interceptor for SessionRenewalInterceptor {
    async fn intercept(
        &self,
        request: ApiRequest,
        next: Next<'_>,
    ) -> Result<ApiResponse, ApiError> {
        match next.run(request.clone()).await {
            Err(ApiError::SessionExpired { session_id }) => {
                if request.header(SESSION_RENEWAL_RETRY_HEADER).is_some() {
                    error!(
                        session_id = %shorten_id(&session_id),
                        "session still expired after renewal, giving up"
                    );
                    return Err(ApiError::SessionExpired { session_id });
                }

                self.coordinator
                    .renew(
                        self.session_creator.as_ref(),
                        &self.credentials_provider,
                        &self.on_session_renewed,
                    )
                    .await?;

                next.run(request.with_header(SESSION_RENEWAL_RETRY_HEADER, "true"))
                    .await
            }
            other => other,
        }
    }
}
