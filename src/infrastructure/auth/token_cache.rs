use futures::future::{BoxFuture, FutureExt, Shared};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::domain::{Clock, Credential, SystemClock, TokenSource};

pub const DEFAULT_REFRESH_BUFFER: Duration = Duration::from_secs(5 * 60);

type RefreshFuture = Shared<BoxFuture<'static, Option<Credential>>>;

struct InFlightRefresh {
    id: u64,
    future: RefreshFuture,
}

#[derive(Default)]
struct CacheState {
    credential: Option<Credential>,
    in_flight: Option<InFlightRefresh>,
    next_refresh_id: u64,
}

/// Single cached credential with a deduplicated refresh.
///
/// While a refresh is running every caller awaits the same pending
/// operation. A failed refresh leaves the cache empty and yields `None`,
/// which is the normal outcome for guests without a session.
pub struct TokenCache {
    source: Arc<dyn TokenSource>,
    clock: Arc<dyn Clock>,
    refresh_buffer: Duration,
    state: Mutex<CacheState>,
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache")
            .field("source", &self.source.source_name())
            .field("refresh_buffer", &self.refresh_buffer)
            .finish()
    }
}

impl TokenCache {
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        Self::with_clock(source, Arc::new(SystemClock), DEFAULT_REFRESH_BUFFER)
    }

    pub fn with_clock(
        source: Arc<dyn TokenSource>,
        clock: Arc<dyn Clock>,
        refresh_buffer: Duration,
    ) -> Self {
        Self {
            source,
            clock,
            refresh_buffer,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Cached credential if still usable, otherwise the outcome of a shared refresh
    pub async fn get_token(&self) -> Option<Credential> {
        let (refresh_id, refresh) = {
            let mut state = self.state.lock().await;

            if let Some(credential) = state
                .credential
                .as_ref()
                .filter(|c| c.is_usable_at(self.clock.now(), self.refresh_buffer))
            {
                return Some(credential.clone());
            }

            // A finished refresh whose waiters were all cancelled before storing it
            if let Some(finished) = state
                .in_flight
                .as_ref()
                .and_then(|in_flight| in_flight.future.peek().cloned())
            {
                state.in_flight = None;
                let now = self.clock.now();
                if let Some(credential) =
                    finished.filter(|c| c.is_usable_at(now, self.refresh_buffer))
                {
                    state.credential = Some(credential.clone());
                    return Some(credential);
                }
                tracing::debug!("Discarding unclaimed refresh result");
            }

            match &state.in_flight {
                Some(in_flight) => {
                    tracing::debug!(refresh_id = in_flight.id, "Joining in-flight credential refresh");
                    (in_flight.id, in_flight.future.clone())
                }
                None => {
                    state.next_refresh_id += 1;
                    let id = state.next_refresh_id;
                    let future = self.start_refresh();
                    state.credential = None;
                    state.in_flight = Some(InFlightRefresh {
                        id,
                        future: future.clone(),
                    });
                    (id, future)
                }
            }
        };

        let credential = refresh.await;

        let mut state = self.state.lock().await;
        if state.in_flight.as_ref().is_some_and(|f| f.id == refresh_id) {
            state.in_flight = None;
            state.credential = credential.clone();
        }

        credential
    }

    /// Drop the cached credential; an in-flight refresh will not be stored
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.credential = None;
        state.in_flight = None;
        tracing::debug!(source = self.source.source_name(), "Credential cache invalidated");
    }

    fn start_refresh(&self) -> RefreshFuture {
        let source = Arc::clone(&self.source);
        let clock = Arc::clone(&self.clock);

        async move {
            tracing::debug!(source = source.source_name(), "Refreshing credential");

            match source.fetch_token().await {
                Ok(grant) => Some(Credential::issued(grant.token, clock.now(), grant.expires_in)),
                Err(e) => {
                    tracing::warn!(
                        source = source.source_name(),
                        error = %e,
                        "Credential refresh failed, continuing without credential"
                    );
                    None
                }
            }
        }
        .boxed()
        .shared()
    }
}
