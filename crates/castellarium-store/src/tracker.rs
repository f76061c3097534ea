use std::sync::Arc;

use tokio::sync::watch;

use crate::error::StoreError;
use crate::ids::IdSets;
use crate::local::{load_id_sets, save_id_sets, LocalStore, SESSION_USER_KEY};
use crate::remote::{RemoteStore, RemoteUserState};

/// How far a successful [`Tracker::persist`] got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Written locally; no user is signed in or no remote is configured.
    LocalOnly,
    /// Written locally and to the signed-in user's remote document.
    Synced,
    /// Written locally; the remote write failed and was not retried.
    Degraded { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    /// Local state was replaced wholesale by the remote document.
    Replaced { visited: usize, wishlisted: usize },
    /// No remote is configured; the session is recorded locally only.
    RemoteUnavailable,
    /// The remote read failed; local state is unchanged.
    FetchFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(String),
    SignedOut,
}

/// Owns the visited / wishlist sets and the session, and keeps local and
/// remote storage in step with them.
///
/// Every change bumps a revision counter observable through
/// [`subscribe`](Self::subscribe), so views can re-render.
pub struct Tracker {
    ids: IdSets,
    session: Option<String>,
    local: Arc<dyn LocalStore>,
    remote: Option<Arc<dyn RemoteStore>>,
    revision: watch::Sender<u64>,
}

impl Tracker {
    /// Loads the id sets and the remembered session from `local`.
    ///
    /// The session is only restored here; call
    /// [`reconcile_on_sign_in`](Self::reconcile_on_sign_in) to pull the
    /// remote document for it.
    ///
    /// # Errors
    ///
    /// Returns an error if local storage cannot be read or holds corrupt
    /// entries.
    pub fn open(
        local: Arc<dyn LocalStore>,
        remote: Option<Arc<dyn RemoteStore>>,
    ) -> Result<Self, StoreError> {
        let ids = load_id_sets(local.as_ref())?;
        let session = local
            .get(SESSION_USER_KEY)?
            .filter(|uid| !uid.trim().is_empty());
        let (revision, _) = watch::channel(0);
        Ok(Self {
            ids,
            session,
            local,
            remote,
            revision,
        })
    }

    #[must_use]
    pub fn ids(&self) -> &IdSets {
        &self.ids
    }

    #[must_use]
    pub fn session_user(&self) -> Option<&str> {
        self.session.as_deref()
    }

    #[must_use]
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Receiver whose value changes whenever the sets change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Toggles `id` in the visited set, then persists.
    ///
    /// # Errors
    ///
    /// Returns an error only if the local write fails.
    pub async fn toggle_visited(&mut self, id: &str) -> Result<PersistOutcome, StoreError> {
        let now_visited = self.ids.toggle_visited(id);
        tracing::debug!(castle_id = %id, visited = now_visited, "toggled visited");
        self.changed();
        self.persist().await
    }

    /// Toggles `id` in the wishlist, then persists. A visited id is never
    /// added, but the sets are still written.
    ///
    /// # Errors
    ///
    /// Returns an error only if the local write fails.
    pub async fn toggle_wishlisted(&mut self, id: &str) -> Result<PersistOutcome, StoreError> {
        let now_wishlisted = self.ids.toggle_wishlisted(id);
        tracing::debug!(castle_id = %id, wishlisted = now_wishlisted, "toggled wishlist");
        self.changed();
        self.persist().await
    }

    /// Writes both sets locally and, when a user is signed in, to the
    /// remote document. A remote failure is logged and reported in the
    /// outcome; it is never retried.
    ///
    /// # Errors
    ///
    /// Returns an error only if the local write fails.
    pub async fn persist(&self) -> Result<PersistOutcome, StoreError> {
        save_id_sets(self.local.as_ref(), &self.ids)?;

        let (Some(remote), Some(user_id)) = (&self.remote, &self.session) else {
            return Ok(PersistOutcome::LocalOnly);
        };
        match remote
            .save_user_state(user_id, &self.ids.visited_list(), &self.ids.wishlisted_list())
            .await
        {
            Ok(()) => Ok(PersistOutcome::Synced),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "remote save failed");
                Ok(PersistOutcome::Degraded {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Starts a session for `user_id`. The remote document replaces the
    /// local sets wholesale; a user without one gets two empty sets.
    ///
    /// # Errors
    ///
    /// Returns an error only if local storage cannot be written. Remote
    /// failures are reported as [`SignInOutcome::FetchFailed`] and the
    /// session stays active.
    pub async fn reconcile_on_sign_in(
        &mut self,
        user_id: &str,
    ) -> Result<SignInOutcome, StoreError> {
        self.local.set(SESSION_USER_KEY, user_id)?;
        self.session = Some(user_id.to_owned());

        let Some(remote) = &self.remote else {
            return Ok(SignInOutcome::RemoteUnavailable);
        };
        let document = match remote.load_user_state(user_id).await {
            Ok(Some(document)) => document,
            Ok(None) => {
                tracing::info!(user_id = %user_id, "no remote state for user, starting empty");
                RemoteUserState::default()
            }
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "remote load failed, keeping local state");
                return Ok(SignInOutcome::FetchFailed {
                    reason: e.to_string(),
                });
            }
        };

        let ids = IdSets::from_lists(document.visited_ids, document.wishlist_ids);
        save_id_sets(self.local.as_ref(), &ids)?;
        let outcome = SignInOutcome::Replaced {
            visited: ids.visited().len(),
            wishlisted: ids.wishlisted().len(),
        };
        self.ids = ids;
        self.changed();
        tracing::info!(user_id = %user_id, ?outcome, "local state replaced by remote state");
        Ok(outcome)
    }

    /// Ends the session. The sets are kept as they are, locally.
    ///
    /// # Errors
    ///
    /// Returns an error if the remembered session cannot be cleared.
    pub fn reconcile_on_sign_out(&mut self) -> Result<(), StoreError> {
        if let Some(user_id) = self.session.take() {
            tracing::info!(user_id = %user_id, "signed out, keeping local state");
        }
        self.local.remove(SESSION_USER_KEY)
    }

    /// Applies one identity change.
    ///
    /// # Errors
    ///
    /// Propagates local storage errors from the reconcile step.
    pub async fn handle_auth_event(
        &mut self,
        event: AuthEvent,
    ) -> Result<Option<SignInOutcome>, StoreError> {
        match event {
            AuthEvent::SignedIn(user_id) => self.reconcile_on_sign_in(&user_id).await.map(Some),
            AuthEvent::SignedOut => self.reconcile_on_sign_out().map(|()| None),
        }
    }

    /// Follows an identity stream until its sender is dropped. The current
    /// value is applied first, then every change.
    ///
    /// # Errors
    ///
    /// Propagates local storage errors from the reconcile steps.
    pub async fn follow_auth(
        &mut self,
        mut identity: watch::Receiver<Option<String>>,
    ) -> Result<(), StoreError> {
        loop {
            let current = identity.borrow_and_update().clone();
            let event = match current {
                Some(user_id) => AuthEvent::SignedIn(user_id),
                None => AuthEvent::SignedOut,
            };
            self.handle_auth_event(event).await?;
            if identity.changed().await.is_err() {
                return Ok(());
            }
        }
    }

    fn changed(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tests;
