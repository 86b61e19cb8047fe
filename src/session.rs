use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct SessionInner {
    token: Option<String>,
    generation: u64,
}

/// Process-wide authenticated-session cell.
///
/// Holds the current token and a generation counter that increments on
/// every transition. A fetch cycle records the generation when it starts
/// and discards its results if the value changed underneath it, which is
/// how results arriving after logout are suppressed without cancelling
/// in-flight requests.
///
/// Cheap to clone; all clones share the same cell.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionInner>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token, or `None` when unauthenticated. Presence implies
    /// "authenticated"; the token format is never inspected locally.
    pub fn current(&self) -> Option<String> {
        self.inner.read().unwrap().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().unwrap().token.is_some()
    }

    pub fn set(&self, token: String) {
        let mut inner = self.inner.write().unwrap();
        inner.token = Some(token);
        inner.generation += 1;
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        if inner.token.take().is_some() {
            inner.generation += 1;
        }
    }

    pub fn generation(&self) -> u64 {
        self.inner.read().unwrap().generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_bump_generation() {
        let session = SessionStore::new();
        assert_eq!(session.generation(), 0);
        assert!(!session.is_authenticated());

        session.set("abc".to_string());
        assert_eq!(session.current().as_deref(), Some("abc"));
        assert_eq!(session.generation(), 1);

        session.clear();
        assert!(session.current().is_none());
        assert_eq!(session.generation(), 2);

        // Clearing an already-absent session is not a transition.
        session.clear();
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn clones_share_the_same_cell() {
        let session = SessionStore::new();
        let observer = session.clone();
        session.set("tok".to_string());
        assert_eq!(observer.current().as_deref(), Some("tok"));
    }
}
