use crate::infrastructure::session_store::SessionStore;

/// SignOutUseCase はセッションからトークンペアを削除する。
///
/// 発行済みトークンの失効は行わない。削除されたリフレッシュトークンは
/// 有効期限まで署名上は有効なままとなる。
#[derive(Debug, Default, Clone, Copy)]
pub struct SignOutUseCase;

impl SignOutUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, session: &mut dyn SessionStore) {
        let had_session = !session.read().is_empty();
        session.clear();
        tracing::debug!(had_session, "session cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::session_store::InMemorySessionStore;

    #[test]
    fn test_sign_out_clears_both_tokens() {
        let mut session = InMemorySessionStore::with_tokens(Some("access"), Some("refresh"));
        SignOutUseCase::new().execute(&mut session);

        assert!(session.read().is_empty());
        assert_eq!(session.clear_count(), 1);
    }

    #[test]
    fn test_sign_out_on_empty_session() {
        let mut session = InMemorySessionStore::new();
        SignOutUseCase::new().execute(&mut session);
        assert!(session.read().is_empty());
    }
}
