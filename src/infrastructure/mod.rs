pub mod clock;
pub mod in_memory;
pub mod secret_provider;
pub mod session_store;
pub mod token_codec;

pub use clock::{Clock, FixedClock, SystemClock};
pub use in_memory::{InMemoryProjectMemberRepository, InMemoryUserRepository};
pub use secret_provider::{EnvSecretProvider, SecretProvider, StaticSecretProvider};
pub use session_store::{CookieSessionStore, InMemorySessionStore, SessionStore, SessionTokens};
pub use token_codec::{IssuedRefreshToken, RefreshIdentity, TokenCodec, TokenError};
