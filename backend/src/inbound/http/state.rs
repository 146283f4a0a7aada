//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    IconCommand, IconQuery, IconStore, LikeCommand, PostCommand, PostQuery, PostRepository,
    ProfileCommand, ProfileQuery, TokenVerifier, UserProvisioning, UserRepository,
};
use crate::domain::{IconService, PostService, UserService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<dyn PostQuery>,
    pub post_commands: Arc<dyn PostCommand>,
    pub likes: Arc<dyn LikeCommand>,
    pub profiles: Arc<dyn ProfileQuery>,
    pub profile_commands: Arc<dyn ProfileCommand>,
    pub icons: Arc<dyn IconQuery>,
    pub icon_commands: Arc<dyn IconCommand>,
    pub users: Arc<dyn UserProvisioning>,
    pub tokens: Arc<dyn TokenVerifier>,
}

impl HttpState {
    /// Wire the domain services over the given driven adapters.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use sns_backend::inbound::http::state::HttpState;
    /// use sns_backend::outbound::icons::InMemoryIconStore;
    /// use sns_backend::outbound::jwt::{JwtTokenVerifier, VerificationKey};
    /// use sns_backend::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let tokens = JwtTokenVerifier::new(VerificationKey::Secret(b"secret"), None, None)
    ///     .expect("verifier");
    /// let state = HttpState::from_adapters(
    ///     store.clone(),
    ///     store,
    ///     Arc::new(InMemoryIconStore::default()),
    ///     Arc::new(tokens),
    ///     Arc::new(DefaultClock),
    /// );
    /// let _posts = state.posts.clone();
    /// ```
    pub fn from_adapters<U, P, I>(
        users: Arc<U>,
        posts: Arc<P>,
        icons: Arc<I>,
        tokens: Arc<dyn TokenVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        U: UserRepository + 'static,
        P: PostRepository + 'static,
        I: IconStore + 'static,
    {
        let icon_service = Arc::new(IconService::new(icons));
        let post_service = Arc::new(PostService::new(
            posts,
            icon_service.clone(),
            clock.clone(),
        ));
        let user_service = Arc::new(UserService::new(users, clock));

        Self {
            posts: post_service.clone(),
            post_commands: post_service.clone(),
            likes: post_service,
            profiles: user_service.clone(),
            profile_commands: user_service.clone(),
            icons: icon_service.clone(),
            icon_commands: icon_service,
            users: user_service,
            tokens,
        }
    }
}
