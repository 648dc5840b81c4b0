//! Test harness over in-memory dependencies.
//!
//! Every test gets fresh stores, the full router, and a token signer that
//! matches the router's identity provider. Postgres-backed tests live in
//! `postgres_store_tests.rs` and start their own container.

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use test_context::AsyncTestContext;

use moderation_core::common::{Identity, Role};
use moderation_core::domains::auth::IdentityProvider;
use moderation_core::kernel::{InMemoryBlogStore, InMemoryHistoryLog, ServerDeps, TestDependencies};
use moderation_core::server::build_router;

use super::ApiClient;

/// Test harness with in-memory stores.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let response = ctx.client().get("/health", None).await;
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    pub deps: ServerDeps,
    /// Direct handles on the stores behind `deps`
    pub blogs: Arc<InMemoryBlogStore>,
    pub history: Arc<InMemoryHistoryLog>,
    pub identity_provider: IdentityProvider,
    router: Router,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new()
    }

    async fn teardown(self) {
        // In-memory stores are dropped with the harness
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_dependencies(TestDependencies::new())
    }

    pub fn with_dependencies(test_deps: TestDependencies) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let blogs = test_deps.blogs.clone();
        let history = test_deps.history.clone();
        let deps = test_deps.into_deps();
        let router = build_router(deps.clone());

        Self {
            deps,
            blogs,
            history,
            identity_provider: TestDependencies::identity_provider(),
            router,
        }
    }

    /// HTTP client over the full router
    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.router.clone())
    }

    /// Sign a token whose claims normalize back to `identity`
    pub fn token_for(&self, identity: &Identity) -> Result<String> {
        let roles = match identity.role {
            Role::Admin => vec![Role::Admin],
            Role::User => vec![],
        };

        self.identity_provider.issue_token(
            identity.subject_id.as_str(),
            &identity.email,
            Some(&identity.name),
            &roles,
            chrono::Duration::hours(1),
        )
    }

    /// Token for `identity`, panicking on signing failure
    pub fn token(&self, identity: &Identity) -> String {
        self.token_for(identity).expect("Failed to sign test token")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
