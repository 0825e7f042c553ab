//! HTTP front end for flatcms.
//!
//! A thin dispatcher over the document store: each route resolves a
//! document name, asks the access gate when the route mutates, calls the
//! store or renderer, and renders a page or redirects home with a flash
//! message.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod session;
pub mod state;
pub mod views;

pub use config::CmsConfig;
pub use error::{ServerError, ServerResult};
pub use server::CmsServer;
pub use session::{SessionData, SessionHandle, SessionStore};
pub use state::AppState;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use axum::Router;
    use flatcms_auth::CredentialStore;
    use flatcms_store::{DocumentStore, FsDocumentStore};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    struct TestApp {
        _dir: tempfile::TempDir,
        documents: Arc<FsDocumentStore>,
        state: AppState,
        router: Router,
    }

    fn app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let documents = Arc::new(FsDocumentStore::open(dir.path().join("data")).unwrap());
        documents.overwrite("about.md", "# Ruby is...\n").unwrap();
        documents.overwrite("changes.txt", "original changes\n").unwrap();
        documents.overwrite("history.txt", "1995 - Ruby 0.95 released.\n").unwrap();

        let credentials = CredentialStore::open(dir.path().join("users.yml")).unwrap();
        credentials.add("admin", "secret").unwrap();

        let state = AppState::new(documents.clone(), credentials);
        TestApp {
            _dir: dir,
            documents,
            router: router::build_router(state.clone()),
            state,
        }
    }

    impl TestApp {
        async fn send(&self, request: Request<Body>) -> Response {
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
            let mut builder = Request::builder().uri(uri);
            if let Some(cookie) = cookie {
                builder = builder.header(COOKIE, cookie);
            }
            self.send(builder.body(Body::empty()).unwrap()).await
        }

        async fn post(&self, uri: &str, form: &str, cookie: Option<&str>) -> Response {
            let mut builder = Request::builder()
                .method("POST")
                .uri(uri)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
            if let Some(cookie) = cookie {
                builder = builder.header(COOKIE, cookie);
            }
            self.send(builder.body(Body::from(form.to_string())).unwrap()).await
        }

        /// Sign in as admin and return the session cookie.
        async fn admin_cookie(&self) -> String {
            let response = self
                .post("/users/signin", "username=admin&password=secret", None)
                .await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            session_cookie(&response).expect("signin starts a session")
        }

        /// Follow a redirect home and return the page body.
        ///
        /// Uses the cookie the redirect set, if any, in place of `cookie`.
        async fn follow(&self, response: Response, cookie: &str) -> String {
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(response.headers()[LOCATION], "/");
            let cookie = session_cookie(&response).unwrap_or_else(|| cookie.to_string());
            body_string(self.get("/", Some(&cookie)).await).await
        }

        /// Drop a file into the data directory behind the store's back.
        fn place(&self, name: &str, content: &str) {
            std::fs::write(self.documents.root().join(name), content).unwrap();
        }
    }

    fn session_cookie(response: &Response) -> Option<String> {
        let raw = response.headers().get(SET_COOKIE)?.to_str().ok()?;
        raw.split(';').next().map(str::to_string)
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = app();
        let response = app.get("/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "ok");
    }

    #[tokio::test]
    async fn index_lists_documents() {
        let app = app();
        let response = app.get("/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        let body = body_string(response).await;
        for name in ["about.md", "changes.txt", "history.txt"] {
            assert!(body.contains(name), "{name} missing from listing");
        }
    }

    #[tokio::test]
    async fn read_only_requests_do_not_start_sessions() {
        let app = app();
        for _ in 0..50 {
            let response = app.get("/health", None).await;
            assert!(response.headers().get(SET_COOKIE).is_none());
        }
        let response = app.get("/", None).await;
        assert!(response.headers().get(SET_COOKIE).is_none());
        let response = app.get("/docs/about.md", None).await;
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert!(app.state.sessions.is_empty());
    }

    #[tokio::test]
    async fn flash_starts_a_session_once() {
        let app = app();
        let response = app.get("/docs/ufo.txt", None).await;
        let cookie = session_cookie(&response).unwrap();
        assert!(cookie.starts_with("flatcms_session="));
        assert_eq!(app.state.sessions.len(), 1);

        // A known cookie is not reissued.
        let again = app.get("/docs/ufo.txt", Some(&cookie)).await;
        assert!(again.headers().get(SET_COOKIE).is_none());
        assert_eq!(app.state.sessions.len(), 1);
    }

    #[tokio::test]
    async fn signin_issues_a_new_session_id() {
        let app = app();
        let response = app.get("/docs/ufo.txt", None).await;
        let anonymous = session_cookie(&response).unwrap();

        let response = app
            .post("/users/signin", "username=admin&password=secret", Some(&anonymous))
            .await;
        let signed_in = session_cookie(&response).expect("signin sets a fresh cookie");
        assert_ne!(signed_in, anonymous);

        // The pre-login id carries no identity.
        let response = app.post("/new", "name=planted.txt", Some(&anonymous)).await;
        let body = app.follow(response, &anonymous).await;
        assert!(body.contains("You must be signed in to do that."));
        assert!(!app.documents.exists("planted.txt").unwrap());

        let response = app.post("/new", "name=mine.txt", Some(&signed_in)).await;
        app.follow(response, &signed_in).await;
        assert!(app.documents.exists("mine.txt").unwrap());
    }

    #[tokio::test]
    async fn viewing_text_document() {
        let app = app();
        let response = app.get("/docs/history.txt", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));
        assert!(body_string(response).await.contains("Ruby 0.95 released"));
    }

    #[tokio::test]
    async fn viewing_markdown_document() {
        let app = app();
        let response = app.get("/docs/about.md", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        assert!(body_string(response).await.contains("<h1>Ruby is...</h1>"));
    }

    #[tokio::test]
    async fn nonexistent_document_redirects_with_message() {
        let app = app();
        let response = app.get("/docs/ufo.txt", None).await;
        let cookie = session_cookie(&response).unwrap();
        let body = app.follow(response, &cookie).await;
        assert!(body.contains("ufo.txt does not exist."));

        // The message is shown once.
        let body = body_string(app.get("/", Some(&cookie)).await).await;
        assert!(!body.contains("ufo.txt does not exist."));
    }

    #[tokio::test]
    async fn directory_is_treated_as_missing() {
        let app = app();
        std::fs::create_dir(app.documents.root().join("nested")).unwrap();
        let response = app.get("/docs/nested", None).await;
        let cookie = session_cookie(&response).unwrap();
        let body = app.follow(response, &cookie).await;
        assert!(body.contains("nested does not exist."));
    }

    #[tokio::test]
    async fn unsupported_extension_is_a_server_error() {
        let app = app();
        app.place("notes.rb", "puts 1");
        let response = app.get("/docs/notes.rb", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        assert_eq!(body, "Internal Server Error");
        assert!(!body.contains("puts"));
    }

    #[tokio::test]
    async fn traversal_is_treated_as_missing() {
        let app = app();
        let response = app.get("/docs/..%2Fusers.yml", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn editing_form_requires_sign_in() {
        let app = app();
        let response = app.get("/docs/changes.txt/edit", None).await;
        let cookie = session_cookie(&response).unwrap();
        let body = app.follow(response, &cookie).await;
        assert!(body.contains("You must be signed in to do that."));

        let cookie = app.admin_cookie().await;
        let response = app.get("/docs/changes.txt/edit", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("<textarea"));
        assert!(body.contains("original changes"));
        assert!(body.contains("<button type=\"submit\""));
    }

    #[tokio::test]
    async fn updating_document() {
        let app = app();
        let cookie = app.admin_cookie().await;

        let response = app.post("/docs/changes.txt", "content=new+content", Some(&cookie)).await;
        let body = app.follow(response, &cookie).await;
        assert!(body.contains("changes.txt has been updated."));

        let response = app.get("/docs/changes.txt", None).await;
        assert_eq!(body_string(response).await, "new content");
    }

    #[tokio::test]
    async fn anonymous_update_is_denied_without_side_effects() {
        let app = app();
        let response = app.post("/docs/changes.txt", "content=vandalised", None).await;
        let cookie = session_cookie(&response).unwrap();
        let body = app.follow(response, &cookie).await;
        assert!(body.contains("You must be signed in to do that."));
        assert_eq!(app.documents.read("changes.txt").unwrap(), "original changes\n");
    }

    #[tokio::test]
    async fn creating_document() {
        let app = app();
        let cookie = app.admin_cookie().await;

        let response = app.get("/new", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("<input"));

        let response = app.post("/new", "name=test.txt", Some(&cookie)).await;
        let body = app.follow(response, &cookie).await;
        assert!(body.contains("test.txt has been created."));
        assert!(app.documents.list().unwrap().contains(&"test.txt".to_string()));
        assert_eq!(app.documents.read("test.txt").unwrap(), "");
    }

    #[tokio::test]
    async fn anonymous_create_is_denied() {
        let app = app();
        let response = app.post("/new", "name=test.txt", None).await;
        let cookie = session_cookie(&response).unwrap();
        let body = app.follow(response, &cookie).await;
        assert!(body.contains("You must be signed in to do that."));
        assert!(!app.documents.exists("test.txt").unwrap());

        let response = app.get("/new", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn creating_document_without_name() {
        let app = app();
        let cookie = app.admin_cookie().await;
        let before = app.documents.list().unwrap().len();

        let response = app.post("/new", "name=", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_string(response).await.contains("A name is required."));
        assert_eq!(app.documents.list().unwrap().len(), before);
    }

    #[tokio::test]
    async fn creating_document_with_bad_extension() {
        let app = app();
        let cookie = app.admin_cookie().await;

        let response = app.post("/new", "name=script.rb", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_string(response).await;
        assert!(body.contains("Name must end with .txt or .md."));
        assert!(body.contains("value=\"script.rb\""));
        assert!(!app.documents.exists("script.rb").unwrap());
    }

    #[tokio::test]
    async fn anonymous_delete_is_denied() {
        let app = app();
        let response = app.post("/docs/history.txt/delete", "", None).await;
        let cookie = session_cookie(&response).unwrap();
        let body = app.follow(response, &cookie).await;
        assert!(body.contains("You must be signed in to do that."));
        assert!(app.documents.exists("history.txt").unwrap());
    }

    #[tokio::test]
    async fn anonymous_duplicate_is_denied() {
        let app = app();
        let before = app.documents.list().unwrap().len();
        let response = app.post("/docs/changes.txt/duplicate", "", None).await;
        let cookie = session_cookie(&response).unwrap();
        let body = app.follow(response, &cookie).await;
        assert!(body.contains("You must be signed in to do that."));
        assert_eq!(app.documents.list().unwrap().len(), before);
        assert!(!app.documents.exists("changes0.txt").unwrap());
    }

    #[tokio::test]
    async fn names_with_url_reserved_characters_round_trip() {
        let app = app();
        let cookie = app.admin_cookie().await;
        for form in ["name=what%3F.md", "name=a%23b.md"] {
            let response = app.post("/new", form, Some(&cookie)).await;
            app.follow(response, &cookie).await;
        }

        let body = body_string(app.get("/", Some(&cookie)).await).await;
        assert!(body.contains("href=\"/docs/what%3F.md\""));
        assert!(body.contains("action=\"/docs/a%23b.md/delete\""));

        let response = app.post("/docs/what%3F.md", "content=%23+Why", Some(&cookie)).await;
        app.follow(response, &cookie).await;
        let response = app.get("/docs/what%3F.md", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("<h1>Why</h1>"));

        let response = app.post("/docs/a%23b.md/delete", "", Some(&cookie)).await;
        let body = app.follow(response, &cookie).await;
        assert!(body.contains("a#b.md has been deleted."));
        assert!(!app.documents.exists("a#b.md").unwrap());
    }

    #[tokio::test]
    async fn duplicating_unsupported_extension_says_why() {
        let app = app();
        let cookie = app.admin_cookie().await;
        app.place("notes.rb", "puts 1");

        let response = app.post("/docs/notes.rb/duplicate", "", Some(&cookie)).await;
        let body = app.follow(response, &cookie).await;
        assert!(body.contains("notes.rb cannot be duplicated."));
        assert!(!body.contains("does not exist"));
    }

    #[tokio::test]
    async fn deleting_document() {
        let app = app();
        let cookie = app.admin_cookie().await;

        let response = app.post("/docs/history.txt/delete", "", Some(&cookie)).await;
        let body = app.follow(response, &cookie).await;
        assert!(body.contains("history.txt has been deleted."));
        assert!(!app.documents.exists("history.txt").unwrap());

        let response = app.post("/docs/history.txt/delete", "", Some(&cookie)).await;
        let body = app.follow(response, &cookie).await;
        assert!(body.contains("history.txt does not exist."));
    }

    #[tokio::test]
    async fn duplicating_document_twice() {
        let app = app();
        let cookie = app.admin_cookie().await;

        let response = app.post("/docs/changes.txt/duplicate", "", Some(&cookie)).await;
        let body = app.follow(response, &cookie).await;
        assert!(body.contains("changes0.txt has been created."));

        let response = app.post("/docs/changes.txt/duplicate", "", Some(&cookie)).await;
        let body = app.follow(response, &cookie).await;
        assert!(body.contains("changes1.txt has been created."));

        for copy in ["changes0.txt", "changes1.txt"] {
            assert_eq!(app.documents.read(copy).unwrap(), "original changes\n");
        }
    }

    #[tokio::test]
    async fn signin_with_bad_credentials() {
        let app = app();
        let response = app
            .post("/users/signin", "username=admin&password=nope", None)
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_string(response).await;
        assert!(body.contains("Invalid credentials"));
        assert!(body.contains("value=\"admin\""));
    }

    #[tokio::test]
    async fn signin_and_signout() {
        let app = app();
        let cookie = app.admin_cookie().await;
        let body = body_string(app.get("/", Some(&cookie)).await).await;
        assert!(body.contains("Welcome!"));
        assert!(body.contains("Signed in as admin."));

        let response = app.post("/users/signout", "", Some(&cookie)).await;
        let body = app.follow(response, &cookie).await;
        assert!(body.contains("You have been signed out."));
        assert!(body.contains("Sign In"));

        let response = app.post("/new", "name=after.txt", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(!app.documents.exists("after.txt").unwrap());
    }

    #[tokio::test]
    async fn signup_then_create() {
        let app = app();
        let response = app
            .post("/users/signup", "username=writer&password=pw123", None)
            .await;
        let cookie = session_cookie(&response).unwrap();
        let body = app.follow(response, &cookie).await;
        assert!(body.contains("writer has been signed up."));

        let response = app.post("/new", "name=draft.md", Some(&cookie)).await;
        app.follow(response, &cookie).await;
        assert!(app.documents.exists("draft.md").unwrap());
    }

    #[tokio::test]
    async fn signup_duplicate_user() {
        let app = app();
        let response = app
            .post("/users/signup", "username=admin&password=other", None)
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_string(response).await.contains("user already exists: admin"));
    }
}
