//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{
    SessionMiddleware, config::CookieContentSecurity, storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use shipnotes::Trace;
#[cfg(debug_assertions)]
use shipnotes::doc::ApiDoc;
use shipnotes::domain::ports::{
    AccountRepository, FeedbackRepository, FixtureAccountRepository, FixtureFeedbackRepository,
    FixtureNoteRepository, FixtureProjectRepository, NoteRepository, ProjectRepository,
};
use shipnotes::domain::{
    AccountService, ChangelogService, CommitBrowseService, FeedbackService, NoteGenerationService,
    NoteService, ProjectService,
};
use shipnotes::inbound::http::auth::{current_session, end_session, start_session};
use shipnotes::inbound::http::changelog::changelog_page;
use shipnotes::inbound::http::credits::get_credits;
use shipnotes::inbound::http::feedback::{list_feedback, submit_feedback};
use shipnotes::inbound::http::generate::generate;
use shipnotes::inbound::http::github::{list_commits, list_repositories};
use shipnotes::inbound::http::health::{HealthState, live, ready};
use shipnotes::inbound::http::patch_notes::{
    delete_note, get_note, list_notes, record_view, update_note,
};
use shipnotes::inbound::http::projects::{
    change_repository, create_project, delete_project, disconnect_repository, edit_project,
    get_project, list_projects, reconnect_repository,
};
use shipnotes::inbound::http::state::HttpState;
use shipnotes::inbound::http::widget::{widget, widget_preflight};
use shipnotes::outbound::github::GithubHttpSource;
use shipnotes::outbound::openai::OpenAiHttpModel;
use shipnotes::outbound::persistence::{
    DieselAccountRepository, DieselFeedbackRepository, DieselNoteRepository,
    DieselProjectRepository,
};

/// Assemble domain services over the configured adapters.
///
/// Database-backed repositories are used when a pool is attached; fixture
/// repositories otherwise. The GitHub and completion adapters are always
/// real HTTP clients.
fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let source = Arc::new(
        GithubHttpSource::new(config.github_base.clone())
            .map_err(|err| std::io::Error::other(format!("github client: {err}")))?,
    );
    let model = Arc::new(
        OpenAiHttpModel::new(config.openai_base.clone(), config.openai_api_key.clone())
            .map_err(|err| std::io::Error::other(format!("completion client: {err}")))?,
    );

    let (accounts, projects, notes, feedback): (
        Arc<dyn AccountRepository>,
        Arc<dyn ProjectRepository>,
        Arc<dyn NoteRepository>,
        Arc<dyn FeedbackRepository>,
    ) = match &config.db_pool {
        Some(pool) => (
            Arc::new(DieselAccountRepository::new(pool.clone())),
            Arc::new(DieselProjectRepository::new(pool.clone())),
            Arc::new(DieselNoteRepository::new(pool.clone())),
            Arc::new(DieselFeedbackRepository::new(pool.clone())),
        ),
        None => (
            Arc::new(FixtureAccountRepository),
            Arc::new(FixtureProjectRepository),
            Arc::new(FixtureNoteRepository),
            Arc::new(FixtureFeedbackRepository),
        ),
    };

    Ok(web::Data::new(HttpState {
        accounts: AccountService::new(accounts.clone()),
        browse: CommitBrowseService::new(accounts.clone(), source.clone()),
        changelog: ChangelogService::new(
            projects.clone(),
            notes.clone(),
            config.public_base_url.clone(),
        ),
        feedback: FeedbackService::new(accounts.clone(), feedback),
        generation: NoteGenerationService::new(
            accounts.clone(),
            projects.clone(),
            notes.clone(),
            model,
        ),
        notes: NoteService::new(notes),
        projects: ProjectService::new(projects, source),
    }))
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .build();

    let api = web::scope("/api")
        .wrap(session)
        .service(start_session)
        .service(current_session)
        .service(end_session)
        .service(list_repositories)
        .service(list_commits)
        .service(generate)
        .service(list_notes)
        .service(get_note)
        .service(update_note)
        .service(delete_note)
        .service(record_view)
        .service(create_project)
        .service(list_projects)
        .service(get_project)
        .service(edit_project)
        .service(delete_project)
        .service(change_repository)
        .service(reconnect_repository)
        .service(disconnect_repository)
        .service(get_credits)
        .service(submit_feedback)
        .service(list_feedback);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        // Public widget routes live outside the session-wrapped `/api`
        // scope and must register before it: the scope captures the
        // `/api` prefix and would 404 them otherwise.
        .service(widget)
        .service(widget_preflight)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Catch-all slug route; must register after every fixed path.
    app.service(changelog_page)
}

/// Construct an Actix HTTP server from the given configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when adapter construction or socket
/// binding fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config)?;
    let server_health_state = health_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
