//! Newsletter Studio
//!
//! Main application entry point

use anyhow::Context;
use tracing::{info, warn};

use newsletter_studio::{
    config::Settings,
    models::{NewContribution, Role, Scope},
    services::ServiceFactory,
    state::{Action, Tab},
    utils::{helpers::format_timestamp, logging},
};

const EMAIL_VAR: &str = "NEWSLETTER_STUDIO_EMAIL";
const PASSWORD_VAR: &str = "NEWSLETTER_STUDIO_PASSWORD";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("loading settings")?;
    settings.validate().context("validating settings")?;

    // Initialize logging
    let _guard = logging::init_logging(&settings.logging).context("initializing logging")?;

    info!("Starting {}...", newsletter_studio::info());
    let services = ServiceFactory::new(settings);

    match (std::env::var(EMAIL_VAR), std::env::var(PASSWORD_VAR)) {
        (Ok(email), Ok(password)) => run_remote(&services, &email, &password).await,
        _ => {
            info!("No backend credentials set, running the offline walkthrough");
            run_offline(&services)
        }
    }
}

/// Sign in, load the session and log what the backend holds
async fn run_remote(services: &ServiceFactory, email: &str, password: &str) -> anyhow::Result<()> {
    let studio = services.remote_studio(services.token_store())?;

    let outcome = studio.login(email, password).await.context("signing in")?;
    if outcome.must_change_password {
        warn!("The backend requires a password change for this account");
    }

    let state = studio.snapshot().await;
    info!(
        user = ?state.session.user.as_ref().map(|u| u.name.as_str()),
        role = %state.session.role,
        groups = state.groups.len(),
        newsletters = state.newsletters.len(),
        users = state.users.len(),
        "Session synchronized"
    );

    for newsletter in &state.newsletters {
        info!(
            id = newsletter.id,
            title = %newsletter.title,
            audience = %newsletter.audience,
            status = ?newsletter.status,
            "Newsletter"
        );
    }

    Ok(())
}

/// Submit, generate and publish against seeded demo data
fn run_offline(services: &ServiceFactory) -> anyhow::Result<()> {
    let mut store = services.demo_store()?;

    store.dispatch(Action::ChangeScope(Scope::Group(2)))?;
    store.dispatch(Action::SubmitContribution(NewContribution {
        author: Some("QLR".to_string()),
        text: "Launched the new onboarding flow".to_string(),
        success_story: "Support tickets dropped by a quarter".to_string(),
        fail_story: "The first rollout missed the mobile app".to_string(),
    }))?;

    store.dispatch(Action::ChangeRole(Role::Admin))?;
    store.dispatch(Action::Navigate(Tab::Generator))?;
    store.dispatch(Action::GenerateDraft)?;
    let draft = store.state().draft.clone();
    store.dispatch(Action::PublishDraft { body: draft, image_url: None })?;

    let participation = store.participation();
    info!(
        contributors = participation.contributor_count,
        total_users = participation.total_users,
        rate = participation.rate,
        "Participation"
    );

    store.dispatch(Action::ChangeScope(Scope::All))?;
    for newsletter in store.visible_newsletters() {
        info!(
            id = newsletter.id,
            title = %newsletter.title,
            audience = %newsletter.audience,
            date = %format_timestamp(newsletter.date),
            "Feed entry"
        );
    }

    Ok(())
}
