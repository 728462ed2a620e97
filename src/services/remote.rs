//! Backend-backed studio
//!
//! Issues gateway calls and feeds confirmed data into the store. The store is
//! only changed after a successful response; failures are recorded on the
//! panel that triggered them, and a lost session sends the store back to the
//! login view.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::gateway::dto::{ContributionCreate, ContributionRead, NewsletterAdminRead, NewsletterCreate, NewsletterFilter, NewsletterRead, UserCreate};
use crate::gateway::{BackendClient, LoginOutcome};
use crate::models::{
    Contribution, ContributionStatus, CreateGroupRequest, CreateNewsletterRequest, NewContribution, Newsletter,
    NewsletterLayout, Role, User,
};
use crate::state::{Action, BusyFlags, Operation, Panel, StudioState, StudioStore, Tab};
use crate::utils::errors::{StudioError, Result};
use crate::utils::helpers::to_trigram;
use crate::utils::logging::log_admin_action;

/// Role given to users added to a group through the admin panel
const DEFAULT_MEMBER_ROLE: &str = "contributor";

pub struct RemoteStudio {
    client: BackendClient,
    store: Arc<Mutex<StudioStore>>,
    busy: BusyFlags,
}

fn newsletter_to_domain(store: &StudioStore, wire: NewsletterRead) -> Newsletter {
    let audience = store.audience_for(Some(wire.group_id));
    wire.into_domain(audience)
}

/// Label, group and author of a backend contribution, taken from the loaded
/// newsletter and user collections
fn contribution_to_domain(store: &StudioStore, wire: ContributionRead) -> Contribution {
    let state = store.state();
    let newsletter = state.newsletters.iter().find(|n| n.id == wire.newsletter_id);
    let label = newsletter
        .map(|n| n.period.clone().unwrap_or_else(|| n.title.clone()))
        .unwrap_or_else(|| state.label.clone());
    let group_id = newsletter.and_then(|n| n.group_id);
    let author = state.users.iter().find(|u| u.id == wire.user_id).map(|u| u.name.clone());
    wire.into_domain(&label, group_id, author)
}

impl RemoteStudio {
    pub fn new(client: BackendClient, store: StudioStore) -> Self {
        Self {
            client,
            store: Arc::new(Mutex::new(store)),
            busy: BusyFlags::new(),
        }
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    pub fn busy(&self) -> &BusyFlags {
        &self.busy
    }

    pub fn store(&self) -> Arc<Mutex<StudioStore>> {
        Arc::clone(&self.store)
    }

    /// Copy of the current store state
    pub async fn snapshot(&self) -> StudioState {
        self.store.lock().await.state().clone()
    }

    /// Record a failure on `panel`; a lost session also clears the store's session
    async fn report<T>(&self, panel: Panel, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            let mut store = self.store.lock().await;
            if e.is_session_lost() {
                warn!(error = %e, "Session lost, returning to login");
                if let Err(inner) = store.dispatch(Action::SessionCleared) {
                    warn!(error = %inner, "Failed to clear session");
                }
            }
            let message = e.to_string();
            if let Err(inner) = store.dispatch(Action::ReportError { panel, message }) {
                warn!(error = %inner, "Failed to record panel error");
            }
        }
        result
    }

    /// Apply backend-confirmed data to the store
    async fn apply(&self, action: Action) -> Result<()> {
        self.store.lock().await.dispatch(action)
    }

    async fn require(&self, tab: Tab, panel: Panel) -> Result<()> {
        let role = self.store.lock().await.session().role;
        let result = if tab.allows(role) {
            Ok(())
        } else {
            Err(StudioError::PermissionDenied(format!("role {} cannot use the {} tab", role, tab)))
        };
        self.report(panel, result).await
    }

    // Session

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let result = self.client.login(email, password).await;
        let outcome = self.report(Panel::Login, result).await?;
        self.load_session().await?;
        Ok(outcome)
    }

    /// Load the current user, groups, newsletters and, for super-admins, users
    pub async fn load_session(&self) -> Result<()> {
        let result = self.client.me().await;
        let user = self.report(Panel::Session, result).await?;
        let role = user.role;
        info!(user_id = user.id, role = %role, "Session user loaded");

        let result = self.client.groups().await;
        let groups = self.report(Panel::Session, result).await?;
        self.apply(Action::GroupsLoaded(groups)).await?;
        self.apply(Action::SessionLoaded(user)).await?;

        if role == Role::SuperAdmin {
            let result = self.client.users().await;
            let users = self.report(Panel::AdminUsers, result).await?;
            self.apply(Action::UsersLoaded(users)).await?;
        }

        self.refresh_newsletters(&NewsletterFilter::default()).await
    }

    pub async fn logout(&self) -> Result<()> {
        let result = self.client.logout().await;
        self.report(Panel::Session, result).await?;
        self.apply(Action::SessionCleared).await
    }

    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<User> {
        let result = self.client.change_password(current_password, new_password).await;
        let user = self.report(Panel::Login, result).await?;
        self.apply(Action::SessionLoaded(user.clone())).await?;
        Ok(user)
    }

    // Newsletters

    pub async fn refresh_newsletters(&self, filter: &NewsletterFilter) -> Result<()> {
        let result = self.client.newsletters(filter).await;
        let wire = self.report(Panel::Feed, result).await?;

        let mut store = self.store.lock().await;
        let newsletters: Vec<Newsletter> = wire.into_iter().map(|n| newsletter_to_domain(&store, n)).collect();
        debug!(count = newsletters.len(), "Newsletters loaded");
        store.dispatch(Action::NewslettersLoaded(newsletters))
    }

    pub async fn open_newsletter(&self, newsletter_id: i64) -> Result<Newsletter> {
        let result = self.client.newsletter(newsletter_id).await;
        let wire = self.report(Panel::Feed, result).await?;
        self.upsert_newsletter(wire).await
    }

    async fn upsert_newsletter(&self, wire: NewsletterRead) -> Result<Newsletter> {
        let mut store = self.store.lock().await;
        let newsletter = newsletter_to_domain(&store, wire);
        store.dispatch(Action::NewsletterUpserted(newsletter.clone()))?;
        Ok(newsletter)
    }

    /// Create a group-scoped newsletter; the backend has no organization-wide editions
    pub async fn create_newsletter(&self, request: &CreateNewsletterRequest) -> Result<Newsletter> {
        self.require(Tab::Admin, Panel::AdminNewsletters).await?;
        let result = match request.group_id {
            Some(group_id) => {
                let payload = NewsletterCreate {
                    title: request.title.trim().to_string(),
                    group_id,
                    period: request.period.clone(),
                    status: None,
                };
                self.client.create_newsletter(&payload).await
            }
            None => Err(StudioError::InvalidInput("A newsletter must target a group".to_string())),
        };
        let wire = self.report(Panel::AdminNewsletters, result).await?;
        self.upsert_newsletter(wire).await
    }

    pub async fn publish_newsletter(&self, newsletter_id: i64) -> Result<Newsletter> {
        self.require(Tab::Generator, Panel::Generator).await?;
        let result = self.client.publish_newsletter(newsletter_id).await;
        let wire = self.report(Panel::Generator, result).await?;
        self.upsert_newsletter(wire).await
    }

    /// Load a newsletter with its contributions and open its layout for editing
    pub async fn open_layout(&self, newsletter_id: i64) -> Result<()> {
        self.require(Tab::Generator, Panel::Layout).await?;
        self.open_newsletter(newsletter_id).await?;
        self.load_contributions(newsletter_id, false).await?;
        self.apply(Action::OpenLayout(newsletter_id)).await
    }

    /// Save the layout currently open in the store
    pub async fn save_open_layout(&self) -> Result<Newsletter> {
        let open = self.store.lock().await.state().layout.clone();
        let result = open.ok_or_else(|| StudioError::InvalidInput("No layout is open".to_string()));
        let editor = self.report(Panel::Layout, result).await?;
        self.save_layout(editor.newsletter_id, &editor.to_layout()).await
    }

    /// Re-derive the open layout after the backend replaced its document
    async fn reopen_layout(&self, newsletter_id: i64) -> Result<()> {
        let mut store = self.store.lock().await;
        let is_open = store.state().layout.as_ref().map(|l| l.newsletter_id) == Some(newsletter_id);
        if is_open {
            store.dispatch(Action::OpenLayout(newsletter_id))?;
        }
        Ok(())
    }

    pub async fn save_layout(&self, newsletter_id: i64, layout: &NewsletterLayout) -> Result<Newsletter> {
        self.require(Tab::Generator, Panel::Layout).await?;
        let guard = self.busy.try_begin(Operation::LayoutSave);
        let _guard = self.report(Panel::Layout, guard).await?;

        let result = self.client.update_layout(newsletter_id, layout).await;
        let wire = self.report(Panel::Layout, result).await?;
        self.upsert_newsletter(wire).await
    }

    pub async fn generate_ai_draft(&self, newsletter_id: i64) -> Result<Newsletter> {
        self.require(Tab::Generator, Panel::Generator).await?;
        let guard = self.busy.try_begin(Operation::AiDraft);
        let _guard = self.report(Panel::Generator, guard).await?;

        let result = self.client.generate_ai_draft(newsletter_id).await;
        let wire = self.report(Panel::Generator, result).await?;
        let newsletter = self.upsert_newsletter(wire).await?;
        if let Some(note) = newsletter.draft_note() {
            info!(newsletter_id = newsletter_id, note = %note, "AI draft fell back to a deterministic layout");
        }
        self.reopen_layout(newsletter_id).await?;
        Ok(newsletter)
    }

    pub async fn render_newsletter(&self, newsletter_id: i64) -> Result<Newsletter> {
        self.require(Tab::Generator, Panel::Layout).await?;
        let guard = self.busy.try_begin(Operation::Render);
        let _guard = self.report(Panel::Layout, guard).await?;

        let result = self.client.render_newsletter(newsletter_id).await;
        let wire = self.report(Panel::Layout, result).await?;
        self.upsert_newsletter(wire).await
    }

    pub async fn newsletter_admins(&self, newsletter_id: i64) -> Result<Vec<User>> {
        self.require(Tab::Admin, Panel::AdminNewsletters).await?;
        let result = self.client.newsletter_admins(newsletter_id).await;
        let links = self.report(Panel::AdminNewsletters, result).await?;
        Ok(links.into_iter().map(|link: NewsletterAdminRead| User::from(link.user)).collect())
    }

    pub async fn add_newsletter_admin(&self, newsletter_id: i64, user_id: i64) -> Result<()> {
        self.require(Tab::Admin, Panel::AdminNewsletters).await?;
        let result = self.client.add_newsletter_admin(newsletter_id, user_id).await;
        self.report(Panel::AdminNewsletters, result).await?;
        log_admin_action(None, "add_newsletter_admin", Some(&user_id.to_string()), Some(&newsletter_id.to_string()));
        Ok(())
    }

    pub async fn remove_newsletter_admin(&self, newsletter_id: i64, user_id: i64) -> Result<()> {
        self.require(Tab::Admin, Panel::AdminNewsletters).await?;
        let result = self.client.remove_newsletter_admin(newsletter_id, user_id).await;
        self.report(Panel::AdminNewsletters, result).await?;
        log_admin_action(None, "remove_newsletter_admin", Some(&user_id.to_string()), Some(&newsletter_id.to_string()));
        Ok(())
    }

    // Contributions

    /// Load the contributions of one newsletter; `mine_only` restricts to the session user's
    pub async fn load_contributions(&self, newsletter_id: i64, mine_only: bool) -> Result<()> {
        let result = if mine_only {
            self.client.my_contributions(newsletter_id).await
        } else {
            self.client.contributions(newsletter_id).await
        };
        let wire = self.report(Panel::Contributions, result).await?;

        let mut store = self.store.lock().await;
        let contributions = wire.into_iter().map(|c| contribution_to_domain(&store, c)).collect();
        store.dispatch(Action::ContributionsLoaded(contributions))
    }

    /// Submit the collect form; each non-blank field becomes one backend item
    pub async fn submit_contribution(&self, newsletter_id: i64, form: &NewContribution) -> Result<Vec<Contribution>> {
        let items = ContributionCreate::from_form(form);
        if items.is_empty() {
            let empty = Err(StudioError::InvalidInput("Contribution has no content".to_string()));
            return self.report(Panel::Collect, empty).await;
        }

        let mut created = Vec::with_capacity(items.len());
        for item in &items {
            let result = self.client.submit_contribution(newsletter_id, item).await;
            let wire = self.report(Panel::Collect, result).await?;

            let mut store = self.store.lock().await;
            let contribution = contribution_to_domain(&store, wire);
            store.dispatch(Action::ContributionUpserted(contribution.clone()))?;
            created.push(contribution);
        }
        Ok(created)
    }

    pub async fn set_contribution_status(&self, contribution_id: i64, status: ContributionStatus) -> Result<Contribution> {
        self.require(Tab::Generator, Panel::Contributions).await?;
        let result = self.client.update_contribution_status(contribution_id, status).await;
        let wire = self.report(Panel::Contributions, result).await?;

        let mut store = self.store.lock().await;
        let contribution = contribution_to_domain(&store, wire);
        store.dispatch(Action::ContributionUpserted(contribution.clone()))?;
        Ok(contribution)
    }

    // Directory

    pub async fn refresh_users(&self) -> Result<()> {
        self.require(Tab::Admin, Panel::AdminUsers).await?;
        let result = self.client.users().await;
        let users = self.report(Panel::AdminUsers, result).await?;
        self.apply(Action::UsersLoaded(users)).await
    }

    pub async fn create_group(&self, request: &CreateGroupRequest) -> Result<()> {
        self.require(Tab::Admin, Panel::AdminGroups).await?;
        let result = self.client.create_group(request).await;
        let group = self.report(Panel::AdminGroups, result).await?;
        self.apply(Action::GroupUpserted(group)).await
    }

    pub async fn delete_group(&self, group_id: i64) -> Result<()> {
        self.require(Tab::Admin, Panel::AdminGroups).await?;
        let result = self.client.delete_group(group_id).await;
        self.report(Panel::AdminGroups, result).await?;
        self.apply(Action::GroupDeleted(group_id)).await
    }

    pub async fn add_group_member(&self, group_id: i64, user_id: i64) -> Result<()> {
        self.require(Tab::Admin, Panel::AdminGroups).await?;
        let result = self.client.add_group_member(group_id, user_id, DEFAULT_MEMBER_ROLE).await;
        let group = self.report(Panel::AdminGroups, result).await?;
        self.apply(Action::GroupUpserted(group)).await?;
        self.refresh_users().await
    }

    pub async fn create_user(&self, name: &str, email: &str, role: Role, password: &str) -> Result<User> {
        self.require(Tab::Admin, Panel::AdminUsers).await?;
        let trigram = to_trigram(name);
        let result = if trigram.is_empty() {
            Err(StudioError::InvalidInput("User name must contain at least one letter or digit".to_string()))
        } else {
            let payload = UserCreate {
                email: email.trim().to_string(),
                trigram: trigram.clone(),
                name: trigram,
                global_role: role.into(),
                password: password.to_string(),
            };
            self.client.create_user(&payload).await
        };
        let user = self.report(Panel::AdminUsers, result).await?;
        self.apply(Action::UserUpserted(user.clone())).await?;
        Ok(user)
    }

    pub async fn reset_password(&self, user_id: i64, new_password: &str) -> Result<User> {
        self.require(Tab::Admin, Panel::AdminUsers).await?;
        let result = self.client.reset_password(user_id, new_password).await;
        let user = self.report(Panel::AdminUsers, result).await?;
        self.apply(Action::UserUpserted(user.clone())).await?;
        log_admin_action(None, "reset_password", Some(&user.name), Some("confirmed by backend"));
        Ok(user)
    }
}
