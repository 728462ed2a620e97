//! Studio store
//!
//! Single owner of the session and the collections. Every change goes through
//! [`StudioStore::dispatch`], which checks the capability table, applies the
//! action and notifies subscribers. Derived views are recomputed on each call.

use std::collections::BTreeMap;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::{Settings, StudioConfig};
use crate::models::{
    Contribution, ContributionStatus, Engagement, Group, NewContribution, Newsletter, NewsletterStatus, Role, Scope,
    User,
};
use crate::services::composer::DraftComposer;
use crate::services::directory;
use crate::services::layout::LayoutEditor;
use crate::services::participation::{participation, Participation};
use crate::services::visibility::{audience_label, edition_contributions, filter_visible, is_visible};
use crate::utils::errors::{StudioError, Result};
use crate::utils::helpers::{newsletter_label, non_blank};
use crate::utils::logging::{log_admin_action, log_user_action};
use super::actions::{Action, Panel};
use super::tabs::{self, Tab, DEFAULT_TAB};

/// Body of a newsletter created from the admin panel, before any draft is published
const CREATED_NEWSLETTER_BODY: &str = "This edition is being prepared. Contributions are open in the Collect tab.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Login,
    App,
}

/// Whether collections are backed by a remote service or held locally only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: Option<User>,
    pub role: Role,
    pub active_tab: Tab,
    pub scope: Scope,
    pub selected_newsletter: Option<i64>,
    pub view: View,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioState {
    pub session: Session,
    pub users: Vec<User>,
    pub groups: Vec<Group>,
    /// Most recent first
    pub contributions: Vec<Contribution>,
    /// Most recent first
    pub newsletters: Vec<Newsletter>,
    pub draft: String,
    /// Layout being edited, if any
    pub layout: Option<LayoutEditor>,
    pub label: String,
    pub panel_errors: BTreeMap<Panel, String>,
    pub revision: u64,
}

/// Notification sent to subscribers after each dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum StudioEvent {
    Changed { revision: u64, action: &'static str },
    Redirected { from: Tab, to: Tab },
    Failed { panel: Panel, message: String },
}

pub struct StudioStore {
    state: StudioState,
    mode: StoreMode,
    composer: DraftComposer,
    studio: StudioConfig,
    subscribers: Vec<mpsc::UnboundedSender<StudioEvent>>,
    pending: Vec<StudioEvent>,
}

fn next_id<T>(records: &[T], id: impl Fn(&T) -> i64) -> i64 {
    records.iter().map(id).max().unwrap_or(0) + 1
}

fn upsert<T>(records: &mut Vec<T>, record: T, same: impl Fn(&T, &T) -> bool, prepend: bool) {
    if let Some(existing) = records.iter_mut().find(|r| same(&**r, &record)) {
        *existing = record;
    } else if prepend {
        records.insert(0, record);
    } else {
        records.push(record);
    }
}

impl StudioStore {
    pub fn new(settings: &Settings, mode: StoreMode) -> Self {
        let view = match mode {
            StoreMode::Local => View::App,
            StoreMode::Remote => View::Login,
        };

        Self {
            state: StudioState {
                session: Session {
                    user: None,
                    role: settings.studio.default_role,
                    active_tab: tabs::resolve_tab(settings.studio.default_role, DEFAULT_TAB),
                    scope: Scope::All,
                    selected_newsletter: None,
                    view,
                },
                users: Vec::new(),
                groups: Vec::new(),
                contributions: Vec::new(),
                newsletters: Vec::new(),
                draft: String::new(),
                layout: None,
                label: newsletter_label(Utc::now()),
                panel_errors: BTreeMap::new(),
                revision: 0,
            },
            mode,
            composer: DraftComposer::new(&settings.composer),
            studio: settings.studio.clone(),
            subscribers: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Store without a backend; the session starts in the app view
    pub fn local(settings: &Settings) -> Self {
        Self::new(settings, StoreMode::Local)
    }

    /// Store fed by a backend; the session starts in the login view
    pub fn remote(settings: &Settings) -> Self {
        Self::new(settings, StoreMode::Remote)
    }

    /// Override the label of the current edition
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.state.label = label.into();
        self
    }

    pub fn mode(&self) -> StoreMode {
        self.mode
    }

    pub fn state(&self) -> &StudioState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.state.session
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<StudioEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Apply one action. Failures are recorded on the action's panel and
    /// returned; the state is left as it was.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        let name = action.name();
        let panel = action.panel();
        let clears_panel = !matches!(action, Action::ReportError { .. } | Action::DismissError(_));
        self.pending.clear();

        match self.apply(action) {
            Ok(()) => {
                self.state.revision += 1;
                if clears_panel {
                    self.state.panel_errors.remove(&panel);
                }
                debug!(action = name, revision = self.state.revision, "Action applied");

                let mut events = std::mem::take(&mut self.pending);
                events.push(StudioEvent::Changed { revision: self.state.revision, action: name });
                for event in events {
                    self.emit(event);
                }
                Ok(())
            }
            Err(e) => {
                self.pending.clear();
                let message = e.to_string();
                warn!(action = name, panel = ?panel, error = %e, "Action failed");
                self.state.panel_errors.insert(panel, message.clone());
                self.emit(StudioEvent::Failed { panel, message });
                Err(e)
            }
        }
    }

    fn emit(&mut self, event: StudioEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn ensure_capability(&self, action: &Action) -> Result<()> {
        let role = self.state.session.role;
        match action.required_tab() {
            Some(tab) if !tab.allows(role) => Err(StudioError::PermissionDenied(format!(
                "{} requires the {} tab, which role {} cannot use",
                action.name(),
                tab,
                role
            ))),
            _ => Ok(()),
        }
    }

    fn ensure_group(&self, scope: Scope) -> Result<()> {
        match scope {
            Scope::Group(group_id) if !self.state.groups.iter().any(|g| g.id == group_id) => {
                Err(StudioError::GroupNotFound { group_id })
            }
            _ => Ok(()),
        }
    }

    fn current_user_id(&self) -> Option<i64> {
        self.state.session.user.as_ref().map(|u| u.id)
    }

    fn current_user_name(&self) -> Option<String> {
        self.state.session.user.as_ref().map(|u| u.name.clone())
    }

    /// Move to the default tab when the active one is hidden for the current role
    fn enforce_tab(&mut self) {
        let session = &mut self.state.session;
        let resolved = tabs::resolve_tab(session.role, session.active_tab);
        if resolved != session.active_tab {
            info!(from = %session.active_tab, to = %resolved, role = %session.role, "Redirecting to default tab");
            self.pending.push(StudioEvent::Redirected { from: session.active_tab, to: resolved });
            session.active_tab = resolved;
        }
    }

    fn newsletter_mut(&mut self, newsletter_id: i64) -> Result<&mut Newsletter> {
        self.state
            .newsletters
            .iter_mut()
            .find(|n| n.id == newsletter_id)
            .ok_or(StudioError::NewsletterNotFound { newsletter_id })
    }

    fn ensure_writable(&self, action: &Action) -> Result<()> {
        if self.mode == StoreMode::Remote && action.is_local_write() {
            return Err(StudioError::BackendRequired(action.name().to_string()));
        }
        Ok(())
    }

    fn layout_mut(&mut self) -> Result<&mut LayoutEditor> {
        self.state
            .layout
            .as_mut()
            .ok_or_else(|| StudioError::InvalidInput("No layout is open".to_string()))
    }

    fn apply(&mut self, action: Action) -> Result<()> {
        self.ensure_capability(&action)?;
        self.ensure_writable(&action)?;

        match action {
            Action::ChangeRole(role) => {
                self.state.session.role = role;
                log_user_action(self.current_user_id(), "change_role", Some(role.as_str()));
                self.enforce_tab();
            }
            Action::Navigate(tab) => {
                self.state.session.active_tab = tab;
                self.enforce_tab();
            }
            Action::ChangeScope(scope) => {
                self.ensure_group(scope)?;
                self.state.session.scope = scope;
                let selected = self.state.session.selected_newsletter;
                if let Some(id) = selected {
                    let still_visible = self.state.newsletters.iter().any(|n| n.id == id && is_visible(scope, n));
                    if !still_visible {
                        self.state.session.selected_newsletter = None;
                    }
                }
                debug!(scope = %scope, "Scope changed");
            }
            Action::OpenNewsletter(newsletter_id) => {
                let scope = self.state.session.scope;
                if !self.state.newsletters.iter().any(|n| n.id == newsletter_id && is_visible(scope, n)) {
                    return Err(StudioError::NewsletterNotFound { newsletter_id });
                }
                self.state.session.selected_newsletter = Some(newsletter_id);
                self.state.session.active_tab = Tab::Feed;
            }
            Action::BackToFeed => {
                self.state.session.selected_newsletter = None;
                self.state.session.active_tab = Tab::Feed;
            }
            Action::SubmitContribution(form) => self.submit_contribution(form)?,
            Action::SetContributionStatus { contribution_id, status } => {
                let contribution = self
                    .state
                    .contributions
                    .iter_mut()
                    .find(|c| c.id == contribution_id)
                    .ok_or(StudioError::ContributionNotFound { contribution_id })?;
                contribution.set_status(status)?;
                info!(contribution_id = contribution_id, status = %status, "Contribution status updated");
            }
            Action::GenerateDraft => {
                let draft = self.composer.compose(self.generator_contributions(), &self.state.label);
                self.state.draft = draft;
                debug!(label = %self.state.label, length = self.state.draft.len(), "Draft generated");
            }
            Action::EditDraft(text) => {
                self.state.draft = text;
            }
            Action::PublishDraft { body, image_url } => self.publish(&body, image_url)?,
            Action::OpenLayout(newsletter_id) => {
                let newsletter = self
                    .state
                    .newsletters
                    .iter()
                    .find(|n| n.id == newsletter_id)
                    .ok_or(StudioError::NewsletterNotFound { newsletter_id })?;
                let editor = LayoutEditor::open(newsletter, &self.state.contributions);
                debug!(newsletter_id = newsletter_id, blocks = editor.blocks.len(), "Layout opened");
                self.state.layout = Some(editor);
            }
            Action::EditLead(lead) => self.layout_mut()?.set_lead(lead),
            Action::UpdateBlock { block_id, field, value } => self.layout_mut()?.update_block(&block_id, field, value)?,
            Action::MoveBlock { block_id, offset } => {
                let moved = self.layout_mut()?.move_block(&block_id, offset)?;
                debug!(block_id = %block_id, offset = offset, moved = moved, "Layout block moved");
            }
            Action::AddBlock => {
                let block_id = self.layout_mut()?.add_block();
                debug!(block_id = %block_id, "Layout block added");
            }
            Action::DeleteBlock(block_id) => {
                self.layout_mut()?.delete_block(&block_id)?;
            }
            Action::CloseLayout => {
                self.state.layout = None;
            }
            Action::React { newsletter_id, kind } => {
                let count = self.newsletter_mut(newsletter_id)?.engagement.react(kind);
                debug!(newsletter_id = newsletter_id, kind = ?kind, count = count, "Reaction added");
            }
            Action::Comment { newsletter_id, author, text } => {
                let author = non_blank(&author).or_else(|| self.current_user_name()).unwrap_or_default();
                self.newsletter_mut(newsletter_id)?.engagement.add_comment(&author, &text)?;
                log_user_action(self.current_user_id(), "comment", Some(&newsletter_id.to_string()));
            }
            Action::CreateNewsletter { title, scope } => self.create_newsletter(&title, scope)?,
            Action::AddUser(request) => {
                let id = next_id(&self.state.users, |u| u.id);
                let user = directory::add_user(&mut self.state.users, &self.state.groups, id, request)?;
                log_admin_action(self.current_user_id(), "add_user", Some(&user.name), None);
            }
            Action::UpdateUserGroups { user_id, group_ids } => {
                directory::update_user_groups(&mut self.state.users, &mut self.state.groups, user_id, &group_ids)?;
                self.sync_session_user(user_id);
            }
            Action::UpdateGroupAdmins { group_id, admin_ids } => {
                directory::update_group_admins(&mut self.state.groups, &mut self.state.users, group_id, &admin_ids)?;
                for user_id in admin_ids {
                    self.sync_session_user(user_id);
                }
            }
            Action::AddGroup { name } => {
                let id = next_id(&self.state.groups, |g| g.id);
                let group = directory::add_group(&mut self.state.groups, id, &name)?;
                log_admin_action(self.current_user_id(), "add_group", Some(&group.name), None);
            }
            Action::DeleteGroup(group_id) | Action::GroupDeleted(group_id) => self.remove_group(group_id)?,
            Action::ResetUserPassword(user_id) => {
                let target = self
                    .state
                    .users
                    .iter()
                    .find(|u| u.id == user_id)
                    .map(|u| u.name.clone())
                    .ok_or(StudioError::UserNotFound { user_id })?;
                log_admin_action(
                    self.current_user_id(),
                    "reset_password",
                    Some(&target),
                    Some("local only, no credentials changed"),
                );
            }
            Action::SessionLoaded(user) => {
                info!(user_id = user.id, role = %user.role, "Session loaded");
                self.state.session.role = user.role;
                self.state.session.view = View::App;
                upsert(&mut self.state.users, user.clone(), |a, b| a.id == b.id, false);
                self.state.session.user = Some(user);
                self.enforce_tab();
            }
            Action::SessionCleared => {
                info!(user_id = ?self.current_user_id(), "Session cleared");
                let session = &mut self.state.session;
                session.user = None;
                session.role = Role::User;
                session.view = View::Login;
                session.selected_newsletter = None;
                session.scope = Scope::All;
                session.active_tab = DEFAULT_TAB;
                self.state.layout = None;
            }
            Action::UsersLoaded(users) => {
                self.state.users = users;
            }
            Action::GroupsLoaded(groups) => {
                self.state.groups = groups;
                if self.ensure_group(self.state.session.scope).is_err() {
                    self.state.session.scope = Scope::All;
                }
            }
            Action::NewslettersLoaded(mut newsletters) => {
                newsletters.sort_by(|a, b| b.date.cmp(&a.date));
                self.state.newsletters = newsletters;
            }
            Action::ContributionsLoaded(mut contributions) => {
                contributions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                self.state.contributions = contributions;
            }
            Action::ContributionUpserted(contribution) => {
                upsert(&mut self.state.contributions, contribution, |a, b| a.id == b.id, true);
            }
            Action::NewsletterUpserted(newsletter) => {
                upsert(&mut self.state.newsletters, newsletter, |a, b| a.id == b.id, true);
            }
            Action::GroupUpserted(group) => {
                upsert(&mut self.state.groups, group, |a, b| a.id == b.id, false);
            }
            Action::UserUpserted(user) => {
                let user_id = user.id;
                upsert(&mut self.state.users, user, |a, b| a.id == b.id, false);
                self.sync_session_user(user_id);
            }
            Action::ReportError { panel, message } => {
                self.state.panel_errors.insert(panel, message);
            }
            Action::DismissError(panel) => {
                self.state.panel_errors.remove(&panel);
            }
        }

        Ok(())
    }

    /// Drop a group with its memberships; records referencing it keep the id
    fn remove_group(&mut self, group_id: i64) -> Result<()> {
        let removed = directory::delete_group(&mut self.state.groups, &mut self.state.users, group_id)?;
        if self.state.session.scope == Scope::Group(group_id) {
            self.state.session.scope = Scope::All;
        }
        if let Some(user_id) = self.current_user_id() {
            self.sync_session_user(user_id);
        }
        log_admin_action(self.current_user_id(), "delete_group", Some(&removed.name), None);
        Ok(())
    }

    /// Refresh the signed-in user's copy after their record changed
    fn sync_session_user(&mut self, user_id: i64) {
        if self.current_user_id() != Some(user_id) {
            return;
        }
        if let Some(user) = self.state.users.iter().find(|u| u.id == user_id) {
            self.state.session.user = Some(user.clone());
        }
    }

    fn submit_contribution(&mut self, form: NewContribution) -> Result<()> {
        let contribution = Contribution {
            id: next_id(&self.state.contributions, |c| c.id),
            newsletter_id: None,
            newsletter_label: self.state.label.clone(),
            author: form.author.as_deref().and_then(non_blank).or_else(|| self.current_user_name()),
            author_id: self.current_user_id(),
            title: None,
            text: form.text.trim().to_string(),
            success_story: form.success_story.trim().to_string(),
            fail_story: form.fail_story.trim().to_string(),
            group_id: self.state.session.scope.group_id(),
            status: ContributionStatus::Submitted,
            created_at: Utc::now(),
        };

        if contribution.is_empty() {
            return Err(StudioError::InvalidInput("Contribution has no content".to_string()));
        }

        info!(contribution_id = contribution.id, label = %contribution.newsletter_label,
              group_id = ?contribution.group_id, "Contribution submitted");
        self.state.contributions.insert(0, contribution);
        Ok(())
    }

    fn publish(&mut self, body: &str, image_url: Option<String>) -> Result<()> {
        let body = non_blank(body)
            .ok_or_else(|| StudioError::InvalidInput("Newsletter body is empty".to_string()))?;
        let group_id = self.state.session.scope.group_id();

        let newsletter = Newsletter {
            id: next_id(&self.state.newsletters, |n| n.id),
            title: self.state.label.clone(),
            date: Utc::now(),
            audience: self.audience_for(group_id),
            group_id,
            body,
            image_url: image_url.as_deref().and_then(non_blank),
            status: NewsletterStatus::Published,
            period: Some(self.state.label.clone()),
            layout: None,
            engagement: Engagement::default(),
        };

        log_admin_action(self.current_user_id(), "publish", Some(&newsletter.title), Some(&newsletter.audience));
        self.state.newsletters.insert(0, newsletter);
        self.state.draft.clear();
        Ok(())
    }

    fn create_newsletter(&mut self, title: &str, scope: Scope) -> Result<()> {
        let title = non_blank(title)
            .ok_or_else(|| StudioError::InvalidInput("Newsletter title is empty".to_string()))?;
        self.ensure_group(scope)?;
        let group_id = scope.group_id();

        let newsletter = Newsletter {
            id: next_id(&self.state.newsletters, |n| n.id),
            title,
            date: Utc::now(),
            audience: self.audience_for(group_id),
            group_id,
            body: CREATED_NEWSLETTER_BODY.to_string(),
            image_url: None,
            status: NewsletterStatus::Draft,
            period: Some(self.state.label.clone()),
            layout: None,
            engagement: Engagement::default(),
        };

        log_admin_action(self.current_user_id(), "create_newsletter", Some(&newsletter.title), None);
        self.state.newsletters.insert(0, newsletter);
        Ok(())
    }

    // Derived views

    pub fn visible_newsletters(&self) -> Vec<&Newsletter> {
        filter_visible(self.state.session.scope, &self.state.newsletters)
    }

    pub fn visible_contributions(&self) -> Vec<&Contribution> {
        filter_visible(self.state.session.scope, &self.state.contributions)
    }

    /// Contributions of the current edition under the current scope
    pub fn generator_contributions(&self) -> Vec<&Contribution> {
        edition_contributions(self.state.session.scope, &self.state.label, &self.state.contributions)
    }

    /// Participation in the current edition under the current scope
    pub fn participation(&self) -> Participation {
        participation(self.generator_contributions(), self.state.users.len())
    }

    pub fn visible_tabs(&self) -> Vec<Tab> {
        tabs::visible_tabs(self.state.session.role)
    }

    pub fn audience_for(&self, group_id: Option<i64>) -> String {
        audience_label(
            group_id,
            &self.state.groups,
            &self.studio.organization_label,
            &self.studio.unknown_group_label,
        )
    }

    pub fn selected_newsletter(&self) -> Option<&Newsletter> {
        let id = self.state.session.selected_newsletter?;
        self.state.newsletters.iter().find(|n| n.id == id)
    }

    pub fn panel_error(&self, panel: Panel) -> Option<&str> {
        self.state.panel_errors.get(&panel).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::models::{CreateUserRequest, GroupMembership, ReactionKind};

    const LABEL: &str = "Monthly newsletter · March 2026";

    fn store(role: Role) -> StudioStore {
        let mut store = StudioStore::local(&Settings::default()).with_label(LABEL);
        store
            .dispatch(Action::GroupsLoaded(vec![Group::new(1, "Product"), Group::new(2, "Tech")]))
            .unwrap();
        store
            .dispatch(Action::UsersLoaded(vec![User {
                id: 1,
                name: "GJV".to_string(),
                email: None,
                trigram: Some("GJV".to_string()),
                role: Role::User,
                memberships: vec![GroupMembership::member(1)],
                must_change_password: false,
            }]))
            .unwrap();
        store.dispatch(Action::ChangeRole(role)).unwrap();
        store
    }

    fn submit(store: &mut StudioStore, text: &str, success: &str, fail: &str) -> Result<()> {
        store.dispatch(Action::SubmitContribution(NewContribution {
            author: Some("GJV".to_string()),
            text: text.to_string(),
            success_story: success.to_string(),
            fail_story: fail.to_string(),
        }))
    }

    #[test]
    fn test_local_store_starts_in_app_view() {
        let local = StudioStore::local(&Settings::default());
        assert_eq!(local.session().view, View::App);
        assert_eq!(local.session().active_tab, Tab::Feed);

        let remote = StudioStore::remote(&Settings::default());
        assert_eq!(remote.session().view, View::Login);
    }

    #[test]
    fn test_role_change_redirects_hidden_tab() {
        let mut store = store(Role::SuperAdmin);
        let mut events = store.subscribe();
        store.dispatch(Action::Navigate(Tab::Admin)).unwrap();
        assert_eq!(store.session().active_tab, Tab::Admin);

        store.dispatch(Action::ChangeRole(Role::Admin)).unwrap();
        assert_eq!(store.session().active_tab, Tab::Feed);

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push(event);
        }
        assert!(seen.contains(&StudioEvent::Redirected { from: Tab::Admin, to: Tab::Feed }));
    }

    #[test]
    fn test_capability_table_guards_actions() {
        let mut store = store(Role::User);
        let result = store.dispatch(Action::AddGroup { name: "Sales".to_string() });
        assert_matches!(result, Err(StudioError::PermissionDenied(_)));
        assert_eq!(store.state().groups.len(), 2);
        assert!(store.panel_error(Panel::AdminGroups).is_some());

        assert_matches!(store.dispatch(Action::GenerateDraft), Err(StudioError::PermissionDenied(_)));
    }

    #[test]
    fn test_submit_prepends_with_label_and_scope() {
        let mut store = store(Role::User);
        store.dispatch(Action::ChangeScope(Scope::Group(2))).unwrap();
        submit(&mut store, "First", "", "").unwrap();
        submit(&mut store, "Second", "", "").unwrap();

        let contributions = &store.state().contributions;
        assert_eq!(contributions[0].text, "Second");
        assert_eq!(contributions[0].group_id, Some(2));
        assert_eq!(contributions[0].newsletter_label, LABEL);
        assert!(contributions[0].id > contributions[1].id);

        assert_matches!(submit(&mut store, " ", "", "\t"), Err(StudioError::InvalidInput(_)));
        assert_eq!(store.state().contributions.len(), 2);
    }

    #[test]
    fn test_change_scope_requires_existing_group() {
        let mut store = store(Role::User);
        assert_matches!(
            store.dispatch(Action::ChangeScope(Scope::Group(42))),
            Err(StudioError::GroupNotFound { group_id: 42 })
        );
        assert_eq!(store.session().scope, Scope::All);
    }

    #[test]
    fn test_publish_prepends_with_audience() {
        let mut store = store(Role::Admin);
        store.dispatch(Action::ChangeScope(Scope::Group(2))).unwrap();
        store
            .dispatch(Action::PublishDraft { body: "<p>Hello</p>".to_string(), image_url: Some(" ".to_string()) })
            .unwrap();

        let newsletter = &store.state().newsletters[0];
        assert_eq!(newsletter.title, LABEL);
        assert_eq!(newsletter.audience, "Tech");
        assert_eq!(newsletter.group_id, Some(2));
        assert_eq!(newsletter.image_url, None);
        assert_eq!(newsletter.engagement, Engagement::default());
    }

    #[test]
    fn test_publish_empty_body_is_rejected() {
        let mut store = store(Role::Admin);
        let before = store.state().newsletters.len();
        let result = store.dispatch(Action::PublishDraft { body: "  \n ".to_string(), image_url: None });

        assert_matches!(result, Err(StudioError::InvalidInput(_)));
        assert_eq!(store.state().newsletters.len(), before);
        assert!(store.panel_error(Panel::Generator).is_some());
    }

    #[test]
    fn test_generate_draft_uses_current_edition() {
        let mut store = store(Role::Admin);
        submit(&mut store, "Launched X", "", "Y broke").unwrap();
        store.dispatch(Action::GenerateDraft).unwrap();

        let draft = &store.state().draft;
        assert!(draft.contains("<li>Launched X</li>"));
        assert!(draft.contains("<li>Y broke</li>"));
        assert!(!draft.contains("Success stories"));
    }

    #[test]
    fn test_delete_group_resets_scope_and_keeps_records() {
        let mut store = store(Role::SuperAdmin);
        store.dispatch(Action::ChangeScope(Scope::Group(1))).unwrap();
        store.dispatch(Action::PublishDraft { body: "Body".to_string(), image_url: None }).unwrap();
        store.dispatch(Action::DeleteGroup(1)).unwrap();

        assert_eq!(store.session().scope, Scope::All);
        assert!(!store.state().users[0].belongs_to(1));
        assert_eq!(store.state().newsletters[0].group_id, Some(1));
        assert_eq!(store.audience_for(Some(1)), "Unknown group");
    }

    #[test]
    fn test_admin_actions_update_directory() {
        let mut store = store(Role::SuperAdmin);
        store
            .dispatch(Action::AddUser(CreateUserRequest {
                name: "xp-d".to_string(),
                role: Role::User,
                group_ids: vec![2],
            }))
            .unwrap();
        store.dispatch(Action::UpdateGroupAdmins { group_id: 2, admin_ids: vec![2] }).unwrap();
        store.dispatch(Action::ResetUserPassword(1)).unwrap();
        assert_matches!(
            store.dispatch(Action::ResetUserPassword(99)),
            Err(StudioError::UserNotFound { user_id: 99 })
        );

        let users = &store.state().users;
        assert_eq!(users[1].name, "XPD");
        assert!(users[1].is_group_admin(2));
        assert!(!users[0].must_change_password);
    }

    #[test]
    fn test_engagement_and_errors() {
        let mut store = store(Role::Admin);
        store.dispatch(Action::PublishDraft { body: "Body".to_string(), image_url: None }).unwrap();
        let id = store.state().newsletters[0].id;

        store.dispatch(Action::React { newsletter_id: id, kind: ReactionKind::Celebrate }).unwrap();
        assert_matches!(
            store.dispatch(Action::Comment { newsletter_id: id, author: "QLR".to_string(), text: " ".to_string() }),
            Err(StudioError::InvalidInput(_))
        );
        assert!(store.panel_error(Panel::Feed).is_some());

        store.dispatch(Action::DismissError(Panel::Feed)).unwrap();
        assert!(store.panel_error(Panel::Feed).is_none());
        assert_eq!(store.state().newsletters[0].engagement.reaction_count(ReactionKind::Celebrate), 1);
    }

    #[test]
    fn test_session_cleared_returns_to_login() {
        let mut store = StudioStore::remote(&Settings::default());
        let user = User {
            id: 7,
            name: "QLR".to_string(),
            email: Some("qlr@example.com".to_string()),
            trigram: None,
            role: Role::SuperAdmin,
            memberships: Vec::new(),
            must_change_password: false,
        };

        store.dispatch(Action::SessionLoaded(user)).unwrap();
        assert_eq!(store.session().view, View::App);
        store.dispatch(Action::Navigate(Tab::Admin)).unwrap();

        store.dispatch(Action::SessionCleared).unwrap();
        assert_eq!(store.session().view, View::Login);
        assert_eq!(store.session().role, Role::User);
        assert_eq!(store.session().active_tab, Tab::Feed);
    }
}
