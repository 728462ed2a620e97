//! Actions dispatched to the studio store

use serde::{Deserialize, Serialize};
use crate::models::{
    Contribution, ContributionStatus, CreateUserRequest, Group, NewContribution, Newsletter, ReactionKind, Role, Scope,
    User,
};
use crate::services::layout::BlockField;
use super::tabs::Tab;

/// Form or panel an error message is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Login,
    Session,
    Feed,
    Collect,
    Contributions,
    Generator,
    Layout,
    AdminNewsletters,
    AdminUsers,
    AdminGroups,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Session and navigation
    ChangeRole(Role),
    Navigate(Tab),
    ChangeScope(Scope),
    OpenNewsletter(i64),
    BackToFeed,

    // Contribution flow
    SubmitContribution(NewContribution),
    SetContributionStatus { contribution_id: i64, status: ContributionStatus },

    // Generator
    GenerateDraft,
    EditDraft(String),
    PublishDraft { body: String, image_url: Option<String> },

    // Layout editor
    OpenLayout(i64),
    EditLead(String),
    UpdateBlock { block_id: String, field: BlockField, value: String },
    MoveBlock { block_id: String, offset: isize },
    AddBlock,
    DeleteBlock(String),
    CloseLayout,

    // Feed engagement
    React { newsletter_id: i64, kind: ReactionKind },
    Comment { newsletter_id: i64, author: String, text: String },

    // Super-admin panel
    CreateNewsletter { title: String, scope: Scope },
    AddUser(CreateUserRequest),
    UpdateUserGroups { user_id: i64, group_ids: Vec<i64> },
    UpdateGroupAdmins { group_id: i64, admin_ids: Vec<i64> },
    AddGroup { name: String },
    DeleteGroup(i64),
    ResetUserPassword(i64),

    // Backend-confirmed data
    SessionLoaded(User),
    SessionCleared,
    UsersLoaded(Vec<User>),
    GroupsLoaded(Vec<Group>),
    NewslettersLoaded(Vec<Newsletter>),
    ContributionsLoaded(Vec<Contribution>),
    ContributionUpserted(Contribution),
    NewsletterUpserted(Newsletter),
    GroupUpserted(Group),
    GroupDeleted(i64),
    UserUpserted(User),

    // Error surfacing
    ReportError { panel: Panel, message: String },
    DismissError(Panel),
}

impl Action {
    /// Short name used in logs and change notifications
    pub fn name(&self) -> &'static str {
        match self {
            Action::ChangeRole(_) => "change_role",
            Action::Navigate(_) => "navigate",
            Action::ChangeScope(_) => "change_scope",
            Action::OpenNewsletter(_) => "open_newsletter",
            Action::BackToFeed => "back_to_feed",
            Action::SubmitContribution(_) => "submit_contribution",
            Action::SetContributionStatus { .. } => "set_contribution_status",
            Action::GenerateDraft => "generate_draft",
            Action::EditDraft(_) => "edit_draft",
            Action::PublishDraft { .. } => "publish_draft",
            Action::OpenLayout(_) => "open_layout",
            Action::EditLead(_) => "edit_lead",
            Action::UpdateBlock { .. } => "update_block",
            Action::MoveBlock { .. } => "move_block",
            Action::AddBlock => "add_block",
            Action::DeleteBlock(_) => "delete_block",
            Action::CloseLayout => "close_layout",
            Action::React { .. } => "react",
            Action::Comment { .. } => "comment",
            Action::CreateNewsletter { .. } => "create_newsletter",
            Action::AddUser(_) => "add_user",
            Action::UpdateUserGroups { .. } => "update_user_groups",
            Action::UpdateGroupAdmins { .. } => "update_group_admins",
            Action::AddGroup { .. } => "add_group",
            Action::DeleteGroup(_) => "delete_group",
            Action::ResetUserPassword(_) => "reset_user_password",
            Action::SessionLoaded(_) => "session_loaded",
            Action::SessionCleared => "session_cleared",
            Action::UsersLoaded(_) => "users_loaded",
            Action::GroupsLoaded(_) => "groups_loaded",
            Action::NewslettersLoaded(_) => "newsletters_loaded",
            Action::ContributionsLoaded(_) => "contributions_loaded",
            Action::ContributionUpserted(_) => "contribution_upserted",
            Action::NewsletterUpserted(_) => "newsletter_upserted",
            Action::GroupUpserted(_) => "group_upserted",
            Action::GroupDeleted(_) => "group_deleted",
            Action::UserUpserted(_) => "user_upserted",
            Action::ReportError { .. } => "report_error",
            Action::DismissError(_) => "dismiss_error",
        }
    }

    /// Tab whose capability the action requires, if any
    pub fn required_tab(&self) -> Option<Tab> {
        match self {
            Action::GenerateDraft
            | Action::EditDraft(_)
            | Action::PublishDraft { .. }
            | Action::SetContributionStatus { .. }
            | Action::OpenLayout(_)
            | Action::EditLead(_)
            | Action::UpdateBlock { .. }
            | Action::MoveBlock { .. }
            | Action::AddBlock
            | Action::DeleteBlock(_) => Some(Tab::Generator),
            Action::CreateNewsletter { .. }
            | Action::AddUser(_)
            | Action::UpdateUserGroups { .. }
            | Action::UpdateGroupAdmins { .. }
            | Action::AddGroup { .. }
            | Action::DeleteGroup(_)
            | Action::ResetUserPassword(_) => Some(Tab::Admin),
            _ => None,
        }
    }

    /// Panel a failure of this action is reported on
    pub fn panel(&self) -> Panel {
        match self {
            Action::ChangeRole(_) | Action::Navigate(_) | Action::ChangeScope(_) => Panel::Session,
            Action::SessionLoaded(_) | Action::SessionCleared => Panel::Session,
            Action::OpenNewsletter(_) | Action::BackToFeed => Panel::Feed,
            Action::React { .. } | Action::Comment { .. } | Action::NewslettersLoaded(_) => Panel::Feed,
            Action::SubmitContribution(_) => Panel::Collect,
            Action::ContributionsLoaded(_) | Action::ContributionUpserted(_) => Panel::Contributions,
            Action::SetContributionStatus { .. } => Panel::Contributions,
            Action::GenerateDraft | Action::EditDraft(_) | Action::PublishDraft { .. } => Panel::Generator,
            Action::NewsletterUpserted(_) => Panel::Generator,
            Action::OpenLayout(_) | Action::EditLead(_) | Action::UpdateBlock { .. } => Panel::Layout,
            Action::MoveBlock { .. } | Action::AddBlock | Action::DeleteBlock(_) | Action::CloseLayout => Panel::Layout,
            Action::CreateNewsletter { .. } => Panel::AdminNewsletters,
            Action::AddUser(_) | Action::UpdateUserGroups { .. } | Action::ResetUserPassword(_) => Panel::AdminUsers,
            Action::UsersLoaded(_) | Action::UserUpserted(_) => Panel::AdminUsers,
            Action::UpdateGroupAdmins { .. } | Action::AddGroup { .. } | Action::DeleteGroup(_) => Panel::AdminGroups,
            Action::GroupsLoaded(_) | Action::GroupUpserted(_) | Action::GroupDeleted(_) => Panel::AdminGroups,
            Action::ReportError { panel, .. } => *panel,
            Action::DismissError(panel) => *panel,
        }
    }

    /// Changes to the shared collections that a backend-fed store only
    /// accepts as confirmed data
    pub fn is_local_write(&self) -> bool {
        matches!(
            self,
            Action::SubmitContribution(_)
                | Action::SetContributionStatus { .. }
                | Action::PublishDraft { .. }
                | Action::React { .. }
                | Action::Comment { .. }
                | Action::CreateNewsletter { .. }
                | Action::AddUser(_)
                | Action::UpdateUserGroups { .. }
                | Action::UpdateGroupAdmins { .. }
                | Action::AddGroup { .. }
                | Action::DeleteGroup(_)
                | Action::ResetUserPassword(_)
        )
    }
}
