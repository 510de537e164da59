//! Command-line adapter: parses arguments into intents and runs them.

use std::collections::BTreeMap;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::application::Dispatcher;
use crate::application::commands::{
    AddUserToGroupCommand, CreateGroupCommand, CreateUserCommand, DeleteGroupCommand,
    DeleteUserCommand, RemoveUserFromGroupCommand, ResetPasswordCommand, UpdateUserCommand,
};
use crate::application::queries::{
    GetAllGroupsQuery, GetGroupMembersQuery, GetGroupQuery, GetUserQuery, GetUsersQuery,
};
use crate::domain::{
    AdminResult, NewGroup, NewUser, Password, RequestErrors, TenantContext, TenantErrors,
    TenantId, UserFilter, UserId, UserLookup, UserUpdate,
};

/// `identity-admin` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "identity-admin",
    about = "Administer users, groups and memberships on a Keycloak deployment",
    version
)]
pub struct Cli {
    /// Tenant (realm) to operate on. Falls back to `IAM_ADMIN_DEFAULT_TENANT`.
    #[arg(long, value_name = "tenant", global = true)]
    pub tenant: Option<String>,
    /// Resource and action.
    #[command(subcommand)]
    pub command: Resource,
}

/// Resource families.
#[derive(Debug, Subcommand)]
pub enum Resource {
    /// Manage users.
    #[command(subcommand)]
    Users(UserAction),
    /// Manage groups.
    #[command(subcommand)]
    Groups(GroupAction),
    /// Manage group memberships.
    #[command(subcommand)]
    Memberships(MembershipAction),
}

/// User actions.
#[derive(Debug, Subcommand)]
pub enum UserAction {
    /// Create a user and set its password.
    Create(CreateUserArgs),
    /// Show one user by username or id.
    Get {
        /// Username or user id.
        username_or_id: String,
        /// Treat the value as a username even when it parses as an id.
        #[arg(long)]
        by_username: bool,
    },
    /// List users.
    List {
        /// Offset of the first user.
        #[arg(long, default_value_t = 0)]
        first: u32,
        /// Maximum number of users.
        #[arg(long, default_value_t = 100)]
        max: u32,
        /// Substring matched against usernames, emails and names.
        #[arg(long)]
        search: Option<String>,
    },
    /// Change user fields.
    Update(UpdateUserArgs),
    /// Delete a user.
    Delete {
        /// User id.
        id: String,
    },
    /// Replace a user's password.
    ResetPassword {
        /// User id.
        id: String,
        /// New password.
        #[arg(long)]
        password: String,
    },
}

/// Arguments for `users create`.
#[derive(Debug, Args)]
pub struct CreateUserArgs {
    /// Login name.
    #[arg(long)]
    pub username: String,
    /// Initial password.
    #[arg(long)]
    pub password: String,
    /// Contact email.
    #[arg(long)]
    pub email: String,
    /// Given name.
    #[arg(long = "first-name")]
    pub first_name: String,
    /// Family name.
    #[arg(long = "last-name")]
    pub last_name: String,
    /// Attribute as `key=value`; repeatable.
    #[arg(long = "attribute", value_name = "key=value", value_parser = parse_attribute)]
    pub attributes: Vec<(String, String)>,
}

/// Arguments for `users update`.
#[derive(Debug, Args)]
pub struct UpdateUserArgs {
    /// User id.
    pub id: String,
    /// New email.
    #[arg(long)]
    pub email: Option<String>,
    /// New given name.
    #[arg(long = "first-name")]
    pub first_name: Option<String>,
    /// New family name.
    #[arg(long = "last-name")]
    pub last_name: Option<String>,
    /// Enable or disable the account.
    #[arg(long)]
    pub enabled: Option<bool>,
}

/// Group actions.
#[derive(Debug, Subcommand)]
pub enum GroupAction {
    /// List every group.
    List,
    /// Show one group.
    Get {
        /// Group id.
        id: Uuid,
    },
    /// Create a top-level group.
    Create {
        /// Group name.
        name: String,
        /// Attribute as `key=value`; repeatable.
        #[arg(long = "attribute", value_name = "key=value", value_parser = parse_attribute)]
        attributes: Vec<(String, String)>,
    },
    /// Delete a group.
    Delete {
        /// Group id.
        id: Uuid,
    },
}

/// Membership actions.
#[derive(Debug, Subcommand)]
pub enum MembershipAction {
    /// Add a user to a group.
    Add {
        /// User id.
        #[arg(long)]
        user: String,
        /// Group id.
        #[arg(long)]
        group: Uuid,
    },
    /// Remove a user from a group.
    Remove {
        /// User id.
        #[arg(long)]
        user: String,
        /// Group id.
        #[arg(long)]
        group: Uuid,
    },
    /// List the members of a group.
    List {
        /// Group id.
        group: Uuid,
    },
}

/// A parsed, validated intent ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// `users create`
    CreateUser(CreateUserCommand),
    /// `users get`
    GetUser(GetUserQuery),
    /// `users list`
    GetUsers(GetUsersQuery),
    /// `users update`
    UpdateUser(UpdateUserCommand),
    /// `users delete`
    DeleteUser(DeleteUserCommand),
    /// `users reset-password`
    ResetPassword(ResetPasswordCommand),
    /// `groups list`
    GetAllGroups(GetAllGroupsQuery),
    /// `groups get`
    GetGroup(GetGroupQuery),
    /// `groups create`
    CreateGroup(CreateGroupCommand),
    /// `groups delete`
    DeleteGroup(DeleteGroupCommand),
    /// `memberships add`
    AddUserToGroup(AddUserToGroupCommand),
    /// `memberships remove`
    RemoveUserFromGroup(RemoveUserFromGroupCommand),
    /// `memberships list`
    GetGroupMembers(GetGroupMembersQuery),
}

impl Cli {
    /// Tenant named on the command line, validated.
    ///
    /// # Errors
    ///
    /// Returns [`TenantErrors::INVALID`] when the value is malformed.
    pub fn tenant(&self) -> AdminResult<Option<TenantId>> {
        self.tenant
            .as_deref()
            .map(|raw| {
                TenantId::new(raw).map_err(|error| TenantErrors::INVALID.with_detail(error.to_string()))
            })
            .transpose()
    }

    /// Build the intent for the parsed command, scoped to the context's tenant.
    ///
    /// # Errors
    ///
    /// Returns [`TenantErrors::NOT_SET`] when no tenant is set and
    /// [`RequestErrors::INVALID`] when an argument fails validation.
    pub fn into_invocation(self, context: &dyn TenantContext) -> AdminResult<Invocation> {
        let tenant = context.tenant()?;
        match self.command {
            Resource::Users(action) => user_invocation(tenant, action),
            Resource::Groups(action) => Ok(group_invocation(tenant, action)),
            Resource::Memberships(action) => membership_invocation(tenant, action),
        }
    }
}

fn user_invocation(tenant: TenantId, action: UserAction) -> AdminResult<Invocation> {
    let invocation = match action {
        UserAction::Create(args) => {
            let password = Password::new(args.password).map_err(invalid)?;
            let user = NewUser::new(
                &args.username,
                password,
                args.email,
                args.first_name,
                args.last_name,
            )
            .map_err(invalid)?
            .with_attributes(args.attributes.into_iter().collect());
            Invocation::CreateUser(CreateUserCommand { tenant, user })
        }
        UserAction::Get {
            username_or_id,
            by_username,
        } => {
            let lookup = if by_username {
                UserLookup::Username(username_or_id)
            } else {
                UserLookup::parse(&username_or_id)
            };
            Invocation::GetUser(GetUserQuery { tenant, lookup })
        }
        UserAction::List { first, max, search } => Invocation::GetUsers(GetUsersQuery {
            tenant,
            filter: UserFilter { first, max, search },
        }),
        UserAction::Update(args) => {
            let update = UserUpdate {
                email: args.email,
                first_name: args.first_name,
                last_name: args.last_name,
                enabled: args.enabled,
                attributes: None,
            };
            if update.is_empty() {
                return Err(RequestErrors::INVALID.with_detail("no fields to update"));
            }
            Invocation::UpdateUser(UpdateUserCommand {
                tenant,
                user_id: UserId::new(&args.id).map_err(invalid)?,
                update,
            })
        }
        UserAction::Delete { id } => Invocation::DeleteUser(DeleteUserCommand {
            tenant,
            user_id: UserId::new(&id).map_err(invalid)?,
        }),
        UserAction::ResetPassword { id, password } => {
            Invocation::ResetPassword(ResetPasswordCommand {
                tenant,
                user_id: UserId::new(&id).map_err(invalid)?,
                password: Password::new(password).map_err(invalid)?,
            })
        }
    };
    Ok(invocation)
}

fn group_invocation(tenant: TenantId, action: GroupAction) -> Invocation {
    match action {
        GroupAction::List => Invocation::GetAllGroups(GetAllGroupsQuery { tenant }),
        GroupAction::Get { id } => Invocation::GetGroup(GetGroupQuery { tenant, id }),
        GroupAction::Create { name, attributes } => {
            let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for (key, value) in attributes {
                grouped.entry(key).or_default().push(value);
            }
            Invocation::CreateGroup(CreateGroupCommand {
                tenant,
                group: NewGroup {
                    name,
                    attributes: grouped,
                },
            })
        }
        GroupAction::Delete { id } => Invocation::DeleteGroup(DeleteGroupCommand { tenant, id }),
    }
}

fn membership_invocation(tenant: TenantId, action: MembershipAction) -> AdminResult<Invocation> {
    let invocation = match action {
        MembershipAction::Add { user, group } => {
            Invocation::AddUserToGroup(AddUserToGroupCommand {
                tenant,
                user_id: UserId::new(&user).map_err(invalid)?,
                group_id: group,
            })
        }
        MembershipAction::Remove { user, group } => {
            Invocation::RemoveUserFromGroup(RemoveUserFromGroupCommand {
                tenant,
                user_id: UserId::new(&user).map_err(invalid)?,
                group_id: group,
            })
        }
        MembershipAction::List { group } => Invocation::GetGroupMembers(GetGroupMembersQuery {
            tenant,
            group_id: group,
        }),
    };
    Ok(invocation)
}

impl Invocation {
    /// Dispatch the intent and render its payload as JSON.
    ///
    /// # Errors
    ///
    /// Returns the handler's error unchanged, or
    /// [`RequestErrors::SERIALIZATION`] when the payload cannot be rendered.
    pub async fn execute(
        self,
        dispatcher: &Dispatcher,
        cancel: &CancellationToken,
    ) -> AdminResult<Value> {
        match self {
            Self::CreateUser(command) => render(dispatcher.dispatch(command, cancel).await),
            Self::GetUser(query) => render(dispatcher.dispatch(query, cancel).await),
            Self::GetUsers(query) => render(dispatcher.dispatch(query, cancel).await),
            Self::UpdateUser(command) => render(dispatcher.dispatch(command, cancel).await),
            Self::DeleteUser(command) => render(dispatcher.dispatch(command, cancel).await),
            Self::ResetPassword(command) => render(dispatcher.dispatch(command, cancel).await),
            Self::GetAllGroups(query) => render(dispatcher.dispatch(query, cancel).await),
            Self::GetGroup(query) => render(dispatcher.dispatch(query, cancel).await),
            Self::CreateGroup(command) => render(dispatcher.dispatch(command, cancel).await),
            Self::DeleteGroup(command) => render(dispatcher.dispatch(command, cancel).await),
            Self::AddUserToGroup(command) => render(dispatcher.dispatch(command, cancel).await),
            Self::RemoveUserFromGroup(command) => {
                render(dispatcher.dispatch(command, cancel).await)
            }
            Self::GetGroupMembers(query) => render(dispatcher.dispatch(query, cancel).await),
        }
    }
}

fn render<T: Serialize>(outcome: AdminResult<T>) -> AdminResult<Value> {
    let payload = outcome?;
    serde_json::to_value(payload)
        .map_err(|error| RequestErrors::SERIALIZATION.with_detail(error.to_string()))
}

fn invalid(error: impl std::error::Error) -> crate::domain::Error {
    RequestErrors::INVALID.with_detail(error.to_string())
}

fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("attribute '{raw}' must be key=value"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("attribute '{raw}' has an empty key"));
    }
    Ok((key.to_owned(), value.trim().to_owned()))
}
