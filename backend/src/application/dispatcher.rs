//! Compile-time routing from intents to handlers.
//!
//! The table below is the single registration point. Each row generates a
//! [`Route`] impl, so registering an intent twice is a conflicting-impl
//! compile error and dispatching an unregistered intent does not type-check.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info_span, warn};

use super::commands::{
    AddUserToGroupCommand, CreateGroupCommand, CreateUserCommand, DeleteGroupCommand,
    DeleteUserCommand, RemoveUserFromGroupCommand, ResetPasswordCommand, UpdateUserCommand,
};
use super::handlers::{
    AddUserToGroupHandler, CreateGroupHandler, CreateUserHandler, DeleteGroupHandler,
    DeleteUserHandler, GetAllGroupsHandler, GetGroupHandler, GetGroupMembersHandler,
    GetUserHandler, GetUsersHandler, RemoveUserFromGroupHandler, ResetPasswordHandler,
    UpdateUserHandler,
};
use super::queries::{
    GetAllGroupsQuery, GetGroupMembersQuery, GetGroupQuery, GetUserQuery, GetUsersQuery,
};
use super::request::{Handler, Request};
use crate::domain::AdminResult;
use crate::domain::ports::{GroupRepository, GroupUsersRepository, TokenRepository, UserRepository};

/// Resolves the handler registered for intent `R`.
pub trait Route<R: Request> {
    /// The single handler for `R`.
    fn handler(&self) -> &dyn Handler<R>;
}

macro_rules! dispatch_table {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $($field:ident: $intent:ty => $handler:ty,)*
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            $($field: $handler,)*
        }

        $(
            impl Route<$intent> for $name {
                fn handler(&self) -> &dyn Handler<$intent> {
                    &self.$field
                }
            }
        )*
    };
}

dispatch_table! {
    /// Routes every intent to exactly one handler.
    pub struct Dispatcher {
        create_user: CreateUserCommand => CreateUserHandler,
        update_user: UpdateUserCommand => UpdateUserHandler,
        delete_user: DeleteUserCommand => DeleteUserHandler,
        reset_password: ResetPasswordCommand => ResetPasswordHandler,
        get_user: GetUserQuery => GetUserHandler,
        get_users: GetUsersQuery => GetUsersHandler,
        create_group: CreateGroupCommand => CreateGroupHandler,
        delete_group: DeleteGroupCommand => DeleteGroupHandler,
        get_all_groups: GetAllGroupsQuery => GetAllGroupsHandler,
        get_group: GetGroupQuery => GetGroupHandler,
        add_user_to_group: AddUserToGroupCommand => AddUserToGroupHandler,
        remove_user_from_group: RemoveUserFromGroupCommand => RemoveUserFromGroupHandler,
        get_group_members: GetGroupMembersQuery => GetGroupMembersHandler,
    }
}

/// Driven ports the handlers are built over.
#[derive(Clone)]
pub struct RepositoryPorts {
    /// User operations.
    pub users: Arc<dyn UserRepository>,
    /// Group operations.
    pub groups: Arc<dyn GroupRepository>,
    /// Membership operations.
    pub group_users: Arc<dyn GroupUsersRepository>,
    /// Token acquisition.
    pub tokens: Arc<dyn TokenRepository>,
}

impl Dispatcher {
    /// Build every handler over the supplied ports.
    pub fn new(ports: RepositoryPorts) -> Self {
        let RepositoryPorts {
            users,
            groups,
            group_users,
            tokens,
        } = ports;
        Self {
            create_user: CreateUserHandler::new(tokens, Arc::clone(&users)),
            update_user: UpdateUserHandler::new(Arc::clone(&users)),
            delete_user: DeleteUserHandler::new(Arc::clone(&users)),
            reset_password: ResetPasswordHandler::new(Arc::clone(&users)),
            get_user: GetUserHandler::new(Arc::clone(&users)),
            get_users: GetUsersHandler::new(users),
            create_group: CreateGroupHandler::new(Arc::clone(&groups)),
            delete_group: DeleteGroupHandler::new(Arc::clone(&groups)),
            get_all_groups: GetAllGroupsHandler::new(Arc::clone(&groups)),
            get_group: GetGroupHandler::new(groups),
            add_user_to_group: AddUserToGroupHandler::new(Arc::clone(&group_users)),
            remove_user_from_group: RemoveUserFromGroupHandler::new(Arc::clone(&group_users)),
            get_group_members: GetGroupMembersHandler::new(group_users),
        }
    }

    /// Route `request` to its handler and return the handler's outcome.
    ///
    /// The cancellation token reaches the handler untouched.
    pub async fn dispatch<R>(&self, request: R, cancel: &CancellationToken) -> AdminResult<R::Response>
    where
        R: Request,
        Self: Route<R>,
    {
        let span = info_span!("dispatch", intent = R::NAME, tenant = %request.tenant());
        let outcome = <Self as Route<R>>::handler(self)
            .handle(request, cancel)
            .instrument(span)
            .await;
        if let Err(error) = &outcome {
            warn!(intent = R::NAME, code = error.code(), "request failed");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;
    use crate::domain::ports::{
        MockGroupRepository, MockGroupUsersRepository, MockTokenRepository, MockUserRepository,
    };
    use crate::domain::{
        Group, GroupErrors, Outcome, RequestErrors, TenantId, User, UserErrors, UserId,
        UserLookup,
    };

    struct Mocks {
        users: MockUserRepository,
        groups: MockGroupRepository,
        group_users: MockGroupUsersRepository,
        tokens: MockTokenRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                users: MockUserRepository::new(),
                groups: MockGroupRepository::new(),
                group_users: MockGroupUsersRepository::new(),
                tokens: MockTokenRepository::new(),
            }
        }

        fn into_dispatcher(self) -> Dispatcher {
            Dispatcher::new(RepositoryPorts {
                users: Arc::new(self.users),
                groups: Arc::new(self.groups),
                group_users: Arc::new(self.group_users),
                tokens: Arc::new(self.tokens),
            })
        }
    }

    #[fixture]
    fn tenant() -> TenantId {
        TenantId::new("acme").expect("valid tenant")
    }

    fn staff() -> Group {
        Group {
            id: Uuid::from_u128(7),
            name: "staff".to_owned(),
            path: "/staff".to_owned(),
            attributes: BTreeMap::new(),
            sub_groups: Vec::new(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn routes_each_intent_to_its_own_port(tenant: TenantId) {
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_get()
            .times(1)
            .returning(|_, _, _| {
                Ok(User {
                    id: Some(UserId::random()),
                    username: "ada".to_owned(),
                    ..User::default()
                })
            });
        mocks
            .group_users
            .expect_get_members()
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));
        mocks.groups.expect_get_all().times(0);
        let dispatcher = mocks.into_dispatcher();
        let cancel = CancellationToken::new();

        let user = dispatcher
            .dispatch(
                GetUserQuery {
                    tenant: tenant.clone(),
                    lookup: UserLookup::Username("ada".to_owned()),
                },
                &cancel,
            )
            .await;
        let members = dispatcher
            .dispatch(
                GetGroupMembersQuery {
                    tenant,
                    group_id: Uuid::new_v4(),
                },
                &cancel,
            )
            .await;

        assert_eq!(user.response().username, "ada");
        assert!(members.response().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn passes_cancellation_through_to_the_port(tenant: TenantId) {
        let mut mocks = Mocks::new();
        mocks
            .groups
            .expect_delete()
            .withf(|_, _, cancel| cancel.is_cancelled())
            .times(1)
            .returning(|_, _, _| Err(RequestErrors::CANCELLED.error()));
        let dispatcher = mocks.into_dispatcher();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = dispatcher
            .dispatch(
                DeleteGroupCommand {
                    tenant,
                    id: Uuid::new_v4(),
                },
                &cancel,
            )
            .await;

        assert!(RequestErrors::CANCELLED.matches(outcome.error()));
    }

    #[rstest]
    #[tokio::test]
    async fn repeated_group_listing_returns_equal_payloads(tenant: TenantId) {
        let mut mocks = Mocks::new();
        mocks
            .groups
            .expect_get_all()
            .times(2)
            .returning(|_, _| Ok(vec![staff()]));
        let dispatcher = mocks.into_dispatcher();
        let cancel = CancellationToken::new();
        let query = GetAllGroupsQuery { tenant };

        let first = dispatcher.dispatch(query.clone(), &cancel).await;
        let second = dispatcher.dispatch(query, &cancel).await;

        assert_eq!(first.into_response(), second.into_response());
    }

    #[rstest]
    #[tokio::test]
    async fn returns_handler_failure_unchanged(tenant: TenantId) {
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_update()
            .times(1)
            .returning(|_, _, _, _| Err(UserErrors::UPDATE.with_detail("status 409")));
        mocks
            .groups
            .expect_get_by_id()
            .times(1)
            .returning(|_, _, _| Err(GroupErrors::NOT_FOUND.error()));
        let dispatcher = mocks.into_dispatcher();
        let cancel = CancellationToken::new();

        let update = dispatcher
            .dispatch(
                UpdateUserCommand {
                    tenant: tenant.clone(),
                    user_id: UserId::random(),
                    update: crate::domain::UserUpdate::default(),
                },
                &cancel,
            )
            .await;
        let group = dispatcher
            .dispatch(
                GetGroupQuery {
                    tenant,
                    id: Uuid::new_v4(),
                },
                &cancel,
            )
            .await;

        assert_eq!(update.into_error(), UserErrors::UPDATE.with_detail("status 409"));
        assert!(GroupErrors::NOT_FOUND.matches(group.error()));
    }
}
