//! [`User`]-related [`Gateway`] implementations.

use common::{
    operations::{By, Insert, Select},
    pagination,
};
use reqwest::Method;
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{
        gateway::{self, Http},
        Gateway,
    },
};

impl Gateway<Select<By<Option<User>, user::Current>>> for Http {
    type Ok = Option<User>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        _: Select<By<Option<User>, user::Current>>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::fetch_optional(self.request(Method::GET, "/user/users/me")).await
    }
}

impl Gateway<Select<By<Option<User>, user::Id>>> for Http {
    type Ok = Option<User>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Self::fetch_optional(
            self.request(Method::GET, &format!("/user/users/{id}")),
        )
        .await
    }
}

impl
    Gateway<
        Select<By<pagination::Page<User>, (user::Role, pagination::Request)>>,
    > for Http
{
    type Ok = pagination::Page<User>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<pagination::Page<User>, (user::Role, pagination::Request)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (role, page) = by.into_inner();
        Self::fetch(
            self.request(Method::GET, &format!("/user/users/role/{role}"))
                .query(&page),
        )
        .await
    }
}

impl Gateway<Select<By<Option<user::Verification>, user::Id>>> for Http {
    type Ok = Option<user::Verification>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<user::Verification>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Self::fetch_optional(self.request(
            Method::GET,
            &format!("/user/users/{id}/verification"),
        ))
        .await
    }
}

impl Gateway<Insert<user::Verify>> for Http {
    type Ok = ();
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Insert(verify): Insert<user::Verify>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::perform(
            self.request(
                Method::POST,
                &format!("/user/users/{}/verify", verify.user_id),
            )
            .json(&verify),
        )
        .await
    }
}
