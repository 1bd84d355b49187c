//! Fleet [`Gateway`] implementations: [`Branch`]es, [`Vehicle`]s and
//! [`VehicleType`]s.

use common::{
    operations::{By, Delete, Insert, Select, Update},
    pagination::Page,
};
use reqwest::Method;
use tracerr::Traced;

use crate::{
    domain::{vehicle, vehicle_type, Branch, Vehicle, VehicleType},
    infra::{
        gateway::{self, Http},
        Gateway,
    },
};

impl Gateway<Select<By<Vec<Branch>, ()>>> for Http {
    type Ok = Vec<Branch>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Branch>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::fetch::<Page<Branch>>(self.request(Method::GET, "/fleet/branches"))
            .await
            .map(|p| p.items)
    }
}

impl Gateway<Select<By<Vec<Vehicle>, ()>>> for Http {
    type Ok = Vec<Vehicle>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Vehicle>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::fetch::<Page<Vehicle>>(self.request(Method::GET, "/fleet/vehicles"))
            .await
            .map(|p| p.items)
    }
}

impl Gateway<Select<By<Option<Vehicle>, vehicle::Id>>> for Http {
    type Ok = Option<Vehicle>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Vehicle>, vehicle::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Self::fetch_optional(
            self.request(Method::GET, &format!("/fleet/vehicles/{id}")),
        )
        .await
    }
}

impl Gateway<Insert<vehicle::Draft>> for Http {
    type Ok = Vehicle;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<vehicle::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::fetch(self.request(Method::POST, "/fleet/vehicles").json(&draft))
            .await
    }
}

impl Gateway<Update<vehicle::Edit>> for Http {
    type Ok = Vehicle;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Update(edit): Update<vehicle::Edit>,
    ) -> Result<Self::Ok, Self::Err> {
        let vehicle::Edit { id, draft } = edit;
        Self::fetch(
            self.request(Method::PUT, &format!("/fleet/vehicles/{id}"))
                .json(&draft),
        )
        .await
    }
}

impl Gateway<Delete<By<Vehicle, vehicle::Id>>> for Http {
    type Ok = ();
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vehicle, vehicle::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Self::perform(
            self.request(Method::DELETE, &format!("/fleet/vehicles/{id}")),
        )
        .await
    }
}

impl Gateway<Select<By<Vec<VehicleType>, ()>>> for Http {
    type Ok = Vec<VehicleType>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<VehicleType>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::fetch::<Page<VehicleType>>(
            self.request(Method::GET, "/fleet/vehicle-types"),
        )
        .await
        .map(|p| p.items)
    }
}

impl Gateway<Select<By<Option<VehicleType>, vehicle_type::Id>>> for Http {
    type Ok = Option<VehicleType>;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<VehicleType>, vehicle_type::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Self::fetch_optional(
            self.request(Method::GET, &format!("/fleet/vehicle-types/{id}")),
        )
        .await
    }
}

impl Gateway<Insert<vehicle_type::Draft>> for Http {
    type Ok = VehicleType;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<vehicle_type::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        Self::fetch(
            self.request(Method::POST, "/fleet/vehicle-types").json(&draft),
        )
        .await
    }
}

impl Gateway<Update<vehicle_type::Edit>> for Http {
    type Ok = VehicleType;
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Update(edit): Update<vehicle_type::Edit>,
    ) -> Result<Self::Ok, Self::Err> {
        let vehicle_type::Edit { id, draft } = edit;
        Self::fetch(
            self.request(Method::PUT, &format!("/fleet/vehicle-types/{id}"))
                .json(&draft),
        )
        .await
    }
}

impl Gateway<Delete<By<VehicleType, vehicle_type::Id>>> for Http {
    type Ok = ();
    type Err = Traced<gateway::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<VehicleType, vehicle_type::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Self::perform(
            self.request(Method::DELETE, &format!("/fleet/vehicle-types/{id}")),
        )
        .await
    }
}
