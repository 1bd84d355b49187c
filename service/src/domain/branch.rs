//! [`Branch`] definitions.

use common::define_id;
use serde::Deserialize;

/// Branch of the rental network where vehicles are picked up and returned.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    /// ID of this [`Branch`].
    pub id: Id,

    /// Name of this [`Branch`].
    #[serde(alias = "branchName")]
    pub name: String,

    /// Street address of this [`Branch`].
    #[serde(default)]
    pub address: Option<String>,

    /// Contact phone of this [`Branch`].
    #[serde(default)]
    pub phone: Option<String>,
}

define_id! {
    #[doc = "ID of a [`Branch`]."]
    Id
}
