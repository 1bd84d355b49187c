//! [`User`] definitions.

use common::{define_id, define_kind};
use serde::{Deserialize, Serialize};

/// Registered user of the rental platform.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// Email of this [`User`].
    #[serde(default)]
    pub email: Option<String>,

    /// Full name of this [`User`].
    #[serde(default, alias = "name")]
    pub full_name: Option<String>,

    /// Phone number of this [`User`].
    #[serde(default)]
    pub phone: Option<String>,

    /// [`Role`] of this [`User`].
    pub role: Role,

    /// [`VerificationStatus`] of this [`User`]'s identity documents, if
    /// reported along with the profile.
    #[serde(default)]
    pub verification_status: Option<VerificationStatus>,
}

define_id! {
    #[doc = "ID of a [`User`]."]
    Id
}

define_kind! {
    #[doc = "Role of a [`User`]."]
    enum Role {
        #[doc = "Renter of vehicles."]
        Customer = "CUSTOMER",

        #[doc = "Staff member of a branch."]
        Staff = "STAFF",

        #[doc = "Administrator of the platform."]
        Admin = "ADMIN",
    }
}

define_kind! {
    #[doc = "Status of a [`User`]'s identity verification."]
    enum VerificationStatus {
        #[doc = "No documents submitted."]
        Unverified = "UNVERIFIED",

        #[doc = "Documents submitted and awaiting review."]
        Pending = "PENDING",

        #[doc = "Documents approved."]
        Verified = "VERIFIED",

        #[doc = "Documents rejected."]
        Rejected = "REJECTED",
    }
}

/// Identity verification state of a [`User`].
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    /// ID of the verified [`User`].
    pub user_id: Id,

    /// Current [`VerificationStatus`].
    #[serde(alias = "verificationStatus")]
    pub status: VerificationStatus,

    /// Reviewer's note, if any.
    #[serde(default)]
    pub note: Option<String>,
}

/// Review decision on a [`User`]'s identity documents.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verify {
    /// ID of the reviewed [`User`].
    #[serde(skip)]
    pub user_id: Id,

    /// Whether the documents are approved.
    pub approved: bool,

    /// Reviewer's note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Selector of the [`User`] owning the forwarded credentials.
#[derive(Clone, Copy, Debug, Default)]
pub struct Current;

#[cfg(test)]
mod spec {
    use super::{Id, Role, User, Verification, VerificationStatus, Verify};

    #[test]
    fn deserializes_profile() {
        let user: User = serde_json::from_str(
            r#"{
                "id": 42,
                "email": "an@example.com",
                "name": "An Nguyen",
                "role": "staff"
            }"#,
        )
        .unwrap();

        assert_eq!(user.id.as_str(), "42");
        assert_eq!(user.full_name.as_deref(), Some("An Nguyen"));
        assert_eq!(user.role, Role::Staff);
        assert_eq!(user.verification_status, None);
    }

    #[test]
    fn deserializes_verification() {
        let v: Verification = serde_json::from_str(
            r#"{"userId": 42, "verificationStatus": "PENDING"}"#,
        )
        .unwrap();

        assert_eq!(v.status, VerificationStatus::Pending);
        assert_eq!(v.note, None);
    }

    #[test]
    fn serializes_review_without_user_id() {
        let verify = Verify {
            user_id: Id::from("42".to_owned()),
            approved: false,
            note: Some("blurry photo".into()),
        };

        assert_eq!(
            serde_json::to_string(&verify).unwrap(),
            r#"{"approved":false,"note":"blurry photo"}"#,
        );
    }
}
