use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use model::entities::profile::{self, Gender};
use model::entities::user;
use sea_orm::ActiveEnum;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::ValidationErrors;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Nested profile representation exchanged under the `profile` key of the
/// user payload, in both directions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProfileData {
    /// Gender code, one of `M` or `F`
    pub gender: Option<String>,
    /// Contact number; clients may send it as a JSON string or number
    #[serde(default, deserialize_with = "deserialize_phone_number")]
    pub phone_number: Option<String>,
}

impl ProfileData {
    pub fn from_model(model: &profile::Model) -> Self {
        Self {
            gender: model.gender.map(|gender| gender.to_value()),
            phone_number: model.phone_number.clone(),
        }
    }

    /// The parsed gender column value. Non-members come back as `None`;
    /// validation reports them before any write happens.
    pub fn gender_value(&self) -> Option<Gender> {
        self.gender
            .as_ref()
            .and_then(|gender| Gender::try_from_value(gender).ok())
    }
}

fn deserialize_phone_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PhoneNumber {
        Text(String),
        Digits(i64),
    }

    let value = Option::<PhoneNumber>::deserialize(deserializer)?;
    Ok(value.map(|number| match number {
        PhoneNumber::Text(text) => text,
        PhoneNumber::Digits(digits) => digits.to_string(),
    }))
}

/// Outbound user representation: exactly the fields the API exposes.
/// The password hash never leaves the entity layer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub profile: Option<ProfileData>,
    pub date_joined: DateTime<Utc>,
}

impl UserResponse {
    pub fn from_model(user: user::Model, profile: Option<profile::Model>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            profile: profile.as_ref().map(ProfileData::from_model),
            date_joined: user.date_joined,
        }
    }
}

/// Inbound user payload. Every field is optional at the serde layer so a
/// missing required field surfaces as a field-keyed validation error
/// instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UserPayload {
    pub email: Option<String>,
    /// Write-only; hashed before it reaches storage
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile: Option<ProfileData>,
}

/// A creation payload that passed validation.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub profile: Option<ProfileData>,
}

impl UserPayload {
    /// Validate a creation payload. Every field check runs; failures are
    /// aggregated per field rather than short-circuited.
    pub fn validate_create(&self) -> Result<NewUser, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = match self.email.as_deref() {
            None => {
                errors.required("email");
                None
            }
            Some(email) => check_email(email, &mut errors),
        };
        let password = match self.password.as_deref() {
            None => {
                errors.required("password");
                None
            }
            Some(password) => check_password(password, &mut errors),
        };
        if let Some(profile) = &self.profile {
            check_profile(profile, &mut errors);
        }

        match (email, password) {
            (Some(email), Some(password)) if errors.is_empty() => Ok(NewUser {
                email,
                password,
                first_name: self.first_name.clone().unwrap_or_default(),
                last_name: self.last_name.clone().unwrap_or_default(),
                profile: self.profile.clone(),
            }),
            _ => Err(errors),
        }
    }

    /// Validate an update payload: the same constraints, applied only to
    /// the fields that are present. `date_joined` is not part of the
    /// write contract and cannot be touched through it.
    pub fn validate_update(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(email) = self.email.as_deref() {
            let _ = check_email(email, &mut errors);
        }
        if let Some(password) = self.password.as_deref() {
            let _ = check_password(password, &mut errors);
        }
        if let Some(profile) = &self.profile {
            check_profile(profile, &mut errors);
        }

        errors.finish()
    }
}

fn check_email(email: &str, errors: &mut ValidationErrors) -> Option<String> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next();
    let well_formed = !local.is_empty()
        && !email.contains(char::is_whitespace)
        && matches!(domain, Some(d) if !d.is_empty() && !d.starts_with('.') && !d.ends_with('.'));

    if well_formed {
        Some(email.to_string())
    } else {
        errors.add("email", "Enter a valid email address.");
        None
    }
}

fn check_password(password: &str, errors: &mut ValidationErrors) -> Option<String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            "password",
            format!("Ensure this field has at least {MIN_PASSWORD_LENGTH} characters."),
        );
        None
    } else {
        Some(password.to_string())
    }
}

fn check_profile(profile: &ProfileData, errors: &mut ValidationErrors) {
    if let Some(gender) = &profile.gender {
        if Gender::try_from_value(gender).is_err() {
            errors.add(
                "profile.gender",
                format!("\"{gender}\" is not a valid choice."),
            );
        }
    }
}

/// Hash a password for storage. Salted Argon2; the plaintext never
/// reaches an entity.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHash, PasswordVerifier};
    use chrono::TimeZone;

    fn user_model() -> user::Model {
        user::Model {
            id: 1,
            email: "victory@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            first_name: "Victory".to_string(),
            last_name: "Surety".to_string(),
            date_joined: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_user_response_contains_expected_fields() {
        let response = UserResponse::from_model(user_model(), None);
        let data = serde_json::to_value(&response).unwrap();
        let object = data.as_object().unwrap();

        assert_eq!(data["id"], 1);
        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "date_joined",
                "email",
                "first_name",
                "id",
                "last_name",
                "profile"
            ]
        );
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("password_hash"));
    }

    #[test]
    fn test_profile_data_contains_exact_content() {
        let profile = profile::Model {
            id: 7,
            user_id: 1,
            gender: Some(Gender::Female),
            phone_number: Some("23456".to_string()),
        };
        let data = ProfileData::from_model(&profile);
        assert_eq!(data.gender.as_deref(), Some("F"));

        // Nested under the user representation
        let response = UserResponse::from_model(user_model(), Some(profile));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["profile"]["gender"], "F");
        assert_eq!(value["profile"]["phone_number"], "23456");
    }

    #[test]
    fn test_phone_number_accepts_digits_and_text() {
        let from_digits: ProfileData =
            serde_json::from_value(serde_json::json!({"gender": "F", "phone_number": 23456}))
                .unwrap();
        assert_eq!(from_digits.phone_number.as_deref(), Some("23456"));

        let from_text: ProfileData =
            serde_json::from_value(serde_json::json!({"phone_number": "+254700000001"})).unwrap();
        assert_eq!(from_text.phone_number.as_deref(), Some("+254700000001"));
    }

    #[test]
    fn test_missing_required_fields_are_aggregated() {
        let errors = UserPayload::default().validate_create().unwrap_err();
        assert_eq!(errors.fields(), vec!["email", "password"]);
        assert_eq!(errors.messages("email"), &["This field is required."]);
        assert_eq!(errors.messages("password"), &["This field is required."]);
    }

    #[test]
    fn test_invalid_fields_reported_independently() {
        let payload = UserPayload {
            email: Some("not-an-email".to_string()),
            password: Some("short".to_string()),
            profile: Some(ProfileData {
                gender: Some("X".to_string()),
                phone_number: None,
            }),
            ..Default::default()
        };

        let errors = payload.validate_create().unwrap_err();
        assert_eq!(errors.fields(), vec!["email", "password", "profile.gender"]);
        assert_eq!(
            errors.messages("profile.gender"),
            &["\"X\" is not a valid choice."]
        );
    }

    #[test]
    fn test_valid_payload_passes() {
        let payload = UserPayload {
            email: Some("a@x.com".to_string()),
            password: Some("correct horse".to_string()),
            first_name: Some("Victory".to_string()),
            last_name: None,
            profile: Some(ProfileData {
                gender: Some("F".to_string()),
                phone_number: Some("23456".to_string()),
            }),
        };

        let new_user = payload.validate_create().unwrap();
        assert_eq!(new_user.email, "a@x.com");
        assert_eq!(new_user.first_name, "Victory");
        assert_eq!(new_user.last_name, "");
        let profile = new_user.profile.unwrap();
        assert_eq!(profile.gender_value(), Some(Gender::Female));
    }

    #[test]
    fn test_update_validates_only_present_fields() {
        let payload = UserPayload {
            first_name: Some("Surety".to_string()),
            ..Default::default()
        };
        assert!(payload.validate_update().is_ok());

        let payload = UserPayload {
            email: Some("broken at example.com".to_string()),
            ..Default::default()
        };
        let errors = payload.validate_update().unwrap_err();
        assert_eq!(errors.fields(), vec!["email"]);
    }

    #[test]
    fn test_hash_password_round_trips() {
        let hash = hash_password("correct horse battery").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"correct horse battery", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"wrong password", &parsed)
                .is_err()
        );
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same password").unwrap();
        let second = hash_password("same password").unwrap();
        assert_ne!(first, second);
    }
}
