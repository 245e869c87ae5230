//! Field rules of the login form.
//!
//! | field      | rules                      |
//! |------------|----------------------------|
//! | `username` | required, at least 3 chars |
//! | `password` | required, at least 6 chars |
//!
//! Lengths count characters of the raw value; nothing is trimmed. The
//! min-length rule is skipped for an empty value, which only reports
//! [`FieldError::Required`].
//!
//! Counting `char`s differs from browser `minlength`, which counts UTF-16
//! code units: a two-emoji username is 4 units long but only 2 chars here.

use crate::LoginInput;

pub const USERNAME_MIN_LEN: usize = 3;
pub const PASSWORD_MIN_LEN: usize = 6;

/// The text fields of the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Username,
    Password,
}

impl Field {
    pub const ALL: [Self; 2] = [Self::Username, Self::Password];

    pub fn name(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Password => "password",
        }
    }

    /// Capitalised name used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Password => "Password",
        }
    }

    fn min_len(self) -> usize {
        match self {
            Self::Username => USERNAME_MIN_LEN,
            Self::Password => PASSWORD_MIN_LEN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    MinLength { required: usize },
}

impl FieldError {
    pub fn message(self, field: Field) -> String {
        match self {
            Self::Required => format!("{} is required", field.label()),
            Self::MinLength { required } => {
                format!("{} must be at least {required} characters", field.label())
            }
        }
    }
}

pub fn validate_field(field: Field, value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return Some(FieldError::Required);
    }
    let required = field.min_len();
    (value.chars().count() < required).then_some(FieldError::MinLength { required })
}

pub fn validate(input: &LoginInput) -> LoginValidation {
    LoginValidation::of(input)
}

/// Per-field errors of a [`LoginInput`].
///
/// Cheap to build, so callers derive it from the input they are looking at
/// instead of caching it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginValidation {
    pub username: Option<FieldError>,
    pub password: Option<FieldError>,
}

impl LoginValidation {
    pub fn of(input: &LoginInput) -> Self {
        Self {
            username: validate_field(Field::Username, &input.username),
            password: validate_field(Field::Password, &input.password),
        }
    }

    pub fn error(&self, field: Field) -> Option<FieldError> {
        match field {
            Field::Username => self.username,
            Field::Password => self.password,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }

    /// Message for `field`, empty when the field is valid.
    pub fn field_error_message(&self, field: Field) -> String {
        self.error(field)
            .map(|err| err.message(field))
            .unwrap_or_default()
    }

    /// An error is only shown once the user edited or left the field.
    pub fn is_field_invalid(&self, input: &LoginInput, field: Field) -> bool {
        let marks = input.marks(field);
        self.error(field).is_some() && (marks.dirty || marks.touched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(username: &str, password: &str) -> LoginInput {
        LoginInput {
            username: username.to_owned(),
            password: password.to_owned(),
            ..LoginInput::default()
        }
    }

    #[test]
    fn empty_fields_are_required_only() {
        assert_eq!(
            validate_field(Field::Username, ""),
            Some(FieldError::Required)
        );
        assert_eq!(
            validate_field(Field::Password, ""),
            Some(FieldError::Required)
        );
    }

    #[test]
    fn min_length_boundaries() {
        assert_eq!(
            validate_field(Field::Username, "ab"),
            Some(FieldError::MinLength { required: 3 })
        );
        assert_eq!(validate_field(Field::Username, "abc"), None);
        assert_eq!(
            validate_field(Field::Password, "12345"),
            Some(FieldError::MinLength { required: 6 })
        );
        assert_eq!(validate_field(Field::Password, "123456"), None);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert_eq!(validate_field(Field::Username, "żółw"), None);
        assert_eq!(
            validate_field(Field::Username, "żó"),
            Some(FieldError::MinLength { required: 3 })
        );
    }

    #[test]
    fn emoji_count_as_one_character_each() {
        assert_eq!(
            validate_field(Field::Username, "😀😀"),
            Some(FieldError::MinLength { required: 3 })
        );
        assert_eq!(validate_field(Field::Username, "😀😀😀"), None);
    }

    #[test]
    fn whitespace_is_not_trimmed() {
        assert_eq!(validate_field(Field::Username, "   "), None);
    }

    #[test]
    fn messages_use_capitalised_field_name() {
        assert_eq!(
            FieldError::Required.message(Field::Username),
            "Username is required"
        );
        assert_eq!(
            FieldError::MinLength { required: 6 }.message(Field::Password),
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn validation_of_whole_form() {
        assert!(validate(&input("bob", "secret")).is_valid());

        let validation = LoginValidation::of(&input("bo", ""));
        assert!(!validation.is_valid());
        assert_eq!(
            validation.field_error_message(Field::Username),
            "Username must be at least 3 characters"
        );
        assert_eq!(
            validation.field_error_message(Field::Password),
            "Password is required"
        );
    }

    #[test]
    fn valid_field_has_empty_message() {
        let validation = LoginValidation::of(&input("bob", ""));
        assert_eq!(validation.field_error_message(Field::Username), "");
    }

    #[test]
    fn errors_hidden_until_dirty_or_touched() {
        let mut form = input("", "");
        let validation = LoginValidation::of(&form);
        assert!(!validation.is_field_invalid(&form, Field::Username));

        form.mark_touched(Field::Username);
        assert!(validation.is_field_invalid(&form, Field::Username));
        assert!(!validation.is_field_invalid(&form, Field::Password));

        form.set_value(Field::Password, "abc".to_owned());
        let validation = LoginValidation::of(&form);
        assert!(validation.is_field_invalid(&form, Field::Password));
    }
}
