//! Registration Wizard
//!
//! Three steps: account (username, email), password (with live checklist)
//! and profile (role, age, institution, privacy policy). The current step is
//! mirrored in `?step=`; a URL pointing past an invalid step lands on the
//! first step that still needs input.

use crate::api::dto::RegisterRequest;
use crate::models::UserType;
use crate::navigation::Location;
use crate::validation::{
    is_strong_password, is_valid_email, is_valid_username, password_checklist, FormErrors,
    PasswordRule,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    #[default]
    Account,
    Password,
    Profile,
}

impl Step {
    pub const QUERY_KEY: &'static str = "step";

    pub fn number(&self) -> u8 {
        match self {
            Step::Account => 1,
            Step::Password => 2,
            Step::Profile => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Step::Account),
            2 => Some(Step::Password),
            3 => Some(Step::Profile),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::Account => "Account",
            Step::Password => "Password",
            Step::Profile => "Profile",
        }
    }

    fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    fn previous(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationWizard {
    step: Step,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub user_type: UserType,
    pub age: Option<u32>,
    pub institution: String,
    pub privacy_policy_accepted: bool,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self {
            step: Step::Account,
            username: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            user_type: UserType::Student,
            age: None,
            institution: String::new(),
            privacy_policy_accepted: false,
        }
    }
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn is_last_step(&self) -> bool {
        self.step == Step::Profile
    }

    /// Live password checklist for step 2
    pub fn checklist(&self) -> Vec<(PasswordRule, bool)> {
        password_checklist(&self.password)
    }

    /// Errors of a single step
    pub fn validate_step(&self, step: Step) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();

        match step {
            Step::Account => {
                if self.username.trim().is_empty() {
                    errors.add("username", "Username is required");
                } else if !is_valid_username(self.username.trim()) {
                    errors.add(
                        "username",
                        "Username must be 4-50 characters of letters, numbers or underscore",
                    );
                }
                if self.email.trim().is_empty() {
                    errors.add("email", "Email is required");
                } else if !is_valid_email(self.email.trim()) {
                    errors.add("email", "Invalid email");
                }
            }
            Step::Password => {
                if self.password.is_empty() {
                    errors.add("password", "Password is required");
                } else if !is_strong_password(&self.password) {
                    errors.add("password", "Password does not meet the requirements");
                }
                if self.confirm_password != self.password {
                    errors.add("confirm_password", "Passwords do not match");
                }
            }
            Step::Profile => {
                if !matches!(self.user_type, UserType::Student | UserType::Professor) {
                    errors.add("user_type", "Choose student or professor");
                }
                match self.age {
                    None => errors.add("age", "Age is required"),
                    Some(age) if !(1..=120).contains(&age) => {
                        errors.add("age", "Age must be between 1 and 120")
                    }
                    Some(_) => {}
                }
                errors.require("institution", &self.institution, "Institution is required");
                if !errors.has("institution") {
                    errors.length("institution", &self.institution, 2, 100);
                }
                if !self.privacy_policy_accepted {
                    errors.add("privacy_policy_accepted", "You must accept the privacy policy");
                }
            }
        }

        errors.into_result(())
    }

    /// First step, up to and including `target`, that does not validate
    fn first_invalid(&self, target: Step) -> Option<Step> {
        [Step::Account, Step::Password, Step::Profile]
            .into_iter()
            .filter(|s| *s <= target)
            .find(|s| self.validate_step(*s).is_err())
    }

    /// Advance when the current step validates
    pub fn next(&mut self) -> Result<Step, FormErrors> {
        self.validate_step(self.step)?;
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    pub fn back(&mut self) -> Step {
        if let Some(prev) = self.step.previous() {
            self.step = prev;
        }
        self.step
    }

    /// Jump to `target`, stopping at the first earlier step still invalid
    pub fn go_to(&mut self, target: Step) -> Step {
        self.step = match self.first_invalid(target) {
            Some(blocked) if blocked < target => blocked,
            _ => target,
        };
        self.step
    }

    /// Follow `?step=` from the URL
    pub fn sync_from(&mut self, location: &Location) -> Step {
        let requested = location
            .param(Step::QUERY_KEY)
            .and_then(|v| v.parse::<u8>().ok())
            .and_then(Step::from_number)
            .unwrap_or_default();
        self.go_to(requested)
    }

    /// URL reflecting the current step
    pub fn location(&self, current: &Location) -> String {
        current
            .clone()
            .with_param(Step::QUERY_KEY, self.step.number().to_string())
            .to_string()
    }

    /// Validate every step into a request body. On failure the wizard moves
    /// to the first invalid step.
    pub fn submit(&mut self) -> Result<RegisterRequest, FormErrors> {
        if let Some(step) = self.first_invalid(Step::Profile) {
            self.step = step;
            return Err(self.validate_step(step).err().unwrap_or_default());
        }

        Ok(RegisterRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            user_type: self.user_type,
            age: self.age,
            institution: Some(self.institution.trim().to_string()),
            privacy_policy_accepted: self.privacy_policy_accepted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> RegistrationWizard {
        RegistrationWizard {
            username: "dino_fan".into(),
            email: "fan@dino.io".into(),
            password: "Rex#2024".into(),
            confirm_password: "Rex#2024".into(),
            user_type: UserType::Professor,
            age: Some(35),
            institution: "UFRJ".into(),
            privacy_policy_accepted: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_next_requires_valid_step() {
        let mut wizard = RegistrationWizard::new();
        wizard.username = "abc".into();
        wizard.email = "abc@x.io".into();

        let errors = wizard.next().unwrap_err();
        assert!(errors.has("username"));
        assert_eq!(wizard.step(), Step::Account);

        wizard.username = "abcd".into();
        assert_eq!(wizard.next().unwrap(), Step::Password);
        assert_eq!(wizard.back(), Step::Account);
        assert_eq!(wizard.back(), Step::Account);
    }

    #[test]
    fn test_password_step() {
        let mut wizard = complete();
        wizard.go_to(Step::Password);
        wizard.confirm_password = "other".into();
        assert!(wizard.next().unwrap_err().has("confirm_password"));

        wizard.password = "weak".into();
        wizard.confirm_password = "weak".into();
        assert!(wizard.next().unwrap_err().has("password"));
        assert!(wizard.checklist().iter().any(|(_, ok)| !ok));
    }

    #[test]
    fn test_url_cannot_skip_ahead() {
        let mut wizard = RegistrationWizard::new();
        let loc = Location::parse("/register?step=3");
        assert_eq!(wizard.sync_from(&loc), Step::Account);

        let mut wizard = complete();
        wizard.password.clear();
        assert_eq!(wizard.sync_from(&loc), Step::Password);

        let mut wizard = complete();
        wizard.institution.clear();
        // An invalid target step itself is fine to land on
        assert_eq!(wizard.sync_from(&loc), Step::Profile);

        assert_eq!(
            wizard.sync_from(&Location::parse("/register?step=banana")),
            Step::Account
        );
    }

    #[test]
    fn test_location_reflects_step() {
        let mut wizard = complete();
        wizard.go_to(Step::Profile);
        assert_eq!(
            wizard.location(&Location::parse("/register?step=1")),
            "/register?step=3"
        );
    }

    #[test]
    fn test_submit() {
        let mut wizard = complete();
        let req = wizard.submit().unwrap();
        assert_eq!(req.user_type, UserType::Professor);
        assert_eq!(req.institution.as_deref(), Some("UFRJ"));

        wizard.privacy_policy_accepted = false;
        wizard.age = Some(0);
        let errors = wizard.submit().unwrap_err();
        assert!(errors.has("privacy_policy_accepted"));
        assert!(errors.has("age"));
        assert_eq!(wizard.step(), Step::Profile);

        let mut wizard = complete();
        wizard.email = "bad".into();
        wizard.go_to(Step::Profile);
        assert!(wizard.submit().unwrap_err().has("email"));
        assert_eq!(wizard.step(), Step::Account);
    }
}
