//! Form State
//!
//! Presentation-free state of every form in the app. Each form validates
//! itself into the request body it submits, or into [`FormErrors`] keyed by
//! field name.

use crate::api::dto::{
    ActivityInput, ChangePasswordRequest, ClassInput, FeedbackRequest, LoginRequest, NoteInput,
};
use crate::models::{ActivityKind, AnswerOption, Class, Note, NoteKind, Question, User, UserPatch};
use crate::validation::{is_valid_email, normalize_username, word_count, FormErrors, PASSWORD_MIN};

/// Soft word limit shown under note editors
pub const NOTE_WORD_LIMIT: usize = 500;

/// Minimum number of questions an activity must have
pub const MIN_QUESTIONS: usize = 5;

/// Minutes pre-filled in a new activity
pub const DEFAULT_TIME_LIMIT_MINUTES: u32 = 30;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, FormErrors> {
        let mut errors = FormErrors::new();
        let email = self.email.trim();

        if email.is_empty() {
            errors.add("email", "Email is required");
        } else if !is_valid_email(email) {
            errors.add("email", "Invalid email");
        }
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }

        errors.into_result(LoginRequest {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

/// Settings > Profile
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub age: u32,
    pub institution: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.username.clone(),
            email: user.email.clone(),
            age: user.age.unwrap_or(0),
            institution: user.institution.clone().unwrap_or_default(),
        }
    }

    /// Name input handler: whitespace becomes `_`
    pub fn set_name(&mut self, raw: &str) {
        self.name = normalize_username(raw);
    }

    pub fn validate(&self) -> Result<UserPatch, FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("name", &self.name, "Name is required");
        errors.require("email", &self.email, "Email is required");
        errors.require("institution", &self.institution, "Institution is required");
        if !errors.has("email") && !is_valid_email(self.email.trim()) {
            errors.add("email", "Invalid email");
        }
        if !(1..=120).contains(&self.age) {
            errors.add("age", "Age must be between 1 and 120");
        }

        errors.into_result(UserPatch {
            username: Some(normalize_username(&self.name)),
            email: Some(self.email.trim().to_string()),
            age: Some(self.age),
            institution: Some(self.institution.trim().to_string()),
            user_type: None,
        })
    }
}

/// Settings > Security
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PasswordChangeForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChangeForm {
    pub fn validate(&self) -> Result<ChangePasswordRequest, FormErrors> {
        let mut errors = FormErrors::new();
        for (field, value) in [
            ("current_password", &self.current_password),
            ("new_password", &self.new_password),
            ("confirm_password", &self.confirm_password),
        ] {
            errors.require(field, value, "All password fields are required");
        }

        if errors.is_empty() {
            if self.new_password != self.confirm_password {
                errors.add("confirm_password", "Passwords do not match");
            } else if self.new_password.chars().count() < PASSWORD_MIN {
                errors.add("new_password", "New password must be at least 6 characters");
            }
        }

        errors.into_result(ChangePasswordRequest {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
            confirm_password: self.confirm_password.clone(),
        })
    }
}

/// Settings > Feedback
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl FeedbackForm {
    /// Form pre-filled with the signed-in user's name and email
    pub fn for_user(user: Option<&User>) -> Self {
        Self {
            name: user.map(|u| u.username.clone()).unwrap_or_default(),
            email: user.map(|u| u.email.clone()).unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.message)
    }

    /// Whether the submit button is enabled
    pub fn can_submit(&self) -> bool {
        [&self.name, &self.email, &self.subject, &self.message]
            .iter()
            .all(|v| !v.trim().is_empty())
    }

    pub fn validate(&self) -> Result<FeedbackRequest, FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("name", &self.name, "Name is required");
        errors.require("email", &self.email, "Email is required");
        errors.require("subject", &self.subject, "Subject is required");
        errors.require("message", &self.message, "Message is required");

        errors.into_result(FeedbackRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.clone(),
        })
    }
}

/// Create/edit note modal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
    pub content_type: NoteKind,
    pub class_id: Option<i64>,
    pub content_id: Option<i64>,
}

impl NoteForm {
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            content_type: note.content_type,
            class_id: note.class_id,
            content_id: note.content_id,
        }
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.content)
    }

    pub fn over_word_limit(&self) -> bool {
        self.word_count() > NOTE_WORD_LIMIT
    }

    /// `"12 / 500 words"`
    pub fn word_count_label(&self) -> String {
        format!("{} / {} words", self.word_count(), NOTE_WORD_LIMIT)
    }

    pub fn validate(&self) -> Result<NoteInput, FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("title", &self.title, "Title and content are required");
        errors.require("content", &self.content, "Title and content are required");

        errors.into_result(NoteInput {
            title: self.title.trim().to_string(),
            content: self.content.clone(),
            content_type: self.content_type,
            class_id: self.class_id,
            content_id: self.content_id,
        })
    }
}

/// Create/edit class modal
#[derive(Debug, Clone, PartialEq)]
pub struct ClassForm {
    pub name: String,
    pub description: String,
    pub max_students: u32,
}

impl Default for ClassForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            max_students: 50,
        }
    }
}

impl ClassForm {
    pub fn from_class(class: &Class) -> Self {
        Self {
            name: class.name.clone(),
            description: class.description.clone(),
            max_students: class.max_students.unwrap_or(50),
        }
    }

    pub fn validate(&self) -> Result<ClassInput, FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("name", &self.name, "Class name is required");
        if !errors.has("name") {
            errors.length("name", &self.name, 3, 100);
        }
        errors.require("description", &self.description, "Description is required");
        if !errors.has("description") {
            errors.length("description", &self.description, 10, 500);
        }
        if !(1..=100).contains(&self.max_students) {
            errors.add("max_students", "Between 1 and 100 students");
        }

        errors.into_result(ClassInput {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            max_students: Some(self.max_students),
        })
    }
}

/// Join-class modal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinClassForm {
    pub code: String,
}

impl JoinClassForm {
    pub fn validate(&self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("code", &self.code, "Class code is required");
        if !errors.has("code") {
            errors.length("code", &self.code, 3, 20);
        }
        errors.into_result(self.code.trim().to_string())
    }
}

/// Editable field of a [`Question`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionField {
    Text,
    OptionA,
    OptionB,
    OptionC,
    OptionD,
}

/// Create-activity modal
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityDraft {
    pub title: String,
    pub description: String,
    pub kind: ActivityKind,
    /// Minutes, as typed
    pub time_limit_minutes: u32,
    pub due_date: String,
    questions: Vec<Question>,
}

impl Default for ActivityDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            kind: ActivityKind::Quiz,
            time_limit_minutes: DEFAULT_TIME_LIMIT_MINUTES,
            due_date: String::new(),
            questions: vec![Question::blank(ActivityKind::Quiz)],
        }
    }
}

impl ActivityDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn add_question(&mut self) {
        self.questions.push(Question::blank(self.kind));
    }

    /// Remove a question; the last one cannot be removed
    pub fn remove_question(&mut self, index: usize) -> bool {
        if self.questions.len() <= 1 || index >= self.questions.len() {
            return false;
        }
        self.questions.remove(index);
        true
    }

    pub fn update_question(
        &mut self,
        index: usize,
        field: QuestionField,
        value: impl Into<String>,
    ) {
        if let Some(q) = self.questions.get_mut(index) {
            let value = value.into();
            match field {
                QuestionField::Text => q.question_text = value,
                QuestionField::OptionA => q.option_a = value,
                QuestionField::OptionB => q.option_b = value,
                QuestionField::OptionC => q.option_c = value,
                QuestionField::OptionD => q.option_d = value,
            }
        }
    }

    /// Set the correct answer; ignored for polls
    pub fn set_answer(&mut self, index: usize, answer: AnswerOption) {
        if !self.kind.is_graded() {
            return;
        }
        if let Some(q) = self.questions.get_mut(index) {
            q.correct_answer = Some(answer);
        }
    }

    /// Switch kind; polls drop correct answers, graded kinds default them to `a`
    pub fn set_kind(&mut self, kind: ActivityKind) {
        self.kind = kind;
        for q in &mut self.questions {
            q.correct_answer = if kind.is_graded() {
                Some(q.correct_answer.unwrap_or(AnswerOption::A))
            } else {
                None
            };
        }
    }

    /// Validate into a request body for `class_id`
    pub fn validate(&self, class_id: i64) -> Result<ActivityInput, FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("title", &self.title, "Fill in the activity title and description");
        errors.require(
            "description",
            &self.description,
            "Fill in the activity title and description",
        );

        if self.questions.len() < MIN_QUESTIONS {
            errors.add(
                "questions",
                format!("The activity must have at least {} questions", MIN_QUESTIONS),
            );
        } else {
            for (i, q) in self.questions.iter().enumerate() {
                let incomplete = [
                    &q.question_text,
                    &q.option_a,
                    &q.option_b,
                    &q.option_c,
                    &q.option_d,
                ]
                .iter()
                .any(|v| v.trim().is_empty());
                if incomplete {
                    errors.add("questions", format!("Question {} is incomplete", i + 1));
                    break;
                }
                if self.kind.is_graded() && q.correct_answer.is_none() {
                    errors.add("questions", format!("Question {} needs a correct answer", i + 1));
                    break;
                }
            }
        }

        let graded = self.kind.is_graded();
        let questions = self
            .questions
            .iter()
            .cloned()
            .map(|mut q| {
                if !graded {
                    q.correct_answer = None;
                }
                q
            })
            .collect();

        errors.into_result(ActivityInput {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            kind: self.kind,
            due_date: Some(self.due_date.trim().to_string()).filter(|d| !d.is_empty()),
            time_limit: Some(self.time_limit_minutes * 60),
            class_id: Some(class_id),
            questions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserType;

    fn filled(draft: &mut ActivityDraft, count: usize) {
        while draft.questions().len() < count {
            draft.add_question();
        }
        for i in 0..count {
            draft.update_question(i, QuestionField::Text, format!("Q{}", i + 1));
            draft.update_question(i, QuestionField::OptionA, "a");
            draft.update_question(i, QuestionField::OptionB, "b");
            draft.update_question(i, QuestionField::OptionC, "c");
            draft.update_question(i, QuestionField::OptionD, "d");
        }
    }

    #[test]
    fn test_login_form() {
        let form = LoginForm {
            email: "nope".into(),
            password: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Invalid email"));
        assert_eq!(errors.get("password"), Some("Password is required"));

        let ok = LoginForm {
            email: " ana@x.io ".into(),
            password: "pw".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.email, "ana@x.io");
    }

    #[test]
    fn test_profile_form() {
        let user = User {
            id: 1,
            username: "ana".into(),
            email: "ana@x.io".into(),
            user_type: UserType::Student,
            age: None,
            institution: None,
            created_at: None,
        };
        let mut form = ProfileForm::from_user(&user);
        form.set_name("Ana  Maria");
        assert_eq!(form.name, "Ana_Maria");

        let errors = form.validate().unwrap_err();
        assert!(errors.has("institution"));
        assert!(errors.has("age"));

        form.institution = "UFPE".into();
        form.age = 121;
        assert!(form.validate().is_err());
        form.age = 30;
        let patch = form.validate().unwrap();
        assert_eq!(patch.username.as_deref(), Some("Ana_Maria"));
        assert_eq!(patch.age, Some(30));
    }

    #[test]
    fn test_password_change_form() {
        let mut form = PasswordChangeForm {
            current_password: "old".into(),
            new_password: "abc".into(),
            confirm_password: "abd".into(),
        };
        assert_eq!(
            form.validate().unwrap_err().get("confirm_password"),
            Some("Passwords do not match")
        );

        form.confirm_password = "abc".into();
        assert!(form.validate().unwrap_err().has("new_password"));

        form.new_password = "abcdef".into();
        form.confirm_password = "abcdef".into();
        assert!(form.validate().is_ok());

        assert_eq!(PasswordChangeForm::default().validate().unwrap_err().len(), 3);
    }

    #[test]
    fn test_feedback_form() {
        let mut form = FeedbackForm::for_user(None);
        assert!(!form.can_submit());
        form.name = "Ana".into();
        form.email = "ana@x.io".into();
        form.subject = "Bug".into();
        form.message = "it broke twice".into();
        assert!(form.can_submit());
        assert_eq!(form.word_count(), 3);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_note_form_word_limit() {
        let mut form = NoteForm {
            title: "T".into(),
            content: "word ".repeat(500),
            ..Default::default()
        };
        assert!(!form.over_word_limit());
        assert_eq!(form.word_count_label(), "500 / 500 words");
        form.content.push_str("extra");
        assert!(form.over_word_limit());
        // Limit is advisory
        assert!(form.validate().is_ok());

        form.title = " ".into();
        assert!(form.validate().unwrap_err().has("title"));
    }

    #[test]
    fn test_class_and_join_forms() {
        let form = ClassForm {
            name: "Bi".into(),
            description: "short".into(),
            max_students: 0,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 3);

        let form = ClassForm {
            name: "Biologia".into(),
            description: "Turma da manhã de biologia".into(),
            max_students: 40,
        };
        assert_eq!(form.validate().unwrap().max_students, Some(40));

        assert!(JoinClassForm { code: "".into() }.validate().is_err());
        assert_eq!(JoinClassForm { code: " AB12CD ".into() }.validate().unwrap(), "AB12CD");
    }

    #[test]
    fn test_activity_needs_five_questions() {
        let mut draft = ActivityDraft::new();
        draft.title = "Quiz 1".into();
        draft.description = "Cells".into();
        filled(&mut draft, 4);

        let errors = draft.validate(3).unwrap_err();
        assert_eq!(errors.get("questions"), Some("The activity must have at least 5 questions"));

        filled(&mut draft, 5);
        let input = draft.validate(3).unwrap();
        assert_eq!(input.questions.len(), 5);
        assert_eq!(input.time_limit, Some(1800));
        assert_eq!(input.class_id, Some(3));
        assert!(input.due_date.is_none());
        assert!(input.questions.iter().all(|q| q.correct_answer == Some(AnswerOption::A)));
    }

    #[test]
    fn test_activity_incomplete_question() {
        let mut draft = ActivityDraft::new();
        draft.title = "Quiz".into();
        draft.description = "d".into();
        filled(&mut draft, 5);
        draft.update_question(2, QuestionField::OptionC, "  ");

        assert_eq!(
            draft.validate(1).unwrap_err().get("questions"),
            Some("Question 3 is incomplete")
        );
    }

    #[test]
    fn test_poll_drops_answers() {
        let mut draft = ActivityDraft::new();
        draft.title = "Poll".into();
        draft.description = "Favourite dino".into();
        filled(&mut draft, 5);
        draft.set_answer(0, AnswerOption::C);

        draft.set_kind(ActivityKind::Enquete);
        draft.set_answer(0, AnswerOption::B);
        let input = draft.validate(1).unwrap();
        assert!(input.questions.iter().all(|q| q.correct_answer.is_none()));

        draft.set_kind(ActivityKind::Quiz);
        assert_eq!(draft.questions()[0].correct_answer, Some(AnswerOption::A));
    }

    #[test]
    fn test_cannot_remove_last_question() {
        let mut draft = ActivityDraft::new();
        assert!(!draft.remove_question(0));
        draft.add_question();
        assert!(draft.remove_question(0));
        assert!(!draft.remove_question(5));
        assert_eq!(draft.questions().len(), 1);
    }
}
