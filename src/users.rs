use crate::context::Context;
use crate::contract::Variant;
use crate::error::{ShopError, ValidationErrors};
use crate::validate;
use serde::Serialize;
use sha2::{Digest, Sha256};

pub const MAX_AGE: i32 = 150;

fn digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    username: String,
    email: String,
    age: i32,
    #[serde(skip)]
    password_digest: String,
}

impl User {
    /// Validates every field and reports all failures at once.
    pub fn register(
        ctx: &Context,
        username: &str,
        email: &str,
        password: &str,
        age: i32,
    ) -> Result<Self, Vec<ShopError>> {
        let mut errors = ValidationErrors::new();
        errors.check(validate::non_empty("username", username));
        errors.check(validate::email("email", email));
        errors.check(validate::min_length(
            "password",
            password,
            ctx.config.min_password_length,
        ));
        errors.check(validate::in_range("age", age, 0, MAX_AGE));

        errors.into_result(()).map(|()| Self {
            username: username.trim().to_string(),
            email: email.to_ascii_lowercase(),
            age,
            password_digest: digest(password),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn verify_password(&self, candidate: &str) -> bool {
        digest(candidate) == self.password_digest
    }

    pub fn change_email(&mut self, email: &str) -> crate::error::Result<()> {
        validate::email("email", email)?;
        self.email = email.to_ascii_lowercase();
        Ok(())
    }
}

impl Variant for User {
    fn kind(&self) -> &'static str {
        "User"
    }

    fn label(&self) -> String {
        format!("{} <{}>", self.username, self.email)
    }
}
