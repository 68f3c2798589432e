use rand::Rng;
use serde::Serialize;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResetStep {
    AwaitingIdentity,
    AwaitingCode,
    AwaitingNewPassword,
    Done,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResetError {
    #[error("Please fill in all fields")]
    MissingIdentity,
    #[error("Please enter the verification code")]
    MissingCode,
    #[error("Invalid verification code. Please try again.")]
    InvalidCode,
    #[error("Please fill in all password fields")]
    MissingPassword,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("This action is not available at the current step")]
    WrongStep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetIdentity {
    pub user_id: String,
    pub email: String,
}

/// Forgot-password wizard. Every failed check leaves the flow exactly as it
/// was; there is no attempt limit.
#[derive(Debug, Clone)]
pub struct ResetFlow {
    step: ResetStep,
    identity: Option<ResetIdentity>,
    code: Option<String>,
}

impl Default for ResetFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ResetFlow {
    pub fn new() -> Self {
        Self {
            step: ResetStep::AwaitingIdentity,
            identity: None,
            code: None,
        }
    }

    pub fn step(&self) -> ResetStep {
        self.step
    }

    pub fn identity(&self) -> Option<&ResetIdentity> {
        self.identity.as_ref()
    }

    /// Returns the generated code; the caller is responsible for delivering it.
    pub fn submit_identity<R: Rng>(
        &mut self,
        user_id: &str,
        email: &str,
        rng: &mut R,
    ) -> Result<String, ResetError> {
        self.expect_step(ResetStep::AwaitingIdentity)?;
        let user_id = user_id.trim();
        let email = email.trim();
        if user_id.is_empty() || email.is_empty() {
            return Err(ResetError::MissingIdentity);
        }

        let code = generate_code(rng);
        self.identity = Some(ResetIdentity {
            user_id: user_id.to_string(),
            email: email.to_string(),
        });
        self.code = Some(code.clone());
        self.step = ResetStep::AwaitingCode;
        Ok(code)
    }

    pub fn verify_code(&mut self, entered: &str) -> Result<(), ResetError> {
        self.expect_step(ResetStep::AwaitingCode)?;
        if entered.is_empty() {
            return Err(ResetError::MissingCode);
        }
        if self.code.as_deref() != Some(entered) {
            return Err(ResetError::InvalidCode);
        }
        self.step = ResetStep::AwaitingNewPassword;
        Ok(())
    }

    /// Replaces the pending code. The previous code stops verifying.
    pub fn resend<R: Rng>(&mut self, rng: &mut R) -> Result<String, ResetError> {
        self.expect_step(ResetStep::AwaitingCode)?;
        let code = generate_code(rng);
        self.code = Some(code.clone());
        Ok(code)
    }

    pub fn back(&mut self) -> Result<ResetStep, ResetError> {
        self.step = match self.step {
            ResetStep::AwaitingCode => ResetStep::AwaitingIdentity,
            ResetStep::AwaitingNewPassword => ResetStep::AwaitingCode,
            _ => return Err(ResetError::WrongStep),
        };
        Ok(self.step)
    }

    pub fn complete<F>(
        &mut self,
        new_password: &str,
        confirm_password: &str,
        on_done: F,
    ) -> Result<(), ResetError>
    where
        F: FnOnce(&ResetIdentity, &str),
    {
        self.expect_step(ResetStep::AwaitingNewPassword)?;
        if new_password.is_empty() || confirm_password.is_empty() {
            return Err(ResetError::MissingPassword);
        }
        if new_password != confirm_password {
            return Err(ResetError::PasswordMismatch);
        }
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ResetError::PasswordTooShort);
        }
        let identity = self.identity.as_ref().ok_or(ResetError::WrongStep)?;

        self.step = ResetStep::Done;
        self.code = None;
        on_done(identity, new_password);
        Ok(())
    }

    fn expect_step(&self, step: ResetStep) -> Result<(), ResetError> {
        if self.step == step {
            Ok(())
        } else {
            Err(ResetError::WrongStep)
        }
    }
}

fn generate_code<R: Rng>(rng: &mut R) -> String {
    rng.gen_range(100_000..=999_999u32).to_string()
}
