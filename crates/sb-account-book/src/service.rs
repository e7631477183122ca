//! # Account Book Script Service
//!
//! Entry point of one validation run: dispatch, guard the immutable
//! configuration, then hand off to the transition's validator.
//!
//! ```text
//! dispatch ──→ Creation ──→ validate_creation
//!          └─→ Update ──→ check_immutable ──→ Selling    ──→ validate_selling
//!                                         └─→ Withdrawal ──→ validate_withdrawal
//! ```

use crate::config::ScriptConfig;
use crate::domain::{check_immutable, Transition};
use crate::errors::AccountBookError;
use crate::instrumentation::Profiler;
use crate::ports::Host;
use crate::validators::creation::validate_creation;
use crate::validators::dispatcher::dispatch;
use crate::validators::selling::validate_selling;
use crate::validators::withdrawal::validate_withdrawal;
use tracing::{debug, error};

/// One execution of the account book type script.
pub struct AccountBookScript<'a, H: ?Sized> {
    host: &'a H,
    config: ScriptConfig,
    profiler: Option<Profiler<'a>>,
}

impl<'a, H: Host + ?Sized> AccountBookScript<'a, H> {
    /// Bind the script to a host.
    pub fn new(host: &'a H, config: ScriptConfig) -> Self {
        Self {
            host,
            config,
            profiler: None,
        }
    }

    /// Record per-phase cycle counts.
    #[must_use]
    pub fn with_profiler(mut self, profiler: Profiler<'a>) -> Self {
        self.profiler = Some(profiler);
        self
    }

    /// The profiler, if one was attached.
    pub fn profiler(&self) -> Option<&Profiler<'a>> {
        self.profiler.as_ref()
    }

    /// Validate the transaction, returning the transition it performs.
    pub fn run(&mut self) -> Result<Transition, AccountBookError> {
        let result = self.validate();
        match &result {
            Ok(transition) => debug!(transition = transition.as_str(), "account book accepted"),
            Err(e) => error!(
                kind = ?e.kind(),
                exit_code = e.exit_code(),
                error = %e,
                "account book rejected"
            ),
        }
        result
    }

    /// Run and map the outcome to a process exit code (0 = accept).
    pub fn exit_code(&mut self) -> i8 {
        match self.run() {
            Ok(_) => 0,
            Err(e) => e.exit_code(),
        }
    }

    fn checkpoint(&mut self, label: &'static str) {
        if let Some(profiler) = self.profiler.as_mut() {
            profiler.checkpoint(label);
        }
    }

    fn validate(&mut self) -> Result<Transition, AccountBookError> {
        let (transition, ctx) = dispatch(self.host, &self.config)?;
        self.checkpoint("dispatch");

        match (&ctx.old, transition) {
            (None, Transition::Creation) => {
                validate_creation(self.host, &self.config, &ctx)?;
            }
            (Some(old), Transition::Selling) => {
                check_immutable(old, &ctx.new)?;
                self.checkpoint("guard");
                validate_selling(self.host, &self.config, &ctx, old)?;
            }
            (Some(old), Transition::Withdrawal) => {
                check_immutable(old, &ctx.new)?;
                self.checkpoint("guard");
                validate_withdrawal(self.host, &self.config, &ctx, old)?;
            }
            _ => {
                return Err(AccountBookError::shape(
                    "transition does not match group shape",
                ))
            }
        }
        self.checkpoint(transition.as_str());
        Ok(transition)
    }
}

/// Validate without profiling.
pub fn validate<H: Host + ?Sized>(
    host: &H,
    config: &ScriptConfig,
) -> Result<Transition, AccountBookError> {
    AccountBookScript::new(host, config.clone()).run()
}

/// Process entry: 0 on accept, the error's exit code otherwise.
pub fn program_entry<H: Host + ?Sized>(host: &H, config: &ScriptConfig) -> i8 {
    AccountBookScript::new(host, config.clone()).exit_code()
}
